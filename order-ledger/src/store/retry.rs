//! Bounded retry for transient store failures
//!
//! Only [`StoreError::Unavailable`] is retried; `NotFound` and
//! `Conflict` carry meaning and are returned to the caller immediately.

use super::{StoreError, StoreResult};
use crate::config::Config;
use std::future::Future;
use std::time::Duration;

/// Run `op` with exponential backoff on transient failures.
///
/// Backoff doubles from `store_retry_base_ms` and is capped at
/// `store_retry_cap_ms`; after `store_retry_attempts` failures the last
/// error is surfaced.
pub async fn with_retry<T, F, Fut>(config: &Config, op_name: &str, mut op: F) -> StoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    let mut delay = Duration::from_millis(config.store_retry_base_ms);
    let cap = Duration::from_millis(config.store_retry_cap_ms);
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(StoreError::Unavailable(msg)) => {
                attempt += 1;
                if attempt >= config.store_retry_attempts {
                    tracing::error!(op = op_name, attempts = attempt, error = %msg, "Store retries exhausted");
                    return Err(StoreError::Unavailable(msg));
                }
                tracing::warn!(op = op_name, attempt, delay_ms = delay.as_millis() as u64, error = %msg, "Transient store error, retrying");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(cap);
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn transient_errors_are_retried_until_success() {
        let config = Config::default();
        let calls = AtomicU32::new(0);
        let result = with_retry(&config, "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(StoreError::Unavailable("flaky".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn conflict_is_not_retried() {
        let config = Config::default();
        let calls = AtomicU32::new(0);
        let result: StoreResult<()> = with_retry(&config, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(StoreError::Conflict) }
        })
        .await;
        assert!(matches!(result, Err(StoreError::Conflict)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_the_last_error() {
        let config = Config {
            store_retry_attempts: 2,
            store_retry_base_ms: 1,
            ..Config::default()
        };
        let result: StoreResult<()> = with_retry(&config, "test", || async {
            Err(StoreError::Unavailable("down".into()))
        })
        .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
