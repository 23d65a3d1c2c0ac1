//! Unique order-code generation
//!
//! Human-facing 8-character codes drawn from `[A-Z0-9]`, checked for
//! uniqueness against the order collection. After the retry budget is
//! spent, falls back to a timestamp-plus-random composite. The fallback
//! has no formal collision guarantee; it is kept as legacy behavior and
//! logged loudly when it fires.

use crate::config::Config;
use crate::store::{OrderStore, retry::with_retry};
use rand::Rng;
use shared::{LedgerError, LedgerResult};

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 8;

fn random_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// Legacy fallback: last 4 digits of the millisecond timestamp plus 4
/// random base-36 characters.
fn fallback_code() -> String {
    let tail = chrono::Utc::now().timestamp_millis().rem_euclid(10_000);
    let mut rng = rand::thread_rng();
    let rand4: String = (0..4)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect();
    // 4 timestamp digits + 4 random chars = 8
    format!("{tail:04}{rand4}")
}

/// Generate a unique order code, consulting the order store.
///
/// Collisions are re-drawn up to `code_retry_attempts` times; on
/// exhaustion the weak fallback code is returned rather than failing
/// the order.
pub async fn generate_unique_order_code(
    orders: &dyn OrderStore,
    config: &Config,
) -> LedgerResult<String> {
    for attempt in 0..config.code_retry_attempts {
        let code = random_code();
        let exists = with_retry(config, "order code uniqueness probe", || {
            let code = code.clone();
            async move { orders.code_exists(&code).await }
        })
        .await
        .map_err(|e| LedgerError::store_unavailable(e.to_string()))?;
        if !exists {
            return Ok(code);
        }
        tracing::debug!(attempt, code = %code, "Order code collision, redrawing");
    }

    let code = fallback_code();
    tracing::warn!(
        code = %code,
        error = %LedgerError::CodeGenerationExhausted,
        "Falling back to timestamp-composite order code"
    );
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use shared::models::{Order, OrderStatus, PaymentMethod};

    fn order_with_code(code: &str) -> Order {
        Order {
            id: None,
            order_unique_id: code.to_string(),
            cake_id: "product:cake".into(),
            quantity: 1,
            total_price: 1000,
            status: OrderStatus::Pending,
            from_stock: true,
            payment_method: PaymentMethod::Cash,
            payment_type: None,
            refund_id: None,
            refund_amount: None,
            refund_status: None,
            created_at: chrono::Utc::now(),
            cancelled_at: None,
        }
    }

    #[test]
    fn codes_are_eight_chars_from_the_charset() {
        for _ in 0..100 {
            let code = random_code();
            assert_eq!(code.len(), 8);
            assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
        }
        let fb = fallback_code();
        assert_eq!(fb.len(), 8);
    }

    #[tokio::test]
    async fn generated_code_avoids_existing_orders() {
        let store = MemoryStore::new();
        let config = Config::default();
        for i in 0..50 {
            OrderStore::create(&store, order_with_code(&format!("CODE{i:04}")))
                .await
                .unwrap();
        }
        let code = generate_unique_order_code(&store, &config).await.unwrap();
        assert!(!OrderStore::code_exists(&store, &code).await.unwrap());
    }

    #[tokio::test]
    async fn mass_generation_never_duplicates_within_retry_bound() {
        let store = MemoryStore::new();
        let config = Config::default();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            let code = generate_unique_order_code(&store, &config).await.unwrap();
            assert!(seen.insert(code.clone()), "duplicate code {code}");
            OrderStore::create(&store, order_with_code(&code)).await.unwrap();
        }
    }

    use crate::store::{StoreError, StoreResult};
    use shared::models::RefundStatus;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Order store whose uniqueness probe reports a collision for the
    /// first `collisions` draws, then a free code.
    struct CollidingOrderStore {
        collisions: AtomicU32,
        probes: AtomicU32,
    }

    impl CollidingOrderStore {
        fn new(collisions: u32) -> Self {
            Self {
                collisions: AtomicU32::new(collisions),
                probes: AtomicU32::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl OrderStore for CollidingOrderStore {
        async fn get(&self, _id: &str) -> StoreResult<Order> {
            Err(StoreError::NotFound)
        }

        async fn create(&self, _order: Order) -> StoreResult<String> {
            Err(StoreError::NotFound)
        }

        async fn update_status(&self, _id: &str, _status: OrderStatus) -> StoreResult<()> {
            Err(StoreError::NotFound)
        }

        async fn attach_refund(
            &self,
            _id: &str,
            _refund_id: &str,
            _refund_amount: i64,
            _refund_status: RefundStatus,
        ) -> StoreResult<()> {
            Err(StoreError::NotFound)
        }

        async fn code_exists(&self, _code: &str) -> StoreResult<bool> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            if self.collisions.load(Ordering::SeqCst) > 0 {
                self.collisions.fetch_sub(1, Ordering::SeqCst);
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }

    #[tokio::test]
    async fn collisions_are_redrawn_until_a_free_code() {
        let store = CollidingOrderStore::new(3);
        let config = Config::default();
        let code = generate_unique_order_code(&store, &config).await.unwrap();
        assert_eq!(store.probes.load(Ordering::SeqCst), 4);
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[tokio::test]
    async fn exhausted_retries_fall_back_to_composite_code() {
        // Every draw collides; the generator gives up after the
        // configured attempts and returns the timestamp composite
        let store = CollidingOrderStore::new(u32::MAX);
        let config = Config::default();
        let code = generate_unique_order_code(&store, &config).await.unwrap();
        assert_eq!(
            store.probes.load(Ordering::SeqCst),
            config.code_retry_attempts
        );
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
        // Timestamp tail first, random chars after
        assert!(code[..4].bytes().all(|b| b.is_ascii_digit()));
    }
}
