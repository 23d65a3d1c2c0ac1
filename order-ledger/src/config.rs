//! Service configuration
//!
//! All knobs can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | STORE_RETRY_ATTEMPTS | 3 | Attempts per store operation before surfacing |
//! | STORE_RETRY_BASE_MS | 100 | Initial backoff delay |
//! | STORE_RETRY_CAP_MS | 2000 | Backoff ceiling |
//! | COUNTER_CAS_ATTEMPTS | 8 | Compare-and-swap retries on a contended product |
//! | CODE_RETRY_ATTEMPTS | 10 | Unique-code draws before the legacy fallback |

/// Ledger service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Attempts per store operation for transient failures
    pub store_retry_attempts: u32,
    /// Initial backoff delay (milliseconds)
    pub store_retry_base_ms: u64,
    /// Backoff ceiling (milliseconds)
    pub store_retry_cap_ms: u64,
    /// Counter compare-and-swap retries under contention
    pub counter_cas_attempts: u32,
    /// Unique-code generation attempts before falling back
    pub code_retry_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_retry_attempts: 3,
            store_retry_base_ms: 100,
            store_retry_cap_ms: 2000,
            counter_cas_attempts: 8,
            code_retry_attempts: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            store_retry_attempts: env_parse("STORE_RETRY_ATTEMPTS", defaults.store_retry_attempts),
            store_retry_base_ms: env_parse("STORE_RETRY_BASE_MS", defaults.store_retry_base_ms),
            store_retry_cap_ms: env_parse("STORE_RETRY_CAP_MS", defaults.store_retry_cap_ms),
            counter_cas_attempts: env_parse("COUNTER_CAS_ATTEMPTS", defaults.counter_cas_attempts),
            code_retry_attempts: env_parse("CODE_RETRY_ATTEMPTS", defaults.code_retry_attempts),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
