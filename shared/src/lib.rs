//! Shared types for the bakery order ledger
//!
//! Data models and the unified error type used by the order-ledger
//! service crate and any future API surface.

pub mod error;
pub mod models;

// Re-exports
pub use error::{LedgerError, LedgerResult};
