//! Data models
//!
//! Shared between the order-ledger service and any API surface.
//! Money fields are integer minor units (i64).

pub mod order;
pub mod product;
pub mod refund;

// Re-exports
pub use order::*;
pub use product::*;
pub use refund::*;
