//! Unified error type for the order ledger
//!
//! Every fallible operation in the ledger core and the lifecycle
//! manager returns [`LedgerResult`]. Store-level failures are mapped
//! into this taxonomy at the service boundary.

use crate::models::OrderStatus;
use thiserror::Error;

/// Ledger and lifecycle errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Rejected before any store write (non-positive quantity, missing fields)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Manual reject requested while no promised quantity is outstanding
    #[error("Insufficient promised quantity")]
    InsufficientPromisedQuantity,

    /// Defensive check tripped; the operation was aborted and counters left unchanged
    #[error("Ledger invariant violation: {0}")]
    InvariantViolation(String),

    /// Transient store failure that survived the retry budget
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Unique-code retries exhausted; the weak fallback code was used
    #[error("Order code generation exhausted retry budget")]
    CodeGenerationExhausted,

    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Order creation aborted; no order is considered placed
    #[error("Order creation failed: {0}")]
    OrderCreationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    // ========== Convenient constructors ==========

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a NotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create an InvariantViolation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Create a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Create an OrderCreationFailed error
    pub fn creation_failed(message: impl Into<String>) -> Self {
        Self::OrderCreationFailed(message.into())
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Errors that should abort the single operation but leave stores untouched
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
