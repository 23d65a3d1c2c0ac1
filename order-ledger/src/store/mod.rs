//! Store abstraction over the external document database
//!
//! The ledger core only needs keyed reads, creates, field updates, and
//! one conditional write: the compare-and-swap on product counters that
//! serializes concurrent placements. Every write publishes a whole
//! coherent record state, so subscribers of the backing store never
//! observe partial field updates.

pub mod memory;
pub mod retry;

use async_trait::async_trait;
use shared::models::{Order, OrderStatus, Product, Refund, RefundStatus, StockCounters};
use thiserror::Error;

/// Store-level errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    /// Conditional write lost the race; caller re-reads and retries
    #[error("Conditional write conflict")]
    Conflict,

    /// Transient failure, eligible for bounded retry
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Product collection
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Product>;

    async fn create(&self, product: Product) -> StoreResult<String>;

    /// Conditionally replace the stock counters: succeeds only when the
    /// stored counters still equal `expected`, otherwise [`StoreError::Conflict`].
    /// The derived `available` flag is recomputed from `new.quantity`
    /// in the same write.
    async fn update_counters(
        &self,
        id: &str,
        expected: &StockCounters,
        new: &StockCounters,
    ) -> StoreResult<()>;
}

/// Order collection
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Order>;

    async fn create(&self, order: Order) -> StoreResult<String>;

    /// Write the new status; a `Cancelled` write also stamps `cancelled_at`.
    async fn update_status(&self, id: &str, status: OrderStatus) -> StoreResult<()>;

    /// Attach refund bookkeeping fields to a cancelled order
    async fn attach_refund(
        &self,
        id: &str,
        refund_id: &str,
        refund_amount: i64,
        refund_status: RefundStatus,
    ) -> StoreResult<()>;

    /// Uniqueness probe for order codes (query by `order_unique_id`)
    async fn code_exists(&self, code: &str) -> StoreResult<bool>;
}

/// Refund collection
#[async_trait]
pub trait RefundStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Refund>;

    async fn create(&self, refund: Refund) -> StoreResult<String>;
}
