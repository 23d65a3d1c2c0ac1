//! Bakery order ledger service
//!
//! The inventory/order reconciliation core: ledger transitions over the
//! four stock counters, the order lifecycle manager, refund-fee
//! computation, and unique order-code generation. The document store
//! backing products, orders, and refunds is an external collaborator
//! reached through the traits in [`store`].

pub mod codegen;
pub mod config;
pub mod ledger;
pub mod logging;
pub mod notify;
pub mod orders;
pub mod refund;
pub mod store;

// Re-exports
pub use config::Config;
pub use notify::{LogNotifier, Notifier};
pub use orders::OrderManager;
pub use store::memory::MemoryStore;
pub use store::{OrderStore, ProductStore, RefundStore, StoreError};
