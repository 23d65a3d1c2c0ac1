//! In-memory store backend
//!
//! Backs tests and local development. Each collection is a
//! `RwLock<HashMap>`; the counter CAS holds the write lock for the
//! whole compare-and-swap, which is what gives it its atomicity.

use super::{OrderStore, ProductStore, RefundStore, StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{Order, OrderStatus, Product, Refund, RefundStatus, StockCounters};
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory document store implementing all three collections
#[derive(Clone, Default)]
pub struct MemoryStore {
    products: Arc<RwLock<HashMap<String, Product>>>,
    orders: Arc<RwLock<HashMap<String, Order>>>,
    refunds: Arc<RwLock<HashMap<String, Refund>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(prefix: &str) -> String {
        format!("{}:{}", prefix, uuid::Uuid::new_v4())
    }

    /// Number of orders held (test helper)
    pub fn order_count(&self) -> usize {
        self.orders.read().len()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("products", &self.products.read().len())
            .field("orders", &self.orders.read().len())
            .field("refunds", &self.refunds.read().len())
            .finish()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Product> {
        self.products
            .read()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, mut product: Product) -> StoreResult<String> {
        let id = product
            .id
            .clone()
            .unwrap_or_else(|| Self::next_id("product"));
        product.id = Some(id.clone());
        product.available = product.counters.available();
        self.products.write().insert(id.clone(), product);
        Ok(id)
    }

    async fn update_counters(
        &self,
        id: &str,
        expected: &StockCounters,
        new: &StockCounters,
    ) -> StoreResult<()> {
        let mut products = self.products.write();
        let product = products.get_mut(id).ok_or(StoreError::NotFound)?;
        if product.counters != *expected {
            return Err(StoreError::Conflict);
        }
        product.counters = *new;
        product.available = new.available();
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Order> {
        self.orders
            .read()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, mut order: Order) -> StoreResult<String> {
        let id = order.id.clone().unwrap_or_else(|| Self::next_id("order"));
        order.id = Some(id.clone());
        self.orders.write().insert(id.clone(), order);
        Ok(id)
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> StoreResult<()> {
        let mut orders = self.orders.write();
        let order = orders.get_mut(id).ok_or(StoreError::NotFound)?;
        order.status = status;
        if status == OrderStatus::Cancelled {
            order.cancelled_at = Some(chrono::Utc::now());
        }
        Ok(())
    }

    async fn attach_refund(
        &self,
        id: &str,
        refund_id: &str,
        refund_amount: i64,
        refund_status: RefundStatus,
    ) -> StoreResult<()> {
        let mut orders = self.orders.write();
        let order = orders.get_mut(id).ok_or(StoreError::NotFound)?;
        order.refund_id = Some(refund_id.to_string());
        order.refund_amount = Some(refund_amount);
        order.refund_status = Some(refund_status);
        Ok(())
    }

    async fn code_exists(&self, code: &str) -> StoreResult<bool> {
        Ok(self
            .orders
            .read()
            .values()
            .any(|o| o.order_unique_id == code))
    }
}

#[async_trait]
impl RefundStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Refund> {
        self.refunds
            .read()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, mut refund: Refund) -> StoreResult<String> {
        let id = refund.id.clone().unwrap_or_else(|| Self::next_id("refund"));
        refund.id = Some(id.clone());
        self.refunds.write().insert(id.clone(), refund);
        Ok(id)
    }
}
