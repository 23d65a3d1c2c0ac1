//! OrderManager - Order lifecycle orchestration
//!
//! Coordinates code generation, ledger transitions, and persistence:
//!
//! ```text
//! create_order(draft)
//!     ├─ 1. Validate the draft
//!     ├─ 2. Generate a unique order code
//!     ├─ 3. CAS-loop the placement transition onto the product counters
//!     ├─ 4. Persist the order (compensating reversal on failure)
//!     └─ 5. Emit notification (logged-only on failure)
//!
//! cancel_order(id)
//!     ├─ 1. Load order, validate the transition
//!     ├─ 2. Write status = cancelled (authoritative)
//!     ├─ 3. Best-effort ledger repair via the stored from_stock flag
//!     └─ 4. Card payments: compute refund, persist it, attach to order
//! ```
//!
//! The product counters are the only shared mutable resource; the
//! conditional `update_counters` write is the serialization point for
//! concurrent placements against the same product.

use crate::config::Config;
use crate::notify::Notifier;
use crate::store::retry::with_retry;
use crate::store::{OrderStore, ProductStore, RefundStore, StoreError};
use crate::{codegen, ledger, refund};
use shared::models::{
    Order, OrderDraft, OrderStatus, PaymentMethod, PaymentType, Product, ProductType, Refund,
    RefundStatus, StockCounters,
};
use shared::{LedgerError, LedgerResult};
use std::sync::Arc;
use validator::Validate;

fn map_store(e: StoreError, resource: &str) -> LedgerError {
    match e {
        StoreError::NotFound => LedgerError::not_found(resource),
        StoreError::Conflict => {
            LedgerError::internal(format!("unexpected write conflict on {resource}"))
        }
        StoreError::Unavailable(msg) => LedgerError::store_unavailable(msg),
    }
}

/// Order lifecycle manager
///
/// Explicitly constructed with its collaborators; one instance can be
/// shared across tasks behind an `Arc`.
pub struct OrderManager {
    products: Arc<dyn ProductStore>,
    orders: Arc<dyn OrderStore>,
    refunds: Arc<dyn RefundStore>,
    notifier: Arc<dyn Notifier>,
    config: Config,
}

impl std::fmt::Debug for OrderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderManager")
            .field("config", &self.config)
            .finish()
    }
}

impl OrderManager {
    pub fn new(
        products: Arc<dyn ProductStore>,
        orders: Arc<dyn OrderStore>,
        refunds: Arc<dyn RefundStore>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        Self {
            products,
            orders,
            refunds,
            notifier,
            config,
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn get_product(&self, id: &str) -> LedgerResult<Product> {
        with_retry(&self.config, "read product", || async move {
            self.products.get(id).await
        })
        .await
        .map_err(|e| map_store(e, "Product"))
    }

    pub async fn get_order(&self, id: &str) -> LedgerResult<Order> {
        with_retry(&self.config, "read order", || async move {
            self.orders.get(id).await
        })
        .await
        .map_err(|e| map_store(e, "Order"))
    }

    // ========================================================================
    // Lifecycle operations
    // ========================================================================

    /// Place an order.
    ///
    /// Either both the order record and the counter update are visible,
    /// or the call fails and no order is considered placed: a failed
    /// order persist triggers a compensating counter reversal.
    pub async fn create_order(&self, draft: OrderDraft) -> LedgerResult<Order> {
        draft
            .validate()
            .map_err(|e| LedgerError::validation(e.to_string()))?;

        let code = codegen::generate_unique_order_code(self.orders.as_ref(), &self.config).await?;

        let quantity = draft.quantity;
        let from_stock = self
            .swap_counters(&draft.cake_id, "apply order placement", |product| {
                let placement = ledger::place(&product.counters, product.product_type, quantity)?;
                Ok((placement.counters, placement.from_stock))
            })
            .await?;

        let mut order = Order {
            id: None,
            order_unique_id: code,
            cake_id: draft.cake_id.clone(),
            quantity,
            total_price: draft.total_price,
            status: OrderStatus::Pending,
            from_stock,
            payment_method: draft.payment_method,
            payment_type: draft.payment_type,
            refund_id: None,
            refund_amount: None,
            refund_status: None,
            created_at: chrono::Utc::now(),
            cancelled_at: None,
        };

        let created = with_retry(&self.config, "persist order", || {
            let order = order.clone();
            async move { self.orders.create(order).await }
        })
        .await;

        match created {
            Ok(id) => order.id = Some(id),
            Err(e) => {
                // Put the stock back before failing the whole operation
                if let Err(comp) = self
                    .undo_placement(&draft.cake_id, quantity, from_stock)
                    .await
                {
                    tracing::error!(
                        cake_id = %draft.cake_id,
                        error = %comp,
                        "Compensating counter reversal failed, counters need manual reconciliation"
                    );
                }
                return Err(LedgerError::creation_failed(e.to_string()));
            }
        }

        if let Err(e) = self.notifier.order_placed(&order).await {
            tracing::warn!(code = %order.order_unique_id, error = %e, "Order notification failed");
        }
        tracing::info!(
            order_id = ?order.id,
            code = %order.order_unique_id,
            cake_id = %order.cake_id,
            from_stock,
            "Order created"
        );
        Ok(order)
    }

    /// Cancel an order.
    ///
    /// The status write is authoritative: ledger repair and the refund
    /// path run afterwards and are logged, never propagated, so a
    /// half-failed cancellation still leaves the order cancelled.
    pub async fn cancel_order(&self, order_id: &str) -> LedgerResult<Order> {
        let order = self.get_order(order_id).await?;
        if !order.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(LedgerError::InvalidStatusTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        with_retry(&self.config, "cancel order status", || async move {
            self.orders
                .update_status(order_id, OrderStatus::Cancelled)
                .await
        })
        .await
        .map_err(|e| map_store(e, "Order"))?;

        // Best-effort ledger repair keyed by the stored from_stock flag
        if let Err(e) = self
            .reverse_placement(&order.cake_id, order.quantity, order.from_stock)
            .await
        {
            tracing::warn!(
                order_id,
                cake_id = %order.cake_id,
                error = %e,
                "Ledger repair after cancellation failed, counters need manual reconciliation"
            );
        }

        let mut order = self.get_order(order_id).await?;

        if order.payment_method == PaymentMethod::Card {
            if let Err(e) = self.record_refund(order_id, &mut order).await {
                tracing::warn!(order_id, error = %e, "Refund recording failed for cancelled order");
            }
        }

        if let Err(e) = self.notifier.order_cancelled(&order).await {
            tracing::warn!(code = %order.order_unique_id, error = %e, "Cancellation notification failed");
        }
        tracing::info!(order_id, code = %order.order_unique_id, "Order cancelled");
        Ok(order)
    }

    /// Transition an order's status through the validated graph.
    /// A `Cancelled` target always takes the full cancellation path,
    /// refund check included.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
    ) -> LedgerResult<Order> {
        if new_status == OrderStatus::Cancelled {
            return self.cancel_order(order_id).await;
        }

        let order = self.get_order(order_id).await?;
        if !order.status.can_transition_to(new_status) {
            return Err(LedgerError::InvalidStatusTransition {
                from: order.status,
                to: new_status,
            });
        }

        with_retry(&self.config, "update order status", || async move {
            self.orders.update_status(order_id, new_status).await
        })
        .await
        .map_err(|e| map_store(e, "Order"))?;

        tracing::info!(order_id, status = ?new_status, "Order status updated");
        self.get_order(order_id).await
    }

    /// Operator reject of promised units, without an order cancellation.
    /// Only baked products carry promised quantity.
    pub async fn reject_promised_quantity(
        &self,
        product_id: &str,
        quantity: i64,
        reason: Option<String>,
    ) -> LedgerResult<Product> {
        self.swap_counters(product_id, "reject promised quantity", |product| {
            if product.product_type != ProductType::Baked {
                return Err(LedgerError::validation(
                    "only baked products carry promised quantity",
                ));
            }
            Ok((ledger::reject_promised(&product.counters, quantity)?, ()))
        })
        .await?;

        tracing::info!(product_id, quantity, reason = ?reason, "Promised quantity rejected");
        self.get_product(product_id).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Read-compute-swap loop for the product counters. The transition
    /// closure is re-run against fresh counters whenever the
    /// conditional write loses a race.
    async fn swap_counters<T, F>(
        &self,
        product_id: &str,
        op_name: &str,
        transition: F,
    ) -> LedgerResult<T>
    where
        F: Fn(&Product) -> LedgerResult<(StockCounters, T)>,
    {
        for attempt in 0..self.config.counter_cas_attempts {
            let product = self.get_product(product_id).await?;
            let (next, outcome) = transition(&product)?;

            let expected = product.counters;
            let written = with_retry(&self.config, op_name, || async move {
                self.products
                    .update_counters(product_id, &expected, &next)
                    .await
            })
            .await;

            match written {
                Ok(()) => return Ok(outcome),
                Err(StoreError::Conflict) => {
                    tracing::debug!(product_id, attempt, op = op_name, "Counter CAS lost race, retrying");
                }
                Err(e) => return Err(map_store(e, "Product")),
            }
        }
        Err(LedgerError::store_unavailable(format!(
            "counter update contention exceeded {} attempts",
            self.config.counter_cas_attempts
        )))
    }

    /// Inverse ledger transition for a cancelled order
    async fn reverse_placement(
        &self,
        product_id: &str,
        quantity: i64,
        from_stock: bool,
    ) -> LedgerResult<()> {
        self.swap_counters(product_id, "reverse order placement", |product| {
            Ok((ledger::cancel(&product.counters, quantity, from_stock)?, ()))
        })
        .await
    }

    /// Compensating reversal for an order that failed to persist. Not a
    /// cancellation: the promise branch must leave the reject tally alone.
    async fn undo_placement(
        &self,
        product_id: &str,
        quantity: i64,
        from_stock: bool,
    ) -> LedgerResult<()> {
        self.swap_counters(product_id, "undo order placement", |product| {
            Ok((
                ledger::revert_placement(&product.counters, quantity, from_stock)?,
                (),
            ))
        })
        .await
    }

    /// Compute and persist the refund for a cancelled card-paid order
    async fn record_refund(&self, order_id: &str, order: &mut Order) -> LedgerResult<()> {
        let fee = refund::service_fee(order.payment_type);
        let amount = refund::refund_amount(order.total_price, order.payment_type);
        let record = Refund {
            id: None,
            order_id: order_id.to_string(),
            original_amount: order.total_price,
            service_fee: fee,
            refund_amount: amount,
            payment_type: order.payment_type.unwrap_or(PaymentType::Other),
            status: RefundStatus::Pending,
            created_at: chrono::Utc::now(),
        };

        let refund_id = with_retry(&self.config, "persist refund", || {
            let record = record.clone();
            async move { self.refunds.create(record).await }
        })
        .await
        .map_err(|e| map_store(e, "Refund"))?;

        with_retry(&self.config, "attach refund to order", || {
            let refund_id = refund_id.clone();
            async move {
                self.orders
                    .attach_refund(order_id, &refund_id, amount, RefundStatus::Pending)
                    .await
            }
        })
        .await
        .map_err(|e| map_store(e, "Order"))?;

        order.refund_id = Some(refund_id.clone());
        order.refund_amount = Some(amount);
        order.refund_status = Some(RefundStatus::Pending);

        let mut persisted = record;
        persisted.id = Some(refund_id);
        if let Err(e) = self.notifier.refund_requested(order, &persisted).await {
            tracing::warn!(order_id, error = %e, "Refund notification failed");
        }
        Ok(())
    }
}
