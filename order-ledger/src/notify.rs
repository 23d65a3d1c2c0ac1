//! Notification seam
//!
//! Delivery (push, SMS, back-office feeds) lives outside this core; the
//! lifecycle manager only needs somewhere to announce events. Failures
//! here are logged by the caller and never block an order.

use async_trait::async_trait;
use shared::models::{Order, Refund};

/// Outbound event sink for order lifecycle events
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn order_placed(&self, order: &Order) -> anyhow::Result<()>;

    async fn order_cancelled(&self, order: &Order) -> anyhow::Result<()>;

    async fn refund_requested(&self, order: &Order, refund: &Refund) -> anyhow::Result<()>;
}

/// Default sink that just traces the events
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_placed(&self, order: &Order) -> anyhow::Result<()> {
        tracing::info!(
            code = %order.order_unique_id,
            cake_id = %order.cake_id,
            quantity = order.quantity,
            from_stock = order.from_stock,
            "Order placed"
        );
        Ok(())
    }

    async fn order_cancelled(&self, order: &Order) -> anyhow::Result<()> {
        tracing::info!(code = %order.order_unique_id, "Order cancelled");
        Ok(())
    }

    async fn refund_requested(&self, order: &Order, refund: &Refund) -> anyhow::Result<()> {
        tracing::info!(
            code = %order.order_unique_id,
            refund_amount = refund.refund_amount,
            service_fee = refund.service_fee,
            "Refund requested"
        );
        Ok(())
    }
}
