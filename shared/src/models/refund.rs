//! Refund Model

use crate::models::PaymentType;
use serde::{Deserialize, Serialize};

/// Refund status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    #[default]
    Pending,
    Processed,
    Failed,
}

/// Refund entity, created exactly once when a card-paid order is cancelled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub id: Option<String>,
    /// Order reference (String ID)
    pub order_id: String,
    /// Amount originally paid, minor units
    pub original_amount: i64,
    /// Channel service fee withheld, minor units
    pub service_fee: i64,
    /// Amount returned to the customer, minor units
    pub refund_amount: i64,
    pub payment_type: PaymentType,
    pub status: RefundStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
