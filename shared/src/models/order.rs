//! Order Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order status
///
/// The transition graph is enforced; the legacy system accepted any
/// status write, which made `pending -> delivered` jumps possible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Preparing,
    Ready,
    Delivering,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether `self -> next` is a legal transition
    ///
    /// Cancellation is reachable from every state before `Delivering`;
    /// `Delivered` and `Cancelled` are terminal.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (*self, next),
            (Pending, Accepted)
                | (Pending, Cancelled)
                | (Accepted, Preparing)
                | (Accepted, Cancelled)
                | (Preparing, Ready)
                | (Preparing, Cancelled)
                | (Ready, Delivering)
                | (Ready, Cancelled)
                | (Delivering, Delivered)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// Card payment channel
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Click,
    Payme,
    Visa,
    /// Unrecognized channel; charged the default service fee
    Other,
}

// Unknown channels fall back to `Other` instead of failing the record
impl<'de> Deserialize<'de> for PaymentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "click" => PaymentType::Click,
            "payme" => PaymentType::Payme,
            "visa" => PaymentType::Visa,
            _ => PaymentType::Other,
        })
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<String>,
    /// Human-facing 8-character code, unique among live orders
    pub order_unique_id: String,
    /// Product reference (String ID)
    pub cake_id: String,
    pub quantity: i64,
    /// Total in minor units
    pub total_price: i64,
    pub status: OrderStatus,
    /// True if satisfied from on-hand stock at placement, false if
    /// promised beyond stock. Immutable once set; the sole source of
    /// truth for how cancellation reverses the ledger.
    pub from_stock: bool,
    pub payment_method: PaymentMethod,
    /// Set when `payment_method` is card
    pub payment_type: Option<PaymentType>,
    pub refund_id: Option<String>,
    pub refund_amount: Option<i64>,
    pub refund_status: Option<crate::models::RefundStatus>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderDraft {
    #[validate(length(min = 1, message = "product reference is required"))]
    pub cake_id: String,
    #[validate(range(min = 1, max = 9999, message = "quantity out of range"))]
    pub quantity: i64,
    #[validate(range(min = 0, message = "total price cannot be negative"))]
    pub total_price: i64,
    pub payment_method: PaymentMethod,
    pub payment_type: Option<PaymentType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_admit_nothing() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn status_skips_are_rejected() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Accepted.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Accepted));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivering));
    }

    #[test]
    fn delivering_cannot_be_cancelled() {
        assert!(!OrderStatus::Delivering.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Delivering.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn unknown_payment_type_deserializes_as_other() {
        let t: PaymentType = serde_json::from_str("\"humo\"").unwrap();
        assert_eq!(t, PaymentType::Other);
    }
}
