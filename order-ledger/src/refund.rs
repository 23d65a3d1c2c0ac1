//! Refund Calculator
//!
//! Pure fee-table computation for cancelled card-paid orders. The
//! channel fee is withheld from the original amount; the result never
//! goes below zero.

use shared::models::PaymentType;

/// Default fee applied when the channel is unknown
const DEFAULT_SERVICE_FEE: i64 = 2500;

/// Per-channel service fee in minor units
pub fn service_fee(payment_type: Option<PaymentType>) -> i64 {
    match payment_type {
        Some(PaymentType::Click) => 2000,
        Some(PaymentType::Payme) => 1500,
        Some(PaymentType::Visa) => 3000,
        Some(PaymentType::Other) | None => DEFAULT_SERVICE_FEE,
    }
}

/// Amount returned to the customer, net of the channel fee
pub fn refund_amount(original_amount: i64, payment_type: Option<PaymentType>) -> i64 {
    (original_amount - service_fee(payment_type)).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_table() {
        assert_eq!(refund_amount(100_000, Some(PaymentType::Click)), 98_000);
        assert_eq!(refund_amount(100_000, Some(PaymentType::Payme)), 98_500);
        assert_eq!(refund_amount(100_000, Some(PaymentType::Visa)), 97_000);
        assert_eq!(refund_amount(100_000, Some(PaymentType::Other)), 97_500);
        assert_eq!(refund_amount(100_000, None), 97_500);
    }

    #[test]
    fn fee_exceeding_amount_clamps_to_zero() {
        assert_eq!(refund_amount(1_000, Some(PaymentType::Click)), 0);
        assert_eq!(refund_amount(0, Some(PaymentType::Visa)), 0);
    }
}
