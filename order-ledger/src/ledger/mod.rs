//! Ledger Core - pure stock-counter transitions
//!
//! Computes the next counter state for a product given a lifecycle
//! event and the current counters. No I/O; callers persist the result.
//!
//! # Transition rules
//!
//! ```text
//! place(q)
//!     baked, quantity >= q   quantity -= q; in_stock += q; from_stock = true
//!     baked, quantity <  q   amount += q;                  from_stock = false
//!     ready                  quantity = max(0, quantity - q); in_stock += q
//!
//! cancel(q, from_stock)
//!     from_stock = true      in_stock = max(0, in_stock - q); quantity += q
//!     from_stock = false     reduction = min(q, amount);
//!                            amount -= reduction; reject += reduction
//!
//! reject_promised(q)         same arithmetic as the promise cancel branch,
//!                            fails when no promised quantity is outstanding
//!
//! revert_placement(q, from_stock)
//!                            undo of place for an order that was never
//!                            persisted; releases amount without a reject
//! ```
//!
//! Reductions are always clamped; a double-cancel shrinks the remaining
//! bucket instead of driving any counter negative.


use shared::models::{ProductType, StockCounters};
use shared::{LedgerError, LedgerResult};

/// Result of applying an order-placed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub counters: StockCounters,
    /// Recorded on the order at creation; drives the inverse transition
    pub from_stock: bool,
}

/// Upper bound on a single event quantity; keeps the counters far away
/// from i64 overflow.
pub const MAX_EVENT_QUANTITY: i64 = 9_999;

fn check_qty(qty: i64) -> LedgerResult<()> {
    if qty <= 0 {
        return Err(LedgerError::validation(format!(
            "event quantity must be positive, got {qty}"
        )));
    }
    if qty > MAX_EVENT_QUANTITY {
        return Err(LedgerError::validation(format!(
            "event quantity exceeds {MAX_EVENT_QUANTITY}, got {qty}"
        )));
    }
    Ok(())
}

/// Order-placed transition
pub fn place(
    counters: &StockCounters,
    product_type: ProductType,
    qty: i64,
) -> LedgerResult<Placement> {
    check_qty(qty)?;
    let mut next = *counters;
    let from_stock = match product_type {
        ProductType::Baked => {
            if counters.quantity >= qty {
                next.quantity -= qty;
                next.in_stock_quantity += qty;
                true
            } else {
                // Promise beyond stock: on-hand counters stay as they are
                next.amount += qty;
                false
            }
        }
        ProductType::Ready => {
            // Ready items are never promise-only
            next.quantity = (counters.quantity - qty).max(0);
            next.in_stock_quantity += qty;
            true
        }
    };
    Ok(Placement {
        counters: next,
        from_stock,
    })
}

/// Order-cancelled transition, keyed by the `from_stock` flag stored on
/// the order at placement time (never recomputed).
pub fn cancel(counters: &StockCounters, qty: i64, from_stock: bool) -> LedgerResult<StockCounters> {
    check_qty(qty)?;
    let mut next = *counters;
    if from_stock {
        next.in_stock_quantity = (counters.in_stock_quantity - qty).max(0);
        next.quantity += qty;
    } else {
        let reduction = qty.min(counters.amount);
        next.amount -= reduction;
        next.reject_amount += reduction;
        // Hard invariant: the promise branch never touches on-hand stock.
        // Discard the whole transition if it somehow did.
        if next.quantity != counters.quantity
            || next.in_stock_quantity != counters.in_stock_quantity
        {
            return Err(LedgerError::invariant(
                "promise-path cancellation touched on-hand counters",
            ));
        }
    }
    Ok(next)
}

/// Reversal of a placement whose order was never persisted.
///
/// Unlike [`cancel`], the promise branch releases `amount` without
/// recording a reject: an order that was never placed was never
/// cancelled, so the cumulative reject tally must not move.
pub fn revert_placement(
    counters: &StockCounters,
    qty: i64,
    from_stock: bool,
) -> LedgerResult<StockCounters> {
    check_qty(qty)?;
    let mut next = *counters;
    if from_stock {
        next.in_stock_quantity = (counters.in_stock_quantity - qty).max(0);
        next.quantity += qty;
    } else {
        next.amount -= qty.min(counters.amount);
    }
    Ok(next)
}

/// Operator reject of promised units, outside any order cancellation.
/// Valid only while promised quantity is outstanding.
pub fn reject_promised(counters: &StockCounters, qty: i64) -> LedgerResult<StockCounters> {
    check_qty(qty)?;
    if counters.amount == 0 {
        return Err(LedgerError::InsufficientPromisedQuantity);
    }
    let mut next = *counters;
    let reduction = qty.min(counters.amount);
    next.amount -= reduction;
    next.reject_amount += reduction;
    Ok(next)
}
