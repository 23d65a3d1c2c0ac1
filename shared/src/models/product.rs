//! Product Model

use serde::{Deserialize, Serialize};

/// How a product is fulfilled
///
/// The tag is required; a record without it is a data-migration error
/// and fails deserialization rather than being guessed from other fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Made-to-order; can be sold from stock or promised beyond stock
    Baked,
    /// Pre-stocked; always sold from available stock
    Ready,
}

/// The four stock counters moved by ledger transitions
///
/// All counters stay >= 0 at all times; excess reductions are clamped,
/// never allowed to go negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StockCounters {
    /// Units immediately available for sale
    pub quantity: i64,
    /// Units sold out of `quantity`, earmarked pending delivery
    pub in_stock_quantity: i64,
    /// Baked only: units promised on order beyond on-hand stock
    pub amount: i64,
    /// Cumulative promised units later cancelled or rejected
    pub reject_amount: i64,
}

impl StockCounters {
    pub fn new(quantity: i64) -> Self {
        Self {
            quantity,
            ..Default::default()
        }
    }

    /// Derived availability: sellable units remain
    ///
    /// Never stored independently of a quantity change.
    pub fn available(&self) -> bool {
        self.quantity > 0
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<String>,
    pub name: String,
    pub product_type: ProductType,
    #[serde(flatten)]
    pub counters: StockCounters,
    /// Derived from `counters.quantity`; persisted for query filters
    pub available: bool,
    /// Unit price in minor units
    pub price: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Product {
    pub fn new(name: impl Into<String>, product_type: ProductType, quantity: i64, price: i64) -> Self {
        let counters = StockCounters::new(quantity);
        Self {
            id: None,
            name: name.into(),
            product_type,
            available: counters.available(),
            counters,
            price,
            created_at: Some(chrono::Utc::now()),
        }
    }
}
