//! # Domain Types
//!
//! Core domain types for the inventory and sales tracker.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   StockEntry    │   │    SaleEntry    │   │   StockCounts   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (store)     │   │  id (store)     │   │  Size → count   │       │
//! │  │  productType    │   │  productType    │   │  absent ≠ zero  │       │
//! │  │  costPerPiece   │   │  actualPrice    │   └─────────────────┘       │
//! │  │  stockCounts    │   │  soldFor        │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Size       │   │   PaymentMode   │   │  ProductChoice  │       │
//! │  │  S M L XL XXL   │   │  Cash / Online  │   │  Listed(name)   │       │
//! │  │  (ordered)      │   │  Payment / Card │   │  Other(custom)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both entry kinds are append-only: created once by a normalizer, assigned
//! an id by the store, never mutated or deleted afterwards. Derived fields
//! are fixed at creation time.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Size
// =============================================================================

/// Garment size. Fixed enum; the declaration order is the canonical
/// presentation and export order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Size {
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl Size {
    /// All sizes in canonical order.
    pub const ALL: [Size; 5] = [Size::S, Size::M, Size::L, Size::Xl, Size::Xxl];

    /// The wire/display label ("S", "M", "L", "XL", "XXL").
    pub const fn label(&self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::Xl => "XL",
            Size::Xxl => "XXL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How a sale was paid. The serialized labels match the record documents
/// exactly, spaces included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "Online Payment")]
    OnlinePayment,
    Card,
}

impl PaymentMode {
    /// All payment modes in presentation order.
    pub const ALL: [PaymentMode; 3] =
        [PaymentMode::Cash, PaymentMode::OnlinePayment, PaymentMode::Card];

    /// The wire/display label.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::OnlinePayment => "Online Payment",
            PaymentMode::Card => "Card",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Stock Counts
// =============================================================================

/// Per-size piece counts for a stock entry.
///
/// A size that is *absent* from the map is distinct from a size recorded as
/// zero: entries that never tracked a size at all remain eligible as cost
/// sources for that size (see [`StockCounts::eligible_for`]), while an entry
/// that tracked it and ran the count down to zero does not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockCounts(BTreeMap<Size, u32>);

impl StockCounts {
    /// Empty counts (no size tracked).
    pub fn new() -> Self {
        StockCounts::default()
    }

    /// Records a count for a size, replacing any previous value.
    pub fn set(&mut self, size: Size, count: u32) {
        self.0.insert(size, count);
    }

    /// The tracked count for a size, or `None` if the size is untracked.
    pub fn get(&self, size: Size) -> Option<u32> {
        self.0.get(&size).copied()
    }

    /// The count for a size, treating untracked as zero.
    pub fn count(&self, size: Size) -> u32 {
        self.get(size).unwrap_or(0)
    }

    /// Total pieces across all sizes.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    /// Whether this entry may serve as a cost source for `size`: the size is
    /// either untracked or has a positive count.
    pub fn eligible_for(&self, size: Size) -> bool {
        match self.get(size) {
            None => true,
            Some(count) => count > 0,
        }
    }
}

impl FromIterator<(Size, u32)> for StockCounts {
    fn from_iter<I: IntoIterator<Item = (Size, u32)>>(iter: I) -> Self {
        StockCounts(iter.into_iter().collect())
    }
}

// =============================================================================
// Product Choice
// =============================================================================

/// Product-type selection on the stock form.
///
/// "Other" is a form-level affordance, not a persisted value: the choice is
/// resolved to a plain product-type string during normalization, so the
/// aggregation layer never sees a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductChoice {
    /// A type picked from the registry.
    Listed(String),
    /// "Other" with a user-supplied name (may be blank; the normalizer
    /// rejects blank names).
    Other(String),
}

// =============================================================================
// Stock Entry
// =============================================================================

/// One purchase batch of a product type, on a date, by a person.
///
/// `total_purchase_amount` and `overall_total_cost` are derived by the stock
/// normalizer and never edited independently. Numeric fields default to zero
/// when a document omits them, so partially-formed records from other writers
/// aggregate instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    /// Unique identifier, assigned by the store on append. Empty until then.
    #[serde(default)]
    pub id: String,

    pub date_of_purchase: NaiveDate,

    /// Who made the purchase (from the people roster).
    #[serde(default)]
    pub purchased_by: String,

    /// Product type, already resolved to a plain string.
    #[serde(default)]
    pub product_type: String,

    #[serde(default)]
    pub cost_per_piece: Money,

    #[serde(default)]
    pub discount_amount: Money,

    #[serde(default)]
    pub gst_amount: Money,

    #[serde(default)]
    pub transport_cost: Money,

    #[serde(default)]
    pub stall_rent: Money,

    #[serde(default)]
    pub stock_counts: StockCounts,

    /// Goods cost: `max(0, pieces · costPerPiece + gst − discount)`.
    #[serde(default)]
    pub total_purchase_amount: Money,

    /// Goods cost plus overheads: `max(0, totalPurchaseAmount + transport + stallRent)`.
    #[serde(default)]
    pub overall_total_cost: Money,
}

// =============================================================================
// Sale Entry
// =============================================================================

/// One unit sold.
///
/// `actual_price` is snapshotted from the latest matching stock entry when
/// the sale is normalized; it is a point-in-time cost lookup, not a foreign
/// key, and is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleEntry {
    /// Unique identifier, assigned by the store on append. Empty until then.
    #[serde(default)]
    pub id: String,

    pub date_of_sale: NaiveDate,

    #[serde(default)]
    pub sold_by: String,

    #[serde(default)]
    pub payment_received_by: String,

    #[serde(default)]
    pub product_type: String,

    pub size: Size,

    /// Cost basis attributed to this sale (₹0 when no stock entry matched).
    #[serde(default)]
    pub actual_price: Money,

    /// Realized sale price. Zero is accepted.
    #[serde(default)]
    pub sold_for: Money,

    /// Absent in some legacy documents; aggregation labels those "Unknown".
    #[serde(default)]
    pub mode_of_payment: Option<PaymentMode>,
}

impl SaleEntry {
    /// Profit realized by this sale (may be negative).
    #[inline]
    pub fn profit(&self) -> Money {
        self.sold_for - self.actual_price
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_labels_and_order() {
        let labels: Vec<_> = Size::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["S", "M", "L", "XL", "XXL"]);
    }

    #[test]
    fn test_size_serde_labels() {
        assert_eq!(serde_json::to_string(&Size::Xxl).unwrap(), "\"XXL\"");
        assert_eq!(serde_json::from_str::<Size>("\"XL\"").unwrap(), Size::Xl);
    }

    #[test]
    fn test_payment_mode_serde_labels() {
        assert_eq!(
            serde_json::to_string(&PaymentMode::OnlinePayment).unwrap(),
            "\"Online Payment\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentMode>("\"Cash\"").unwrap(),
            PaymentMode::Cash
        );
    }

    #[test]
    fn test_stock_counts_absent_vs_zero() {
        let mut counts = StockCounts::new();
        counts.set(Size::M, 0);

        assert_eq!(counts.get(Size::M), Some(0));
        assert_eq!(counts.get(Size::S), None);
        assert_eq!(counts.count(Size::S), 0);

        // Untracked size stays eligible; tracked-at-zero does not.
        assert!(counts.eligible_for(Size::S));
        assert!(!counts.eligible_for(Size::M));
        counts.set(Size::M, 3);
        assert!(counts.eligible_for(Size::M));
    }

    #[test]
    fn test_stock_counts_total() {
        let counts: StockCounts = [(Size::S, 1), (Size::M, 2), (Size::Xxl, 4)]
            .into_iter()
            .collect();
        assert_eq!(counts.total(), 7);
        assert_eq!(StockCounts::new().total(), 0);
    }

    #[test]
    fn test_stock_entry_tolerates_sparse_documents() {
        // A document missing every numeric field decodes with zeros rather
        // than failing the whole snapshot.
        let entry: StockEntry = serde_json::from_str(
            r#"{"dateOfPurchase": "2024-03-01", "productType": "Saree"}"#,
        )
        .unwrap();

        assert_eq!(entry.product_type, "Saree");
        assert_eq!(entry.cost_per_piece, Money::zero());
        assert_eq!(entry.stock_counts.total(), 0);
        assert_eq!(entry.overall_total_cost, Money::zero());
    }

    #[test]
    fn test_sale_entry_tolerates_missing_payment_mode() {
        let sale: SaleEntry = serde_json::from_str(
            r#"{"dateOfSale": "2024-03-02", "productType": "Saree", "size": "M"}"#,
        )
        .unwrap();

        assert_eq!(sale.mode_of_payment, None);
        assert_eq!(sale.sold_for, Money::zero());
        assert_eq!(sale.profit(), Money::zero());
    }

    #[test]
    fn test_sale_profit_sign() {
        let mut sale: SaleEntry = serde_json::from_str(
            r#"{"dateOfSale": "2024-03-02", "productType": "Saree", "size": "M"}"#,
        )
        .unwrap();
        sale.actual_price = Money::from_rupees(500);
        sale.sold_for = Money::from_rupees(700);
        assert_eq!(sale.profit(), Money::from_rupees(200));

        sale.sold_for = Money::from_rupees(400);
        assert_eq!(sale.profit(), Money::from_rupees(-100));
    }
}
