//! # Record Normalizers
//!
//! Turn raw form input into valid entries, or reject it before anything
//! touches the store.
//!
//! ## Normalization Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Raw form fields (strings)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Coercion: counts → max(0, parsed-or-0), currency → parsed-or-0         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Rejection: empty stock / blank "Other" name → ValidationError          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Derived fields: goods cost, overall cost, actual price snapshot        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Entry ready for append (id assigned by the store)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sale drafts are never rejected: a zero sale amount is accepted, and a
//! product with no stock history simply snapshots a zero cost basis.

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{PaymentMode, ProductChoice, SaleEntry, Size, StockCounts, StockEntry};

// =============================================================================
// Drafts
// =============================================================================

/// Raw stock-purchase form input.
///
/// Numeric fields arrive as the strings the user typed; coercion is the
/// normalizer's job, not the form's.
#[derive(Debug, Clone)]
pub struct StockDraft {
    pub date_of_purchase: NaiveDate,
    pub purchased_by: String,
    pub product: ProductChoice,
    pub cost_per_piece: String,
    pub discount_amount: String,
    pub gst_amount: String,
    pub transport_cost: String,
    pub stall_rent: String,
    /// One raw count per size; missing sizes count as zero.
    pub stock_counts: Vec<(Size, String)>,
}

/// Raw sale form input.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub date_of_sale: NaiveDate,
    pub sold_by: String,
    pub payment_received_by: String,
    pub product_type: String,
    pub size: Size,
    pub sold_for: String,
    pub mode_of_payment: PaymentMode,
}

// =============================================================================
// Coercion Helpers
// =============================================================================

/// Coerces a raw count field: `max(0, parsed-or-0)`.
fn parse_count_or_zero(raw: &str) -> u32 {
    raw.trim().parse::<i64>().unwrap_or(0).max(0) as u32
}

// =============================================================================
// Stock Record Normalizer
// =============================================================================

/// Validates a stock draft and computes its derived cost fields.
///
/// ## Rules
/// - per-size counts are coerced via `max(0, parsed-or-0)`; a total of zero
///   pieces rejects the draft with [`ValidationError::EmptyStock`]
/// - choosing "Other" with a blank name rejects with
///   [`ValidationError::MissingProductName`]; otherwise the trimmed custom
///   name becomes the persisted product type
/// - `totalPurchaseAmount = max(0, pieces · costPerPiece + gst − discount)`
/// - `overallTotalCost  = max(0, totalPurchaseAmount + transport + stallRent)`
///
/// The returned entry has an empty id; the store assigns one on append.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use vastra_core::normalize::{normalize_stock, StockDraft};
/// use vastra_core::types::{ProductChoice, Size};
///
/// let entry = normalize_stock(StockDraft {
///     date_of_purchase: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     purchased_by: "Keshav".into(),
///     product: ProductChoice::Listed("Saree".into()),
///     cost_per_piece: "500".into(),
///     discount_amount: "0".into(),
///     gst_amount: "0".into(),
///     transport_cost: "50".into(),
///     stall_rent: "20".into(),
///     stock_counts: vec![(Size::M, "2".into())],
/// })
/// .unwrap();
///
/// assert_eq!(entry.overall_total_cost.to_string(), "₹1070.00");
/// ```
pub fn normalize_stock(draft: StockDraft) -> ValidationResult<StockEntry> {
    let mut counts = StockCounts::new();
    for size in Size::ALL {
        let raw = draft
            .stock_counts
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, raw)| raw.as_str())
            .unwrap_or("");
        counts.set(size, parse_count_or_zero(raw));
    }

    let total_pieces = counts.total();
    if total_pieces == 0 {
        return Err(ValidationError::EmptyStock);
    }

    let product_type = match &draft.product {
        ProductChoice::Listed(name) => name.clone(),
        ProductChoice::Other(custom) => {
            let custom = custom.trim();
            if custom.is_empty() {
                return Err(ValidationError::MissingProductName);
            }
            custom.to_string()
        }
    };

    let cost_per_piece = Money::parse_or_zero(&draft.cost_per_piece);
    let discount_amount = Money::parse_or_zero(&draft.discount_amount);
    let gst_amount = Money::parse_or_zero(&draft.gst_amount);
    let transport_cost = Money::parse_or_zero(&draft.transport_cost);
    let stall_rent = Money::parse_or_zero(&draft.stall_rent);

    let total_purchase_amount =
        (cost_per_piece.multiply_count(total_pieces) + gst_amount - discount_amount)
            .floor_at_zero();
    let overall_total_cost =
        (total_purchase_amount + transport_cost + stall_rent).floor_at_zero();

    Ok(StockEntry {
        id: String::new(),
        date_of_purchase: draft.date_of_purchase,
        purchased_by: draft.purchased_by,
        product_type,
        cost_per_piece,
        discount_amount,
        gst_amount,
        transport_cost,
        stall_rent,
        stock_counts: counts,
        total_purchase_amount,
        overall_total_cost,
    })
}

// =============================================================================
// Sale Record Normalizer
// =============================================================================

/// Resolves the cost basis for a sale: the `costPerPiece` of the most recent
/// stock entry matching the product type whose count for `size` is positive
/// or untracked. Returns zero when nothing matches.
///
/// "Most recent" is by purchase date, descending; entries sharing the newest
/// date resolve by their order in `stocks` (the sort is stable). Remaining
/// stock never enters into it: a sold-out size still yields its latest cost.
pub fn resolve_actual_price(stocks: &[StockEntry], product_type: &str, size: Size) -> Money {
    let mut matching: Vec<&StockEntry> = stocks
        .iter()
        .filter(|s| s.product_type == product_type && s.stock_counts.eligible_for(size))
        .collect();
    matching.sort_by(|a, b| b.date_of_purchase.cmp(&a.date_of_purchase));

    matching
        .first()
        .map(|s| s.cost_per_piece)
        .unwrap_or_else(Money::zero)
}

/// Builds a sale entry from a draft and the current stock snapshot.
///
/// Never rejects: `soldFor` is coerced via parsed-or-0 and zero is accepted,
/// and `actualPrice` falls back to zero for a product type never seen in
/// stock. No stock count is decremented here — remaining stock is always
/// computed lazily by the aggregation engine, so concurrent sale submissions
/// never race on a counter.
pub fn normalize_sale(draft: SaleDraft, stocks: &[StockEntry]) -> SaleEntry {
    let actual_price = resolve_actual_price(stocks, &draft.product_type, draft.size);

    SaleEntry {
        id: String::new(),
        date_of_sale: draft.date_of_sale,
        sold_by: draft.sold_by,
        payment_received_by: draft.payment_received_by,
        product_type: draft.product_type,
        size: draft.size,
        actual_price,
        sold_for: Money::parse_or_zero(&draft.sold_for),
        mode_of_payment: Some(draft.mode_of_payment),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
