//! # Aggregation Engine
//!
//! Pure, stateless functions over the full `{stocks, sales}` snapshot,
//! producing the four trend views.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Record Store (live subscription fan-out)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Snapshot { stocks, sales }        (immutable, read-only)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  aggregate(&snapshot) ──► TrendViews                                    │
//! │       ├── remaining stock by product & size                             │
//! │       ├── financial summary by product                                  │
//! │       ├── profit by seller & product                                    │
//! │       └── revenue by payment mode                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no state machine and no incremental update: every snapshot change
//! recomputes every view in one linear pass over each record set, and
//! recomputing the identical snapshot yields identical output.
//!
//! Iteration order of the input slices is load-bearing. Grouped rows appear
//! in first-seen order, and where several stock entries feed the same
//! (product, size) key the *last-iterated* entry's cost-per-piece is the one
//! used to value remaining stock. The store hands snapshots over sorted by
//! entry date descending, so that surviving cost is the earliest-dated
//! contributing purchase — preserved as canonical, not a weighted average.

use crate::money::Money;
use crate::types::{SaleEntry, Size, StockCounts, StockEntry};

// =============================================================================
// Snapshot
// =============================================================================

/// The full in-memory state the engine computes over.
///
/// The two sets refresh independently (their subscriptions carry no mutual
/// ordering guarantee); a snapshot simply pairs whatever the latest full set
/// of each happens to be. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub stocks: Vec<StockEntry>,
    pub sales: Vec<SaleEntry>,
}

// =============================================================================
// View Rows
// =============================================================================

/// Remaining pieces for one product type, broken down by size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingStockRow {
    pub product_type: String,
    /// All sizes present, clamped at zero.
    pub remaining: StockCounts,
}

/// Revenue, cost of goods sold, and remaining-stock valuation for one
/// product type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFinancials {
    pub product_type: String,
    /// Σ soldFor over matching sales.
    pub total_revenue: Money,
    /// Σ actualPrice over matching sales.
    pub total_goods_cost: Money,
    /// Σ over sizes of remaining · last-iterated costPerPiece.
    pub remaining_stock_value: Money,
}

/// Sales performance for one (seller, product type) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerProductProfit {
    pub sold_by: String,
    pub product_type: String,
    pub count: u32,
    pub revenue: Money,
    /// Σ (soldFor − actualPrice); negative when selling below cost.
    pub profit: Money,
}

/// Total revenue taken through one payment mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentModeRevenue {
    /// Mode label; sales without a recorded mode group under "Unknown".
    pub mode: String,
    pub total: Money,
}

/// Everything the trends presentation consumes, computed in one pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendViews {
    pub remaining_stock: Vec<RemainingStockRow>,
    pub financial_summary: Vec<ProductFinancials>,
    pub profit_by_seller: Vec<SellerProductProfit>,
    pub revenue_by_payment_mode: Vec<PaymentModeRevenue>,
}

impl TrendViews {
    /// True when every view is empty (nothing recorded yet).
    pub fn is_empty(&self) -> bool {
        self.remaining_stock.is_empty()
            && self.financial_summary.is_empty()
            && self.profit_by_seller.is_empty()
            && self.revenue_by_payment_mode.is_empty()
    }
}

// =============================================================================
// Ordered grouping helper
// =============================================================================

/// Returns the value slot for `key`, appending a fresh one in first-seen
/// order if absent. Record sets are small enough that the linear scan is the
/// whole cost model.
fn slot<'a, K, V>(rows: &'a mut Vec<(K, V)>, key: K, init: impl FnOnce() -> V) -> &'a mut V
where
    K: PartialEq,
{
    if let Some(idx) = rows.iter().position(|(k, _)| *k == key) {
        return &mut rows[idx].1;
    }
    rows.push((key, init()));
    let last = rows.len() - 1;
    &mut rows[last].1
}

/// Sold-unit tally per (productType, size), shared by the stock and
/// valuation views.
fn consumed_by_key(sales: &[SaleEntry]) -> Vec<((String, Size), u32)> {
    let mut consumed: Vec<((String, Size), u32)> = Vec::new();
    for sale in sales {
        *slot(&mut consumed, (sale.product_type.clone(), sale.size), || 0) += 1;
    }
    consumed
}

fn consumed_count(consumed: &[((String, Size), u32)], product: &str, size: Size) -> u32 {
    consumed
        .iter()
        .find(|((p, s), _)| p.as_str() == product && *s == size)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

// =============================================================================
// Remaining stock by product & size
// =============================================================================

/// For each (productType, size):
/// `remaining = max(0, Σ stockCounts[size] − #sales(productType, size))`.
///
/// Only sizes with a positive recorded count ever accumulate; sales in
/// excess of recorded stock clamp at zero rather than going negative.
/// Products whose remaining is zero across every size are dropped.
pub fn remaining_stock(stocks: &[StockEntry], sales: &[SaleEntry]) -> Vec<RemainingStockRow> {
    let consumed = consumed_by_key(sales);

    // Accumulate initial counts, materializing every size the first time a
    // product appears.
    let mut summary: Vec<(String, StockCounts)> = Vec::new();
    for stock in stocks {
        for size in Size::ALL {
            let count = stock.stock_counts.count(size);
            if count > 0 {
                let row = slot(&mut summary, stock.product_type.clone(), || {
                    Size::ALL.iter().map(|s| (*s, 0)).collect()
                });
                row.set(size, row.count(size) + count);
            }
        }
    }

    // Subtract what was sold, clamped at zero.
    for (product, counts) in &mut summary {
        for size in Size::ALL {
            let sold = consumed_count(&consumed, product, size);
            counts.set(size, counts.count(size).saturating_sub(sold));
        }
    }

    summary
        .into_iter()
        .filter(|(_, counts)| counts.total() > 0)
        .map(|(product_type, remaining)| RemainingStockRow {
            product_type,
            remaining,
        })
        .collect()
}

// =============================================================================
// Financial summary by product
// =============================================================================

/// Revenue and COGS from the sales stream, plus a valuation of what is left
/// on hand, for every product type appearing in either stream.
///
/// The remaining-stock valuation prices each (product, size) key at the cost
/// of the last-iterated stock entry that contributed to it.
pub fn financial_summary(stocks: &[StockEntry], sales: &[SaleEntry]) -> Vec<ProductFinancials> {
    let consumed = consumed_by_key(sales);

    // Initial count and surviving cost per (product, size). The cost is
    // overwritten on every contributing entry; whichever iterates last wins.
    let mut initial: Vec<((String, Size), (u32, Money))> = Vec::new();
    for stock in stocks {
        for size in Size::ALL {
            let count = stock.stock_counts.count(size);
            if count > 0 {
                let cell = slot(
                    &mut initial,
                    (stock.product_type.clone(), size),
                    || (0, Money::zero()),
                );
                cell.0 += count;
                cell.1 = stock.cost_per_piece;
            }
        }
    }

    let mut summary: Vec<(String, ProductFinancials)> = Vec::new();
    let fresh = |name: &String| {
        let product_type = name.clone();
        move || ProductFinancials {
            product_type,
            total_revenue: Money::zero(),
            total_goods_cost: Money::zero(),
            remaining_stock_value: Money::zero(),
        }
    };

    // Sales contribute revenue and cost of goods sold.
    for sale in sales {
        let row = slot(&mut summary, sale.product_type.clone(), fresh(&sale.product_type));
        row.total_revenue += sale.sold_for;
        row.total_goods_cost += sale.actual_price;
    }

    // Unsold stock contributes its valuation.
    for ((product, size), (initial_count, latest_cost)) in &initial {
        let sold = consumed_count(&consumed, product, *size);
        let remaining = initial_count.saturating_sub(sold);
        let row = slot(&mut summary, product.clone(), fresh(product));
        row.remaining_stock_value += latest_cost.multiply_count(remaining);
    }

    summary.into_iter().map(|(_, row)| row).collect()
}

// =============================================================================
// Profit by seller & product
// =============================================================================

/// Groups sales by (soldBy, productType) and totals count, revenue and
/// profit. Profit per sale is `soldFor − actualPrice` and may be negative.
pub fn profit_by_seller(sales: &[SaleEntry]) -> Vec<SellerProductProfit> {
    let mut rows: Vec<((String, String), SellerProductProfit)> = Vec::new();
    for sale in sales {
        let row = slot(
            &mut rows,
            (sale.sold_by.clone(), sale.product_type.clone()),
            || SellerProductProfit {
                sold_by: sale.sold_by.clone(),
                product_type: sale.product_type.clone(),
                count: 0,
                revenue: Money::zero(),
                profit: Money::zero(),
            },
        );
        row.count += 1;
        row.revenue += sale.sold_for;
        row.profit += sale.profit();
    }
    rows.into_iter().map(|(_, row)| row).collect()
}

// =============================================================================
// Revenue by payment mode
// =============================================================================

/// Groups sales by payment-mode label ("Unknown" when absent) and sums
/// `soldFor`, dropping groups whose total is not positive.
pub fn revenue_by_payment_mode(sales: &[SaleEntry]) -> Vec<PaymentModeRevenue> {
    let mut rows: Vec<(String, Money)> = Vec::new();
    for sale in sales {
        let label = sale
            .mode_of_payment
            .map(|m| m.label())
            .unwrap_or("Unknown")
            .to_string();
        *slot(&mut rows, label, Money::zero) += sale.sold_for;
    }

    rows.into_iter()
        .filter(|(_, total)| total.is_positive())
        .map(|(mode, total)| PaymentModeRevenue { mode, total })
        .collect()
}

// =============================================================================
// Entry Point
// =============================================================================

/// Computes every trend view from one snapshot.
///
/// Pure and total: malformed entries have already been defaulted to zeros at
/// decode time, so there is no failure path here, only arithmetic.
pub fn aggregate(snapshot: &Snapshot) -> TrendViews {
    TrendViews {
        remaining_stock: remaining_stock(&snapshot.stocks, &snapshot.sales),
        financial_summary: financial_summary(&snapshot.stocks, &snapshot.sales),
        profit_by_seller: profit_by_seller(&snapshot.sales),
        revenue_by_payment_mode: revenue_by_payment_mode(&snapshot.sales),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMode;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn stock(product: &str, day: u32, cost: i64, counts: &[(Size, u32)]) -> StockEntry {
        StockEntry {
            id: format!("stock-{product}-{day}"),
            date_of_purchase: date(day),
            purchased_by: "Keshav".into(),
            product_type: product.into(),
            cost_per_piece: Money::from_rupees(cost),
            discount_amount: Money::zero(),
            gst_amount: Money::zero(),
            transport_cost: Money::zero(),
            stall_rent: Money::zero(),
            stock_counts: counts.iter().copied().collect(),
            total_purchase_amount: Money::zero(),
            overall_total_cost: Money::zero(),
        }
    }

    fn sale(product: &str, size: Size, sold_for: i64, actual: i64) -> SaleEntry {
        SaleEntry {
            id: String::new(),
            date_of_sale: date(10),
            sold_by: "Radha".into(),
            payment_received_by: "Keshav".into(),
            product_type: product.into(),
            size,
            actual_price: Money::from_rupees(actual),
            sold_for: Money::from_rupees(sold_for),
            mode_of_payment: Some(PaymentMode::Cash),
        }
    }

    /// Scenario A's stock entry: Saree, ₹500/piece, two M pieces.
    fn saree_stock() -> Vec<StockEntry> {
        vec![stock("Saree", 1, 500, &[(Size::M, 2)])]
    }

    // -- remaining stock -----------------------------------------------------

    #[test]
    fn scenario_b_remaining_after_one_sale() {
        let stocks = saree_stock();
        let sales = vec![sale("Saree", Size::M, 700, 500)];

        let rows = remaining_stock(&stocks, &sales);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_type, "Saree");
        assert_eq!(rows[0].remaining.count(Size::M), 1);
        assert_eq!(rows[0].remaining.count(Size::S), 0);
    }

    #[test]
    fn scenario_c_remaining_clamps_at_zero() {
        let stocks = saree_stock();
        let two = vec![sale("Saree", Size::M, 700, 500); 2];
        let three = vec![sale("Saree", Size::M, 700, 500); 3];

        // Two sales exhaust the stock; the product drops from the view.
        assert!(remaining_stock(&stocks, &two).is_empty());
        // A third oversells but never drives the count negative.
        assert!(remaining_stock(&stocks, &three).is_empty());

        // With another size still on hand, the oversold size shows as zero
        // rather than negative.
        let stocks = vec![stock("Saree", 1, 500, &[(Size::M, 2), (Size::L, 1)])];
        let rows = remaining_stock(&stocks, &three);
        assert_eq!(rows[0].remaining.count(Size::M), 0);
        assert_eq!(rows[0].remaining.count(Size::L), 1);
    }

    #[test]
    fn sold_out_products_are_excluded_but_others_remain() {
        let stocks = vec![
            stock("Saree", 1, 500, &[(Size::M, 1)]),
            stock("Tops", 2, 200, &[(Size::S, 3)]),
        ];
        let sales = vec![sale("Saree", Size::M, 700, 500)];

        let rows = remaining_stock(&stocks, &sales);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_type, "Tops");
        assert_eq!(rows[0].remaining.count(Size::S), 3);
    }

    #[test]
    fn multiple_purchases_accumulate_per_size() {
        let stocks = vec![
            stock("Saree", 1, 500, &[(Size::M, 2), (Size::L, 1)]),
            stock("Saree", 3, 550, &[(Size::M, 3)]),
        ];
        let rows = remaining_stock(&stocks, &[]);
        assert_eq!(rows[0].remaining.count(Size::M), 5);
        assert_eq!(rows[0].remaining.count(Size::L), 1);
    }

    #[test]
    fn sales_of_unstocked_products_do_not_create_rows() {
        let rows = remaining_stock(&[], &[sale("Lehenga", Size::M, 900, 0)]);
        assert!(rows.is_empty());
    }

    #[test]
    fn remaining_rows_follow_stock_iteration_order() {
        let stocks = vec![
            stock("Tops", 5, 200, &[(Size::S, 1)]),
            stock("Saree", 1, 500, &[(Size::M, 2)]),
        ];
        let rows = remaining_stock(&stocks, &[]);
        let names: Vec<_> = rows.iter().map(|r| r.product_type.as_str()).collect();
        assert_eq!(names, ["Tops", "Saree"]);
    }

    // -- financial summary ---------------------------------------------------

    #[test]
    fn scenario_b_financials() {
        let stocks = saree_stock();
        let sales = vec![sale("Saree", Size::M, 700, 500)];

        let rows = financial_summary(&stocks, &sales);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.total_revenue, Money::from_rupees(700));
        assert_eq!(row.total_goods_cost, Money::from_rupees(500));
        // One M piece left, valued at its cost per piece.
        assert_eq!(row.remaining_stock_value, Money::from_rupees(500));
    }

    #[test]
    fn oversold_keys_value_remaining_at_zero() {
        let stocks = saree_stock();
        let sales = vec![sale("Saree", Size::M, 700, 500); 3];

        let rows = financial_summary(&stocks, &sales);
        let row = &rows[0];
        assert_eq!(row.total_revenue, Money::from_rupees(2100));
        assert_eq!(row.total_goods_cost, Money::from_rupees(1500));
        assert_eq!(row.remaining_stock_value, Money::zero());
    }

    #[test]
    fn financial_summary_uses_last_iterated_cost() {
        // Two purchases feed (Saree, M). The valuation keeps whichever cost
        // iterates last over the input order, not an average.
        let stocks = vec![
            stock("Saree", 9, 650, &[(Size::M, 1)]),
            stock("Saree", 1, 500, &[(Size::M, 2)]),
        ];
        let rows = financial_summary(&stocks, &[]);
        // 3 pieces, all valued at the last-iterated ₹500.
        assert_eq!(rows[0].remaining_stock_value, Money::from_rupees(1500));
    }

    #[test]
    fn products_seen_only_in_sales_still_get_rows() {
        // Scenario E at the aggregation level: revenue with a zero cost basis.
        let rows = financial_summary(&[], &[sale("Lehenga", Size::M, 900, 0)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_type, "Lehenga");
        assert_eq!(rows[0].total_revenue, Money::from_rupees(900));
        assert_eq!(rows[0].total_goods_cost, Money::zero());
        assert_eq!(rows[0].remaining_stock_value, Money::zero());
    }

    #[test]
    fn sale_products_precede_stock_only_products() {
        let stocks = vec![stock("Tops", 5, 200, &[(Size::S, 1)])];
        let sales = vec![sale("Saree", Size::M, 700, 500)];

        let rows = financial_summary(&stocks, &sales);
        let names: Vec<_> = rows.iter().map(|r| r.product_type.as_str()).collect();
        assert_eq!(names, ["Saree", "Tops"]);
    }

    // -- profit by seller ----------------------------------------------------

    #[test]
    fn groups_by_seller_and_product() {
        let mut s1 = sale("Saree", Size::M, 700, 500);
        s1.sold_by = "Radha".into();
        let mut s2 = sale("Saree", Size::M, 600, 500);
        s2.sold_by = "Radha".into();
        let mut s3 = sale("Saree", Size::L, 450, 500);
        s3.sold_by = "Keshav".into();

        let rows = profit_by_seller(&[s1, s2, s3]);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].sold_by, "Radha");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].revenue, Money::from_rupees(1300));
        assert_eq!(rows[0].profit, Money::from_rupees(300));

        // Selling below cost shows up as negative profit.
        assert_eq!(rows[1].sold_by, "Keshav");
        assert_eq!(rows[1].profit, Money::from_rupees(-50));
    }

    // -- revenue by payment mode ---------------------------------------------

    #[test]
    fn scenario_d_zero_total_modes_are_excluded() {
        let mut cash = sale("Saree", Size::M, 700, 500);
        cash.mode_of_payment = Some(PaymentMode::Cash);
        let mut free_card = sale("Saree", Size::M, 0, 500);
        free_card.mode_of_payment = Some(PaymentMode::Card);

        let rows = revenue_by_payment_mode(&[cash, free_card]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mode, "Cash");
        assert_eq!(rows[0].total, Money::from_rupees(700));
    }

    #[test]
    fn missing_mode_groups_under_unknown() {
        let mut nameless = sale("Saree", Size::M, 300, 200);
        nameless.mode_of_payment = None;

        let rows = revenue_by_payment_mode(&[nameless]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mode, "Unknown");
        assert_eq!(rows[0].total, Money::from_rupees(300));
    }

    #[test]
    fn modes_accumulate_across_sales() {
        let mut online = sale("Saree", Size::M, 700, 500);
        online.mode_of_payment = Some(PaymentMode::OnlinePayment);
        let mut online2 = sale("Tops", Size::S, 250, 200);
        online2.mode_of_payment = Some(PaymentMode::OnlinePayment);

        let rows = revenue_by_payment_mode(&[online, online2]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mode, "Online Payment");
        assert_eq!(rows[0].total, Money::from_rupees(950));
    }

    // -- whole-snapshot properties -------------------------------------------

    #[test]
    fn aggregation_is_idempotent() {
        let snapshot = Snapshot {
            stocks: vec![
                stock("Saree", 1, 500, &[(Size::M, 2), (Size::L, 1)]),
                stock("Tops", 2, 200, &[(Size::S, 4)]),
            ],
            sales: vec![
                sale("Saree", Size::M, 700, 500),
                sale("Tops", Size::S, 250, 200),
                sale("Lehenga", Size::Xl, 900, 0),
            ],
        };

        let first = aggregate(&snapshot);
        let second = aggregate(&snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_snapshot_yields_empty_views() {
        let views = aggregate(&Snapshot::default());
        assert!(views.is_empty());
    }

    #[test]
    fn partial_snapshots_are_consistent() {
        // The stock and sale subscriptions refresh independently; the engine
        // must produce coherent views from either half alone.
        let stocks_only = Snapshot {
            stocks: saree_stock(),
            sales: Vec::new(),
        };
        let views = aggregate(&stocks_only);
        assert_eq!(views.remaining_stock.len(), 1);
        assert_eq!(
            views.financial_summary[0].remaining_stock_value,
            Money::from_rupees(1000)
        );
        assert!(views.profit_by_seller.is_empty());

        let sales_only = Snapshot {
            stocks: Vec::new(),
            sales: vec![sale("Saree", Size::M, 700, 500)],
        };
        let views = aggregate(&sales_only);
        assert!(views.remaining_stock.is_empty());
        assert_eq!(views.financial_summary[0].total_revenue, Money::from_rupees(700));
        assert_eq!(views.profit_by_seller[0].profit, Money::from_rupees(200));
    }

    #[test]
    fn malformed_entries_default_to_zero_instead_of_failing() {
        // An entry decoded from a document with no counts participates as
        // zeros; the engine never errors on a well-formed snapshot.
        let bare: StockEntry = serde_json::from_str(
            r#"{"dateOfPurchase": "2024-03-01", "productType": "Saree"}"#,
        )
        .unwrap();
        let snapshot = Snapshot {
            stocks: vec![bare, stock("Saree", 2, 500, &[(Size::M, 2)])],
            sales: vec![sale("Saree", Size::M, 700, 500)],
        };

        let views = aggregate(&snapshot);
        assert_eq!(views.remaining_stock[0].remaining.count(Size::M), 1);
    }
}
