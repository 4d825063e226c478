//! # CSV Export
//!
//! Renders record sets as delimited text for download.
//!
//! ## Shape
//! - fixed header row per record kind
//! - nested size-count maps flatten into one `Stock Count (X)` column per
//!   size, in canonical size order
//! - absent optional fields serialize as the empty string
//! - money cells are plain two-decimal numbers (no currency sign)
//! - RFC-4180 quoting: fields containing commas, quotes or newlines are
//!   quoted, embedded quotes doubled

use crate::types::{SaleEntry, Size, StockEntry};

/// Quotes a field when its content requires it.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders the stock set as CSV, one row per purchase entry.
pub fn stocks_to_csv(stocks: &[StockEntry]) -> String {
    let mut header: Vec<String> = [
        "id",
        "dateOfPurchase",
        "purchasedBy",
        "productType",
        "costPerPiece",
        "discountAmount",
        "gstAmount",
        "transportCost",
        "stallRent",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for size in Size::ALL {
        header.push(format!("Stock Count ({size})"));
    }
    header.push("totalPurchaseAmount".into());
    header.push("overallTotalCost".into());

    let mut lines = vec![csv_row(&header)];
    for stock in stocks {
        let mut row = vec![
            stock.id.clone(),
            stock.date_of_purchase.to_string(),
            stock.purchased_by.clone(),
            stock.product_type.clone(),
            stock.cost_per_piece.to_decimal_string(),
            stock.discount_amount.to_decimal_string(),
            stock.gst_amount.to_decimal_string(),
            stock.transport_cost.to_decimal_string(),
            stock.stall_rent.to_decimal_string(),
        ];
        for size in Size::ALL {
            row.push(stock.stock_counts.count(size).to_string());
        }
        row.push(stock.total_purchase_amount.to_decimal_string());
        row.push(stock.overall_total_cost.to_decimal_string());
        lines.push(csv_row(&row));
    }
    lines.join("\n")
}

/// Renders the sale set as CSV, one row per sale.
pub fn sales_to_csv(sales: &[SaleEntry]) -> String {
    let header: Vec<String> = [
        "id",
        "dateOfSale",
        "soldBy",
        "productType",
        "size",
        "actualPrice",
        "soldFor",
        "modeOfPayment",
        "paymentReceivedBy",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let mut lines = vec![csv_row(&header)];
    for sale in sales {
        lines.push(csv_row(&[
            sale.id.clone(),
            sale.date_of_sale.to_string(),
            sale.sold_by.clone(),
            sale.product_type.clone(),
            sale.size.label().to_string(),
            sale.actual_price.to_decimal_string(),
            sale.sold_for.to_decimal_string(),
            sale.mode_of_payment
                .map(|m| m.label().to_string())
                .unwrap_or_default(),
            sale.payment_received_by.clone(),
        ]));
    }
    lines.join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================
