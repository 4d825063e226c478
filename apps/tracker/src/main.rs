//! # Vastra Tracker Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (env filter, default INFO)
//! 2. Load configuration from environment over defaults
//! 3. Open the record store & run migrations
//! 4. Start the session and the change-driven trend loop
//! 5. Shut down on ctrl-c (dropping the loop unsubscribes both feeds)

use tracing::info;
use tracing_subscriber::EnvFilter;

use vastra_core::aggregate::TrendViews;
use vastra_store::{Store, StoreConfig};
use vastra_tracker::{Session, TrackerConfig, TrackerError};

#[tokio::main]
async fn main() -> Result<(), TrackerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = TrackerConfig::from_env()?;
    info!(
        db = %config.database_path.display(),
        owner = config.owner_id.as_deref().unwrap_or("(signed out)"),
        "Starting vastra tracker"
    );

    let store = Store::open(StoreConfig::new(&config.database_path)).await?;
    let session = Session::new(store, config);

    tokio::select! {
        result = session.watch_trends(log_trends) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}

/// Logs a summary of every trend view; runs inside the change notification.
fn log_trends(views: &TrendViews) {
    if views.is_empty() {
        info!("No data yet. Record stock and sale entries to see trends.");
        return;
    }

    for row in &views.remaining_stock {
        info!(
            product = %row.product_type,
            s = row.remaining.count(vastra_core::Size::S),
            m = row.remaining.count(vastra_core::Size::M),
            l = row.remaining.count(vastra_core::Size::L),
            xl = row.remaining.count(vastra_core::Size::Xl),
            xxl = row.remaining.count(vastra_core::Size::Xxl),
            "Remaining stock"
        );
    }
    for row in &views.financial_summary {
        info!(
            product = %row.product_type,
            revenue = %row.total_revenue,
            goods_cost = %row.total_goods_cost,
            remaining_value = %row.remaining_stock_value,
            "Financial summary"
        );
    }
    for row in &views.profit_by_seller {
        info!(
            seller = %row.sold_by,
            product = %row.product_type,
            count = row.count,
            revenue = %row.revenue,
            profit = %row.profit,
            "Profit by seller"
        );
    }
    for row in &views.revenue_by_payment_mode {
        info!(mode = %row.mode, total = %row.total, "Revenue by payment mode");
    }
}
