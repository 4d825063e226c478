//! # Sale Repository
//!
//! Append-only access to the sale collection, plus its live feed.
//!
//! Mirrors the stock repository; sales order by date of sale. Note there is
//! deliberately no stock-decrement here: a sale append touches only the sale
//! collection, so two clerks recording sales at once never race on a shared
//! counter.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{debug, warn};

use vastra_core::types::SaleEntry;

use crate::error::StoreResult;
use crate::live::{FeedRegistry, LiveSnapshots};
use crate::repository::{generate_record_id, insert_record, list_records, RecordKind};

/// Repository for sale records.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    feeds: Arc<FeedRegistry<SaleEntry>>,
}

impl SaleRepository {
    pub(crate) fn new(pool: SqlitePool, feeds: Arc<FeedRegistry<SaleEntry>>) -> Self {
        SaleRepository { pool, feeds }
    }

    /// Appends one sale and returns its store-assigned id.
    pub async fn append(&self, owner: &str, sale: &SaleEntry) -> StoreResult<String> {
        let mut sale = sale.clone();
        sale.id = generate_record_id();

        let payload = serde_json::to_string(&sale)?;
        insert_record(&self.pool, &sale.id, owner, RecordKind::Sale, &payload).await?;

        debug!(
            owner = %owner,
            id = %sale.id,
            product = %sale.product_type,
            size = %sale.size,
            sold_for = %sale.sold_for,
            "Appended sale"
        );

        if let Err(e) = self.refresh(owner).await {
            warn!(owner = %owner, error = %e, "Sale feed refresh failed");
        }

        Ok(sale.id)
    }

    /// The full current sale set for an owner, ordered by sale date
    /// descending (stable), skipping undecodable documents.
    pub async fn list(&self, owner: &str) -> StoreResult<Vec<SaleEntry>> {
        let rows = list_records(&self.pool, owner, RecordKind::Sale).await?;

        let mut sales: Vec<SaleEntry> = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_str::<SaleEntry>(&row.payload) {
                Ok(sale) => sales.push(sale),
                Err(e) => warn!(id = %row.id, error = %e, "Skipping undecodable sale record"),
            }
        }

        sales.sort_by(|a, b| b.date_of_sale.cmp(&a.date_of_sale));
        Ok(sales)
    }

    /// Subscribes to the owner's sale feed; dropping the handle unsubscribes.
    pub async fn subscribe(&self, owner: &str) -> StoreResult<LiveSnapshots<SaleEntry>> {
        let current = self.list(owner).await?;
        Ok(self.feeds.subscribe(owner, current))
    }

    async fn refresh(&self, owner: &str) -> StoreResult<()> {
        if self.feeds.is_tracked(owner) {
            let set = self.list(owner).await?;
            self.feeds.publish(owner, set);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
