//! # Stock Repository
//!
//! Append-only access to the stock-purchase collection, plus its live feed.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{debug, warn};

use vastra_core::types::StockEntry;

use crate::error::StoreResult;
use crate::live::{FeedRegistry, LiveSnapshots};
use crate::repository::{generate_record_id, insert_record, list_records, RecordKind};

/// Repository for stock-purchase records.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
    feeds: Arc<FeedRegistry<StockEntry>>,
}

impl StockRepository {
    pub(crate) fn new(pool: SqlitePool, feeds: Arc<FeedRegistry<StockEntry>>) -> Self {
        StockRepository { pool, feeds }
    }

    /// Appends one stock entry and returns its store-assigned id.
    ///
    /// Any id already on the entry is replaced. On success the owner's live
    /// feed is refreshed with the full current set; a refresh failure is
    /// logged but does not fail the append (the record is durable by then,
    /// and failing here would invite a duplicate resubmission).
    pub async fn append(&self, owner: &str, entry: &StockEntry) -> StoreResult<String> {
        let mut entry = entry.clone();
        entry.id = generate_record_id();

        let payload = serde_json::to_string(&entry)?;
        insert_record(&self.pool, &entry.id, owner, RecordKind::Stock, &payload).await?;

        debug!(
            owner = %owner,
            id = %entry.id,
            product = %entry.product_type,
            pieces = entry.stock_counts.total(),
            "Appended stock entry"
        );

        if let Err(e) = self.refresh(owner).await {
            warn!(owner = %owner, error = %e, "Stock feed refresh failed");
        }

        Ok(entry.id)
    }

    /// The full current stock set for an owner, ordered by purchase date
    /// descending (ties keep insertion order — the sort is stable).
    ///
    /// Documents that fail to decode are logged and skipped; one bad record
    /// never takes down the snapshot.
    pub async fn list(&self, owner: &str) -> StoreResult<Vec<StockEntry>> {
        let rows = list_records(&self.pool, owner, RecordKind::Stock).await?;

        let mut entries: Vec<StockEntry> = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_str::<StockEntry>(&row.payload) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(id = %row.id, error = %e, "Skipping undecodable stock record"),
            }
        }

        entries.sort_by(|a, b| b.date_of_purchase.cmp(&a.date_of_purchase));
        Ok(entries)
    }

    /// Subscribes to the owner's stock feed. The returned handle observes
    /// the current set immediately and every appended change thereafter;
    /// dropping it unsubscribes.
    pub async fn subscribe(&self, owner: &str) -> StoreResult<LiveSnapshots<StockEntry>> {
        let current = self.list(owner).await?;
        Ok(self.feeds.subscribe(owner, current))
    }

    /// Reloads the owner's full set into the live feed, if anyone tracks it.
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
