//! # Tracker Session
//!
//! The orchestration layer between form drafts and the record store.
//!
//! ## Submission Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_stock(draft) / record_sale(draft)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  saving flag taken ──── already set? → SaveInProgress (refused)         │
//! │       │                 (released on EVERY exit path via Drop guard)    │
//! │       ▼                                                                 │
//! │  normalizer ──────────── invalid? → Validation (store never called)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store append ────────── failed? → Store (retryable, nothing saved)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  id returned; live feeds fan the new set out to subscribers             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads never fail on identity: a signed-out session or an unloadable
//! stream degrades to an empty record set for that stream, so the trends
//! view renders "no data" instead of crashing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::{info, warn};

use vastra_core::aggregate::{aggregate, Snapshot, TrendViews};
use vastra_core::export::{sales_to_csv, stocks_to_csv};
use vastra_core::normalize::{normalize_sale, normalize_stock, SaleDraft, StockDraft};
use vastra_core::registry::ProductRegistry;
use vastra_store::Store;

use crate::config::TrackerConfig;
use crate::error::TrackerError;

// =============================================================================
// Saving Guard
// =============================================================================

/// Scoped hold on the session's saving flag.
///
/// Acquiring fails while another submission is pending; dropping releases
/// the flag on every path, success or failure, so a failed append can
/// always be resubmitted.
struct SavingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SavingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, TrackerError> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(TrackerError::SaveInProgress);
        }
        Ok(SavingGuard { flag })
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Session
// =============================================================================

/// One operator's tracker session: an optional owner identity over a shared
/// record store.
#[derive(Debug)]
pub struct Session {
    store: Store,
    config: TrackerConfig,
    owner: RwLock<Option<String>>,
    saving: AtomicBool,
}

impl Session {
    /// Creates a session, signed in as the configured owner (if any).
    pub fn new(store: Store, config: TrackerConfig) -> Self {
        let owner = RwLock::new(config.owner_id.clone());
        Session {
            store,
            config,
            owner,
            saving: AtomicBool::new(false),
        }
    }

    /// Switches the session to a signed-in owner. Data under the previous
    /// identity stays in the store, untouched.
    pub fn sign_in(&self, owner: impl Into<String>) {
        let owner = owner.into();
        info!(owner = %owner, "Signed in");
        *self.owner.write().expect("owner lock poisoned") = Some(owner);
    }

    /// Signs the session out. Already-loaded views keep rendering; new reads
    /// see no data.
    pub fn sign_out(&self) {
        info!("Signed out");
        *self.owner.write().expect("owner lock poisoned") = None;
    }

    /// The signed-in owner, if any.
    pub fn owner(&self) -> Option<String> {
        self.owner.read().expect("owner lock poisoned").clone()
    }

    /// The configured people roster (form options for purchaser, seller and
    /// payment receiver).
    pub fn people(&self) -> &[String] {
        &self.config.people
    }

    fn require_owner(&self) -> Result<String, TrackerError> {
        self.owner().ok_or(TrackerError::NotSignedIn)
    }

    // -------------------------------------------------------------------------
    // Submissions
    // -------------------------------------------------------------------------

    /// Normalizes and appends one stock purchase, returning its record id.
    pub async fn record_stock(&self, draft: StockDraft) -> Result<String, TrackerError> {
        let owner = self.require_owner()?;
        let _saving = SavingGuard::acquire(&self.saving)?;

        let entry = normalize_stock(draft)?;
        let id = self.store.stocks().append(&owner, &entry).await?;

        info!(
            id = %id,
            product = %entry.product_type,
            pieces = entry.stock_counts.total(),
            overall = %entry.overall_total_cost,
            "Stock entry recorded"
        );
        Ok(id)
    }

    /// Normalizes and appends one sale, snapshotting its cost basis from the
    /// current stock set, and returns its record id.
    pub async fn record_sale(&self, draft: SaleDraft) -> Result<String, TrackerError> {
        let owner = self.require_owner()?;
        let _saving = SavingGuard::acquire(&self.saving)?;

        let stocks = self.store.stocks().list(&owner).await?;
        let sale = normalize_sale(draft, &stocks);
        let id = self.store.sales().append(&owner, &sale).await?;

        info!(
            id = %id,
            product = %sale.product_type,
            size = %sale.size,
            sold_for = %sale.sold_for,
            actual_price = %sale.actual_price,
            "Sale recorded"
        );
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// The latest full snapshot. Signed out means both sets are empty; a
    /// stream that fails to load degrades to empty for that stream only.
    pub async fn snapshot(&self) -> Snapshot {
        let Some(owner) = self.owner() else {
            return Snapshot::default();
        };

        let stocks = match self.store.stocks().list(&owner).await {
            Ok(stocks) => stocks,
            Err(e) => {
                warn!(error = %e, "Stock stream unavailable, rendering as empty");
                Vec::new()
            }
        };
        let sales = match self.store.sales().list(&owner).await {
            Ok(sales) => sales,
            Err(e) => {
                warn!(error = %e, "Sale stream unavailable, rendering as empty");
                Vec::new()
            }
        };

        Snapshot { stocks, sales }
    }

    /// All four trend views over the latest snapshot.
    pub async fn trends(&self) -> TrendViews {
        aggregate(&self.snapshot().await)
    }

    /// The product-type registry for the latest stock set: configured seed
    /// list united with every observed type.
    pub async fn product_registry(&self) -> ProductRegistry {
        let snapshot = self.snapshot().await;
        ProductRegistry::from_snapshot(&self.config.seed_product_types, &snapshot.stocks)
    }

    /// The stock records as CSV (sizes flattened into per-size columns).
    pub async fn export_stocks(&self) -> String {
        stocks_to_csv(&self.snapshot().await.stocks)
    }

    /// The sale records as CSV.
    pub async fn export_sales(&self) -> String {
        sales_to_csv(&self.snapshot().await.sales)
    }

    // -------------------------------------------------------------------------
    // Live recomputation
    // -------------------------------------------------------------------------

    /// Subscribes to both record feeds and invokes `on_change` with freshly
    /// aggregated views: once immediately, then after every mutation of
    /// either stream.
    ///
    /// The two feeds refresh independently; each wake pairs the changed set
    /// with the latest snapshot of the other. Recomputation runs
    /// synchronously inside the notification — a linear scan of both sets.
    ///
    /// Returns when the store shuts down. Dropping the future (e.g. losing a
    /// select race against a shutdown signal) drops both subscriptions,
    /// which is the unsubscribe.
    pub async fn watch_trends<F>(&self, mut on_change: F) -> Result<(), TrackerError>
    where
        F: FnMut(&TrendViews),
    {
        let Some(owner) = self.owner() else {
            // Signed out: no data, and nothing to watch.
            on_change(&TrendViews::default());
            return Ok(());
        };

        let mut stock_sub = self.store.stocks().subscribe(&owner).await?;
        let mut sale_sub = self.store.sales().subscribe(&owner).await?;

        let mut snapshot = Snapshot {
            stocks: stock_sub.current().to_vec(),
            sales: sale_sub.current().to_vec(),
        };
        on_change(&aggregate(&snapshot));

        loop {
            tokio::select! {
                set = stock_sub.changed() => match set {
                    Some(set) => snapshot.stocks = set.to_vec(),
                    None => break,
                },
                set = sale_sub.changed() => match set {
                    Some(set) => snapshot.sales = set.to_vec(),
                    None => break,
                },
            }
            on_change(&aggregate(&snapshot));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use vastra_core::money::Money;
    use vastra_core::types::{PaymentMode, ProductChoice, Size};
    use vastra_store::StoreConfig;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn stock_draft() -> StockDraft {
        StockDraft {
            date_of_purchase: date(1),
            purchased_by: "Subhasree".into(),
            product: ProductChoice::Listed("Saree".into()),
            cost_per_piece: "500".into(),
            discount_amount: "0".into(),
            gst_amount: "0".into(),
            transport_cost: "50".into(),
            stall_rent: "20".into(),
            stock_counts: vec![(Size::M, "2".into())],
        }
    }

    fn sale_draft() -> SaleDraft {
        SaleDraft {
            date_of_sale: date(5),
            sold_by: "Radha".into(),
            payment_received_by: "Keshav".into(),
            product_type: "Saree".into(),
            size: Size::M,
            sold_for: "700".into(),
            mode_of_payment: PaymentMode::Cash,
        }
    }

    async fn session() -> Session {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        Session::new(store, TrackerConfig::default())
    }

    #[tokio::test]
    async fn records_flow_through_to_trends() {
        let session = session().await;

        session.record_stock(stock_draft()).await.unwrap();
        session.record_sale(sale_draft()).await.unwrap();

        let views = session.trends().await;
        assert_eq!(views.remaining_stock[0].remaining.count(Size::M), 1);
        assert_eq!(
            views.profit_by_seller[0].profit,
            Money::from_rupees(200)
        );
        assert_eq!(views.revenue_by_payment_mode[0].mode, "Cash");
    }

    #[tokio::test]
    async fn sale_snapshots_cost_from_recorded_stock() {
        let session = session().await;
        session.record_stock(stock_draft()).await.unwrap();
        session.record_sale(sale_draft()).await.unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.sales[0].actual_price, Money::from_rupees(500));
    }

    #[tokio::test]
    async fn invalid_drafts_never_reach_the_store() {
        let session = session().await;

        let mut draft = stock_draft();
        draft.stock_counts = vec![(Size::M, "0".into())];
        let err = session.record_stock(draft).await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));

        let snapshot = session.snapshot().await;
        assert!(snapshot.stocks.is_empty());
    }

    #[tokio::test]
    async fn saving_flag_is_released_after_failure() {
        let session = session().await;

        let mut bad = stock_draft();
        bad.product = ProductChoice::Other("".into());
        assert!(session.record_stock(bad).await.is_err());

        // The failed submission released the flag; the retry goes through.
        session.record_stock(stock_draft()).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_submission_is_refused() {
        let session = session().await;
        let guard = SavingGuard::acquire(&session.saving).unwrap();

        let err = session.record_stock(stock_draft()).await.unwrap_err();
        assert!(matches!(err, TrackerError::SaveInProgress));

        drop(guard);
        session.record_stock(stock_draft()).await.unwrap();
    }

    #[tokio::test]
    async fn signed_out_sessions_read_no_data_and_cannot_submit() {
        let session = session().await;
        session.sign_out();

        assert!(session.trends().await.is_empty());
        let err = session.record_stock(stock_draft()).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotSignedIn));

        session.sign_in("local");
        session.record_stock(stock_draft()).await.unwrap();
    }

    #[tokio::test]
    async fn owners_see_only_their_own_records() {
        let session = session().await;
        session.record_stock(stock_draft()).await.unwrap();

        session.sign_in("someone-else");
        assert!(session.trends().await.is_empty());

        session.sign_in("local");
        assert!(!session.trends().await.is_empty());
    }

    #[tokio::test]
    async fn roster_comes_from_configuration() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let mut config = TrackerConfig::default();
        config.people = vec!["Asha".into(), "Vik".into()];
        let session = Session::new(store, config);

        assert_eq!(session.people(), ["Asha", "Vik"]);
    }

    #[tokio::test]
    async fn registry_unites_seed_and_observed_types() {
        let session = session().await;

        let mut draft = stock_draft();
        draft.product = ProductChoice::Other("Dupatta".into());
        session.record_stock(draft).await.unwrap();

        let registry = session.product_registry().await;
        assert!(registry.contains("Saree"));
        assert!(registry.contains("Dupatta"));
    }

    #[tokio::test]
    async fn csv_exports_render_the_record_sets() {
        let session = session().await;
        session.record_stock(stock_draft()).await.unwrap();
        session.record_sale(sale_draft()).await.unwrap();

        let stocks_csv = session.export_stocks().await;
        assert_eq!(stocks_csv.lines().count(), 2);
        assert!(stocks_csv.contains("Stock Count (XL)"));
        assert!(stocks_csv.contains("1070.00"));

        let sales_csv = session.export_sales().await;
        assert!(sales_csv.lines().nth(1).unwrap().contains("700.00"));
    }

    #[tokio::test]
    async fn watch_trends_recomputes_on_every_append() {
        let session = Arc::new(session().await);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let watcher = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                session
                    .watch_trends(move |views| {
                        let _ = tx.send(views.clone());
                    })
                    .await
            })
        };

        // Initial views arrive immediately and are empty.
        let initial = rx.recv().await.unwrap();
        assert!(initial.is_empty());

        session.record_stock(stock_draft()).await.unwrap();
        let after_stock = rx.recv().await.unwrap();
        assert_eq!(after_stock.remaining_stock[0].remaining.count(Size::M), 2);

        session.record_sale(sale_draft()).await.unwrap();
        let after_sale = rx.recv().await.unwrap();
        assert_eq!(after_sale.remaining_stock[0].remaining.count(Size::M), 1);
        assert_eq!(after_sale.profit_by_seller[0].count, 1);

        // Dropping the watcher future is the unsubscribe.
        watcher.abort();
    }
}
