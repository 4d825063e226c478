//! # Store Connection Management
//!
//! Connection pool creation and configuration for the SQLite record store.
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers
//! - Better crash recovery

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use tracing::info;

use vastra_core::types::{SaleEntry, StockEntry};

use crate::error::{StoreError, StoreResult};
use crate::live::FeedRegistry;
use crate::migrations;
use crate::repository::sale::SaleRepository;
use crate::repository::stock::StockRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Record-store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/vastra.db").max_connections(5);
/// let store = Store::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file (`:memory:` for tests).
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a single-operator tracker)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection above the minimum.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a configuration for an on-disk store at `path`. The file is
    /// created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Creates a configuration for an in-memory store.
    ///
    /// The pool is pinned to a single connection: each SQLite `:memory:`
    /// connection is its own database, so the one connection must stay
    /// alive for the store's lifetime.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }
}

// =============================================================================
// Store
// =============================================================================

/// The record store: a connection pool plus the live-feed registries for
/// both record kinds.
///
/// Cloning is cheap (pool and registries are shared); all clones observe the
/// same data and feed the same subscribers.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    stock_feeds: Arc<FeedRegistry<StockEntry>>,
    sale_feeds: Arc<FeedRegistry<SaleEntry>>,
}

impl Store {
    /// Opens the store: connects the pool and runs pending migrations.
    pub async fn open(config: StoreConfig) -> StoreResult<Store> {
        info!(path = %config.database_path.display(), "Opening record store");

        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        if config.run_migrations {
            migrations::run_migrations(&pool).await?;
        }

        Ok(Store {
            pool,
            stock_feeds: Arc::new(FeedRegistry::new()),
            sale_feeds: Arc::new(FeedRegistry::new()),
        })
    }

    /// The stock-purchase record collection.
    pub fn stocks(&self) -> StockRepository {
        StockRepository::new(self.pool.clone(), Arc::clone(&self.stock_feeds))
    }

    /// The sale record collection.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone(), Arc::clone(&self.sale_feeds))
    }

    /// Raw pool access (diagnostics and tests).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool. Live subscribers see their feeds end.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
