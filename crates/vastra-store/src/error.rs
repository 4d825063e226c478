//! # Store Error Types
//!
//! Error types for record-store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds categorization                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TrackerError (app) ← non-fatal notice, submission stays retryable      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store errors never abort the tracker: an append failure leaves the record
//! unsaved and the form resubmittable, and a subscribe failure degrades that
//! stream to "no data".

use thiserror::Error;

/// Record-store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening the database failed (missing directory, permissions, disk).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed on open.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// A query failed at runtime.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A record payload could not be serialized for persistence.
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal store error.
    #[error("internal store error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// sqlx::Error::Database       → StoreError::QueryFailed
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            other => StoreError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
