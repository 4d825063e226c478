//! # Record Repositories
//!
//! Append-only access to the two record collections.
//!
//! Records are stored as JSON documents in a single `records` table keyed by
//! `(owner_id, kind)`. The payload carries the full entity; the repository
//! assigns each document a UUID id on append and never updates or deletes a
//! row — every correction in this system is a new record, and "remaining
//! stock" style figures are always derived downstream, never stored.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::StoreResult;

pub mod sale;
pub mod stock;

// =============================================================================
// Record Kind
// =============================================================================

/// The two record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Stock,
    Sale,
}

impl RecordKind {
    /// The `kind` column value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Stock => "stock",
            RecordKind::Sale => "sale",
        }
    }
}

// =============================================================================
// Shared Row Access
// =============================================================================

/// One raw document row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RecordRow {
    pub id: String,
    pub payload: String,
}

/// Generates a new record id.
pub(crate) fn generate_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Inserts one document row.
pub(crate) async fn insert_record(
    pool: &SqlitePool,
    id: &str,
    owner: &str,
    kind: RecordKind,
    payload: &str,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO records (id, owner_id, kind, payload, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(owner)
    .bind(kind.as_str())
    .bind(payload)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetches all document rows for an owner and kind, in insertion order.
///
/// Insertion order (`rowid`) is the tie-break beneath the per-kind date
/// sort the typed repositories apply on top.
pub(crate) async fn list_records(
    pool: &SqlitePool,
    owner: &str,
    kind: RecordKind,
) -> StoreResult<Vec<RecordRow>> {
    let rows = sqlx::query_as::<_, RecordRow>(
        "SELECT id, payload FROM records \
         WHERE owner_id = ?1 AND kind = ?2 \
         ORDER BY rowid ASC",
    )
    .bind(owner)
    .bind(kind.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
