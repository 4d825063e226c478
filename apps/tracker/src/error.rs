//! # Tracker Error Type
//!
//! Unified error type for session operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Validation  → rejected before any store call; shown inline, the form   │
//! │                keeps its values and stays submittable                   │
//! │  Store       → non-fatal notice; the entry was not saved and the same   │
//! │                submission can simply be retried                        │
//! │  NotSignedIn → submissions need an identity; reads degrade to "no      │
//! │                data" instead of surfacing this                          │
//! │  SaveInProgress → a submission is already awaiting the store; the      │
//! │                duplicate attempt is refused, not queued                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use vastra_core::ValidationError;
use vastra_store::StoreError;

use crate::config::ConfigError;

/// Errors surfaced by the tracker session.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The draft was rejected before anything touched the store.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The store call failed; the operation is retryable by resubmission.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Startup configuration was unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A submission was attempted with no signed-in owner.
    #[error("not signed in")]
    NotSignedIn,

    /// A previous submission has not resolved yet.
    #[error("a save is already in progress")]
    SaveInProgress,
}

// =============================================================================
// Unit Tests
// =============================================================================
