//! # vastra-core: Pure Business Logic for Vastra
//!
//! This crate is the heart of the tracker. It contains all business logic as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vastra Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     apps/tracker (session)                      │   │
//! │  │     form drafts ──► submissions ──► trend recomputation         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vastra-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │   types   │  │   money   │  │ normalize │  │ aggregate  │  │   │
//! │  │   │ StockEntry│  │   Money   │  │  drafts → │  │ snapshot → │  │   │
//! │  │   │ SaleEntry │  │  (paise)  │  │  entries  │  │   views    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │ registry  │  │  export   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 vastra-store (Record Store)                     │   │
//! │  │        SQLite documents, live snapshot subscriptions            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (StockEntry, SaleEntry, Size, PaymentMode)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`normalize`] - Record normalizers (raw form input → valid entries)
//! - [`aggregate`] - The Aggregation Engine (snapshot → trend views)
//! - [`registry`] - Product-type registry recomputed per snapshot
//! - [`export`] - CSV export of raw record sets
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot in, same views out, every time
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are paise (i64), rounded once
//!    at the form boundary
//! 4. **Append-only data**: entries are normalized, persisted, and never
//!    mutated; every view is derived lazily from the latest snapshot

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod export;
pub mod money;
pub mod normalize;
pub mod registry;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate, Snapshot, TrendViews};
pub use error::ValidationError;
pub use money::Money;
pub use normalize::{normalize_sale, normalize_stock, SaleDraft, StockDraft};
pub use registry::ProductRegistry;
pub use types::*;

// =============================================================================
// Business Constants
// =============================================================================

/// Default people roster: who purchases stock, sells, and receives payments.
/// Deployments override this through the tracker configuration.
pub const PEOPLE: [&str; 3] = ["Subhasree", "Keshav", "Radha"];

/// Seed product types the registry starts from. The set is open-ended:
/// stock entries introduce new names at entry time via the "Other" branch.
pub const SEED_PRODUCT_TYPES: [&str; 7] = [
    "Tops",
    "Colored Gown",
    "White Gown",
    "Lehenga",
    "Saree",
    "Jumpsuit",
    "Blouse",
];
