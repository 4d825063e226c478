//! # vastra-store: Record Store for Vastra
//!
//! Persistence and change fan-out for the two record streams.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vastra Data Flow                                │
//! │                                                                         │
//! │  Session (record_stock / record_sale)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    vastra-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │     Store     │   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │   │ stock / sale   │   │  (embedded)  │   │   │
//! │  │   │               │◄──│ append + list  │   │ 001_records  │   │   │
//! │  │   └───────┬───────┘   └───────┬────────┘   └──────────────┘   │   │
//! │  │           │                   │ refresh                        │   │
//! │  │           │           ┌───────▼────────┐                       │   │
//! │  │           │           │   Live feeds   │  full current set     │   │
//! │  │           │           │   (live.rs)    │  on every mutation    │   │
//! │  │           │           └────────────────┘                       │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  SQLite database (WAL mode) — records as JSON documents                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Collaborator Contract
//!
//! Per owner identity and record kind:
//! - `append(owner, record) -> id` — assigns the id, persists, fans out
//! - `subscribe(owner) -> LiveSnapshots` — the full current set immediately,
//!   and again after every mutation from any store handle; drop to
//!   unsubscribe
//!
//! The stock and sale feeds are independent: nothing orders one stream's
//! refresh relative to the other's, and consumers must recompute from
//! whatever the latest snapshot of each is.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

mod live;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use live::LiveSnapshots;
pub use pool::{Store, StoreConfig};
pub use repository::sale::SaleRepository;
pub use repository::stock::StockRepository;
pub use repository::RecordKind;
