//! # Vastra Tracker Library
//!
//! Orchestration layer for the tracker binary.
//!
//! ## Module Organization
//! ```text
//! vastra_tracker/
//! ├── lib.rs          ◄─── module exports
//! ├── config.rs       ◄─── explicit startup configuration (env overrides)
//! ├── error.rs        ◄─── unified session error type
//! └── session.rs      ◄─── identity, submissions, live trend recomputation
//! ```

pub mod config;
pub mod error;
pub mod session;

pub use config::TrackerConfig;
pub use error::TrackerError;
pub use session::Session;
