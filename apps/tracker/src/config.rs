//! # Tracker Configuration
//!
//! Configuration is an explicit struct passed at startup — no ambient
//! globals. Values are loaded from environment variables with fallback to
//! the business defaults.
//!
//! ## Environment Variables
//! - `VASTRA_DB_PATH` — SQLite database file (default `./vastra.db`)
//! - `VASTRA_OWNER` — owner identity the store is addressed by; set empty
//!   to start signed out (default `local`)
//! - `VASTRA_PEOPLE` — comma-separated people roster
//! - `VASTRA_PRODUCT_TYPES` — comma-separated seed product types

use std::env;
use std::path::PathBuf;

use vastra_core::{PEOPLE, SEED_PRODUCT_TYPES};

/// Tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Path to the record-store database file.
    pub database_path: PathBuf,

    /// Owner identity, or `None` to start signed out. Absence of identity
    /// means "no data available", never an error.
    pub owner_id: Option<String>,

    /// People roster: who purchases, sells, and receives payments.
    pub people: Vec<String>,

    /// Seed product types the registry starts from.
    pub seed_product_types: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            database_path: PathBuf::from("./vastra.db"),
            owner_id: Some("local".to_string()),
            people: PEOPLE.iter().map(|p| p.to_string()).collect(),
            seed_product_types: SEED_PRODUCT_TYPES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl TrackerConfig {
    /// Loads configuration from environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = TrackerConfig::default();

        if let Ok(path) = env::var("VASTRA_DB_PATH") {
            if path.is_empty() {
                return Err(ConfigError::InvalidValue("VASTRA_DB_PATH".to_string()));
            }
            config.database_path = PathBuf::from(path);
        }

        if let Ok(owner) = env::var("VASTRA_OWNER") {
            let owner = owner.trim().to_string();
            config.owner_id = if owner.is_empty() { None } else { Some(owner) };
        }

        if let Ok(people) = env::var("VASTRA_PEOPLE") {
            config.people = parse_list(&people)
                .ok_or_else(|| ConfigError::InvalidValue("VASTRA_PEOPLE".to_string()))?;
        }

        if let Ok(types) = env::var("VASTRA_PRODUCT_TYPES") {
            config.seed_product_types = parse_list(&types)
                .ok_or_else(|| ConfigError::InvalidValue("VASTRA_PRODUCT_TYPES".to_string()))?;
        }

        Ok(config)
    }
}

/// Splits a comma-separated list, trimming entries; `None` when nothing
/// usable remains.
fn parse_list(raw: &str) -> Option<Vec<String>> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
