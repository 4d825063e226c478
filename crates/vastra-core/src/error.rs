//! # Error Types
//!
//! Domain-specific error types for vastra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  vastra-core (this file)                                                │
//! │  └── ValidationError  - Record normalization rejections                 │
//! │                                                                         │
//! │  vastra-store (separate crate)                                          │
//! │  └── StoreError       - Append/subscribe failures                       │
//! │                                                                         │
//! │  Flow: ValidationError → TrackerError → shown inline to the operator    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors fire *before* any store call: a rejected draft never
//! reaches persistence. The Aggregation Engine has no error type at all — it
//! is defined to be total over any decodable snapshot.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Rejections raised by the record normalizers.
///
/// These block submission and are shown inline on the entry form; nothing
/// is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Every per-size count parsed to zero; an entry must carry stock.
    #[error("total stock count must be greater than zero")]
    EmptyStock,

    /// "Other" was selected but no product-type name was supplied.
    #[error("a name is required for the new product type")]
    MissingProductName,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience alias for normalizer results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::EmptyStock.to_string(),
            "total stock count must be greater than zero"
        );
        assert_eq!(
            ValidationError::MissingProductName.to_string(),
            "a name is required for the new product type"
        );
    }
}
