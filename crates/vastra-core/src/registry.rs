//! # Product-Type Registry
//!
//! The set of known product types is open-ended: it starts from a configured
//! seed list and grows whenever a stock entry introduces a new name via the
//! "Other" branch.
//!
//! The registry is a *value recomputed from the snapshot*, never a structure
//! mutated in place: every stock refresh rebuilds it as the union of the seed
//! list and all distinct product types observed in the current stock set.
//! New names persist implicitly through the entries that carry them, so a
//! rebuilt registry on a fresh session sees exactly the same set.

use crate::types::StockEntry;

/// Form option label for introducing a new product type. Presentation only;
/// never persisted as a product type.
pub const OTHER_OPTION: &str = "Other";

/// Ordered set of known product-type names: seed list first, then observed
/// names in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRegistry {
    types: Vec<String>,
}

impl ProductRegistry {
    /// Rebuilds the registry from the seed list and the current stock
    /// snapshot.
    pub fn from_snapshot<S: AsRef<str>>(seed: &[S], stocks: &[StockEntry]) -> Self {
        let mut types: Vec<String> = Vec::with_capacity(seed.len());
        for name in seed {
            let name = name.as_ref();
            if !name.is_empty() && !types.iter().any(|t| t == name) {
                types.push(name.to_string());
            }
        }
        for stock in stocks {
            let name = stock.product_type.as_str();
            if !name.is_empty() && !types.iter().any(|t| t == name) {
                types.push(name.to_string());
            }
        }
        ProductRegistry { types }
    }

    /// The known product types, in registry order.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Whether a name is already registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.iter().any(|t| t == name)
    }

    /// Stock-form options: every known type plus the "Other" sentinel.
    pub fn options(&self) -> Vec<String> {
        let mut options = self.types.clone();
        options.push(OTHER_OPTION.to_string());
        options
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
