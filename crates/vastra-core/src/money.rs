//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing thousands of sale amounts as f64 drifts.                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹10.99 is stored as 1099 paise (i64)                                 │
//! │    Raw form input is rounded to whole paise ONCE, at normalization      │
//! │    time; every derived figure after that is exact integer math.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vastra_core::money::Money;
//!
//! // Coerce a raw form field (unparseable input counts as zero)
//! let cost = Money::parse_or_zero("500");
//! assert_eq!(cost.paise(), 50_000);
//!
//! // Arithmetic stays in paise
//! let total = cost * 2 + Money::parse_or_zero("12.50");
//! assert_eq!(total.to_string(), "₹1012.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: loss-making sales produce negative profit rows
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde as bare integer**: record payloads carry paise, never floats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use vastra_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(500).paise(), 50_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Coerces a raw form field into money: parsed-or-zero, rounded to
    /// whole paise (half away from zero).
    ///
    /// This is the single point where currency input meets floating point.
    /// `"500"` → ₹500.00, `"12.5"` → ₹12.50, `""` and `"abc"` → ₹0.00.
    ///
    /// ## Rounding
    /// Nearest paisa, half away from zero. This mirrors rounding the
    /// displayed two-decimal value before persisting it.
    pub fn parse_or_zero(raw: &str) -> Self {
        let value = raw.trim().parse::<f64>().unwrap_or(0.0);
        if value.is_finite() {
            Money((value * 100.0).round() as i64)
        } else {
            Money(0)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero.
    ///
    /// Derived cost figures are floored at zero: a discount larger than the
    /// goods value never produces a negative total.
    ///
    /// ## Example
    /// ```rust
    /// use vastra_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(-500).floor_at_zero(), Money::zero());
    /// assert_eq!(Money::from_paise(500).floor_at_zero().paise(), 500);
    /// ```
    #[inline]
    pub const fn floor_at_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Multiplies money by a unit count.
    ///
    /// ## Example
    /// ```rust
    /// use vastra_core::money::Money;
    ///
    /// let per_piece = Money::from_rupees(500);
    /// assert_eq!(per_piece.multiply_count(2).paise(), 100_000);
    /// ```
    #[inline]
    pub const fn multiply_count(&self, count: u32) -> Self {
        Money(self.0 * count as i64)
    }

    /// Renders the value as a plain 2-decimal number without the currency
    /// sign, e.g. for CSV cells: `1070.00`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money in a human-readable format (presentation boundary,
/// always two decimals).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for piece-count calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

/// Summing an iterator of Money values (aggregation totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
