//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    7.50 + 19.00 + 19.00 + 19.00 may not compare equal to 64.50         │
//! │                                                                         │
//! │  A basket total is the SUM of its line totals. That invariant must     │
//! │  hold exactly, every time the basket is read.                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    750 + 1900 + 1900 + 1900 == 6450, always                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! let price = Money::from_cents(2000); // 20.00
//!
//! let line_total = price.multiply_quantity(3); // 60.00
//! let total = line_total + Money::from_cents(750); // 67.50
//! assert_eq!(total.cents(), 6750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as `subtotal - total` may go negative
///   in principle, and the arithmetic stays closed
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: serializes as a bare integer number of cents
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.unit_price ──┬──► LineItem.total ──► Basket.total             │
/// │                       │         ▲                                       │
/// │  Rule new_unit_price ─┘─────────┘  (at checkout)                        │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_cents(750); // Represents 7.50
    /// assert_eq!(price.cents(), 750);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity.
    ///
    /// Unchecked: catalog prices and line quantities are bounded by
    /// [`MAX_PRICE_CENTS`](crate::MAX_PRICE_CENTS) and
    /// [`MAX_LINE_QUANTITY`](crate::MAX_LINE_QUANTITY).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1900);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 5700);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with two decimals and no currency symbol;
/// currency and locale formatting belong to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

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

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing line totals into a basket total.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(5700).to_string(), "57.00");
        assert_eq!(Money::from_cents(750).to_string(), "7.50");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3u32).cents(), 3000);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1500);
    }

    #[test]
    fn test_largest_line_total_is_exact() {
        let unit = Money::from_cents(crate::MAX_PRICE_CENTS);
        let line = unit.multiply_quantity(crate::MAX_LINE_QUANTITY);
        assert_eq!(line.cents(), 99_900_000_000);
        assert_eq!(line.to_string(), "999000000.00");
    }

    #[test]
    fn test_sum_of_line_totals() {
        let totals = [
            Money::from_cents(750),
            Money::from_cents(5700),
            Money::from_cents(1000),
        ];
        let by_ref: Money = totals.iter().sum();
        let by_value: Money = totals.into_iter().sum();
        assert_eq!(by_ref.cents(), 7450);
        assert_eq!(by_ref, by_value);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1900)).unwrap();
        assert_eq!(json, "1900");
        let back: Money = serde_json::from_str("750").unwrap();
        assert_eq!(back, Money::from_cents(750));
    }
}
