//! # Money Module
//!
//! Provides the `Money` type for handling basket prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A basket subtotal is a sum of many line totals, so drift accumulates. │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    unit_price = 10, quantity = 3  →  line total = 30 (exactly)         │
//! │    subtotal = Σ line totals       →  no rounding, ever                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use trolley_core::money::Money;
//!
//! let unit_price = Money::from_cents(1099); // $10.99
//! let line_total = unit_price.checked_multiply_quantity(2).unwrap();
//! assert_eq!(line_total.cents(), 2198);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// Serialises as a bare JSON integer, so an item priced at 10 minor units
/// appears as `"unitPrice": 10` on the wire.
///
/// ## Where Money is Used
/// ```text
/// PricingResolver ──► BasketItem.unit_price ──► BasketItem.total_price
///                                                        │
///                                                        ▼
///                                           BasketTotals.subtotal (Σ)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use trolley_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
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

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two values, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use trolley_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(20).checked_add(Money::from_cents(30));
    /// assert_eq!(subtotal, Some(Money::from_cents(50)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    /// ```
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(
            Money::from_cents(i64::MAX - 1).checked_add(Money::from_cents(1)),
            Some(Money::from_cents(i64::MAX))
        );
        assert!(Money::from_cents(i64::MAX / 2 + 1)
            .checked_add(Money::from_cents(i64::MAX / 2 + 1))
            .is_none());
    }

    #[test]
    fn test_checked_multiply_quantity_overflow() {
        let unit_price = Money::from_cents(i64::MAX / 2);
        assert!(unit_price.checked_multiply_quantity(3).is_none());
        assert_eq!(
            Money::from_cents(10).checked_multiply_quantity(4),
            Some(Money::from_cents(40))
        );
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_cents(10)).unwrap();
        assert_eq!(json, "10");

        let back: Money = serde_json::from_str("42").unwrap();
        assert_eq!(back.cents(), 42);
    }
}
