//! # Money Module
//!
//! Provides the `Money` type for handling Rupiah amounts exactly.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    35000 * 0.1 = 3500.0000000000005  ❌ WRONG!                          │
//! │                                                                         │
//! │  The backend stores prices as DECIMAL columns and may send them        │
//! │  as "10000.00" strings or as plain numbers.                             │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    35000 × 0.1000 = 3500 exactly, the 10% VAT never rounds             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockdesk_core::money::Money;
//!
//! let price = Money::from_rupiah(10_000);
//! let line = price.multiply_quantity(2).unwrap();
//! assert_eq!(line.to_string(), "Rp 20.000");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use crate::error::{CoreError, CoreResult};
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in Rupiah.
///
/// ## Design Decisions
/// - **Decimal backing**: prices arrive from the backend as decimal strings
/// - **String serde**: serialises as a normalised decimal string, accepts
///   strings and JSON numbers
/// - **No currency field**: the dashboard is single-currency
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price ──┬──► CartLine.unit_price ──► CartLine.line_total       │
/// │                  │                                                      │
/// │                  └──► Displayed as "Rp 10.000" in the picker            │
/// │                                                                         │
/// │  Σ line totals ──► subtotal ──► VAT 10% ──► grand total ──► Receipt     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from a whole Rupiah amount.
    ///
    /// ## Example
    /// ```rust
    /// use stockdesk_core::money::Money;
    ///
    /// let price = Money::from_rupiah(5_000);
    /// assert!(price.is_positive());
    /// ```
    #[inline]
    pub fn from_rupiah(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// Wraps an existing decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Calculates tax at the given rate without rounding.
    ///
    /// Fails with [`CoreError::AmountOverflow`] when the product leaves the
    /// decimal range.
    ///
    /// ## Example
    /// ```rust
    /// use stockdesk_core::money::Money;
    /// use stockdesk_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_rupiah(35_000);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1000)).unwrap();
    /// assert_eq!(tax, Money::from_rupiah(3_500));
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Subtotal: Rp 35.000
    ///      │
    ///      ▼
    /// calculate_tax(10%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Tax: Rp 3.500
    ///      │
    ///      ▼
    /// Grand Total: Rp 38.500
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> CoreResult<Money> {
        self.0
            .checked_mul(rate.as_fraction())
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }

    /// Multiplies money by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use stockdesk_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(5_000);
    /// assert_eq!(unit_price.multiply_quantity(3).unwrap(), Money::from_rupiah(15_000));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> CoreResult<Self> {
        self.0
            .checked_mul(Decimal::from(qty))
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }

    /// Adds two amounts, failing instead of panicking on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> CoreResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Indonesian Rupiah formatting: `.` groups thousands, `,` separates the
/// fraction, which is only shown when non-zero.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0.round_dp(2);
        let sign = if value.is_sign_negative() && !value.is_zero() {
            "-"
        } else {
            ""
        };

        let abs = value.abs();
        let whole = abs.trunc();
        let hundredths = ((abs - whole) * Decimal::ONE_HUNDRED)
            .trunc()
            .to_u32()
            .unwrap_or(0);

        write!(f, "{}Rp {}", sign, group_thousands(&whole.normalize().to_string()))?;
        if hundredths > 0 {
            write!(f, ",{:02}", hundredths)?;
        }
        Ok(())
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Serialises the normalised decimal string (`"10000.00"` becomes `"10000"`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.0.normalize(), serializer)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rupiah(35_000).to_string(), "Rp 35.000");
        assert_eq!(Money::from_rupiah(500).to_string(), "Rp 500");
        assert_eq!(Money::from_rupiah(1_250_000).to_string(), "Rp 1.250.000");
        assert_eq!(Money::from_rupiah(0).to_string(), "Rp 0");
        assert_eq!(Money::from_rupiah(-7_500).to_string(), "-Rp 7.500");
    }

    #[test]
    fn test_display_with_fraction() {
        let money = Money::from_decimal(Decimal::new(100050, 2)); // 1000.50
        assert_eq!(money.to_string(), "Rp 1.000,50");

        let scaled = Money::from_decimal(Decimal::new(1000000, 2)); // 10000.00
        assert_eq!(scaled.to_string(), "Rp 10.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(10_000);
        let b = Money::from_rupiah(2_500);

        assert_eq!(a + b, Money::from_rupiah(12_500));
        assert_eq!(a - b, Money::from_rupiah(7_500));

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_rupiah(15_000));
    }

    #[test]
    fn test_tax_is_exact() {
        let rate = TaxRate::from_bps(1000);
        assert_eq!(
            Money::from_rupiah(35_000).calculate_tax(rate).unwrap(),
            Money::from_rupiah(3_500)
        );

        // 10% of 12.345 has no rounding applied
        let odd = Money::from_rupiah(12_345).calculate_tax(rate).unwrap();
        assert_eq!(odd.amount(), Decimal::new(12345, 1));
    }

    #[test]
    fn test_equality_ignores_scale() {
        let from_wire = Money::from_decimal(Decimal::new(1000000, 2));
        assert_eq!(from_wire, Money::from_rupiah(10_000));
    }

    #[test]
    fn test_deserialize_string_and_number() {
        let from_str: Money = serde_json::from_str("\"10000.00\"").unwrap();
        let from_num: Money = serde_json::from_str("10000").unwrap();
        assert_eq!(from_str, Money::from_rupiah(10_000));
        assert_eq!(from_num, Money::from_rupiah(10_000));
    }

    #[test]
    fn test_serialize_normalised() {
        let money = Money::from_decimal(Decimal::new(1000000, 2));
        assert_eq!(serde_json::to_string(&money).unwrap(), "\"10000\"");

        let fraction = Money::from_decimal(Decimal::new(100050, 2));
        assert_eq!(serde_json::to_value(fraction).unwrap(), "1000.5");

        let back: Money = serde_json::from_str(&serde_json::to_string(&fraction).unwrap()).unwrap();
        assert_eq!(back, fraction);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = Money::from_decimal(Decimal::MAX);

        assert!(matches!(
            huge.multiply_quantity(2),
            Err(CoreError::AmountOverflow)
        ));
        assert!(matches!(
            huge.checked_add(Money::from_rupiah(1)),
            Err(CoreError::AmountOverflow)
        ));
        assert_eq!(huge.multiply_quantity(1).unwrap(), huge);
        assert_eq!(
            Money::from_rupiah(5_000)
                .checked_add(Money::from_rupiah(250))
                .unwrap(),
            Money::from_rupiah(5_250)
        );
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert_eq!(Money::default(), zero);

        assert!(Money::from_rupiah(100).is_positive());
        assert!(Money::from_rupiah(-100).is_negative());
    }
}
