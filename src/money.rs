//! Exact decimal amounts for balances and transactions.
//!
//! Wraps `rust_decimal` and keeps the scale a value was written with, so an
//! amount read as `150.00` is written back as `150.00`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A monetary amount with full decimal precision.
///
/// Equality and ordering are numeric (`1.0 == 1.00`), while `Display` keeps
/// the original scale. Like `Decimal`, the `+` and `-` operators panic when
/// the result is out of range; ledger arithmetic goes through
/// [`Money::checked_add`] and [`Money::checked_sub`].
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use bank_ledger::Money;
///
/// let amount = Money::from_str("10.50").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Returns `true` if this amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this amount is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Adds `rhs`, or returns `None` if the sum is out of range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Subtracts `rhs`, or returns `None` if the difference is out of range.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl From<i32> for Money {
    fn from(value: i32) -> Self {
        Money(Decimal::from(value))
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Money(Decimal::from(value))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_keeps_scale() {
        assert_eq!(Money::from_str("200.00").unwrap().to_string(), "200.00");
        assert_eq!(Money::from_str("1.5").unwrap().to_string(), "1.5");
        assert_eq!(Money::from_str("  42  ").unwrap().to_string(), "42");
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!(Money::from_str("").is_err());
        assert!(Money::from_str("ten").is_err());
    }

    #[test]
    fn test_arithmetic_uses_widest_scale() {
        let a = Money::from_str("200.00").unwrap();
        let b = Money::from_str("50.5").unwrap();

        assert_eq!((a - b).to_string(), "149.50");
        assert_eq!((a + b).to_string(), "250.50");
    }

    #[test]
    fn test_numeric_equality_ignores_scale() {
        assert_eq!(Money::from_str("1.0").unwrap(), Money::from_str("1.00").unwrap());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::from(5).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::from(-1).is_negative());
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let max = Money::from(Decimal::MAX);
        let one = Money::from(1);

        assert_eq!(max.checked_add(one), None);
        assert_eq!(Money::from(Decimal::MIN).checked_sub(one), None);
        assert_eq!(one.checked_add(one), Some(Money::from(2)));
        assert_eq!(max.checked_sub(max), Some(Money::ZERO));
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from(1), Money::from_str("2.25").unwrap()];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.to_string(), "3.25");
    }
}
