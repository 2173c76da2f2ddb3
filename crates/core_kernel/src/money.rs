//! FCFA amounts and rates
//!
//! The office books everything in West African CFA francs, which have no
//! subunit. `Amount` wraps a `rust_decimal::Decimal` held at zero decimal
//! places so that rate applications stay exact until the final rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

/// Errors that can occur when building amounts or rates
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid rate: {0}")]
    InvalidRate(String),
}

/// A monetary amount in FCFA
///
/// Amounts are integers. Construction from a fractional decimal rounds to
/// the nearest unit, midpoints to even, which is how decimal quantization
/// to the unit behaves in the office's reference computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates an amount, rounding to the unit
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
    }

    /// Creates an amount, rounding half away from zero
    ///
    /// Interest computations use this rounding.
    pub fn new_half_up(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Creates an amount from whole francs
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Parses a user supplied amount which must already be a whole number
    pub fn try_from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        if value.fract() != Decimal::ZERO {
            return Err(MoneyError::InvalidAmount(format!(
                "{} has a fractional part; FCFA amounts are whole numbers",
                value
            )));
        }
        Ok(Self(value.trunc()))
    }

    /// Returns the underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Strictly lower than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Subtraction floored at zero, used for "remaining due" computations
    pub fn remaining_after(&self, paid: Amount) -> Amount {
        if paid >= *self {
            Amount::ZERO
        } else {
            Amount(self.0 - paid.0)
        }
    }

    /// Returns the positive part of this amount
    pub fn clamp_non_negative(&self) -> Amount {
        if self.is_negative() {
            Amount::ZERO
        } else {
            *self
        }
    }
}

impl From<i64> for Amount {
    fn from(units: i64) -> Self {
        Amount::from_units(units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.abs().trunc().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(c);
        }
        if self.is_negative() {
            write!(f, "-{} FCFA", grouped)
        } else {
            write!(f, "{} FCFA", grouped)
        }
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + *a)
    }
}

/// Represents a percentage rate (tariff bracket rate, interest rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.035 for 3.5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 3.5 for 3.5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        (self.value * dec!(100)).normalize()
    }

    /// Scales the rate, e.g. by 1.5 for a statutory surcharge
    pub fn scaled(&self, factor: Decimal) -> Rate {
        Rate::new(self.value * factor)
    }

    /// Applies this rate to an amount without rounding
    pub fn apply(&self, amount: Amount) -> Decimal {
        amount.value() * self.value
    }

    /// Applies this rate and rounds the result to the unit
    pub fn apply_rounded(&self, amount: Amount) -> Amount {
        Amount::new(self.apply(amount))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_rounds_to_unit() {
        assert_eq!(Amount::new(dec!(100.4)).value(), dec!(100));
        assert_eq!(Amount::new(dec!(100.6)).value(), dec!(101));
        assert_eq!(Amount::new(dec!(100.5)).value(), dec!(100));
        assert_eq!(Amount::new(dec!(101.5)).value(), dec!(102));
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(Amount::new_half_up(dec!(100.5)).value(), dec!(101));
        assert_eq!(Amount::new_half_up(dec!(-100.5)).value(), dec!(-101));
    }

    #[test]
    fn test_amount_display_groups_thousands() {
        assert_eq!(Amount::from_units(1_125_000).to_string(), "1 125 000 FCFA");
        assert_eq!(Amount::from_units(-500).to_string(), "-500 FCFA");
        assert_eq!(Amount::ZERO.to_string(), "0 FCFA");
    }

    #[test]
    fn test_remaining_after_floors_at_zero() {
        let due = Amount::from_units(1000);
        assert_eq!(due.remaining_after(Amount::from_units(400)), Amount::from_units(600));
        assert_eq!(due.remaining_after(Amount::from_units(1400)), Amount::ZERO);
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percentage(dec!(3.5));
        assert_eq!(rate.apply_rounded(Amount::from_units(15_000_000)), Amount::from_units(525_000));
        assert_eq!(rate.to_string(), "3.5%");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn amount_sum_is_associative(
            a in -1_000_000_000i64..1_000_000_000i64,
            b in -1_000_000_000i64..1_000_000_000i64,
            c in -1_000_000_000i64..1_000_000_000i64
        ) {
            let (a, b, c) = (Amount::from_units(a), Amount::from_units(b), Amount::from_units(c));
            prop_assert_eq!((a + b) + c, a + (b + c));
        }

        #[test]
        fn remaining_after_is_never_negative(
            due in 0i64..1_000_000_000i64,
            paid in 0i64..1_000_000_000i64
        ) {
            let remaining = Amount::from_units(due).remaining_after(Amount::from_units(paid));
            prop_assert!(!remaining.is_negative());
        }
    }
}
