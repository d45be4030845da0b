//! Fixed-point monetary amounts.
//!
//! Balances and transfer amounts are held as `i64` cents so that debits and
//! credits are exact. `Decimal` only appears at the HTTP boundary, where
//! clients send and receive amounts like `40.5`.

use std::fmt;

use rust_decimal::{Decimal, prelude::ToPrimitive};

/// Why a decimal amount cannot be held as cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("must have at most two decimal places")]
    TooPrecise,

    #[error("is out of range")]
    OutOfRange,
}

/// An amount of money in minor units (cents).
///
/// Stored in the `balance_cents BIGINT` column, hence the transparent
/// sqlx encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Number of fractional digits carried by an amount.
    pub const SCALE: u32 = 2;

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal amount into cents.
    ///
    /// Fails if the value has more than two fractional digits or does not
    /// fit in an `i64` once scaled.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        if value.normalize().scale() > Self::SCALE {
            return Err(MoneyError::TooPrecise);
        }
        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.to_i64())
            .map(Self)
            .ok_or(MoneyError::OutOfRange)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, Self::SCALE)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_two_decimal_places_exactly() {
        assert_eq!(Money::from_decimal(dec!(40.5)), Ok(Money::from_cents(4050)));
        assert_eq!(Money::from_decimal(dec!(0.01)), Ok(Money::from_cents(1)));
        assert_eq!(Money::from_decimal(dec!(100)), Ok(Money::from_cents(10000)));
    }

    #[test]
    fn rejects_sub_cent_precision() {
        assert_eq!(Money::from_decimal(dec!(0.001)), Err(MoneyError::TooPrecise));
        assert_eq!(Money::from_decimal(dec!(12.345)), Err(MoneyError::TooPrecise));
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        assert_eq!(Money::from_decimal(dec!(1.2500)), Ok(Money::from_cents(125)));
    }

    #[test]
    fn rejects_values_outside_i64_cents() {
        assert_eq!(Money::from_decimal(Decimal::MAX), Err(MoneyError::OutOfRange));
        assert_eq!(
            Money::from_decimal(dec!(100000000000000000000)),
            Err(MoneyError::OutOfRange)
        );
        assert_eq!(
            Money::from_decimal(dec!(92233720368547758.07)),
            Ok(Money::from_cents(i64::MAX))
        );
        assert_eq!(
            Money::from_decimal(dec!(92233720368547758.08)),
            Err(MoneyError::OutOfRange)
        );
    }

    #[test]
    fn displays_as_decimal() {
        assert_eq!(Money::from_cents(8000).to_string(), "80.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }

    #[test]
    fn checked_arithmetic_detects_overflow() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(
            Money::from_cents(100).checked_sub(Money::from_cents(40)),
            Some(Money::from_cents(60))
        );
    }

    #[test]
    fn sign_helpers() {
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(!Money::ZERO.is_positive());
        assert!(Money::from_cents(1).is_positive());
    }
}
