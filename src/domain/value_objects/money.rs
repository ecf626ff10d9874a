//! Money value object.
//!
//! Provides a strongly-typed representation of a monetary amount in the
//! platform currency. The ledger works in a single currency, so `Money` only
//! carries a `Decimal` amount.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing Money.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount string could not be parsed as a valid decimal.
    InvalidAmount(String),
    /// The amount is negative when it should be positive.
    NegativeAmount,
}

impl fmt::Display for MoneyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(value) => {
                write!(formatter, "Invalid amount: {value}")
            }
            Self::NegativeAmount => {
                write!(formatter, "Amount cannot be negative")
            }
        }
    }
}

impl std::error::Error for MoneyError {}

/// A monetary amount in the platform currency.
///
/// `Money` is signed: balances are kept non-negative by the ledger rules, but
/// transaction log entries record debits as negative amounts.
///
/// # Examples
///
/// ```rust
/// use consultant_wallet::domain::value_objects::Money;
///
/// let earned = Money::new(10_000);
/// let reserved = Money::new(5_000);
/// assert_eq!(earned - reserved, Money::new(5_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a `Money` value from whole currency units.
    #[must_use]
    pub fn new(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Creates a `Money` value from a `Decimal` amount.
    #[must_use]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parses a string amount into `Money`.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the string is not a decimal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use consultant_wallet::domain::value_objects::Money;
    ///
    /// assert!(Money::parse("2500.50").is_ok());
    /// assert!(Money::parse("twenty").is_err());
    /// ```
    pub fn parse(amount: &str) -> Result<Self, MoneyError> {
        Decimal::from_str(amount.trim())
            .map(Self)
            .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))
    }

    /// Parses a string amount and rejects negative values.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the string is not a decimal and
    /// `MoneyError::NegativeAmount` if it is below zero.
    pub fn parse_non_negative(amount: &str) -> Result<Self, MoneyError> {
        let money = Self::parse(amount)?;
        if money.is_negative() {
            Err(MoneyError::NegativeAmount)
        } else {
            Ok(money)
        }
    }

    /// The zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the amount as a `Decimal`.
    #[must_use]
    pub const fn amount(&self) -> &Decimal {
        &self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Decimal::is_zero is not const
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if the amount is strictly greater than zero.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns `true` if the amount is strictly below zero.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// Returns the floored value and whether the floor was applied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use consultant_wallet::domain::value_objects::Money;
    ///
    /// let (rest, clamped) = Money::new(300).saturating_sub(Money::new(500));
    /// assert_eq!(rest, Money::zero());
    /// assert!(clamped);
    /// ```
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> (Self, bool) {
        let difference = self.0 - other.0;
        if difference.is_sign_negative() && !difference.is_zero() {
            (Self::zero(), true)
        } else {
            (Self(difference), false)
        }
    }

    /// Computes `percent` percent of this amount, rounded to whole currency
    /// units (midpoints round away from zero).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use consultant_wallet::domain::value_objects::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let fee = Money::new(5_000).percentage(Decimal::from(2));
    /// assert_eq!(fee, Money::new(100));
    /// ```
    #[must_use]
    pub fn percentage(&self, percent: Decimal) -> Self {
        let raw = self.0 * percent / Decimal::ONE_HUNDRED;
        Self(raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0.normalize())
    }
}
