//! Amount type for handling monetary values entered through the dashboard form.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may include a dollar sign, thousands separators, or an exponent.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// The number of decimal places used when an amount is written to the wire.
const WIRE_DECIMALS: u32 = 2;

/// The largest magnitude accepted when parsing, one quadrillion. Sums of any number of amounts
/// this size stay far inside the range of `Decimal`.
const MAX_MAGNITUDE: i64 = 1_000_000_000_000_000;

/// Represents a currency amount.
///
/// Unlike a float, sums of `Amount` values are exact, so category totals always add up to the
/// grand total. Parsed amounts are limited to `±1,000,000,000,000,000`; arithmetic saturates at
/// the bounds of `Decimal` instead of panicking.
///
/// # Examples
///
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "$1,250.50");
/// assert_eq!(amount.to_wire(), "1250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative, e.g. a refund.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Adds two amounts, returning `None` if the result does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Formats the amount as a plain number with exactly two decimal places, e.g. `-1250.50`.
    pub fn to_wire(&self) -> String {
        fixed_2dp(self.0)
    }
}

/// Rounds `value` half away from zero and renders it with exactly two decimal places.
pub(crate) fn fixed_2dp(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(
        WIRE_DECIMALS,
        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
    );
    rounded.rescale(WIRE_DECIMALS);
    if rounded.is_zero() {
        // avoid "-0.00"
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

/// Serializes `value` as a JSON number with exactly two decimal places.
pub(crate) fn serialize_2dp<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let raw = RawValue::from_string(fixed_2dp(*value)).map_err(serde::ser::Error::custom)?;
    raw.serialize(serializer)
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountError {
    input: String,
    reason: String,
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid amount: {}", self.input, self.reason)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &str| AmountError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(error("the value is empty"));
        }

        // "-$50.00", "$50.00", "+50"
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);
        let digits = unsigned.replace(',', "");
        if digits.is_empty() {
            return Err(error("no digits were found"));
        }

        let value = match Decimal::from_str(&digits) {
            Ok(value) => value,
            Err(plain) => {
                if digits.contains(['e', 'E']) {
                    Decimal::from_scientific(&digits).map_err(|e| error(&e.to_string()))?
                } else {
                    return Err(error(&plain.to_string()));
                }
            }
        };

        if value.abs() > Decimal::from(MAX_MAGNITUDE) {
            return Err(error("amounts are limited to 1,000,000,000,000,000"));
        }

        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().to_f64().unwrap_or_default();
        write!(f, "{sign}${}", format_num::format_num!(",.2", num))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_2dp(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept both `12.50` and `"12.50"`.
        let value = serde_json::Value::deserialize(deserializer)?;
        let s = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a number or string for an amount, got {other}"
                )))
            }
        };
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |total, amount| total + amount)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
