//! Parsing and validation of decimal money values.
//!
//! Amounts are fixed at two fractional digits and twelve significant digits,
//! the same shape the store persists. Anything finer is rejected rather than
//! rounded so a spend record never differs from what the operator typed.

use crate::types::MONEY_SCALE;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest accepted magnitude (exclusive): 10 integer digits.
fn money_bound() -> Decimal {
    Decimal::new(10_000_000_000, 0)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid decimal amount: {0}")]
    Unparsable(String),
    #[error("Amount must be positive.")]
    NotPositive,
    #[error("Budget limit must not be negative.")]
    NegativeLimit,
    #[error("Amount {0} has more than {MONEY_SCALE} decimal places")]
    TooPrecise(Decimal),
    #[error("Amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Parse a spend amount: a strictly positive decimal with at most two places.
pub fn parse_amount(s: &str) -> Result<Decimal, AmountError> {
    validate_amount(parse_decimal(s)?)
}

/// Parse a brand budget limit: a non-negative decimal with at most two places.
pub fn parse_limit(s: &str) -> Result<Decimal, AmountError> {
    validate_limit(parse_decimal(s)?)
}

/// Validate an already-typed spend amount and normalize it to two places.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }
    normalize(amount)
}

/// Validate an already-typed budget limit and normalize it to two places.
pub fn validate_limit(limit: Decimal) -> Result<Decimal, AmountError> {
    if limit.is_zero() {
        return Ok(to_money(Decimal::ZERO));
    }
    if limit.is_sign_negative() {
        return Err(AmountError::NegativeLimit);
    }
    normalize(limit)
}

/// Rescale a value read back from storage (or computed from stored values).
pub fn to_money(value: Decimal) -> Decimal {
    let mut v = value;
    v.rescale(MONEY_SCALE);
    v
}

fn parse_decimal(s: &str) -> Result<Decimal, AmountError> {
    let trimmed = s.trim();
    Decimal::from_str(trimmed).map_err(|_| AmountError::Unparsable(s.to_string()))
}

fn normalize(value: Decimal) -> Result<Decimal, AmountError> {
    let value = value.normalize();
    if value.scale() > MONEY_SCALE {
        return Err(AmountError::TooPrecise(value));
    }
    if value.abs() >= money_bound() {
        return Err(AmountError::OutOfRange(value));
    }
    Ok(to_money(value))
}
