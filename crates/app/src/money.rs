//! Money conversions.
//!
//! Amounts are stored as integer cents. The HTTP layer speaks major units (`19.99`), so the
//! conversion goes through [`Decimal`] and never does arithmetic on binary floats.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount must be a finite number")]
    NotFinite,

    #[error("amount must not be negative")]
    Negative,

    #[error("amount is too large")]
    Overflow,
}

/// Convert a major-unit amount into cents, rounding half away from zero.
///
/// # Errors
///
/// Returns an error for `NaN`, infinities, negative amounts and amounts beyond `u64` cents.
pub fn to_cents(amount: f64) -> Result<u64, MoneyError> {
    let decimal = Decimal::from_f64(amount).ok_or(MoneyError::NotFinite)?;

    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(MoneyError::Negative);
    }

    decimal
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_u64())
        .ok_or(MoneyError::Overflow)
}

/// Convert cents into a major-unit amount for rendering.
pub fn to_major(cents: u64) -> f64 {
    (Decimal::from(cents) / Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or_default()
}

/// Parse a numeric string such as `"19.99"` into a major-unit amount.
pub fn parse_major(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<Decimal>()
        .ok()
        .and_then(|decimal| decimal.to_f64())
}
