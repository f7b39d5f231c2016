//! Minor-unit conversions between storage and the pricing engine.

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency every booking is priced and settled in.
pub const BOOKING_CURRENCY: &Currency = iso::NGN;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MinorUnitsError {
    #[error("amount {0} does not fit in a signed 64-bit integer")]
    TooLarge(u64),

    #[error("amount {0} is negative")]
    Negative(i64),
}

/// Wrap stored minor units as money in the booking currency.
///
/// # Errors
///
/// Returns [`MinorUnitsError::TooLarge`] when the amount exceeds `i64::MAX`.
pub fn to_money(minor: u64) -> Result<Money<'static, Currency>, MinorUnitsError> {
    let signed = i64::try_from(minor).map_err(|_ignored| MinorUnitsError::TooLarge(minor))?;

    Ok(Money::from_minor(signed, BOOKING_CURRENCY))
}

/// Extract non-negative minor units from money.
///
/// # Errors
///
/// Returns [`MinorUnitsError::Negative`] for negative amounts.
pub fn to_minor(money: &Money<'_, Currency>) -> Result<u64, MinorUnitsError> {
    let signed = money.to_minor_units();

    u64::try_from(signed).map_err(|_ignored| MinorUnitsError::Negative(signed))
}

/// Convert stored signed minor units to `u64`, as a column decode error.
pub(crate) fn decode_minor(column: &str, value: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert `u64` minor units for binding, as a column encode error.
pub(crate) fn encode_minor(column: &str, value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
