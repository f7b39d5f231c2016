//! Discounts

use std::fmt;

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentages are whole numbers from 0 to 100.
    #[error("discount percent must be between 0 and 100, got {0}")]
    OutOfRange(i64),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// A whole-number discount percentage in `0..=100`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// Largest accepted percentage.
    pub const MAX: u8 = 100;

    /// No discount at all.
    pub const ZERO: Self = Self(0);

    /// Create a percentage, rejecting values above 100.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::OutOfRange`] when `percent > 100`.
    pub fn new(percent: u8) -> Result<Self, DiscountError> {
        if percent > Self::MAX {
            return Err(DiscountError::OutOfRange(i64::from(percent)));
        }

        Ok(Self(percent))
    }

    /// The percentage as a whole number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The percentage as a fraction, e.g. `10` becomes `0.10`.
    pub fn as_fraction(self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }
}

impl fmt::Debug for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for DiscountPercent {
    type Error = DiscountError;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl TryFrom<i16> for DiscountPercent {
    type Error = DiscountError;

    fn try_from(percent: i16) -> Result<Self, Self::Error> {
        let whole =
            u8::try_from(percent).map_err(|_ignored| DiscountError::OutOfRange(percent.into()))?;

        Self::new(whole)
    }
}

impl From<DiscountPercent> for u8 {
    fn from(percent: DiscountPercent) -> Self {
        percent.0
    }
}

impl From<DiscountPercent> for i16 {
    fn from(percent: DiscountPercent) -> Self {
        i16::from(percent.0)
    }
}

/// Apply a fractional rate to a minor-unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the amount cannot be
/// represented as a decimal or the result overflows `i64`.
pub fn percent_of_minor(rate: Decimal, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    rate.checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
