//! Coupons
//!
//! Single-use percentage coupons. Codes are stored upper-cased; lookups trim
//! surrounding whitespace but are otherwise case-sensitive.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest accepted coupon code.
pub const MIN_CODE_LEN: usize = 3;

/// Longest accepted coupon code.
pub const MAX_CODE_LEN: usize = 32;

/// Errors raised while parsing a coupon code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CouponCodeError {
    /// Nothing but whitespace was supplied.
    #[error("coupon code is empty")]
    Empty,

    /// Code length outside the accepted bounds.
    #[error("coupon code must be between {MIN_CODE_LEN} and {MAX_CODE_LEN} characters, got {0}")]
    Length(usize),

    /// Only ASCII letters, digits, `-` and `_` are accepted.
    #[error("coupon code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A trimmed coupon code, exactly as presented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Parse a code presented by a guest: trims, then validates.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponCodeError`] describing the first problem found.
    pub fn parse(raw: &str) -> Result<Self, CouponCodeError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(CouponCodeError::Empty);
        }

        let len = trimmed.chars().count();

        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&len) {
            return Err(CouponCodeError::Length(len));
        }

        if let Some(invalid) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CouponCodeError::InvalidCharacter(invalid));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Parse a code for storage: as [`CouponCode::parse`], then upper-cased.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponCodeError`] describing the first problem found.
    pub fn normalized(raw: &str) -> Result<Self, CouponCodeError> {
        Self::parse(raw).map(|code| Self(code.0.to_ascii_uppercase()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CouponCode {
    type Err = CouponCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

/// Why a coupon cannot be redeemed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CouponRejection {
    /// The coupon was already consumed by a confirmed booking.
    #[error("coupon has already been used")]
    AlreadyUsed,

    /// The coupon has been disabled by an administrator.
    #[error("coupon is disabled")]
    Disabled,
}

/// Redemption-relevant flags of a stored coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CouponState {
    /// Set once a confirmed booking consumes the coupon.
    pub is_used: bool,

    /// Administrative on/off switch.
    pub is_usable: bool,
}

impl CouponState {
    /// A freshly created coupon.
    pub const FRESH: Self = Self {
        is_used: false,
        is_usable: true,
    };

    /// Check whether the coupon may be applied to a booking.
    ///
    /// # Errors
    ///
    /// - [`CouponRejection::AlreadyUsed`]: the coupon was consumed.
    /// - [`CouponRejection::Disabled`]: the coupon is switched off.
    pub const fn ensure_redeemable(self) -> Result<(), CouponRejection> {
        if self.is_used {
            return Err(CouponRejection::AlreadyUsed);
        }

        if !self.is_usable {
            return Err(CouponRejection::Disabled);
        }

        Ok(())
    }

    /// State after a confirmed booking consumes the coupon.
    ///
    /// # Errors
    ///
    /// Same as [`CouponState::ensure_redeemable`].
    pub const fn redeem(self) -> Result<Self, CouponRejection> {
        match self.ensure_redeemable() {
            Ok(()) => Ok(Self {
                is_used: true,
                is_usable: self.is_usable,
            }),
            Err(rejection) => Err(rejection),
        }
    }
}
