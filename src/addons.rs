//! Addons
//!
//! Optional extras attached to an apartment, charged either once per stay or once per night.

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::PricingError;

/// How an addon's price scales with the stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Charged for every night of the stay.
    #[serde(alias = "perNight", alias = "per-night")]
    PerNight,

    /// Charged once regardless of length.
    #[serde(alias = "oneTime", alias = "one-time")]
    OneTime,
}

impl PricingMode {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            PricingMode::PerNight => "per_night",
            PricingMode::OneTime => "one_time",
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown pricing mode was encountered while parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown pricing mode: {0}")]
pub struct UnknownPricingMode(pub String);

impl FromStr for PricingMode {
    type Err = UnknownPricingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_night" | "perNight" | "per-night" => Ok(PricingMode::PerNight),
            "one_time" | "oneTime" | "one-time" => Ok(PricingMode::OneTime),
            other => Err(UnknownPricingMode(other.to_string())),
        }
    }
}

/// Price and mode of one selected addon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddonCharge<'a> {
    price: Money<'a, Currency>,
    mode: PricingMode,
}

impl<'a> AddonCharge<'a> {
    /// Create a new addon charge.
    pub const fn new(price: Money<'a, Currency>, mode: PricingMode) -> Self {
        Self { price, mode }
    }

    /// Unit price of the addon.
    pub const fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Pricing mode of the addon.
    pub const fn mode(&self) -> PricingMode {
        self.mode
    }

    /// Total this addon contributes to a stay of `nights` nights.
    ///
    /// # Errors
    ///
    /// - [`PricingError::NonPositiveAddonPrice`]: the unit price is zero or negative.
    /// - [`PricingError::Overflow`]: the per-night multiplication overflowed.
    pub fn total_for(&self, nights: u32) -> Result<Money<'a, Currency>, PricingError> {
        let minor = self.price.to_minor_units();

        if minor <= 0 {
            return Err(PricingError::NonPositiveAddonPrice);
        }

        let total = match self.mode {
            PricingMode::OneTime => minor,
            PricingMode::PerNight => minor
                .checked_mul(i64::from(nights))
                .ok_or(PricingError::Overflow)?,
        };

        Ok(Money::from_minor(total, self.price.currency()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::NGN;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn per_night_addon_scales_with_nights() -> TestResult {
        let addon = AddonCharge::new(Money::from_minor(500_000, NGN), PricingMode::PerNight);

        assert_eq!(addon.total_for(3)?, Money::from_minor(1_500_000, NGN));

        Ok(())
    }

    #[test]
    fn one_time_addon_ignores_nights() -> TestResult {
        let addon = AddonCharge::new(Money::from_minor(2_000_000, NGN), PricingMode::OneTime);

        assert_eq!(addon.total_for(7)?, Money::from_minor(2_000_000, NGN));

        Ok(())
    }

    #[test]
    fn zero_priced_addon_is_rejected() {
        let addon = AddonCharge::new(Money::from_minor(0, NGN), PricingMode::OneTime);

        assert_eq!(addon.total_for(1), Err(PricingError::NonPositiveAddonPrice));
    }

    #[test]
    fn pricing_mode_parses_known_spellings() -> TestResult {
        assert_eq!("per_night".parse::<PricingMode>()?, PricingMode::PerNight);
        assert_eq!("perNight".parse::<PricingMode>()?, PricingMode::PerNight);
        assert_eq!("one_time".parse::<PricingMode>()?, PricingMode::OneTime);
        assert_eq!("oneTime".parse::<PricingMode>()?, PricingMode::OneTime);

        Ok(())
    }

    #[test]
    fn pricing_mode_rejects_unknown_spelling() {
        let result = "weekly".parse::<PricingMode>();

        assert_eq!(result, Err(UnknownPricingMode("weekly".to_string())));
    }
}
