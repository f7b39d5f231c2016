//! Pricing
//!
//! Prices a stay in minor currency units. Fees are charged on the pre-fee subtotal
//! (base plus addons); the coupon discount is then taken off the grand total
//! including fees. Every percentage step rounds half away from zero to a whole
//! minor unit.

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    addons::AddonCharge,
    discounts::{DiscountError, DiscountPercent, percent_of_minor},
};

/// Service charge applied to the pre-fee subtotal (5%).
pub const SERVICE_CHARGE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// VAT applied to the pre-fee subtotal (7.5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(75, 0, 0, false, 3);

/// Errors that can occur while pricing a stay.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The nightly rate was zero or negative.
    #[error("nightly rate must be positive")]
    NonPositiveRate,

    /// A stay of zero nights cannot be priced.
    #[error("a stay must last at least one night")]
    NoNights,

    /// An addon had a zero or negative unit price.
    #[error("addon price must be positive")]
    NonPositiveAddonPrice,

    /// Minor-unit arithmetic overflowed.
    #[error("amount overflowed")]
    Overflow,

    /// Percentage conversion failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// One priced addon within a breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddonLine<'a> {
    /// The addon as selected.
    pub charge: AddonCharge<'a>,

    /// What the addon contributes for this stay.
    pub total: Money<'a, Currency>,
}

/// Full price breakdown for a stay.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown<'a> {
    /// Number of nights priced.
    pub nights: u32,

    /// Nightly rate used.
    pub nightly_rate: Money<'a, Currency>,

    /// `nightly_rate * nights`.
    pub base_subtotal: Money<'a, Currency>,

    /// Each selected addon and its contribution.
    pub addon_lines: SmallVec<[AddonLine<'a>; 4]>,

    /// Sum of all addon contributions.
    pub addons_total: Money<'a, Currency>,

    /// Base plus addons; fees are computed on this amount.
    pub pre_fee_subtotal: Money<'a, Currency>,

    /// Service charge.
    pub service_charge: Money<'a, Currency>,

    /// Tax.
    pub tax: Money<'a, Currency>,

    /// Pre-fee subtotal plus service charge and tax.
    pub grand_total: Money<'a, Currency>,

    /// Coupon percentage applied, if any.
    pub discount_percent: Option<DiscountPercent>,

    /// Discount taken off the grand total.
    pub discount: Money<'a, Currency>,

    /// Amount owed.
    pub total: Money<'a, Currency>,
}

impl<'a> PriceBreakdown<'a> {
    /// Currency every amount is expressed in.
    pub fn currency(&self) -> &'a Currency {
        self.total.currency()
    }

    /// Check the breakdown adds up:
    /// `base + addons + service_charge + tax - discount == total`.
    pub fn verify(&self) -> bool {
        let addons_sum = self
            .addon_lines
            .iter()
            .map(|line| line.total.to_minor_units())
            .try_fold(0_i64, i64::checked_add);

        let expected = addons_sum
            .filter(|sum| *sum == self.addons_total.to_minor_units())
            .and_then(|sum| sum.checked_add(self.base_subtotal.to_minor_units()))
            .and_then(|sum| sum.checked_add(self.service_charge.to_minor_units()))
            .and_then(|sum| sum.checked_add(self.tax.to_minor_units()))
            .and_then(|sum| sum.checked_sub(self.discount.to_minor_units()));

        expected == Some(self.total.to_minor_units())
    }
}

/// Price a stay.
///
/// # Errors
///
/// - [`PricingError::NonPositiveRate`]: the nightly rate is zero or negative.
/// - [`PricingError::NoNights`]: `nights` is zero.
/// - [`PricingError::NonPositiveAddonPrice`]: an addon has a zero or negative price.
/// - [`PricingError::Overflow`]: minor-unit arithmetic overflowed.
/// - [`PricingError::Money`]: amounts were in different currencies.
pub fn price_stay<'a>(
    nightly_rate: Money<'a, Currency>,
    nights: u32,
    addons: &[AddonCharge<'a>],
    discount_percent: Option<DiscountPercent>,
) -> Result<PriceBreakdown<'a>, PricingError> {
    if nightly_rate.to_minor_units() <= 0 {
        return Err(PricingError::NonPositiveRate);
    }

    if nights == 0 {
        return Err(PricingError::NoNights);
    }

    let currency = nightly_rate.currency();

    let base_subtotal = Money::from_minor(
        nightly_rate
            .to_minor_units()
            .checked_mul(i64::from(nights))
            .ok_or(PricingError::Overflow)?,
        currency,
    );

    let addon_lines = addons
        .iter()
        .map(|charge| {
            Ok(AddonLine {
                charge: *charge,
                total: charge.total_for(nights)?,
            })
        })
        .collect::<Result<SmallVec<[AddonLine<'a>; 4]>, PricingError>>()?;

    let addons_total = addon_lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| acc.add(line.total))?;

    let pre_fee_subtotal = base_subtotal.add(addons_total)?;

    let service_charge = apply_rate(SERVICE_CHARGE_RATE, &pre_fee_subtotal)?;
    let tax = apply_rate(TAX_RATE, &pre_fee_subtotal)?;

    let grand_total = pre_fee_subtotal.add(service_charge)?.add(tax)?;

    let discount = match discount_percent {
        Some(percent) => apply_rate(percent.as_fraction(), &grand_total)?,
        None => Money::from_minor(0, currency),
    };

    let total = grand_total.sub(discount)?;

    Ok(PriceBreakdown {
        nights,
        nightly_rate,
        base_subtotal,
        addon_lines,
        addons_total,
        pre_fee_subtotal,
        service_charge,
        tax,
        grand_total,
        discount_percent,
        discount,
        total,
    })
}

fn apply_rate<'a>(
    rate: Decimal,
    amount: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = percent_of_minor(rate, amount.to_minor_units())?;

    Ok(Money::from_minor(minor, amount.currency()))
}
