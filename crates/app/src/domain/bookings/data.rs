//! Bookings Data

use hearth::{
    addons::{AddonCharge, PricingMode},
    bookings::PaymentMethod,
    discounts::DiscountPercent,
    pricing::price_stay,
};
use jiff::civil::Date;
use smallvec::SmallVec;

use crate::{
    domain::{
        apartments::records::{AddonUuid, ApartmentUuid},
        bookings::{
            errors::BookingsServiceError,
            records::{BookingRecord, BookingUuid},
        },
    },
    money::{to_minor, to_money},
};

/// Guest contact details captured with a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub special_request: Option<String>,
}

impl CustomerInfo {
    /// Name, email and phone are present and the email looks like one.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.phone.trim().is_empty()
            && self
                .email
                .trim()
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
    }
}

/// New Booking Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub uuid: BookingUuid,
    pub apartment_uuid: ApartmentUuid,
    pub check_in: Date,
    pub check_out: Date,
    pub guests: u32,
    pub addon_uuids: Vec<AddonUuid>,
    pub customer: CustomerInfo,
}

/// Inputs for a price preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub check_in: Date,
    pub check_out: Date,
    pub guests: u32,
    pub addon_uuids: Vec<AddonUuid>,
    pub coupon_code: Option<String>,
}

/// An addon's price as it stood when it was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonSnapshot {
    pub addon_uuid: AddonUuid,
    pub name: String,
    pub price: u64,
    pub pricing_mode: PricingMode,
}

/// An addon line within a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedAddon {
    pub addon: AddonSnapshot,
    pub total: u64,
}

/// Priced stay in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub nights: u32,
    pub nightly_rate: u64,
    pub base_subtotal: u64,
    pub addons: Vec<QuotedAddon>,
    pub addons_total: u64,
    pub service_charge: u64,
    pub tax: u64,
    pub discount_percent: Option<DiscountPercent>,
    pub discount_amount: u64,
    pub total_amount: u64,
}

impl Quote {
    /// Price a stay from minor-unit inputs.
    ///
    /// # Errors
    ///
    /// Returns an error when the amounts cannot be priced or do not fit in minor units.
    pub fn price(
        nightly_rate: u64,
        nights: u32,
        addons: Vec<AddonSnapshot>,
        discount: Option<DiscountPercent>,
    ) -> Result<Self, BookingsServiceError> {
        let rate = to_money(nightly_rate)?;

        let charges = addons
            .iter()
            .map(|addon| Ok(AddonCharge::new(to_money(addon.price)?, addon.pricing_mode)))
            .collect::<Result<SmallVec<[AddonCharge<'static>; 4]>, BookingsServiceError>>()?;

        let breakdown = price_stay(rate, nights, &charges, discount)?;

        let addons = addons
            .into_iter()
            .zip(&breakdown.addon_lines)
            .map(|(addon, line)| {
                Ok(QuotedAddon {
                    addon,
                    total: to_minor(&line.total)?,
                })
            })
            .collect::<Result<Vec<_>, BookingsServiceError>>()?;

        Ok(Self {
            nights: breakdown.nights,
            nightly_rate,
            base_subtotal: to_minor(&breakdown.base_subtotal)?,
            addons,
            addons_total: to_minor(&breakdown.addons_total)?,
            service_charge: to_minor(&breakdown.service_charge)?,
            tax: to_minor(&breakdown.tax)?,
            discount_percent: breakdown.discount_percent,
            discount_amount: to_minor(&breakdown.discount)?,
            total_amount: to_minor(&breakdown.total)?,
        })
    }
}

/// Checkout request from the guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    pub coupon_code: Option<String>,
}

/// Account guests pay into for bank transfers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankAccount {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
}

/// Static checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Where the payment provider sends the guest after a hosted checkout.
    pub callback_url: Option<String>,

    pub bank_account: BankAccount,
}

/// Instructions returned for a bank transfer checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankTransferInstructions {
    pub account: BankAccount,
    pub amount: u64,
    pub reference: String,
}

/// What the guest does next to pay.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// Continue to the provider's hosted checkout.
    Redirect {
        booking: BookingRecord,
        reference: String,
        authorization_url: String,
    },

    /// Pay by bank transfer quoting the reference.
    BankTransfer {
        booking: BookingRecord,
        instructions: BankTransferInstructions,
    },
}

impl CheckoutOutcome {
    #[must_use]
    pub fn booking(&self) -> &BookingRecord {
        match self {
            Self::Redirect { booking, .. } | Self::BankTransfer { booking, .. } => booking,
        }
    }
}
