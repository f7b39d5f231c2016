//! Booking Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hearth_app::domain::bookings::{
    data::{Quote, QuotedAddon},
    records::{BookingAddonRecord, BookingRecord},
};

pub(crate) mod cancel;
pub(crate) mod checkout;
pub(crate) mod confirm;
pub(crate) mod confirm_transfer;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;

/// Priced Addon Line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddonLineResponse {
    /// Catalog addon this line was priced from
    pub addon_uuid: Uuid,

    /// Addon name at pricing time
    pub name: String,

    /// Unit price in minor units
    pub price: u64,

    /// `per_night` or `one_time`
    pub pricing_mode: String,

    /// Line total in minor units
    pub total: u64,
}

impl From<&BookingAddonRecord> for AddonLineResponse {
    fn from(line: &BookingAddonRecord) -> Self {
        Self {
            addon_uuid: line.addon_uuid.into_uuid(),
            name: line.name.clone(),
            price: line.price,
            pricing_mode: line.pricing_mode.as_str().to_string(),
            total: line.total,
        }
    }
}

impl From<&QuotedAddon> for AddonLineResponse {
    fn from(line: &QuotedAddon) -> Self {
        Self {
            addon_uuid: line.addon.addon_uuid.into_uuid(),
            name: line.addon.name.clone(),
            price: line.addon.price,
            pricing_mode: line.addon.pricing_mode.as_str().to_string(),
            total: line.total,
        }
    }
}

/// Price Breakdown
///
/// All amounts are minor units of `currency`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PriceResponse {
    pub currency: String,
    pub nights: u32,
    pub nightly_rate: u64,
    pub base_subtotal: u64,
    pub addons: Vec<AddonLineResponse>,
    pub addons_total: u64,
    pub service_charge: u64,
    pub tax: u64,
    pub discount_percent: Option<u8>,
    pub discount_amount: u64,
    pub total_amount: u64,
}

fn currency() -> String {
    hearth_app::money::BOOKING_CURRENCY.iso_alpha_code.to_string()
}

impl From<&Quote> for PriceResponse {
    fn from(quote: &Quote) -> Self {
        Self {
            currency: currency(),
            nights: quote.nights,
            nightly_rate: quote.nightly_rate,
            base_subtotal: quote.base_subtotal,
            addons: quote.addons.iter().map(AddonLineResponse::from).collect(),
            addons_total: quote.addons_total,
            service_charge: quote.service_charge,
            tax: quote.tax,
            discount_percent: quote.discount_percent.map(|percent| percent.get()),
            discount_amount: quote.discount_amount,
            total_amount: quote.total_amount,
        }
    }
}

impl From<&BookingRecord> for PriceResponse {
    fn from(booking: &BookingRecord) -> Self {
        Self {
            currency: currency(),
            nights: booking.nights,
            nightly_rate: booking.nightly_rate,
            base_subtotal: booking.base_subtotal,
            addons: booking.addons.iter().map(AddonLineResponse::from).collect(),
            addons_total: booking.addons_total,
            service_charge: booking.service_charge,
            tax: booking.tax,
            discount_percent: booking.discount_percent.map(|percent| percent.get()),
            discount_amount: booking.discount_amount,
            total_amount: booking.total_amount,
        }
    }
}

/// Booking Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingResponse {
    pub uuid: Uuid,
    pub apartment_uuid: Uuid,

    /// First night, `YYYY-MM-DD`
    pub check_in: String,

    /// Departure day, `YYYY-MM-DD`; not a booked night
    pub check_out: String,

    pub guests: u32,

    /// `pending`, `confirmed` or `cancelled`
    pub status: String,

    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub price: PriceResponse,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub special_request: Option<String>,
    pub confirmed_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BookingRecord> for BookingResponse {
    fn from(booking: BookingRecord) -> Self {
        let price = PriceResponse::from(&booking);

        Self {
            uuid: booking.uuid.into_uuid(),
            apartment_uuid: booking.apartment_uuid.into_uuid(),
            check_in: booking.check_in.to_string(),
            check_out: booking.check_out.to_string(),
            guests: booking.guests,
            status: booking.status.as_str().to_string(),
            payment_method: booking
                .payment_method
                .map(|method| method.as_str().to_string()),
            payment_reference: booking.payment_reference,
            price,
            customer_name: booking.customer.name,
            customer_email: booking.customer.email,
            customer_phone: booking.customer.phone,
            special_request: booking.customer.special_request,
            confirmed_at: booking.confirmed_at.as_ref().map(ToString::to_string),
            cancelled_at: booking.cancelled_at.as_ref().map(ToString::to_string),
            created_at: booking.created_at.to_string(),
            updated_at: booking.updated_at.to_string(),
        }
    }
}
