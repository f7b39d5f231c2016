//! Booking Records

use hearth::{
    addons::PricingMode,
    bookings::{BookingStatus, PaymentMethod},
    discounts::DiscountPercent,
    stays::{Stay, StayError},
};
use jiff::{Timestamp, civil::Date};

use crate::{
    auth::UserUuid,
    domain::{
        apartments::records::{AddonUuid, ApartmentUuid},
        bookings::data::{AddonSnapshot, CustomerInfo},
        coupons::records::CouponUuid,
    },
    uuids::TypedUuid,
};

/// Booking UUID
pub type BookingUuid = TypedUuid<BookingRecord>;

/// Booking Addon UUID
pub type BookingAddonUuid = TypedUuid<BookingAddonRecord>;

/// Booking Record
///
/// Amounts are minor units, snapshotted when the booking was priced.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub uuid: BookingUuid,
    pub apartment_uuid: ApartmentUuid,
    pub user_uuid: UserUuid,
    pub check_in: Date,
    pub check_out: Date,
    pub guests: u32,
    pub status: BookingStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,
    pub nightly_rate: u64,
    pub nights: u32,
    pub base_subtotal: u64,
    pub addons: Vec<BookingAddonRecord>,
    pub addons_total: u64,
    pub service_charge: u64,
    pub tax: u64,
    pub coupon_uuid: Option<CouponUuid>,
    pub discount_percent: Option<DiscountPercent>,
    pub discount_amount: u64,
    pub total_amount: u64,
    pub customer: CustomerInfo,
    pub confirmed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BookingRecord {
    /// The nights this booking covers.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored dates do not form a valid stay.
    pub fn stay(&self) -> Result<Stay, StayError> {
        Stay::new(self.check_in, self.check_out)
    }

    /// Addon snapshots in the order they were selected.
    #[must_use]
    pub fn addon_snapshots(&self) -> Vec<AddonSnapshot> {
        self.addons
            .iter()
            .map(BookingAddonRecord::snapshot)
            .collect()
    }
}

/// An addon as it was priced into a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingAddonRecord {
    pub uuid: BookingAddonUuid,
    pub booking_uuid: BookingUuid,
    pub addon_uuid: AddonUuid,
    pub position: u32,
    pub name: String,
    pub price: u64,
    pub pricing_mode: PricingMode,
    pub total: u64,
}

impl BookingAddonRecord {
    #[must_use]
    pub fn snapshot(&self) -> AddonSnapshot {
        AddonSnapshot {
            addon_uuid: self.addon_uuid,
            name: self.name.clone(),
            price: self.price,
            pricing_mode: self.pricing_mode,
        }
    }
}
