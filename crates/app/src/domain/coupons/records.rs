//! Coupon Records

use hearth::{coupons::CouponState, discounts::DiscountPercent};
use jiff::Timestamp;

use crate::{auth::UserUuid, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon Record
#[derive(Debug, Clone)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount_percent: DiscountPercent,
    pub is_used: bool,
    pub is_usable: bool,
    pub used_by: Option<UserUuid>,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CouponRecord {
    #[must_use]
    pub const fn state(&self) -> CouponState {
        CouponState {
            is_used: self.is_used,
            is_usable: self.is_usable,
        }
    }
}

/// A coupon that passed validation and may be attached to a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount_percent: DiscountPercent,
}
