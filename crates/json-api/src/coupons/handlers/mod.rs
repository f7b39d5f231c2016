//! Coupon Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hearth_app::domain::coupons::records::CouponRecord;

pub(crate) mod create;
pub(crate) mod set_usable;
pub(crate) mod validate;

/// Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    pub uuid: Uuid,
    pub code: String,
    pub discount_percent: u8,

    /// Redeemed by a confirmed booking; never reset
    pub is_used: bool,

    /// Administrator switch, independent of `is_used`
    pub is_usable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_by: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl From<CouponRecord> for CouponResponse {
    fn from(coupon: CouponRecord) -> Self {
        Self {
            uuid: coupon.uuid.into_uuid(),
            code: coupon.code,
            discount_percent: coupon.discount_percent.get(),
            is_used: coupon.is_used,
            is_usable: coupon.is_usable,
            used_by: coupon.used_by.map(Into::into),
            used_at: coupon.used_at.map(|at| at.to_string()),
            created_at: coupon.created_at.to_string(),
            updated_at: coupon.updated_at.to_string(),
        }
    }
}
