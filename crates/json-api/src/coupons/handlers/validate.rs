//! Validate Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hearth_app::domain::coupons::records::ValidatedCoupon;

use crate::{coupons::errors::into_rejection, extensions::*, state::State};

/// Validate Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateCouponRequest {
    /// Code as typed by the guest; matched exactly after trimming
    pub code: String,
}

/// Validate Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidatedCouponResponse {
    pub uuid: Uuid,
    pub code: String,
    pub discount_percent: u8,
}

impl From<ValidatedCoupon> for ValidatedCouponResponse {
    fn from(coupon: ValidatedCoupon) -> Self {
        Self {
            uuid: coupon.uuid.into_uuid(),
            code: coupon.code,
            discount_percent: coupon.discount_percent.get(),
        }
    }
}

/// Validate Coupon Handler
///
/// Checks a code before checkout. Nothing is consumed.
#[endpoint(
    tags("coupons"),
    summary = "Validate Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon can be applied"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon rejected"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<ValidatedCouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.principal_or_401()?;

    let coupon = state
        .app
        .coupons
        .validate_coupon(&json.into_inner().code)
        .await
        .map_err(into_rejection)?;

    Ok(Json(coupon.into()))
}
