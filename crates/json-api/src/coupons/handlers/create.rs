//! Create Coupon Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use hearth_app::domain::coupons::{
    data::{NewCoupon, generate_coupon_code},
    records::CouponUuid,
};

use crate::{
    coupons::{errors::into_status_error, handlers::CouponResponse},
    extensions::*,
    state::State,
};

const fn default_usable() -> bool {
    true
}

/// Create Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCouponRequest {
    /// Stored upper-cased; a random code is generated when omitted
    #[serde(default)]
    pub code: Option<String>,

    /// Whole percent, 0 to 100
    pub discount_percent: u8,

    #[serde(default = "default_usable")]
    pub is_usable: bool,
}

impl From<CreateCouponRequest> for NewCoupon {
    fn from(request: CreateCouponRequest) -> Self {
        NewCoupon {
            uuid: CouponUuid::new(),
            code: request
                .code
                .filter(|code| !code.trim().is_empty())
                .unwrap_or_else(generate_coupon_code),
            discount_percent: request.discount_percent,
            is_usable: request.is_usable,
        }
    }
}

/// Create Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Create Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator access required"),
        (status_code = StatusCode::CONFLICT, description = "Coupon code already exists"),
    ),
)]
#[tracing::instrument(
    name = "coupons.create",
    skip(json, depot, res),
    fields(coupon_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let coupon = NewCoupon::from(json.into_inner());

    tracing::Span::current().record("coupon_uuid", tracing::field::display(coupon.uuid));

    let coupon = state
        .app
        .coupons
        .create_coupon(coupon)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/coupons/{}", coupon.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(coupon.into()))
}
