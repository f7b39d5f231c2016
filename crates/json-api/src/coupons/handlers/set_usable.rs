//! Set Coupon Usable Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    coupons::{errors::into_status_error, handlers::CouponResponse},
    extensions::*,
    state::State,
};

/// Set Usable Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetUsableRequest {
    pub is_usable: bool,
}

/// Set Coupon Usable Handler
///
/// Enables or disables a coupon. A used coupon stays used either way.
#[endpoint(
    tags("coupons"),
    summary = "Enable or Disable Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon updated"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator access required"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
    ),
)]
#[tracing::instrument(
    name = "coupons.set_usable",
    skip(coupon, json, depot),
    fields(coupon_uuid = tracing::field::Empty, is_usable = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    json: JsonBody<SetUsableRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let coupon = coupon.into_inner();
    let is_usable = json.into_inner().is_usable;

    let span = tracing::Span::current();

    span.record("coupon_uuid", tracing::field::display(coupon));
    span.record("is_usable", is_usable);

    let coupon = state
        .app
        .coupons
        .set_usable(coupon.into(), is_usable)
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}

#[cfg(test)]
mod tests {
    use hearth::discounts::DiscountPercent;
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use hearth_app::domain::coupons::{
        CouponsServiceError, MockCouponsService,
        records::{CouponRecord, CouponUuid},
    };

    use crate::test_helpers::{Mocks, TEST_GUEST, admin_service, guest_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("coupons/{coupon}/usable").put(handler)
    }

    #[tokio::test]
    async fn test_disabling_used_coupon_keeps_it_used() -> TestResult {
        let uuid = CouponUuid::new();

        let record = CouponRecord {
            uuid,
            code: "WELCOME10".to_string(),
            discount_percent: DiscountPercent::new(10)?,
            is_used: true,
            is_usable: false,
            used_by: Some(TEST_GUEST.user_uuid),
            used_at: Some(Timestamp::UNIX_EPOCH),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        };

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_set_usable()
            .once()
            .withf(move |u, is_usable| *u == uuid && !*is_usable)
            .return_once(move |_, _| Ok(record));

        let service = admin_service(
            Mocks {
                coupons,
                ..Mocks::default()
            },
            route(),
        );

        let mut res = TestClient::put(format!("http://example.com/coupons/{uuid}/usable"))
            .json(&json!({ "is_usable": false }))
            .send(&service)
            .await;

        let body: CouponResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.is_usable, "expected coupon to be disabled");
        assert!(body.is_used, "expected coupon to stay used");
        assert_eq!(body.used_by, Some(TEST_GUEST.user_uuid.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_coupon_returns_404() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_set_usable()
            .once()
            .return_once(|_, _| Err(CouponsServiceError::NotFound));

        let service = admin_service(
            Mocks {
                coupons,
                ..Mocks::default()
            },
            route(),
        );

        let res = TestClient::put(format!(
            "http://example.com/coupons/{}/usable",
            Uuid::now_v7()
        ))
        .json(&json!({ "is_usable": true }))
        .send(&service)
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_guest_cannot_toggle_coupons() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_set_usable().never();

        let service = guest_service(
            Mocks {
                coupons,
                ..Mocks::default()
            },
            route(),
        );

        let res = TestClient::put(format!(
            "http://example.com/coupons/{}/usable",
            Uuid::now_v7()
        ))
        .json(&json!({ "is_usable": true }))
        .send(&service)
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
