//! Apartment Quote Handler

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

use hearth_app::domain::bookings::data::QuoteRequest;

use crate::{
    bookings::{PriceResponse, errors::into_status_error},
    extensions::*,
    state::State,
};

/// Quote Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateQuoteRequest {
    /// `YYYY-MM-DD`
    pub check_in: String,

    /// `YYYY-MM-DD`, after `check_in`
    pub check_out: String,

    pub guests: u32,

    /// Addons to include; duplicates are priced once
    #[serde(default)]
    pub addons: Vec<Uuid>,

    #[serde(default)]
    pub coupon_code: Option<String>,
}

impl CreateQuoteRequest {
    fn into_quote_request(self) -> Result<QuoteRequest, StatusError> {
        Ok(QuoteRequest {
            check_in: parse_date(&self.check_in, "check_in")?,
            check_out: parse_date(&self.check_out, "check_out")?,
            guests: self.guests,
            addon_uuids: self.addons.into_iter().map(Into::into).collect(),
            coupon_code: self.coupon_code.filter(|code| !code.trim().is_empty()),
        })
    }
}

/// Apartment Quote Handler
///
/// Prices a prospective stay without holding the dates or consuming a coupon.
#[endpoint(
    tags("apartments"),
    summary = "Quote Stay",
    responses(
        (status_code = StatusCode::OK, description = "Stay priced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Apartment not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon rejected"),
    ),
)]
pub(crate) async fn handler(
    apartment: PathParam<Uuid>,
    json: JsonBody<CreateQuoteRequest>,
    depot: &mut Depot,
) -> Result<Json<PriceResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner().into_quote_request()?;

    let quote = state
        .app
        .bookings
        .quote_booking(apartment.into_inner().into(), request, today())
        .await
        .map_err(into_status_error)?;

    Ok(Json(PriceResponse::from(&quote)))
}
