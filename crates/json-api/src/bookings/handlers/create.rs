//! Create Booking Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hearth_app::domain::bookings::{
    data::{CustomerInfo, NewBooking},
    records::BookingUuid,
};

use crate::{bookings::errors::into_status_error, extensions::*, state::State};

/// Guest contact details
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub special_request: Option<String>,
}

impl From<CustomerRequest> for CustomerInfo {
    fn from(request: CustomerRequest) -> Self {
        CustomerInfo {
            name: request.name,
            email: request.email,
            phone: request.phone,
            special_request: request.special_request,
        }
    }
}

/// Create Booking Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateBookingRequest {
    /// Client-chosen booking UUID; generated when omitted
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub apartment_uuid: Uuid,

    /// First night, `YYYY-MM-DD`
    pub check_in: String,

    /// Departure day, `YYYY-MM-DD`
    pub check_out: String,

    pub guests: u32,

    /// Selected addon UUIDs; repeats are priced once
    #[serde(default)]
    pub addons: Vec<Uuid>,

    pub customer: CustomerRequest,
}

impl CreateBookingRequest {
    fn into_new_booking(self) -> Result<NewBooking, StatusError> {
        Ok(NewBooking {
            uuid: self.uuid.map_or_else(BookingUuid::new, BookingUuid::from_uuid),
            apartment_uuid: self.apartment_uuid.into(),
            check_in: parse_date(&self.check_in, "check_in")?,
            check_out: parse_date(&self.check_out, "check_out")?,
            guests: self.guests,
            addon_uuids: self.addons.into_iter().map(Into::into).collect(),
            customer: self.customer.into(),
        })
    }
}

/// Booking Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingCreatedResponse {
    pub uuid: Uuid,

    /// Always `pending` until payment is confirmed
    pub status: String,

    /// Amount due in minor units
    pub total_amount: u64,
}

/// Create Booking Handler
#[endpoint(
    tags("bookings"),
    summary = "Create Booking",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Booking created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::NOT_FOUND, description = "Apartment not found"),
        (status_code = StatusCode::CONFLICT, description = "Dates unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "bookings.create",
    skip(json, depot, res),
    fields(booking_uuid = tracing::field::Empty, user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateBookingRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BookingCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let booking = json.into_inner().into_new_booking()?;

    let span = tracing::Span::current();

    span.record("booking_uuid", tracing::field::display(booking.uuid));
    span.record("user_uuid", tracing::field::display(principal.user_uuid));

    let booking = state
        .app
        .bookings
        .create_booking(principal, booking, today())
        .await
        .map_err(into_status_error)?;

    let uuid = booking.uuid.into_uuid();

    res.add_header(LOCATION, format!("/bookings/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(BookingCreatedResponse {
        uuid,
        status: booking.status.as_str().to_string(),
        total_amount: booking.total_amount,
    }))
}
