//! Confirm Bank Transfer Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    bookings::handlers::confirm::ConfirmBookingResponse, extensions::*,
    payments::errors::into_status_error, state::State,
};

/// Confirm Bank Transfer Handler
///
/// Confirms a booking paid by bank transfer once the funds have arrived. Administrators only.
#[endpoint(
    tags("bookings"),
    summary = "Confirm Bank Transfer",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Booking confirmed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator access required"),
        (status_code = StatusCode::NOT_FOUND, description = "Booking not found"),
        (status_code = StatusCode::CONFLICT, description = "Not a bank transfer, cancelled, or dates taken"),
    ),
)]
#[tracing::instrument(
    name = "bookings.confirm_transfer",
    skip(booking, depot),
    fields(booking_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    booking: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ConfirmBookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let booking = booking.into_inner();

    tracing::Span::current().record("booking_uuid", tracing::field::display(booking));

    let outcome = state
        .app
        .payments
        .confirm_transfer(booking.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(outcome.into()))
}
