//! Cancel Booking Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    bookings::{errors::into_status_error, handlers::BookingResponse},
    extensions::*,
    state::State,
};

/// Cancel Booking Handler
///
/// Cancels a booking whose stay has not started. No refund is issued.
#[endpoint(
    tags("bookings"),
    summary = "Cancel Booking",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Booking cancelled"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Booking belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Booking not found"),
        (status_code = StatusCode::CONFLICT, description = "Already cancelled or stay has started"),
    ),
)]
#[tracing::instrument(
    name = "bookings.cancel",
    skip(booking, depot),
    fields(booking_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    booking: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let booking = booking.into_inner();

    tracing::Span::current().record("booking_uuid", tracing::field::display(booking));

    let booking = state
        .app
        .bookings
        .cancel_booking(principal, booking.into(), today())
        .await
        .map_err(into_status_error)?;

    tracing::info!(booking_uuid = %booking.uuid, "cancelled booking");

    Ok(Json(booking.into()))
}
