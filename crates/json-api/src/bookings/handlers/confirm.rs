//! Confirm Booking Handler

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

use hearth_app::domain::payments::data::PaymentOutcome;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Payment Confirmation Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ConfirmBookingRequest {
    /// Reference returned by checkout
    pub reference: String,
}

/// Payment Confirmation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ConfirmBookingResponse {
    pub uuid: Uuid,
    pub status: String,

    /// Whether the booking is confirmed
    pub confirmed: bool,

    /// Provider status when the payment has not settled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

impl From<PaymentOutcome> for ConfirmBookingResponse {
    fn from(outcome: PaymentOutcome) -> Self {
        let confirmed = outcome.is_confirmed();

        let payment_status = match &outcome {
            PaymentOutcome::NotPaid { status, .. } => Some(status.as_str().to_string()),
            PaymentOutcome::Confirmed(_) | PaymentOutcome::AlreadyConfirmed(_) => None,
        };

        let booking = outcome.booking();

        Self {
            uuid: booking.uuid.into_uuid(),
            status: booking.status.as_str().to_string(),
            confirmed,
            payment_status,
        }
    }
}

/// Confirm Booking Handler
///
/// Verifies the payment with the provider and confirms the booking when it has settled.
/// Reached from the provider's redirect, so no session is required.
#[endpoint(
    tags("bookings"),
    summary = "Confirm Payment",
    responses(
        (status_code = StatusCode::OK, description = "Payment checked"),
        (status_code = StatusCode::BAD_REQUEST, description = "Reference does not match the booking"),
        (status_code = StatusCode::NOT_FOUND, description = "Booking not found"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Payment does not cover the total"),
        (status_code = StatusCode::CONFLICT, description = "Booking cancelled or dates taken"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment provider unavailable"),
    ),
)]
#[tracing::instrument(
    name = "bookings.confirm",
    skip(booking, json, depot),
    fields(booking_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    booking: PathParam<Uuid>,
    json: JsonBody<ConfirmBookingRequest>,
    depot: &mut Depot,
) -> Result<Json<ConfirmBookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let booking = booking.into_inner();
    let reference = json.into_inner().reference;

    tracing::Span::current().record("booking_uuid", tracing::field::display(booking));

    let outcome = state
        .app
        .payments
        .confirm_payment(booking.into(), reference.trim())
        .await
        .map_err(into_status_error)?;

    Ok(Json(outcome.into()))
}
