//! Booking Checkout Handler

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

use hearth::bookings::PaymentMethod;
use hearth_app::domain::bookings::data::{
    BankTransferInstructions, CheckoutOutcome, CheckoutRequest,
};

use crate::{bookings::errors::into_status_error, extensions::*, state::State};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutBookingRequest {
    /// `paystack` or `bank_transfer`
    pub payment_method: String,

    /// Coupon to apply; checked now, redeemed when payment is confirmed
    #[serde(default)]
    pub coupon_code: Option<String>,
}

impl CheckoutBookingRequest {
    fn into_checkout_request(self) -> Result<CheckoutRequest, StatusError> {
        Ok(CheckoutRequest {
            payment_method: self
                .payment_method
                .parse::<PaymentMethod>()
                .or_400("payment_method must be \"paystack\" or \"bank_transfer\"")?,
            coupon_code: self
                .coupon_code
                .filter(|code| !code.trim().is_empty()),
        })
    }
}

/// Bank Transfer Instructions
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BankTransferResponse {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,

    /// Amount to transfer in minor units
    pub amount: u64,

    /// Narration the guest must quote with the transfer
    pub reference: String,
}

impl From<BankTransferInstructions> for BankTransferResponse {
    fn from(instructions: BankTransferInstructions) -> Self {
        Self {
            bank_name: instructions.account.bank_name,
            account_name: instructions.account.account_name,
            account_number: instructions.account.account_number,
            amount: instructions.amount,
            reference: instructions.reference,
        }
    }
}

/// Checkout Response
///
/// Exactly one of `authorization_url` and `bank_transfer` is present.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    /// Payment reference to present when confirming
    pub reference: String,

    /// Amount due in minor units, after any coupon
    pub total_amount: u64,

    /// Hosted payment page to send the guest to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_transfer: Option<BankTransferResponse>,
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::Redirect {
                booking,
                reference,
                authorization_url,
            } => Self {
                reference,
                total_amount: booking.total_amount,
                authorization_url: Some(authorization_url),
                bank_transfer: None,
            },
            CheckoutOutcome::BankTransfer {
                booking,
                instructions,
            } => Self {
                reference: instructions.reference.clone(),
                total_amount: booking.total_amount,
                authorization_url: None,
                bank_transfer: Some(instructions.into()),
            },
        }
    }
}

/// Booking Checkout Handler
///
/// Starts paying for a pending booking. Repeating checkout mints a new reference.
#[endpoint(
    tags("bookings"),
    summary = "Start Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Checkout started"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Booking belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Booking not found"),
        (status_code = StatusCode::CONFLICT, description = "Booking already processed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon rejected"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment provider unavailable"),
    ),
)]
#[tracing::instrument(
    name = "bookings.checkout",
    skip(booking, json, depot),
    fields(booking_uuid = tracing::field::Empty, payment_method = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    booking: PathParam<Uuid>,
    json: JsonBody<CheckoutBookingRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let booking = booking.into_inner();
    let request = json.into_inner().into_checkout_request()?;

    let span = tracing::Span::current();

    span.record("booking_uuid", tracing::field::display(booking));
    span.record("payment_method", request.payment_method.as_str());

    let outcome = state
        .app
        .bookings
        .initiate_checkout(principal, booking.into(), request)
        .await
        .map_err(into_status_error)?;

    Ok(Json(outcome.into()))
}
