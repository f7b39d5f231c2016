//! Booking Errors

use salvo::http::StatusError;
use tracing::error;

use hearth_app::domain::bookings::BookingsServiceError;

use crate::coupons::errors::into_rejection;

pub(crate) fn into_status_error(error: BookingsServiceError) -> StatusError {
    match error {
        BookingsServiceError::InvalidDates
        | BookingsServiceError::InvalidGuests
        | BookingsServiceError::TooManyGuests
        | BookingsServiceError::InvalidCustomer
        | BookingsServiceError::InvalidAddon(_) => StatusError::bad_request().brief(error.to_string()),
        BookingsServiceError::InvalidReference
        | BookingsServiceError::MissingRequiredData
        | BookingsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid booking payload")
        }
        BookingsServiceError::DatesUnavailable
        | BookingsServiceError::AlreadyProcessed
        | BookingsServiceError::AlreadyCancelled
        | BookingsServiceError::TooLateToCancel => StatusError::conflict().brief(error.to_string()),
        BookingsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Booking already exists")
        }
        BookingsServiceError::Coupon(source) => into_rejection(source),
        BookingsServiceError::Forbidden => StatusError::forbidden(),
        BookingsServiceError::NotFound => StatusError::not_found().brief("Booking not found"),
        BookingsServiceError::Gateway(source) => {
            error!("payment provider failed during checkout: {source}");

            StatusError::bad_gateway().brief("Payment provider unavailable")
        }
        BookingsServiceError::Pricing(source) => {
            error!("failed to price booking: {source}");

            StatusError::internal_server_error()
        }
        BookingsServiceError::Amount(source) => {
            error!("booking amount out of range: {source}");

            StatusError::internal_server_error()
        }
        BookingsServiceError::Sql(source) => {
            error!("failed to process booking: {source}");

            StatusError::internal_server_error()
        }
    }
}
