//! Coupon Errors

use salvo::http::StatusError;
use tracing::error;

use hearth_app::domain::coupons::CouponsServiceError;

/// Errors from coupon administration.
pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Coupon code already exists")
        }
        CouponsServiceError::NotFound => StatusError::not_found().brief("Coupon not found"),
        CouponsServiceError::InvalidCode(_)
        | CouponsServiceError::InvalidDiscount
        | CouponsServiceError::InvalidReference
        | CouponsServiceError::MissingRequiredData
        | CouponsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid coupon payload")
        }
        CouponsServiceError::AlreadyUsed | CouponsServiceError::Disabled => {
            StatusError::unprocessable_entity().brief(error.to_string())
        }
        CouponsServiceError::Sql(source) => {
            error!("failed to process coupon: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Errors from applying a coupon code a guest typed in.
pub(crate) fn into_rejection(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::NotFound | CouponsServiceError::InvalidCode(_) => {
            StatusError::unprocessable_entity().brief("Coupon code is not valid")
        }
        CouponsServiceError::AlreadyUsed => {
            StatusError::unprocessable_entity().brief("Coupon has already been used")
        }
        CouponsServiceError::Disabled => {
            StatusError::unprocessable_entity().brief("Coupon is disabled")
        }
        other => into_status_error(other),
    }
}
