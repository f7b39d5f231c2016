//! Apartment Errors

use salvo::http::StatusError;
use tracing::error;

use hearth_app::domain::availability::AvailabilityServiceError;

pub(crate) fn into_status_error(error: AvailabilityServiceError) -> StatusError {
    match error {
        AvailabilityServiceError::NotFound => StatusError::not_found().brief("Apartment not found"),
        AvailabilityServiceError::Sql(source) => {
            error!("failed to read availability: {source}");

            StatusError::internal_server_error()
        }
    }
}
