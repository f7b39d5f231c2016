//! Payment Errors

use salvo::http::StatusError;
use tracing::error;

use hearth_app::domain::payments::PaymentsServiceError;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Booking not found"),
        PaymentsServiceError::ReferenceMismatch => StatusError::bad_request().brief(error.to_string()),
        PaymentsServiceError::InvalidReference
        | PaymentsServiceError::MissingRequiredData
        | PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment payload")
        }
        PaymentsServiceError::Underpaid { .. } => {
            StatusError::payment_required().brief(error.to_string())
        }
        PaymentsServiceError::AlreadyCancelled
        | PaymentsServiceError::DatesUnavailable
        | PaymentsServiceError::CouponAlreadyUsed
        | PaymentsServiceError::ManualConfirmationRequired
        | PaymentsServiceError::NotBankTransfer => StatusError::conflict().brief(error.to_string()),
        PaymentsServiceError::Gateway(source) => {
            error!("payment provider failed during verification: {source}");

            StatusError::bad_gateway().brief("Payment provider unavailable")
        }
        PaymentsServiceError::Sql(source) => {
            error!("failed to confirm payment: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use hearth_app::gateway::GatewayError;

    use super::*;

    #[test]
    fn short_payment_is_payment_required() {
        let error = into_status_error(PaymentsServiceError::Underpaid {
            expected: 11_812_500,
            received: 100,
        });

        assert_eq!(error.code, StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn lost_race_for_dates_is_a_conflict() {
        assert_eq!(
            into_status_error(PaymentsServiceError::DatesUnavailable).code,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn provider_failure_is_bad_gateway() {
        let error = into_status_error(PaymentsServiceError::Gateway(
            GatewayError::UnexpectedResponse("empty body".to_string()),
        ));

        assert_eq!(error.code, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn transfer_booking_on_the_provider_path_is_a_conflict() {
        assert_eq!(
            into_status_error(PaymentsServiceError::ManualConfirmationRequired).code,
            StatusCode::CONFLICT
        );
        assert_eq!(
            into_status_error(PaymentsServiceError::NotBankTransfer).code,
            StatusCode::CONFLICT
        );
    }
}
