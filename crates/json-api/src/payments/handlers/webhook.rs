//! Payment Webhook Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use hearth_app::domain::payments::data::{PaymentOutcome, WebhookOutcome};

use crate::{extensions::*, state::State};

/// Header carrying the provider's HMAC-SHA512 of the raw body.
pub(crate) const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Webhook Acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    pub received: bool,
}

/// Payment Webhook Handler
///
/// Receives provider notifications. Unsigned deliveries and business refusals are
/// acknowledged and dropped. Storage or provider outages answer 500 so the delivery is retried.
#[endpoint(
    tags("payments"),
    summary = "Payment Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Delivery acknowledged"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Temporary failure, retry later"),
    ),
)]
#[tracing::instrument(name = "payments.webhook", skip(req, depot), err)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let signature = req
        .header::<String>(SIGNATURE_HEADER)
        .unwrap_or_default();

    let payload = match req.payload().await {
        Ok(payload) => payload.clone(),
        Err(error) => {
            tracing::warn!("failed to read webhook body: {error}");

            return Ok(Json(WebhookResponse { received: true }));
        }
    };

    match state.app.payments.handle_webhook(&payload, &signature).await {
        Ok(WebhookOutcome::Rejected) => {
            tracing::warn!("rejected webhook with invalid signature");
        }
        Ok(WebhookOutcome::Ignored) => {
            tracing::debug!("ignored webhook event");
        }
        Ok(WebhookOutcome::Processed(outcome)) => {
            let booking_uuid = outcome.booking().uuid;

            match outcome {
                PaymentOutcome::Confirmed(_) => {
                    tracing::info!(%booking_uuid, "confirmed booking from webhook");
                }
                PaymentOutcome::AlreadyConfirmed(_) => {
                    tracing::debug!(%booking_uuid, "webhook for already confirmed booking");
                }
                PaymentOutcome::NotPaid { status, .. } => {
                    tracing::info!(%booking_uuid, status = status.as_str(), "webhook payment not settled");
                }
            }
        }
        Err(error) if error.is_transient() => {
            tracing::error!("webhook processing failed, leaving it for redelivery: {error}");

            return Err(StatusError::internal_server_error().brief("Temporary failure"));
        }
        Err(error) => {
            tracing::warn!("webhook could not be applied: {error}");
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}

#[cfg(test)]
mod tests {
    use hearth::bookings::BookingStatus;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use hearth_app::{
        domain::{
            bookings::records::BookingUuid,
            payments::{MockPaymentsService, PaymentsServiceError},
        },
        gateway::GatewayError,
    };

    use crate::test_helpers::{Mocks, make_booking, public_service};

    use super::*;

    const BODY: &str = r#"{"event":"charge.success","data":{"reference":"hb_ref"}}"#;

    fn make_service(payments: MockPaymentsService) -> Service {
        public_service(
            Mocks {
                payments,
                ..Mocks::default()
            },
            Router::with_path("payments/webhook").post(handler),
        )
    }

    #[tokio::test]
    async fn test_signed_delivery_is_passed_through_verbatim() -> TestResult {
        let mut booking = make_booking(BookingUuid::new());

        booking.status = BookingStatus::Confirmed;

        let mut payments = MockPaymentsService::new();

        payments
            .expect_handle_webhook()
            .once()
            .withf(|payload, signature| payload == BODY.as_bytes() && signature == "sig")
            .return_once(move |_, _| {
                Ok(WebhookOutcome::Processed(PaymentOutcome::Confirmed(booking)))
            });

        let mut res = TestClient::post("http://example.com/payments/webhook")
            .add_header(SIGNATURE_HEADER, "sig", true)
            .raw_json(BODY)
            .send(&make_service(payments))
            .await;

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.received, "expected acknowledgement");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_signature_is_still_acknowledged() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_handle_webhook()
            .once()
            .withf(|_, signature| signature.is_empty())
            .return_once(|_, _| Ok(WebhookOutcome::Rejected));

        let res = TestClient::post("http://example.com/payments/webhook")
            .raw_json(BODY)
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_business_refusal_is_acknowledged() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_handle_webhook()
            .once()
            .return_once(|_, _| Err(PaymentsServiceError::DatesUnavailable));

        let res = TestClient::post("http://example.com/payments/webhook")
            .add_header(SIGNATURE_HEADER, "sig", true)
            .raw_json(BODY)
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_provider_outage_asks_for_redelivery() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments.expect_handle_webhook().once().return_once(|_, _| {
            Err(PaymentsServiceError::Gateway(GatewayError::Unavailable(
                StatusCode::SERVICE_UNAVAILABLE,
            )))
        });

        let res = TestClient::post("http://example.com/payments/webhook")
            .add_header(SIGNATURE_HEADER, "sig", true)
            .raw_json(BODY)
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_provider_refusal_is_acknowledged() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments.expect_handle_webhook().once().return_once(|_, _| {
            Err(PaymentsServiceError::Gateway(GatewayError::Rejected {
                status: StatusCode::BAD_REQUEST,
                message: "Transaction reference not found".to_string(),
            }))
        });

        let res = TestClient::post("http://example.com/payments/webhook")
            .add_header(SIGNATURE_HEADER, "sig", true)
            .raw_json(BODY)
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_ignored_event_is_acknowledged() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_handle_webhook()
            .once()
            .return_once(|_, _| Ok(WebhookOutcome::Ignored));

        let res = TestClient::post("http://example.com/payments/webhook")
            .add_header(SIGNATURE_HEADER, "sig", true)
            .raw_json(r#"{"event":"transfer.success","data":{"reference":"tr_1"}}"#)
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
