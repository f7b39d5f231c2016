//! Paystack client for hosted checkout and transaction verification.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::warn;

use crate::{
    gateway::{
        GatewayError, InitializeTransaction, PaymentGateway, SecretKey, TransactionSession,
        TransactionStatus, TransactionVerification,
    },
    money::BOOKING_CURRENCY,
};

/// Attempts per provider call: the first try plus a single retry.
const MAX_ATTEMPTS: u32 = 2;

/// Pause before the retry.
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Configuration for connecting to Paystack.
#[derive(Debug, Clone)]
pub struct PaystackConfig {
    /// API base address, e.g. `"https://api.paystack.co"`.
    pub base_url: String,

    /// Secret key, also used to verify webhook signatures.
    pub secret_key: SecretKey,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// HTTP client for the Paystack transaction API.
#[derive(Debug, Clone)]
pub struct PaystackGateway {
    config: PaystackConfig,
    http: Client,
}

impl PaystackGateway {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: PaystackConfig) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    #[must_use]
    pub fn secret_key(&self) -> &SecretKey {
        &self.config.secret_key
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn send<T, F>(&self, operation: &'static str, build: F) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 1;

        loop {
            let result = match build()
                .bearer_auth(self.config.secret_key.expose())
                .send()
                .await
            {
                Ok(response) => read_envelope(response).await,
                Err(error) => Err(GatewayError::from(error)),
            };

            match result {
                Err(error) if error.is_transient() && attempt < MAX_ATTEMPTS => {
                    warn!(operation, attempt, error = %error, "retrying payment provider call");

                    tokio::time::sleep(RETRY_DELAY).await;

                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    #[tracing::instrument(
        name = "gateway.paystack.initialize_transaction",
        skip(self, request),
        fields(reference = %request.reference, amount = request.amount),
        err
    )]
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<TransactionSession, GatewayError> {
        let url = self.url("/transaction/initialize");

        let mut body = json!({
            "email": request.email,
            "amount": request.amount,
            "reference": request.reference,
            "currency": BOOKING_CURRENCY.iso_alpha_code,
        });

        if let Some(callback_url) = &request.callback_url {
            body["callback_url"] = json!(callback_url);
        }

        self.send("initialize_transaction", || self.http.post(&url).json(&body))
            .await
    }

    #[tracing::instrument(
        name = "gateway.paystack.verify_transaction",
        skip(self),
        fields(status = tracing::field::Empty),
        err
    )]
    async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<TransactionVerification, GatewayError> {
        if !is_sendable_reference(reference) {
            return Err(GatewayError::InvalidReference);
        }

        let url = self.url(&format!("/transaction/verify/{reference}"));

        let data: VerifyData = self
            .send("verify_transaction", || self.http.get(&url))
            .await?;

        let status = TransactionStatus::from_provider(&data.status);

        tracing::Span::current().record("status", tracing::field::debug(status));

        let amount = u64::try_from(data.amount).map_err(|_ignored| {
            GatewayError::UnexpectedResponse(format!("negative amount {}", data.amount))
        })?;

        Ok(TransactionVerification {
            reference: data.reference,
            status,
            amount,
        })
    }
}

/// References are path segments; only unreserved characters are allowed.
fn is_sendable_reference(reference: &str) -> bool {
    !reference.is_empty()
        && reference.len() <= 100
        && reference
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'='))
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();

    if status.is_server_error() {
        return Err(GatewayError::Unavailable(status));
    }

    if !status.is_success() {
        let message = response
            .json::<Envelope<serde_json::Value>>()
            .await
            .map(|envelope| envelope.message)
            .unwrap_or_default();

        return Err(GatewayError::Rejected { status, message });
    }

    let envelope: Envelope<T> = response.json().await?;

    if !envelope.status {
        return Err(GatewayError::Rejected {
            status,
            message: envelope.message,
        });
    }

    envelope
        .data
        .ok_or_else(|| GatewayError::UnexpectedResponse("missing data".to_string()))
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    reference: String,
    amount: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;

    fn gateway(server: &MockServer) -> Result<PaystackGateway, GatewayError> {
        PaystackGateway::new(PaystackConfig {
            base_url: server.uri(),
            secret_key: SecretKey::new("sk_test_secret"),
            timeout: Duration::from_secs(2),
        })
    }

    #[tokio::test]
    async fn initialize_returns_session() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/transaction/initialize"))
            .and(header("authorization", "Bearer sk_test_secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "message": "Authorization URL created",
                "data": {
                    "authorization_url": "https://checkout.paystack.com/abc",
                    "access_code": "abc",
                    "reference": "hb_ref"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = gateway(&server)?
            .initialize_transaction(InitializeTransaction {
                email: "guest@example.com".to_string(),
                amount: 18_562_500,
                reference: "hb_ref".to_string(),
                callback_url: None,
            })
            .await?;

        assert_eq!(session.authorization_url, "https://checkout.paystack.com/abc");
        assert_eq!(session.reference, "hb_ref");

        Ok(())
    }

    #[tokio::test]
    async fn verify_maps_success() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transaction/verify/hb_ref"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "message": "Verification successful",
                "data": { "status": "success", "reference": "hb_ref", "amount": 18_562_500 }
            })))
            .mount(&server)
            .await;

        let verification = gateway(&server)?.verify_transaction("hb_ref").await?;

        assert_eq!(verification.status, TransactionStatus::Success);
        assert_eq!(verification.amount, 18_562_500);

        Ok(())
    }

    #[tokio::test]
    async fn server_error_is_retried_once() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transaction/verify/hb_ref"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let result = gateway(&server)?.verify_transaction("hb_ref").await;

        assert!(
            matches!(result, Err(GatewayError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn client_error_is_not_retried() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transaction/verify/hb_missing"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": false,
                "message": "Transaction reference not found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway(&server)?.verify_transaction("hb_missing").await;

        assert!(
            matches!(&result, Err(GatewayError::Rejected { message, .. }) if message == "Transaction reference not found"),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unsafe_reference_is_not_sent() -> TestResult {
        let server = MockServer::start().await;

        let result = gateway(&server)?.verify_transaction("../admin").await;

        assert!(
            matches!(result, Err(GatewayError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }
}
