//! Payment Gateway

mod data;
mod errors;
mod paystack;
mod secret;
mod signature;

use async_trait::async_trait;
use mockall::automock;

pub use data::*;
pub use errors::GatewayError;
pub use paystack::{PaystackConfig, PaystackGateway};
pub use secret::SecretKey;
pub use signature::{sign_webhook, verify_webhook_signature};

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted payment session for `request.amount` minor units.
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<TransactionSession, GatewayError>;

    /// Ask the provider what happened to the transaction with this reference.
    async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<TransactionVerification, GatewayError>;
}
