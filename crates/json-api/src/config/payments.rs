//! Payments Config

use std::time::Duration;

use clap::Args;

use hearth_app::{
    domain::bookings::data::{BankAccount, CheckoutSettings},
    gateway::{PaystackConfig, SecretKey},
};

/// Payment provider and bank transfer settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Paystack API base address
    #[arg(long, env = "PAYSTACK_BASE_URL", default_value = "https://api.paystack.co")]
    pub paystack_base_url: String,

    /// Paystack secret key, also used to verify webhook signatures
    #[arg(long, env = "PAYSTACK_SECRET_KEY", hide_env_values = true)]
    pub paystack_secret_key: String,

    /// Per-request timeout for Paystack calls
    #[arg(long, env = "PAYSTACK_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub paystack_timeout_seconds: u64,

    /// Where the hosted checkout sends the guest after paying
    #[arg(long, env = "PAYMENT_CALLBACK_URL")]
    pub payment_callback_url: Option<String>,

    /// Bank shown in bank transfer instructions
    #[arg(long, env = "BANK_NAME", default_value = "")]
    pub bank_name: String,

    /// Account name shown in bank transfer instructions
    #[arg(long, env = "BANK_ACCOUNT_NAME", default_value = "")]
    pub bank_account_name: String,

    /// Account number shown in bank transfer instructions
    #[arg(long, env = "BANK_ACCOUNT_NUMBER", default_value = "")]
    pub bank_account_number: String,
}

impl PaymentsConfig {
    #[must_use]
    pub fn paystack(&self) -> PaystackConfig {
        PaystackConfig {
            base_url: self.paystack_base_url.clone(),
            secret_key: SecretKey::new(self.paystack_secret_key.clone()),
            timeout: Duration::from_secs(self.paystack_timeout_seconds),
        }
    }

    #[must_use]
    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            callback_url: self.payment_callback_url.clone(),
            bank_account: BankAccount {
                bank_name: self.bank_name.clone(),
                account_name: self.bank_account_name.clone(),
                account_number: self.bank_account_number.clone(),
            },
        }
    }
}
