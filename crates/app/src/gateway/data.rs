//! Payment Gateway Data

use serde::{Deserialize, Serialize};

/// Request to open a hosted payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeTransaction {
    pub email: String,
    pub amount: u64,
    pub reference: String,
    pub callback_url: Option<String>,
}

/// Handle returned by the provider for a hosted payment session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionSession {
    pub authorization_url: String,
    #[serde(default)]
    pub access_code: Option<String>,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Success,
    Failed,
    Abandoned,
    /// Still in flight (`ongoing`, `pending`, `processing`, `queued`, ...).
    Pending,
}

impl TransactionStatus {
    /// Map a provider status string; anything unrecognised is still in flight.
    #[must_use]
    pub fn from_provider(status: &str) -> Self {
        match status {
            "success" => Self::Success,
            "failed" | "reversed" => Self::Failed,
            "abandoned" => Self::Abandoned,
            _ => Self::Pending,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Abandoned => "abandoned",
            Self::Pending => "pending",
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Outcome of verifying a transaction with the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionVerification {
    pub reference: String,
    pub status: TransactionStatus,
    pub amount: u64,
}
