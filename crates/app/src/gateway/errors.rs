//! Payment gateway errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the payment provider.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a server error on every attempt.
    #[error("payment provider unavailable ({0})")]
    Unavailable(StatusCode),

    /// The provider refused the request.
    #[error("payment provider rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    /// The provider returned a body that could not be understood.
    #[error("unexpected response from payment provider: {0}")]
    UnexpectedResponse(String),

    /// The reference cannot be sent to the provider.
    #[error("invalid payment reference")]
    InvalidReference,
}

impl GatewayError {
    /// Whether a second attempt might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(error) => error.is_timeout() || error.is_connect(),
            Self::Unavailable(_) => true,
            Self::Rejected { .. } | Self::UnexpectedResponse(_) | Self::InvalidReference => false,
        }
    }
}
