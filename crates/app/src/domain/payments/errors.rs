//! Payments service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{database::is_exclusion_violation, gateway::GatewayError};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("booking not found")]
    NotFound,

    #[error("booking has been cancelled")]
    AlreadyCancelled,

    #[error("payment reference does not match the booking")]
    ReferenceMismatch,

    #[error("payment of {received} does not cover the booking total of {expected}")]
    Underpaid { expected: u64, received: u64 },

    #[error("the apartment is no longer available for these dates")]
    DatesUnavailable,

    #[error("coupon has already been used")]
    CouponAlreadyUsed,

    #[error("bank transfers are confirmed by an administrator")]
    ManualConfirmationRequired,

    #[error("booking is not awaiting a bank transfer")]
    NotBankTransfer,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("payment provider error")]
    Gateway(#[from] GatewayError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_exclusion_violation(&error) {
            return Self::DatesUnavailable;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::UniqueViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl PaymentsServiceError {
    /// Whether the failure came from infrastructure and the same delivery may succeed later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sql(_) => true,
            Self::Gateway(error) => error.is_transient(),
            _ => false,
        }
    }
}
