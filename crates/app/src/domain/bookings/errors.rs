//! Bookings service errors.

use hearth::{bookings::TransitionError, pricing::PricingError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    database::is_exclusion_violation,
    domain::{apartments::records::AddonUuid, coupons::CouponsServiceError},
    gateway::GatewayError,
    money::MinorUnitsError,
};

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    #[error("check-out must be after check-in and check-in may not be in the past")]
    InvalidDates,

    #[error("at least one guest is required")]
    InvalidGuests,

    #[error("guest count exceeds the apartment's capacity")]
    TooManyGuests,

    #[error("customer name, email and phone are required")]
    InvalidCustomer,

    #[error("addon {0} is not available for this apartment")]
    InvalidAddon(AddonUuid),

    #[error("the apartment is not available for these dates")]
    DatesUnavailable,

    #[error("booking has already been processed")]
    AlreadyProcessed,

    #[error("booking has already been cancelled")]
    AlreadyCancelled,

    #[error("booking can no longer be cancelled")]
    TooLateToCancel,

    #[error(transparent)]
    Coupon(#[from] CouponsServiceError),

    #[error("booking belongs to another user")]
    Forbidden,

    #[error("booking already exists")]
    AlreadyExists,

    #[error("booking not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("payment provider error")]
    Gateway(#[from] GatewayError),

    #[error("pricing error")]
    Pricing(#[from] PricingError),

    #[error("amount out of range")]
    Amount(#[from] MinorUnitsError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<TransitionError> for BookingsServiceError {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::AlreadyProcessed => Self::AlreadyProcessed,
            TransitionError::AlreadyCancelled => Self::AlreadyCancelled,
            TransitionError::TooLateToCancel => Self::TooLateToCancel,
        }
    }
}

impl From<Error> for BookingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_exclusion_violation(&error) {
            return Self::DatesUnavailable;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
