//! Coupons service errors.

use hearth::coupons::{CouponCodeError, CouponRejection};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("coupon code already exists")]
    AlreadyExists,

    #[error("coupon not found")]
    NotFound,

    #[error("coupon has already been used")]
    AlreadyUsed,

    #[error("coupon is disabled")]
    Disabled,

    #[error("invalid coupon code")]
    InvalidCode(#[from] CouponCodeError),

    #[error("discount percent must be between 0 and 100")]
    InvalidDiscount,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<CouponRejection> for CouponsServiceError {
    fn from(rejection: CouponRejection) -> Self {
        match rejection {
            CouponRejection::AlreadyUsed => Self::AlreadyUsed,
            CouponRejection::Disabled => Self::Disabled,
        }
    }
}

impl From<Error> for CouponsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
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
