//! Bookings
//!
//! Booking lifecycle: `pending -> confirmed` on verified payment, `pending | confirmed ->
//! cancelled` before check-in. Confirmed and cancelled are otherwise terminal.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stays::Stay;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting payment. Does not hold the apartment.
    Pending,

    /// Paid. Holds the apartment for its nights.
    Confirmed,

    /// Cancelled by the guest or an administrator.
    Cancelled,
}

/// How the guest intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Hosted card checkout through the payment provider.
    #[serde(alias = "card")]
    Paystack,

    /// Manual bank transfer, confirmed by an administrator once the funds arrive.
    #[serde(alias = "bank-transfer", alias = "bankTransfer")]
    BankTransfer,
}

/// Errors raised when a lifecycle transition is not allowed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The booking is no longer pending.
    #[error("booking has already been processed")]
    AlreadyProcessed,

    /// The booking was cancelled.
    #[error("booking has been cancelled")]
    AlreadyCancelled,

    /// The stay has already started.
    #[error("booking can no longer be cancelled")]
    TooLateToCancel,
}

/// Outcome of confirming a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The booking moves from pending to confirmed.
    Confirmed,

    /// The booking was already confirmed; nothing changes.
    AlreadyConfirmed,
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl BookingStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Only confirmed bookings hold their nights.
    pub const fn blocks_availability(self) -> bool {
        matches!(self, BookingStatus::Confirmed)
    }

    /// Check that a checkout may be started.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyProcessed`] unless the booking is pending.
    pub const fn ensure_checkout(self) -> Result<(), TransitionError> {
        match self {
            BookingStatus::Pending => Ok(()),
            BookingStatus::Confirmed | BookingStatus::Cancelled => {
                Err(TransitionError::AlreadyProcessed)
            }
        }
    }

    /// Decide what confirming the booking does.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyCancelled`] for a cancelled booking.
    pub const fn confirm(self) -> Result<Confirmation, TransitionError> {
        match self {
            BookingStatus::Pending => Ok(Confirmation::Confirmed),
            BookingStatus::Confirmed => Ok(Confirmation::AlreadyConfirmed),
            BookingStatus::Cancelled => Err(TransitionError::AlreadyCancelled),
        }
    }

    /// Check that the booking may be cancelled on `today`.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::AlreadyCancelled`]: the booking is already cancelled.
    /// - [`TransitionError::TooLateToCancel`]: check-in is today or earlier.
    pub fn ensure_cancellable(self, stay: &Stay, today: Date) -> Result<(), TransitionError> {
        if self == BookingStatus::Cancelled {
            return Err(TransitionError::AlreadyCancelled);
        }

        if stay.has_started(today) {
            return Err(TransitionError::TooLateToCancel);
        }

        Ok(())
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(UnknownVariant {
                kind: "booking status",
                value: other.to_string(),
            }),
        }
    }
}

impl PaymentMethod {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Paystack => "paystack",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paystack" | "card" => Ok(PaymentMethod::Paystack),
            "bank_transfer" | "bank-transfer" | "bankTransfer" => Ok(PaymentMethod::BankTransfer),
            other => Err(UnknownVariant {
                kind: "payment method",
                value: other.to_string(),
            }),
        }
    }
}
