//! Stays
//!
//! A stay is the half-open night range `[check_in, check_out)`: the guest sleeps on
//! every date from check-in up to, but not including, check-out. One stay's check-out
//! day can therefore be another stay's check-in day.

use std::fmt;

use jiff::{ToSpan, civil::Date};
use thiserror::Error;

/// Errors raised while building a [`Stay`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StayError {
    /// Check-out falls on or before check-in, so the stay has no nights.
    #[error("check-out must be after check-in")]
    CheckOutNotAfterCheckIn,

    /// The number of nights could not be represented.
    #[error("stay is too long")]
    TooLong,
}

/// A validated half-open range of nights.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stay {
    check_in: Date,
    check_out: Date,
    nights: u32,
}

impl Stay {
    /// Build a stay from check-in and check-out dates.
    ///
    /// # Errors
    ///
    /// - [`StayError::CheckOutNotAfterCheckIn`]: the range is empty or inverted.
    /// - [`StayError::TooLong`]: the night count does not fit in a `u32`.
    pub fn new(check_in: Date, check_out: Date) -> Result<Self, StayError> {
        if check_out <= check_in {
            return Err(StayError::CheckOutNotAfterCheckIn);
        }

        let days = check_in
            .until(check_out)
            .map_err(|_ignored| StayError::TooLong)?
            .get_days();

        let nights = u32::try_from(days).map_err(|_ignored| StayError::TooLong)?;

        Ok(Self {
            check_in,
            check_out,
            nights,
        })
    }

    /// First night of the stay.
    pub const fn check_in(&self) -> Date {
        self.check_in
    }

    /// Departure day; not itself a night of the stay.
    pub const fn check_out(&self) -> Date {
        self.check_out
    }

    /// Number of whole nights, always at least one.
    pub const fn nights(&self) -> u32 {
        self.nights
    }

    /// Whether two stays share at least one night.
    pub fn overlaps(&self, other: &Stay) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Whether the stay has started (or starts) on or before `today`.
    pub fn has_started(&self, today: Date) -> bool {
        self.check_in <= today
    }

    /// Every occupied calendar day, in order.
    pub fn nights_iter(&self) -> impl Iterator<Item = Date> + use<> {
        let check_out = self.check_out;

        self.check_in
            .series(1.day())
            .take_while(move |night| *night < check_out)
    }
}

impl fmt::Debug for Stay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stay[{}, {})", self.check_in, self.check_out)
    }
}
