//! Availability
//!
//! Only confirmed bookings occupy nights. Pending and cancelled bookings never block a range.

use std::collections::BTreeSet;

use jiff::civil::Date;

use crate::{bookings::BookingStatus, stays::Stay};

/// A stay together with the status of the booking that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    /// Lifecycle status of the booking.
    pub status: BookingStatus,

    /// Nights held by the booking.
    pub stay: Stay,
}

impl Occupancy {
    /// Create a new occupancy record.
    pub const fn new(status: BookingStatus, stay: Stay) -> Self {
        Self { status, stay }
    }

    /// Whether this occupancy removes its nights from sale.
    pub const fn is_blocking(&self) -> bool {
        self.status.blocks_availability()
    }
}

/// Whether `requested` shares no night with any blocking occupancy.
pub fn is_range_available<'a, I>(requested: &Stay, occupancies: I) -> bool
where
    I: IntoIterator<Item = &'a Occupancy>,
{
    !occupancies
        .into_iter()
        .filter(|occupancy| occupancy.is_blocking())
        .any(|occupancy| occupancy.stay.overlaps(requested))
}

/// Every blocked night on or after `from`, sorted and de-duplicated.
pub fn booked_nights<'a, I>(occupancies: I, from: Date) -> BTreeSet<Date>
where
    I: IntoIterator<Item = &'a Occupancy>,
{
    occupancies
        .into_iter()
        .filter(|occupancy| occupancy.is_blocking())
        .flat_map(|occupancy| occupancy.stay.nights_iter())
        .filter(|night| *night >= from)
        .collect()
}
