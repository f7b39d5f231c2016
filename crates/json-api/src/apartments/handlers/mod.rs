//! Apartment Handlers

pub(crate) mod availability;
pub(crate) mod booked_nights;
pub(crate) mod quote;
