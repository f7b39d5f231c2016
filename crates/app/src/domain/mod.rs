//! Hearth Domain Concerns

pub mod apartments;
pub mod availability;
pub mod bookings;
pub mod coupons;
pub mod payments;
