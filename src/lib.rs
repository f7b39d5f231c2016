//! Hearth
//!
//! Hearth is the availability and pricing engine behind short-stay apartment bookings.
//! It decides which nights an apartment can be sold for, prices a stay with addons,
//! fees and coupons, and guards the booking lifecycle transitions.

pub mod addons;
pub mod availability;
pub mod bookings;
pub mod coupons;
pub mod discounts;
pub mod pricing;
pub mod stays;
