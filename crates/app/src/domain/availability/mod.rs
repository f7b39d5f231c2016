//! Availability

pub mod errors;
pub(crate) mod repository;
pub mod service;

pub use errors::AvailabilityServiceError;
pub use service::*;
