//! Apartments Data

use hearth::addons::PricingMode;

use crate::domain::apartments::records::{AddonUuid, ApartmentUuid};

/// New Apartment Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApartment {
    pub uuid: ApartmentUuid,
    pub name: String,
    pub nightly_rate: u64,
    pub max_guests: u32,
    pub bedrooms: u16,
    pub bathrooms: u16,
    pub addons: Vec<NewAddon>,
}

/// New Addon Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddon {
    pub uuid: AddonUuid,
    pub name: String,
    pub price: u64,
    pub pricing_mode: PricingMode,
    pub active: bool,
}
