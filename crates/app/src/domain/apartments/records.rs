//! Apartment Records

use hearth::addons::PricingMode;
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Apartment UUID
pub type ApartmentUuid = TypedUuid<ApartmentRecord>;

/// Addon UUID
pub type AddonUuid = TypedUuid<AddonRecord>;

/// Apartment Record
#[derive(Debug, Clone)]
pub struct ApartmentRecord {
    pub uuid: ApartmentUuid,
    pub name: String,
    pub nightly_rate: u64,
    pub max_guests: u32,
    pub bedrooms: u16,
    pub bathrooms: u16,
    pub addons: Vec<AddonRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Addon Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonRecord {
    pub uuid: AddonUuid,
    pub apartment_uuid: ApartmentUuid,
    pub name: String,
    pub price: u64,
    pub pricing_mode: PricingMode,
    pub active: bool,
}

impl ApartmentRecord {
    /// Look up an active addon from this apartment's catalog.
    #[must_use]
    pub fn active_addon(&self, uuid: AddonUuid) -> Option<&AddonRecord> {
        self.addons
            .iter()
            .find(|addon| addon.uuid == uuid && addon.active)
    }
}
