//! Apartments service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::apartments::{
        errors::ApartmentsServiceError,
        data::NewApartment,
        records::{ApartmentRecord, ApartmentUuid},
        repository::PgApartmentsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgApartmentsService {
    db: Db,
    repository: PgApartmentsRepository,
}

impl PgApartmentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgApartmentsRepository::new(),
        }
    }
}

#[async_trait]
impl ApartmentsService for PgApartmentsService {
    #[tracing::instrument(
        name = "apartments.service.create_apartment",
        skip(self, apartment),
        fields(apartment_uuid = %apartment.uuid, addon_count = apartment.addons.len()),
        err
    )]
    async fn create_apartment(
        &self,
        apartment: NewApartment,
    ) -> Result<ApartmentRecord, ApartmentsServiceError> {
        if apartment.nightly_rate == 0
            || apartment.max_guests == 0
            || apartment.name.trim().is_empty()
            || apartment.addons.iter().any(|addon| addon.price == 0)
        {
            return Err(ApartmentsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let record = self.repository.create_apartment(&mut tx, &apartment).await?;

        tx.commit().await?;

        info!(apartment_uuid = %record.uuid, "created apartment");

        Ok(record)
    }

    async fn get_apartment(
        &self,
        apartment: ApartmentUuid,
    ) -> Result<ApartmentRecord, ApartmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_apartment(&mut tx, apartment).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait ApartmentsService: Send + Sync {
    /// Creates an apartment together with its addon catalog.
    async fn create_apartment(
        &self,
        apartment: NewApartment,
    ) -> Result<ApartmentRecord, ApartmentsServiceError>;

    /// Retrieve an apartment and its full addon catalog.
    async fn get_apartment(
        &self,
        apartment: ApartmentUuid,
    ) -> Result<ApartmentRecord, ApartmentsServiceError>;
}

#[cfg(test)]
mod tests {
    use hearth::addons::PricingMode;
    use testresult::TestResult;

    use crate::{
        domain::apartments::{data::NewAddon, records::AddonUuid},
        test::TestContext,
    };

    use super::*;

    fn new_apartment() -> NewApartment {
        NewApartment {
            uuid: ApartmentUuid::new(),
            name: "Lekki Loft".to_string(),
            nightly_rate: 5_000_000,
            max_guests: 4,
            bedrooms: 2,
            bathrooms: 1,
            addons: vec![NewAddon {
                uuid: AddonUuid::new(),
                name: "Cleaning".to_string(),
                price: 500_000,
                pricing_mode: PricingMode::PerNight,
                active: true,
            }],
        }
    }

    #[tokio::test]
    async fn create_apartment_returns_catalog() -> TestResult {
        let ctx = TestContext::new().await;
        let apartment = new_apartment();

        let created = ctx.apartments.create_apartment(apartment.clone()).await?;

        assert_eq!(created.uuid, apartment.uuid);
        assert_eq!(created.nightly_rate, 5_000_000);
        assert_eq!(created.addons.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn get_apartment_includes_addons() -> TestResult {
        let ctx = TestContext::new().await;
        let apartment = new_apartment();
        let addon_uuid = apartment.addons[0].uuid;

        ctx.apartments.create_apartment(apartment.clone()).await?;

        let fetched = ctx.apartments.get_apartment(apartment.uuid).await?;

        assert!(fetched.active_addon(addon_uuid).is_some());
        assert_eq!(fetched.max_guests, 4);

        Ok(())
    }

    #[tokio::test]
    async fn get_apartment_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.apartments.get_apartment(ApartmentUuid::new()).await;

        assert!(
            matches!(result, Err(ApartmentsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_apartment_zero_rate_returns_invalid_data() {
        let ctx = TestContext::new().await;
        let mut apartment = new_apartment();

        apartment.nightly_rate = 0;

        let result = ctx.apartments.create_apartment(apartment).await;

        assert!(
            matches!(result, Err(ApartmentsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }
}
