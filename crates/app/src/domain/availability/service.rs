//! Availability service.

use std::collections::BTreeSet;

use async_trait::async_trait;
use hearth::{
    availability::{booked_nights, is_range_available},
    stays::Stay,
};
use jiff::civil::Date;
use mockall::automock;
use tracing::{Span, debug};

use crate::{
    database::Db,
    domain::{
        apartments::records::ApartmentUuid,
        availability::{errors::AvailabilityServiceError, repository::PgAvailabilityRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgAvailabilityService {
    db: Db,
    repository: PgAvailabilityRepository,
}

impl PgAvailabilityService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAvailabilityRepository::new(),
        }
    }
}

#[async_trait]
impl AvailabilityService for PgAvailabilityService {
    #[tracing::instrument(
        name = "availability.service.is_range_available",
        skip(self),
        fields(apartment_uuid = %apartment, available = tracing::field::Empty),
        err
    )]
    async fn is_range_available(
        &self,
        apartment: ApartmentUuid,
        check_in: Date,
        check_out: Date,
    ) -> Result<bool, AvailabilityServiceError> {
        let Ok(requested) = Stay::new(check_in, check_out) else {
            debug!("malformed range treated as unavailable");

            return Ok(false);
        };

        let mut tx = self.db.begin().await?;

        if !self.repository.apartment_exists(&mut tx, apartment).await? {
            return Err(AvailabilityServiceError::NotFound);
        }

        let occupancies = self
            .repository
            .list_confirmed_stays(&mut tx, apartment, check_in, Some(check_out))
            .await?;

        tx.commit().await?;

        let available = is_range_available(&requested, &occupancies);

        Span::current().record("available", available);

        Ok(available)
    }

    #[tracing::instrument(
        name = "availability.service.list_booked_nights",
        skip(self),
        fields(apartment_uuid = %apartment, nights = tracing::field::Empty),
        err
    )]
    async fn list_booked_nights(
        &self,
        apartment: ApartmentUuid,
        from: Date,
    ) -> Result<BTreeSet<Date>, AvailabilityServiceError> {
        let mut tx = self.db.begin().await?;

        if !self.repository.apartment_exists(&mut tx, apartment).await? {
            return Err(AvailabilityServiceError::NotFound);
        }

        let occupancies = self
            .repository
            .list_confirmed_stays(&mut tx, apartment, from, None)
            .await?;

        tx.commit().await?;

        let nights = booked_nights(&occupancies, from);

        Span::current().record("nights", nights.len());

        Ok(nights)
    }
}

#[automock]
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    /// Whether the apartment is free for every night in `[check_in, check_out)`.
    ///
    /// Malformed ranges are reported as unavailable rather than as errors.
    async fn is_range_available(
        &self,
        apartment: ApartmentUuid,
        check_in: Date,
        check_out: Date,
    ) -> Result<bool, AvailabilityServiceError>;

    /// Every confirmed night on or after `from`.
    async fn list_booked_nights(
        &self,
        apartment: ApartmentUuid,
        from: Date,
    ) -> Result<BTreeSet<Date>, AvailabilityServiceError>;
}
