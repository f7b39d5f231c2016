//! Apartments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    domain::apartments::{
        data::{NewAddon, NewApartment},
        records::{AddonRecord, AddonUuid, ApartmentRecord, ApartmentUuid},
    },
    money::{decode_minor, encode_minor},
};

const CREATE_APARTMENT_SQL: &str = include_str!("sql/create_apartment.sql");
const CREATE_ADDON_SQL: &str = include_str!("sql/create_addon.sql");
const GET_APARTMENT_SQL: &str = include_str!("sql/get_apartment.sql");
const LOCK_APARTMENT_SQL: &str = include_str!("sql/lock_apartment.sql");
const LIST_ADDONS_SQL: &str = include_str!("sql/list_addons.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgApartmentsRepository;

impl PgApartmentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_apartment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        apartment: &NewApartment,
    ) -> Result<ApartmentRecord, sqlx::Error> {
        let max_guests = i32::try_from(apartment.max_guests).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "max_guests".to_string(),
                source: Box::new(e),
            }
        })?;

        let bedrooms = i16::try_from(apartment.bedrooms).map_err(|e| sqlx::Error::ColumnDecode {
            index: "bedrooms".to_string(),
            source: Box::new(e),
        })?;

        let bathrooms =
            i16::try_from(apartment.bathrooms).map_err(|e| sqlx::Error::ColumnDecode {
                index: "bathrooms".to_string(),
                source: Box::new(e),
            })?;

        let mut record = query_as::<Postgres, ApartmentRecord>(CREATE_APARTMENT_SQL)
            .bind(apartment.uuid.into_uuid())
            .bind(&apartment.name)
            .bind(encode_minor("nightly_rate", apartment.nightly_rate)?)
            .bind(max_guests)
            .bind(bedrooms)
            .bind(bathrooms)
            .fetch_one(&mut **tx)
            .await?;

        for addon in &apartment.addons {
            let created = self.create_addon(tx, record.uuid, addon).await?;

            record.addons.push(created);
        }

        Ok(record)
    }

    pub(crate) async fn create_addon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        apartment: ApartmentUuid,
        addon: &NewAddon,
    ) -> Result<AddonRecord, sqlx::Error> {
        query_as::<Postgres, AddonRecord>(CREATE_ADDON_SQL)
            .bind(addon.uuid.into_uuid())
            .bind(apartment.into_uuid())
            .bind(&addon.name)
            .bind(encode_minor("price", addon.price)?)
            .bind(addon.pricing_mode.as_str())
            .bind(addon.active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_apartment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        apartment: ApartmentUuid,
    ) -> Result<ApartmentRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, ApartmentRecord>(GET_APARTMENT_SQL)
            .bind(apartment.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.addons = self.list_addons(tx, apartment).await?;

        Ok(record)
    }

    /// Load an apartment and hold a row lock on it until the transaction ends.
    pub(crate) async fn lock_apartment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        apartment: ApartmentUuid,
    ) -> Result<ApartmentRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, ApartmentRecord>(LOCK_APARTMENT_SQL)
            .bind(apartment.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.addons = self.list_addons(tx, apartment).await?;

        Ok(record)
    }

    pub(crate) async fn list_addons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        apartment: ApartmentUuid,
    ) -> Result<Vec<AddonRecord>, sqlx::Error> {
        query_as::<Postgres, AddonRecord>(LIST_ADDONS_SQL)
            .bind(apartment.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ApartmentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let max_guests: i32 = row.try_get("max_guests")?;
        let bedrooms: i16 = row.try_get("bedrooms")?;
        let bathrooms: i16 = row.try_get("bathrooms")?;

        Ok(Self {
            uuid: ApartmentUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            nightly_rate: decode_minor("nightly_rate", row.try_get("nightly_rate")?)?,
            max_guests: u32::try_from(max_guests).map_err(|e| sqlx::Error::ColumnDecode {
                index: "max_guests".to_string(),
                source: Box::new(e),
            })?,
            bedrooms: u16::try_from(bedrooms).map_err(|e| sqlx::Error::ColumnDecode {
                index: "bedrooms".to_string(),
                source: Box::new(e),
            })?,
            bathrooms: u16::try_from(bathrooms).map_err(|e| sqlx::Error::ColumnDecode {
                index: "bathrooms".to_string(),
                source: Box::new(e),
            })?,
            addons: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AddonRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let pricing_mode: String = row.try_get("pricing_mode")?;

        Ok(Self {
            uuid: AddonUuid::from_uuid(row.try_get("uuid")?),
            apartment_uuid: ApartmentUuid::from_uuid(row.try_get("apartment_uuid")?),
            name: row.try_get("name")?,
            price: decode_minor("price", row.try_get("price")?)?,
            pricing_mode: pricing_mode
                .parse()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "pricing_mode".to_string(),
                    source: Box::new(e),
                })?,
            active: row.try_get("active")?,
        })
    }
}
