//! Availability Repository

use hearth::{
    availability::Occupancy,
    bookings::BookingStatus,
    stays::Stay,
};
use jiff::civil::Date;
use jiff_sqlx::Date as SqlxDate;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::domain::apartments::records::ApartmentUuid;

const APARTMENT_EXISTS_SQL: &str = include_str!("sql/apartment_exists.sql");
const LIST_CONFIRMED_STAYS_SQL: &str = include_str!("sql/list_confirmed_stays.sql");

/// A booked stay as read from storage.
struct OccupancyRow(Occupancy);

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAvailabilityRepository;

impl PgAvailabilityRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn apartment_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        apartment: ApartmentUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(APARTMENT_EXISTS_SQL)
            .bind(apartment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Confirmed stays that end after `from` and, when given, start before `until`.
    pub(crate) async fn list_confirmed_stays(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        apartment: ApartmentUuid,
        from: Date,
        until: Option<Date>,
    ) -> Result<Vec<Occupancy>, sqlx::Error> {
        let rows = query_as::<Postgres, OccupancyRow>(LIST_CONFIRMED_STAYS_SQL)
            .bind(apartment.into_uuid())
            .bind(SqlxDate::from(from))
            .bind(until.map(SqlxDate::from))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}

impl<'r> FromRow<'r, PgRow> for OccupancyRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let check_in = row.try_get::<SqlxDate, _>("check_in")?.to_jiff();
        let check_out = row.try_get::<SqlxDate, _>("check_out")?.to_jiff();
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<BookingStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        let stay = Stay::new(check_in, check_out).map_err(|e| sqlx::Error::ColumnDecode {
            index: "check_out".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self(Occupancy::new(status, stay)))
    }
}
