//! Bookings Repository

use hearth::{
    bookings::{BookingStatus, PaymentMethod},
    discounts::DiscountPercent,
};
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        apartments::records::{AddonUuid, ApartmentUuid},
        bookings::{
            data::{CustomerInfo, NewBooking, Quote, QuotedAddon},
            records::{BookingAddonRecord, BookingAddonUuid, BookingRecord, BookingUuid},
        },
        coupons::records::CouponUuid,
    },
    money::{decode_minor, encode_minor},
};

const CREATE_BOOKING_SQL: &str = include_str!("sql/create_booking.sql");
const CREATE_BOOKING_ADDON_SQL: &str = include_str!("sql/create_booking_addon.sql");
const GET_BOOKING_SQL: &str = include_str!("sql/get_booking.sql");
const LOCK_BOOKING_SQL: &str = include_str!("sql/lock_booking.sql");
const FIND_BOOKING_BY_REFERENCE_SQL: &str = include_str!("sql/find_booking_by_reference.sql");
const LIST_USER_BOOKINGS_SQL: &str = include_str!("sql/list_user_bookings.sql");
const LIST_BOOKING_ADDONS_SQL: &str = include_str!("sql/list_booking_addons.sql");
const UPDATE_CHECKOUT_SQL: &str = include_str!("sql/update_checkout.sql");
const CONFIRM_BOOKING_SQL: &str = include_str!("sql/confirm_booking.sql");
const CANCEL_BOOKING_SQL: &str = include_str!("sql/cancel_booking.sql");

/// Payment details written when a checkout starts.
#[derive(Debug)]
pub(crate) struct CheckoutUpdate<'a> {
    pub(crate) payment_method: PaymentMethod,
    pub(crate) reference: &'a str,
    pub(crate) coupon: Option<CouponUuid>,
    pub(crate) quote: &'a Quote,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBookingsRepository;

impl PgBookingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a pending booking and its priced addon lines.
    pub(crate) async fn create_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        booking: &NewBooking,
        quote: &Quote,
    ) -> Result<BookingRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, BookingRecord>(CREATE_BOOKING_SQL)
            .bind(booking.uuid.into_uuid())
            .bind(booking.apartment_uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(SqlxDate::from(booking.check_in))
            .bind(SqlxDate::from(booking.check_out))
            .bind(encode_count("guests", booking.guests)?)
            .bind(encode_minor("nightly_rate", quote.nightly_rate)?)
            .bind(encode_count("nights", quote.nights)?)
            .bind(encode_minor("base_subtotal", quote.base_subtotal)?)
            .bind(encode_minor("addons_total", quote.addons_total)?)
            .bind(encode_minor("service_charge", quote.service_charge)?)
            .bind(encode_minor("tax", quote.tax)?)
            .bind(encode_minor("total_amount", quote.total_amount)?)
            .bind(booking.customer.name.trim())
            .bind(booking.customer.email.trim())
            .bind(booking.customer.phone.trim())
            .bind(booking.customer.special_request.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        for (position, line) in (0_u32..).zip(&quote.addons) {
            let addon = self
                .create_booking_addon(tx, record.uuid, position, line)
                .await?;

            record.addons.push(addon);
        }

        Ok(record)
    }

    async fn create_booking_addon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        position: u32,
        line: &QuotedAddon,
    ) -> Result<BookingAddonRecord, sqlx::Error> {
        query_as::<Postgres, BookingAddonRecord>(CREATE_BOOKING_ADDON_SQL)
            .bind(BookingAddonUuid::new().into_uuid())
            .bind(booking.into_uuid())
            .bind(line.addon.addon_uuid.into_uuid())
            .bind(encode_count("position", position)?)
            .bind(&line.addon.name)
            .bind(encode_minor("price", line.addon.price)?)
            .bind(line.addon.pricing_mode.as_str())
            .bind(encode_minor("total", line.total)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<BookingRecord, sqlx::Error> {
        let record = query_as::<Postgres, BookingRecord>(GET_BOOKING_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_addons(tx, record).await
    }

    /// Load a booking and hold a row lock on it until the transaction ends.
    pub(crate) async fn lock_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<BookingRecord, sqlx::Error> {
        let record = query_as::<Postgres, BookingRecord>(LOCK_BOOKING_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_addons(tx, record).await
    }

    pub(crate) async fn find_booking_by_reference(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reference: &str,
    ) -> Result<Option<BookingRecord>, sqlx::Error> {
        let record = query_as::<Postgres, BookingRecord>(FIND_BOOKING_BY_REFERENCE_SQL)
            .bind(reference)
            .fetch_optional(&mut **tx)
            .await?;

        match record {
            Some(record) => Ok(Some(self.with_addons(tx, record).await?)),
            None => Ok(None),
        }
    }

    /// A user's bookings, newest first.
    pub(crate) async fn list_user_bookings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<BookingRecord>, sqlx::Error> {
        let mut bookings = query_as::<Postgres, BookingRecord>(LIST_USER_BOOKINGS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        let uuids: Vec<Uuid> = bookings.iter().map(|b| b.uuid.into_uuid()).collect();

        let mut addons: FxHashMap<BookingUuid, Vec<BookingAddonRecord>> = FxHashMap::default();

        for addon in self.list_booking_addons(tx, &uuids).await? {
            addons.entry(addon.booking_uuid).or_default().push(addon);
        }

        for booking in &mut bookings {
            booking.addons = addons.remove(&booking.uuid).unwrap_or_default();
        }

        Ok(bookings)
    }

    async fn list_booking_addons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bookings: &[Uuid],
    ) -> Result<Vec<BookingAddonRecord>, sqlx::Error> {
        query_as::<Postgres, BookingAddonRecord>(LIST_BOOKING_ADDONS_SQL)
            .bind(bookings)
            .fetch_all(&mut **tx)
            .await
    }

    /// Record the payment method, reference and (re)priced totals of a pending booking.
    pub(crate) async fn update_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        update: &CheckoutUpdate<'_>,
    ) -> Result<BookingRecord, sqlx::Error> {
        let record = query_as::<Postgres, BookingRecord>(UPDATE_CHECKOUT_SQL)
            .bind(booking.into_uuid())
            .bind(update.payment_method.as_str())
            .bind(update.reference)
            .bind(update.coupon.map(CouponUuid::into_uuid))
            .bind(update.quote.discount_percent.map(i16::from))
            .bind(encode_minor("discount_amount", update.quote.discount_amount)?)
            .bind(encode_minor("total_amount", update.quote.total_amount)?)
            .fetch_one(&mut **tx)
            .await?;

        self.with_addons(tx, record).await
    }

    /// Move a pending booking to confirmed.
    ///
    /// Fails with an exclusion violation when another confirmed booking holds any of its nights.
    pub(crate) async fn confirm_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<BookingRecord, sqlx::Error> {
        let record = query_as::<Postgres, BookingRecord>(CONFIRM_BOOKING_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_addons(tx, record).await
    }

    pub(crate) async fn cancel_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<BookingRecord, sqlx::Error> {
        let record = query_as::<Postgres, BookingRecord>(CANCEL_BOOKING_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_addons(tx, record).await
    }

    async fn with_addons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut record: BookingRecord,
    ) -> Result<BookingRecord, sqlx::Error> {
        record.addons = self
            .list_booking_addons(tx, &[record.uuid.into_uuid()])
            .await?;

        Ok(record)
    }
}

fn encode_count(column: &str, value: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn decode_count(column: &str, value: i32) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for BookingRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let payment_method: Option<String> = row.try_get("payment_method")?;
        let discount_percent: Option<i16> = row.try_get("discount_percent")?;

        let status = status
            .parse::<BookingStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        let payment_method = payment_method
            .map(|method| method.parse::<PaymentMethod>())
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "payment_method".to_string(),
                source: Box::new(e),
            })?;

        let discount_percent = discount_percent
            .map(DiscountPercent::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_percent".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: BookingUuid::from_uuid(row.try_get("uuid")?),
            apartment_uuid: ApartmentUuid::from_uuid(row.try_get("apartment_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            check_in: row.try_get::<SqlxDate, _>("check_in")?.to_jiff(),
            check_out: row.try_get::<SqlxDate, _>("check_out")?.to_jiff(),
            guests: decode_count("guests", row.try_get("guests")?)?,
            status,
            payment_method,
            payment_reference: row.try_get("payment_reference")?,
            nightly_rate: decode_minor("nightly_rate", row.try_get("nightly_rate")?)?,
            nights: decode_count("nights", row.try_get("nights")?)?,
            base_subtotal: decode_minor("base_subtotal", row.try_get("base_subtotal")?)?,
            addons: Vec::new(),
            addons_total: decode_minor("addons_total", row.try_get("addons_total")?)?,
            service_charge: decode_minor("service_charge", row.try_get("service_charge")?)?,
            tax: decode_minor("tax", row.try_get("tax")?)?,
            coupon_uuid: row
                .try_get::<Option<Uuid>, _>("coupon_uuid")?
                .map(CouponUuid::from_uuid),
            discount_percent,
            discount_amount: decode_minor("discount_amount", row.try_get("discount_amount")?)?,
            total_amount: decode_minor("total_amount", row.try_get("total_amount")?)?,
            customer: CustomerInfo {
                name: row.try_get("customer_name")?,
                email: row.try_get("customer_email")?,
                phone: row.try_get("customer_phone")?,
                special_request: row.try_get("special_request")?,
            },
            confirmed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("confirmed_at")?
                .map(SqlxTimestamp::to_jiff),
            cancelled_at: row
                .try_get::<Option<SqlxTimestamp>, _>("cancelled_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for BookingAddonRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let pricing_mode: String = row.try_get("pricing_mode")?;

        Ok(Self {
            uuid: BookingAddonUuid::from_uuid(row.try_get("uuid")?),
            booking_uuid: BookingUuid::from_uuid(row.try_get("booking_uuid")?),
            addon_uuid: AddonUuid::from_uuid(row.try_get("addon_uuid")?),
            position: decode_count("position", row.try_get("position")?)?,
            name: row.try_get("name")?,
            price: decode_minor("price", row.try_get("price")?)?,
            pricing_mode: pricing_mode
                .parse()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "pricing_mode".to_string(),
                    source: Box::new(e),
                })?,
            total: decode_minor("total", row.try_get("total")?)?,
        })
    }
}
