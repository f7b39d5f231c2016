//! Bookings service.

use std::sync::Arc;

use async_trait::async_trait;
use hearth::{availability::is_range_available, bookings::PaymentMethod, stays::Stay};
use jiff::civil::Date;
use mockall::automock;
use rustc_hash::FxHashSet;
use tracing::{Span, info};
use uuid::Uuid;

use crate::{
    activity::{ActivityEvent, ActivityPublisher},
    auth::Principal,
    database::Db,
    domain::{
        apartments::{
            records::{AddonUuid, ApartmentRecord, ApartmentUuid},
            repository::PgApartmentsRepository,
        },
        availability::repository::PgAvailabilityRepository,
        bookings::{
            data::{
                AddonSnapshot, BankTransferInstructions, CheckoutOutcome, CheckoutRequest,
                CheckoutSettings, NewBooking, Quote, QuoteRequest,
            },
            errors::BookingsServiceError,
            records::{BookingRecord, BookingUuid},
            repository::{CheckoutUpdate, PgBookingsRepository},
        },
        coupons::{repository::PgCouponsRepository, service::resolve_coupon},
    },
    gateway::{InitializeTransaction, PaymentGateway},
};

#[derive(Clone)]
pub struct PgBookingsService {
    db: Db,
    repository: PgBookingsRepository,
    apartments: PgApartmentsRepository,
    availability: PgAvailabilityRepository,
    coupons: PgCouponsRepository,
    gateway: Arc<dyn PaymentGateway>,
    activity: Arc<dyn ActivityPublisher>,
    settings: CheckoutSettings,
}

impl PgBookingsService {
    #[must_use]
    pub fn new(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        activity: Arc<dyn ActivityPublisher>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            db,
            repository: PgBookingsRepository::new(),
            apartments: PgApartmentsRepository::new(),
            availability: PgAvailabilityRepository::new(),
            coupons: PgCouponsRepository::new(),
            gateway,
            activity,
            settings,
        }
    }
}

/// Mint a fresh provider reference for a checkout attempt.
fn payment_reference() -> String {
    format!("hb_{}", Uuid::now_v7().simple())
}

/// Validate a requested stay against an apartment and resolve its addon selection.
///
/// Repeated addon ids are priced once, in the order first selected.
fn resolve_selection(
    apartment: &ApartmentRecord,
    check_in: Date,
    check_out: Date,
    guests: u32,
    addon_uuids: &[AddonUuid],
    today: Date,
) -> Result<(Stay, Vec<AddonSnapshot>), BookingsServiceError> {
    let stay =
        Stay::new(check_in, check_out).map_err(|_ignored| BookingsServiceError::InvalidDates)?;

    if stay.check_in() < today {
        return Err(BookingsServiceError::InvalidDates);
    }

    if guests == 0 {
        return Err(BookingsServiceError::InvalidGuests);
    }

    if guests > apartment.max_guests {
        return Err(BookingsServiceError::TooManyGuests);
    }

    let mut seen = FxHashSet::default();
    let mut addons = Vec::with_capacity(addon_uuids.len());

    for &uuid in addon_uuids {
        if !seen.insert(uuid) {
            continue;
        }

        let addon = apartment
            .active_addon(uuid)
            .ok_or(BookingsServiceError::InvalidAddon(uuid))?;

        addons.push(AddonSnapshot {
            addon_uuid: addon.uuid,
            name: addon.name.clone(),
            price: addon.price,
            pricing_mode: addon.pricing_mode,
        });
    }

    Ok((stay, addons))
}

#[async_trait]
impl BookingsService for PgBookingsService {
    #[tracing::instrument(
        name = "bookings.service.quote_booking",
        skip(self, request),
        fields(apartment_uuid = %apartment, total_amount = tracing::field::Empty),
        err
    )]
    async fn quote_booking(
        &self,
        apartment: ApartmentUuid,
        request: QuoteRequest,
        today: Date,
    ) -> Result<Quote, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.apartments.get_apartment(&mut tx, apartment).await?;

        let (stay, addons) = resolve_selection(
            &record,
            request.check_in,
            request.check_out,
            request.guests,
            &request.addon_uuids,
            today,
        )?;

        let coupon = match request.coupon_code.as_deref() {
            Some(code) => Some(resolve_coupon(&self.coupons, &mut tx, code).await?),
            None => None,
        };

        tx.commit().await?;

        let quote = Quote::price(
            record.nightly_rate,
            stay.nights(),
            addons,
            coupon.map(|coupon| coupon.discount_percent),
        )?;

        Span::current().record("total_amount", quote.total_amount);

        Ok(quote)
    }

    #[tracing::instrument(
        name = "bookings.service.create_booking",
        skip(self, principal, booking),
        fields(
            booking_uuid = %booking.uuid,
            apartment_uuid = %booking.apartment_uuid,
            user_uuid = %principal.user_uuid,
            total_amount = tracing::field::Empty
        ),
        err
    )]
    async fn create_booking(
        &self,
        principal: Principal,
        booking: NewBooking,
        today: Date,
    ) -> Result<BookingRecord, BookingsServiceError> {
        if !booking.customer.is_complete() {
            return Err(BookingsServiceError::InvalidCustomer);
        }

        let mut tx = self.db.begin().await?;

        let apartment = self
            .apartments
            .lock_apartment(&mut tx, booking.apartment_uuid)
            .await?;

        let (stay, addons) = resolve_selection(
            &apartment,
            booking.check_in,
            booking.check_out,
            booking.guests,
            &booking.addon_uuids,
            today,
        )?;

        let occupancies = self
            .availability
            .list_confirmed_stays(
                &mut tx,
                apartment.uuid,
                stay.check_in(),
                Some(stay.check_out()),
            )
            .await?;

        if !is_range_available(&stay, &occupancies) {
            return Err(BookingsServiceError::DatesUnavailable);
        }

        let quote = Quote::price(apartment.nightly_rate, stay.nights(), addons, None)?;

        let record = self
            .repository
            .create_booking(&mut tx, principal.user_uuid, &booking, &quote)
            .await?;

        tx.commit().await?;

        Span::current().record("total_amount", record.total_amount);

        info!(
            booking_uuid = %record.uuid,
            apartment_uuid = %record.apartment_uuid,
            nights = record.nights,
            total_amount = record.total_amount,
            "created booking"
        );

        self.activity.publish(ActivityEvent::BookingCreated {
            booking_uuid: record.uuid.into_uuid(),
            apartment_uuid: record.apartment_uuid.into_uuid(),
            total_amount: record.total_amount,
        });

        Ok(record)
    }

    async fn get_booking(
        &self,
        principal: Principal,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_booking(&mut tx, booking).await?;

        tx.commit().await?;

        if !principal.can_access(record.user_uuid) {
            return Err(BookingsServiceError::Forbidden);
        }

        Ok(record)
    }

    async fn list_bookings(
        &self,
        principal: Principal,
    ) -> Result<Vec<BookingRecord>, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .repository
            .list_user_bookings(&mut tx, principal.user_uuid)
            .await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "bookings.service.initiate_checkout",
        skip(self, principal, request),
        fields(
            booking_uuid = %booking,
            payment_method = %request.payment_method,
            reference = tracing::field::Empty,
            total_amount = tracing::field::Empty
        ),
        err
    )]
    async fn initiate_checkout(
        &self,
        principal: Principal,
        booking: BookingUuid,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.lock_booking(&mut tx, booking).await?;

        if !principal.can_access(record.user_uuid) {
            return Err(BookingsServiceError::Forbidden);
        }

        record.status.ensure_checkout()?;

        let coupon = match request.coupon_code.as_deref() {
            Some(code) => Some(resolve_coupon(&self.coupons, &mut tx, code).await?),
            None => None,
        };

        let quote = Quote::price(
            record.nightly_rate,
            record.nights,
            record.addon_snapshots(),
            coupon.as_ref().map(|coupon| coupon.discount_percent),
        )?;

        let reference = payment_reference();

        let updated = self
            .repository
            .update_checkout(
                &mut tx,
                record.uuid,
                &CheckoutUpdate {
                    payment_method: request.payment_method,
                    reference: &reference,
                    coupon: coupon.as_ref().map(|coupon| coupon.uuid),
                    quote: &quote,
                },
            )
            .await?;

        Span::current().record("reference", reference.as_str());
        Span::current().record("total_amount", updated.total_amount);

        let outcome = match request.payment_method {
            PaymentMethod::Paystack => {
                let session = self
                    .gateway
                    .initialize_transaction(InitializeTransaction {
                        email: updated.customer.email.clone(),
                        amount: updated.total_amount,
                        reference: reference.clone(),
                        callback_url: self.settings.callback_url.clone(),
                    })
                    .await?;

                CheckoutOutcome::Redirect {
                    booking: updated,
                    reference: reference.clone(),
                    authorization_url: session.authorization_url,
                }
            }
            PaymentMethod::BankTransfer => CheckoutOutcome::BankTransfer {
                instructions: BankTransferInstructions {
                    account: self.settings.bank_account.clone(),
                    amount: updated.total_amount,
                    reference: reference.clone(),
                },
                booking: updated,
            },
        };

        tx.commit().await?;

        info!(
            booking_uuid = %booking,
            reference = %reference,
            coupon_uuid = ?coupon.as_ref().map(|coupon| coupon.uuid),
            "started checkout"
        );

        self.activity.publish(ActivityEvent::CheckoutStarted {
            booking_uuid: booking.into_uuid(),
            payment_method: request.payment_method,
            reference,
        });

        Ok(outcome)
    }

    #[tracing::instrument(
        name = "bookings.service.cancel_booking",
        skip(self, principal),
        fields(booking_uuid = %booking, user_uuid = %principal.user_uuid),
        err
    )]
    async fn cancel_booking(
        &self,
        principal: Principal,
        booking: BookingUuid,
        today: Date,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.lock_booking(&mut tx, booking).await?;

        if !principal.can_access(record.user_uuid) {
            return Err(BookingsServiceError::Forbidden);
        }

        let stay = record
            .stay()
            .map_err(|_ignored| BookingsServiceError::InvalidData)?;

        record.status.ensure_cancellable(&stay, today)?;

        let cancelled = self.repository.cancel_booking(&mut tx, booking).await?;

        tx.commit().await?;

        info!(booking_uuid = %booking, previous_status = %record.status, "cancelled booking");

        self.activity.publish(ActivityEvent::BookingCancelled {
            booking_uuid: booking.into_uuid(),
        });

        Ok(cancelled)
    }
}

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// Price a prospective stay without creating anything.
    async fn quote_booking(
        &self,
        apartment: ApartmentUuid,
        request: QuoteRequest,
        today: Date,
    ) -> Result<Quote, BookingsServiceError>;

    /// Create a pending booking for the principal.
    async fn create_booking(
        &self,
        principal: Principal,
        booking: NewBooking,
        today: Date,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Retrieve a booking owned by the principal, or any booking for an admin.
    async fn get_booking(
        &self,
        principal: Principal,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// The principal's own bookings, newest first.
    async fn list_bookings(
        &self,
        principal: Principal,
    ) -> Result<Vec<BookingRecord>, BookingsServiceError>;

    /// Start paying for a pending booking, optionally applying a coupon.
    ///
    /// The coupon is checked but not consumed; it is burned when the payment is confirmed.
    async fn initiate_checkout(
        &self,
        principal: Principal,
        booking: BookingUuid,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, BookingsServiceError>;

    /// Cancel a booking whose stay has not started. No refund is issued.
    async fn cancel_booking(
        &self,
        principal: Principal,
        booking: BookingUuid,
        today: Date,
    ) -> Result<BookingRecord, BookingsServiceError>;
}
