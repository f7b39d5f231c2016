//! Payments service.

use std::sync::Arc;

use async_trait::async_trait;
use hearth::bookings::{Confirmation, PaymentMethod};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, error, info, warn};

use crate::{
    activity::{ActivityEvent, ActivityPublisher},
    database::Db,
    domain::{
        bookings::{
            records::{BookingRecord, BookingUuid},
            repository::PgBookingsRepository,
        },
        coupons::repository::PgCouponsRepository,
        payments::{
            data::{PaymentOutcome, WebhookEvent, WebhookOutcome},
            errors::PaymentsServiceError,
        },
    },
    gateway::{PaymentGateway, SecretKey, verify_webhook_signature},
};

#[derive(Clone)]
pub struct PgPaymentsService {
    db: Db,
    bookings: PgBookingsRepository,
    coupons: PgCouponsRepository,
    gateway: Arc<dyn PaymentGateway>,
    activity: Arc<dyn ActivityPublisher>,
    webhook_secret: SecretKey,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        activity: Arc<dyn ActivityPublisher>,
        webhook_secret: SecretKey,
    ) -> Self {
        Self {
            db,
            bookings: PgBookingsRepository::new(),
            coupons: PgCouponsRepository::new(),
            gateway,
            activity,
            webhook_secret,
        }
    }
}

impl PgPaymentsService {
    /// Confirm a locked pending booking and burn its coupon, then commit and publish events.
    async fn finish_confirmation(
        &self,
        mut tx: Transaction<'static, Postgres>,
        booking: BookingUuid,
        reference: Option<&str>,
    ) -> Result<BookingRecord, PaymentsServiceError> {
        let confirmed = match self.bookings.confirm_booking(&mut tx, booking).await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                let e = PaymentsServiceError::from(e);

                if matches!(e, PaymentsServiceError::DatesUnavailable) {
                    error!(
                        booking_uuid = %booking,
                        reference,
                        "paid booking overlaps a confirmed stay, needs manual refund"
                    );
                }

                return Err(e);
            }
        };

        if let Some(coupon) = confirmed.coupon_uuid {
            let rows = self
                .coupons
                .mark_used(&mut tx, coupon, confirmed.user_uuid)
                .await?;

            if rows == 0 {
                error!(
                    booking_uuid = %booking,
                    coupon_uuid = %coupon,
                    reference,
                    "coupon was consumed by another booking"
                );

                return Err(PaymentsServiceError::CouponAlreadyUsed);
            }
        }

        tx.commit().await?;

        Span::current().record("outcome", "confirmed");

        info!(
            booking_uuid = %booking,
            reference,
            total_amount = confirmed.total_amount,
            "confirmed booking"
        );

        self.activity.publish(ActivityEvent::BookingConfirmed {
            booking_uuid: booking.into_uuid(),
        });

        if let Some(coupon) = confirmed.coupon_uuid {
            self.activity.publish(ActivityEvent::CouponRedeemed {
                coupon_uuid: coupon.into_uuid(),
                booking_uuid: booking.into_uuid(),
            });
        }

        Ok(confirmed)
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    #[tracing::instrument(
        name = "payments.service.confirm_payment",
        skip(self),
        fields(booking_uuid = %booking, outcome = tracing::field::Empty),
        err
    )]
    async fn confirm_payment(
        &self,
        booking: BookingUuid,
        reference: &str,
    ) -> Result<PaymentOutcome, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        // Held until commit so a racing webhook and redirect confirm one at a time.
        let record = self.bookings.lock_booking(&mut tx, booking).await?;

        if record.payment_reference.as_deref() != Some(reference) {
            return Err(PaymentsServiceError::ReferenceMismatch);
        }

        match record.status.confirm() {
            Err(_cancelled) => return Err(PaymentsServiceError::AlreadyCancelled),
            Ok(Confirmation::AlreadyConfirmed) => {
                tx.commit().await?;

                Span::current().record("outcome", "already_confirmed");

                return Ok(PaymentOutcome::AlreadyConfirmed(record));
            }
            Ok(Confirmation::Confirmed) => {}
        }

        // Transfer references never reach the provider.
        if record.payment_method == Some(PaymentMethod::BankTransfer) {
            return Err(PaymentsServiceError::ManualConfirmationRequired);
        }

        let verification = self.gateway.verify_transaction(reference).await?;

        if verification.reference != reference {
            return Err(PaymentsServiceError::ReferenceMismatch);
        }

        if !verification.status.is_success() {
            tx.commit().await?;

            Span::current().record("outcome", "not_paid");

            info!(
                booking_uuid = %booking,
                status = ?verification.status,
                "payment not settled, booking stays pending"
            );

            return Ok(PaymentOutcome::NotPaid {
                booking: record,
                status: verification.status,
            });
        }

        if verification.amount < record.total_amount {
            warn!(
                booking_uuid = %booking,
                expected = record.total_amount,
                received = verification.amount,
                "payment does not cover booking total"
            );

            return Err(PaymentsServiceError::Underpaid {
                expected: record.total_amount,
                received: verification.amount,
            });
        }

        let confirmed = self
            .finish_confirmation(tx, booking, Some(reference))
            .await?;

        Ok(PaymentOutcome::Confirmed(confirmed))
    }

    #[tracing::instrument(
        name = "payments.service.confirm_transfer",
        skip(self),
        fields(booking_uuid = %booking, outcome = tracing::field::Empty),
        err
    )]
    async fn confirm_transfer(
        &self,
        booking: BookingUuid,
    ) -> Result<PaymentOutcome, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.bookings.lock_booking(&mut tx, booking).await?;

        match record.status.confirm() {
            Err(_cancelled) => return Err(PaymentsServiceError::AlreadyCancelled),
            Ok(Confirmation::AlreadyConfirmed) => {
                tx.commit().await?;

                Span::current().record("outcome", "already_confirmed");

                return Ok(PaymentOutcome::AlreadyConfirmed(record));
            }
            Ok(Confirmation::Confirmed) => {}
        }

        if record.payment_method != Some(PaymentMethod::BankTransfer) {
            return Err(PaymentsServiceError::NotBankTransfer);
        }

        let confirmed = self
            .finish_confirmation(tx, booking, record.payment_reference.as_deref())
            .await?;

        Ok(PaymentOutcome::Confirmed(confirmed))
    }

    #[tracing::instrument(
        name = "payments.service.handle_webhook",
        skip(self, payload, signature),
        fields(event = tracing::field::Empty, reference = tracing::field::Empty),
        err
    )]
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookOutcome, PaymentsServiceError> {
        if !verify_webhook_signature(&self.webhook_secret, payload, signature) {
            warn!("dropping webhook with invalid signature");

            return Ok(WebhookOutcome::Rejected);
        }

        let event: WebhookEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "dropping malformed webhook payload");

                return Ok(WebhookOutcome::Ignored);
            }
        };

        Span::current().record("event", event.event.as_str());
        Span::current().record("reference", event.data.reference.as_str());

        if !event.is_charge_success() {
            return Ok(WebhookOutcome::Ignored);
        }

        let mut tx = self.db.begin().await?;

        let booking = self
            .bookings
            .find_booking_by_reference(&mut tx, &event.data.reference)
            .await?;

        tx.commit().await?;

        let Some(booking) = booking else {
            warn!("webhook reference matches no booking");

            return Ok(WebhookOutcome::Ignored);
        };

        let outcome = self
            .confirm_payment(booking.uuid, &event.data.reference)
            .await?;

        Ok(WebhookOutcome::Processed(outcome))
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Verify a payment with the provider and confirm the booking it pays for.
    ///
    /// Confirming an already-confirmed booking succeeds without contacting the provider.
    async fn confirm_payment(
        &self,
        booking: BookingUuid,
        reference: &str,
    ) -> Result<PaymentOutcome, PaymentsServiceError>;

    /// Confirm a booking paid by bank transfer once an administrator has seen the funds.
    ///
    /// The provider is not consulted. Confirming twice succeeds without changes.
    async fn confirm_transfer(
        &self,
        booking: BookingUuid,
    ) -> Result<PaymentOutcome, PaymentsServiceError>;

    /// Reconcile a signed provider webhook delivery.
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookOutcome, PaymentsServiceError>;
}

#[cfg(test)]
mod tests {
    use hearth::bookings::BookingStatus;
    use jiff::civil::{Date, date};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        auth::Role,
        domain::{
            apartments::records::ApartmentRecord,
            bookings::{
                BookingsService,
                data::{CheckoutOutcome, CheckoutRequest},
            },
            coupons::{
                CouponsService, CouponsServiceError, data::NewCoupon, records::CouponUuid,
            },
        },
        gateway::{
            MockPaymentGateway, TransactionSession, TransactionStatus, TransactionVerification,
            sign_webhook,
        },
        test::{TEST_WEBHOOK_SECRET, TestContext, helpers},
    };

    use super::*;

    async fn pending_with_reference(
        ctx: &TestContext,
        apartment: &ApartmentRecord,
        stay: (Date, Date),
        coupon_code: Option<&str>,
        payment_method: PaymentMethod,
    ) -> TestResult<(BookingUuid, String)> {
        let guest = helpers::create_user(ctx, Role::Guest).await?;

        let booking = ctx
            .bookings
            .create_booking(
                guest,
                helpers::new_booking(apartment, stay.0, stay.1),
                date(2030, 5, 1),
            )
            .await?;

        let outcome = ctx
            .bookings
            .initiate_checkout(
                guest,
                booking.uuid,
                CheckoutRequest {
                    payment_method,
                    coupon_code: coupon_code.map(str::to_string),
                },
            )
            .await?;

        let reference = match outcome {
            CheckoutOutcome::Redirect { reference, .. } => reference,
            CheckoutOutcome::BankTransfer { instructions, .. } => instructions.reference,
        };

        Ok((booking.uuid, reference))
    }

    async fn june_booking(
        ctx: &TestContext,
        coupon_code: Option<&str>,
        payment_method: PaymentMethod,
    ) -> TestResult<(BookingUuid, String)> {
        let apartment = helpers::create_apartment(ctx).await?;

        pending_with_reference(
            ctx,
            &apartment,
            (date(2030, 6, 1), date(2030, 6, 4)),
            coupon_code,
            payment_method,
        )
        .await
    }

    async fn create_save10(ctx: &TestContext) -> TestResult {
        ctx.coupons
            .create_coupon(NewCoupon {
                uuid: CouponUuid::new(),
                code: "SAVE10".to_string(),
                discount_percent: 10,
                is_usable: true,
            })
            .await?;

        Ok(())
    }

    fn gateway_reporting(status: TransactionStatus, amount: u64) -> MockPaymentGateway {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_initialize_transaction().returning(|request| {
            Ok(TransactionSession {
                authorization_url: format!("https://checkout.hearth.test/{}", request.reference),
                access_code: None,
                reference: request.reference,
            })
        });

        gateway.expect_verify_transaction().returning(move |reference| {
            Ok(TransactionVerification {
                reference: reference.to_string(),
                status,
                amount,
            })
        });

        gateway
    }

    #[tokio::test]
    async fn confirming_twice_burns_coupon_once() -> TestResult {
        let ctx = TestContext::new().await;

        create_save10(&ctx).await?;

        let (booking, reference) =
            june_booking(&ctx, Some("SAVE10"), PaymentMethod::Paystack).await?;

        let first = ctx.payments.confirm_payment(booking, &reference).await?;
        let second = ctx.payments.confirm_payment(booking, &reference).await?;

        assert!(matches!(first, PaymentOutcome::Confirmed(_)), "got {first:?}");
        assert!(matches!(second, PaymentOutcome::AlreadyConfirmed(_)), "got {second:?}");
        assert_eq!(second.booking().status, BookingStatus::Confirmed);

        let reused = ctx.coupons.validate_coupon("SAVE10").await;

        assert!(
            matches!(reused, Err(CouponsServiceError::AlreadyUsed)),
            "expected AlreadyUsed, got {reused:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn abandoned_payment_leaves_booking_pending() -> TestResult {
        let ctx =
            TestContext::with_gateway(gateway_reporting(TransactionStatus::Abandoned, 0)).await;

        let (booking, reference) = june_booking(&ctx, None, PaymentMethod::Paystack).await?;

        let outcome = ctx.payments.confirm_payment(booking, &reference).await?;

        assert!(!outcome.is_confirmed());
        assert_eq!(outcome.booking().status, BookingStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn short_payment_is_rejected() -> TestResult {
        let ctx =
            TestContext::with_gateway(gateway_reporting(TransactionStatus::Success, 100)).await;

        let (booking, reference) = june_booking(&ctx, None, PaymentMethod::Paystack).await?;

        let result = ctx.payments.confirm_payment(booking, &reference).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::Underpaid { received: 100, .. })),
            "expected Underpaid, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn wrong_reference_is_rejected_without_provider_call() -> TestResult {
        let ctx = TestContext::with_gateway(MockPaymentGateway::new()).await;

        let (booking, _reference) = june_booking(&ctx, None, PaymentMethod::BankTransfer).await?;

        let result = ctx.payments.confirm_payment(booking, "hb_forged").await;

        assert!(
            matches!(result, Err(PaymentsServiceError::ReferenceMismatch)),
            "expected ReferenceMismatch, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_paid_overlap_is_refused() -> TestResult {
        let ctx = TestContext::new().await;
        let apartment = helpers::create_apartment(&ctx).await?;

        let (first, first_reference) = pending_with_reference(
            &ctx,
            &apartment,
            (date(2030, 6, 1), date(2030, 6, 5)),
            None,
            PaymentMethod::Paystack,
        )
        .await?;
        let (second, second_reference) = pending_with_reference(
            &ctx,
            &apartment,
            (date(2030, 6, 4), date(2030, 6, 7)),
            None,
            PaymentMethod::Paystack,
        )
        .await?;

        ctx.payments.confirm_payment(first, &first_reference).await?;

        let result = ctx.payments.confirm_payment(second, &second_reference).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::DatesUnavailable)),
            "expected DatesUnavailable, got {result:?}"
        );

        let reloaded = ctx.bookings.get_booking(helpers::admin(), second).await?;

        assert_eq!(reloaded.status, BookingStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn transfer_booking_is_confirmed_without_the_provider() -> TestResult {
        // No expectations: any provider call fails the test.
        let ctx = TestContext::with_gateway(MockPaymentGateway::new()).await;

        create_save10(&ctx).await?;

        let (booking, _reference) =
            june_booking(&ctx, Some("SAVE10"), PaymentMethod::BankTransfer).await?;

        let first = ctx.payments.confirm_transfer(booking).await?;
        let second = ctx.payments.confirm_transfer(booking).await?;

        assert!(matches!(first, PaymentOutcome::Confirmed(_)), "got {first:?}");
        assert!(matches!(second, PaymentOutcome::AlreadyConfirmed(_)), "got {second:?}");

        let reloaded = ctx.bookings.get_booking(helpers::admin(), booking).await?;

        assert_eq!(reloaded.status, BookingStatus::Confirmed);

        let reused = ctx.coupons.validate_coupon("SAVE10").await;

        assert!(
            matches!(reused, Err(CouponsServiceError::AlreadyUsed)),
            "expected AlreadyUsed, got {reused:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn transfer_reference_is_not_sent_to_the_provider() -> TestResult {
        let ctx = TestContext::with_gateway(MockPaymentGateway::new()).await;

        let (booking, reference) = june_booking(&ctx, None, PaymentMethod::BankTransfer).await?;

        let result = ctx.payments.confirm_payment(booking, &reference).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::ManualConfirmationRequired)),
            "expected ManualConfirmationRequired, got {result:?}"
        );

        let reloaded = ctx.bookings.get_booking(helpers::admin(), booking).await?;

        assert_eq!(reloaded.status, BookingStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn card_booking_cannot_be_confirmed_as_transfer() -> TestResult {
        let ctx = TestContext::new().await;

        let (booking, _reference) = june_booking(&ctx, None, PaymentMethod::Paystack).await?;

        let result = ctx.payments.confirm_transfer(booking).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::NotBankTransfer)),
            "expected NotBankTransfer, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_confirmations_confirm_once() -> TestResult {
        let ctx = TestContext::new().await;

        let (booking, reference) = june_booking(&ctx, None, PaymentMethod::Paystack).await?;

        let (first, second) = tokio::join!(
            ctx.payments.confirm_payment(booking, &reference),
            ctx.payments.confirm_payment(booking, &reference),
        );

        let outcomes = [first?, second?];

        let confirmed = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, PaymentOutcome::Confirmed(_)))
            .count();
        let already = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, PaymentOutcome::AlreadyConfirmed(_)))
            .count();

        assert_eq!(confirmed, 1, "expected exactly one confirmation, got {outcomes:?}");
        assert_eq!(already, 1, "expected one idempotent replay, got {outcomes:?}");

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_confirmations_burn_a_shared_coupon_once() -> TestResult {
        let ctx = TestContext::new().await;
        let apartment = helpers::create_apartment(&ctx).await?;

        create_save10(&ctx).await?;

        let (first, first_reference) = pending_with_reference(
            &ctx,
            &apartment,
            (date(2030, 6, 1), date(2030, 6, 3)),
            Some("SAVE10"),
            PaymentMethod::Paystack,
        )
        .await?;
        let (second, second_reference) = pending_with_reference(
            &ctx,
            &apartment,
            (date(2030, 7, 1), date(2030, 7, 3)),
            Some("SAVE10"),
            PaymentMethod::Paystack,
        )
        .await?;

        let (a, b) = tokio::join!(
            ctx.payments.confirm_payment(first, &first_reference),
            ctx.payments.confirm_payment(second, &second_reference),
        );

        let confirmed = [&a, &b]
            .iter()
            .filter(|result| matches!(result, Ok(PaymentOutcome::Confirmed(_))))
            .count();
        let refused = [&a, &b]
            .iter()
            .filter(|result| matches!(result, Err(PaymentsServiceError::CouponAlreadyUsed)))
            .count();

        assert_eq!(confirmed, 1, "expected one winner, got {a:?} and {b:?}");
        assert_eq!(refused, 1, "expected one coupon refusal, got {a:?} and {b:?}");

        let used: i64 = sqlx::query_scalar("SELECT count(*) FROM coupons WHERE is_used")
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(used, 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_overlapping_confirmations_admit_one_stay() -> TestResult {
        let ctx = TestContext::new().await;
        let apartment = helpers::create_apartment(&ctx).await?;

        let (first, first_reference) = pending_with_reference(
            &ctx,
            &apartment,
            (date(2030, 6, 1), date(2030, 6, 5)),
            None,
            PaymentMethod::Paystack,
        )
        .await?;
        let (second, second_reference) = pending_with_reference(
            &ctx,
            &apartment,
            (date(2030, 6, 3), date(2030, 6, 8)),
            None,
            PaymentMethod::Paystack,
        )
        .await?;

        let (a, b) = tokio::join!(
            ctx.payments.confirm_payment(first, &first_reference),
            ctx.payments.confirm_payment(second, &second_reference),
        );

        let confirmed = [&a, &b]
            .iter()
            .filter(|result| matches!(result, Ok(PaymentOutcome::Confirmed(_))))
            .count();
        let refused = [&a, &b]
            .iter()
            .filter(|result| matches!(result, Err(PaymentsServiceError::DatesUnavailable)))
            .count();

        assert_eq!(confirmed, 1, "expected one winner, got {a:?} and {b:?}");
        assert_eq!(refused, 1, "expected one overlap refusal, got {a:?} and {b:?}");

        Ok(())
    }

    #[tokio::test]
    async fn webhook_with_bad_signature_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;

        let (booking, reference) = june_booking(&ctx, None, PaymentMethod::Paystack).await?;

        let payload = json!({ "event": "charge.success", "data": { "reference": reference } })
            .to_string();

        let outcome = ctx
            .payments
            .handle_webhook(payload.as_bytes(), "deadbeef")
            .await?;

        assert!(matches!(outcome, WebhookOutcome::Rejected), "got {outcome:?}");

        let reloaded = ctx.bookings.get_booking(helpers::admin(), booking).await?;

        assert_eq!(reloaded.status, BookingStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn signed_webhook_confirms_booking() -> TestResult {
        let ctx = TestContext::new().await;

        let (booking, reference) = june_booking(&ctx, None, PaymentMethod::Paystack).await?;

        let payload = json!({ "event": "charge.success", "data": { "reference": reference } })
            .to_string();
        let signature = sign_webhook(&SecretKey::new(TEST_WEBHOOK_SECRET), payload.as_bytes());

        let outcome = ctx
            .payments
            .handle_webhook(payload.as_bytes(), &signature)
            .await?;

        assert!(
            matches!(&outcome, WebhookOutcome::Processed(payment) if payment.is_confirmed()),
            "got {outcome:?}"
        );

        let reloaded = ctx.bookings.get_booking(helpers::admin(), booking).await?;

        assert_eq!(reloaded.status, BookingStatus::Confirmed);

        Ok(())
    }
}
