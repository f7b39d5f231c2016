//! Test helpers.

use std::sync::Arc;

use jiff::{Timestamp, civil::date};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use hearth::{
    addons::PricingMode,
    bookings::{BookingStatus, PaymentMethod},
};
use hearth_app::{
    activity::BroadcastActivityFeed,
    auth::{MockAuthService, Principal, Role, UserUuid},
    context::AppContext,
    domain::{
        apartments::{
            MockApartmentsService,
            records::{AddonUuid, ApartmentUuid},
        },
        availability::MockAvailabilityService,
        bookings::{
            MockBookingsService,
            data::CustomerInfo,
            records::{BookingAddonRecord, BookingAddonUuid, BookingRecord, BookingUuid},
        },
        coupons::MockCouponsService,
        payments::MockPaymentsService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_GUEST: Principal =
    Principal::new(UserUuid::from_uuid(Uuid::nil()), Role::Guest);

pub(crate) const TEST_ADMIN: Principal =
    Principal::new(UserUuid::from_uuid(Uuid::from_u128(1)), Role::Admin);

/// One mock per service. Mocks without expectations fail any call made to them.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) apartments: MockApartmentsService,
    pub(crate) availability: MockAvailabilityService,
    pub(crate) coupons: MockCouponsService,
    pub(crate) bookings: MockBookingsService,
    pub(crate) payments: MockPaymentsService,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            apartments: Arc::new(self.apartments),
            availability: Arc::new(self.availability),
            coupons: Arc::new(self.coupons),
            bookings: Arc::new(self.bookings),
            payments: Arc::new(self.payments),
            auth: Arc::new(self.auth),
            feed: Arc::new(BroadcastActivityFeed::default()),
        })
    }
}

#[salvo::handler]
async fn inject_guest(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(TEST_GUEST);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

/// Serve `route` with the mocks and no authenticated principal.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// Serve `route` as [`TEST_GUEST`].
pub(crate) fn guest_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_guest)
            .push(route),
    )
}

/// Serve `route` as [`TEST_ADMIN`].
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

/// A pending two-night booking owned by [`TEST_GUEST`], priced at the usual rate plus cleaning.
pub(crate) fn make_booking(uuid: BookingUuid) -> BookingRecord {
    BookingRecord {
        uuid,
        apartment_uuid: ApartmentUuid::from_uuid(Uuid::from_u128(7)),
        user_uuid: TEST_GUEST.user_uuid,
        check_in: date(2030, 6, 1),
        check_out: date(2030, 6, 3),
        guests: 2,
        status: BookingStatus::Pending,
        payment_method: Some(PaymentMethod::Paystack),
        payment_reference: Some("hb_0192f0c16a3e7cc09b1a2f4f1f1d9e11".to_string()),
        nightly_rate: 5_000_000,
        nights: 2,
        base_subtotal: 10_000_000,
        addons: vec![BookingAddonRecord {
            uuid: BookingAddonUuid::from_uuid(Uuid::from_u128(9)),
            booking_uuid: uuid,
            addon_uuid: AddonUuid::from_uuid(Uuid::from_u128(8)),
            position: 0,
            name: "Cleaning".to_string(),
            price: 500_000,
            pricing_mode: PricingMode::OneTime,
            total: 500_000,
        }],
        addons_total: 500_000,
        service_charge: 525_000,
        tax: 787_500,
        coupon_uuid: None,
        discount_percent: None,
        discount_amount: 0,
        total_amount: 11_812_500,
        customer: CustomerInfo {
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+2348000000000".to_string(),
            special_request: None,
        },
        confirmed_at: None,
        cancelled_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
