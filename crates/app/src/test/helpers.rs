//! Test Helpers

use hearth::{addons::PricingMode, bookings::PaymentMethod};
use jiff::civil::Date;
use testresult::TestResult;

use crate::{
    auth::{Principal, Role, UserUuid},
    domain::{
        apartments::{
            ApartmentsService, ApartmentsServiceError,
            data::{NewAddon, NewApartment},
            records::{AddonUuid, ApartmentRecord, ApartmentUuid},
        },
        bookings::{
            BookingsService,
            data::{CheckoutRequest, CustomerInfo, NewBooking},
            records::{BookingRecord, BookingUuid},
        },
        payments::PaymentsService,
    },
    test::TestContext,
};

/// An administrator that exists only as a principal.
pub(crate) fn admin() -> Principal {
    Principal::new(UserUuid::new(), Role::Admin)
}

pub(crate) async fn create_user(ctx: &TestContext, role: Role) -> Result<Principal, sqlx::Error> {
    let user = UserUuid::new();

    sqlx::query("INSERT INTO users (uuid, email, role) VALUES ($1, $2, $3)")
        .bind(user.into_uuid())
        .bind(format!("{user}@example.com"))
        .bind(role.as_str())
        .execute(ctx.db.pool())
        .await?;

    Ok(Principal::new(user, role))
}

/// A four-guest apartment at 50,000.00 a night with a 5,000.00 per-night cleaning addon.
pub(crate) async fn create_apartment(
    ctx: &TestContext,
) -> Result<ApartmentRecord, ApartmentsServiceError> {
    ctx.apartments
        .create_apartment(NewApartment {
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
        })
        .await
}

/// Two guests with every active addon selected.
pub(crate) fn new_booking(
    apartment: &ApartmentRecord,
    check_in: Date,
    check_out: Date,
) -> NewBooking {
    NewBooking {
        uuid: BookingUuid::new(),
        apartment_uuid: apartment.uuid,
        check_in,
        check_out,
        guests: 2,
        addon_uuids: apartment
            .addons
            .iter()
            .filter(|addon| addon.active)
            .map(|addon| addon.uuid)
            .collect(),
        customer: CustomerInfo {
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+2348000000000".to_string(),
            special_request: None,
        },
    }
}

/// Create, check out and confirm a booking for a fresh guest.
pub(crate) async fn confirmed_booking(
    ctx: &TestContext,
    apartment: &ApartmentRecord,
    check_in: Date,
    check_out: Date,
) -> TestResult<BookingRecord> {
    let guest = create_user(ctx, Role::Guest).await?;

    let booking = ctx
        .bookings
        .create_booking(guest, new_booking(apartment, check_in, check_out), check_in)
        .await?;

    ctx.bookings
        .initiate_checkout(
            guest,
            booking.uuid,
            CheckoutRequest {
                payment_method: PaymentMethod::BankTransfer,
                coupon_code: None,
            },
        )
        .await?;

    let confirmed = ctx.payments.confirm_transfer(booking.uuid).await?;

    Ok(confirmed.booking().clone())
}
