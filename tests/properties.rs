//! Property tests for stay overlap, availability and pricing arithmetic.

use hearth::{
    addons::{AddonCharge, PricingMode},
    availability::{Occupancy, booked_nights, is_range_available},
    bookings::BookingStatus,
    discounts::DiscountPercent,
    pricing::price_stay,
    stays::Stay,
};
use jiff::{ToSpan, civil::date};
use proptest::prelude::*;
use rusty_money::{Money, iso::NGN};

fn stay_strategy() -> impl Strategy<Value = Stay> {
    (0_i64..120, 1_i64..21).prop_filter_map("valid stay", |(offset, length)| {
        let start = date(2024, 1, 1).checked_add(offset.days()).ok()?;
        let end = start.checked_add(length.days()).ok()?;

        Stay::new(start, end).ok()
    })
}

fn mode_strategy() -> impl Strategy<Value = PricingMode> {
    prop_oneof![Just(PricingMode::PerNight), Just(PricingMode::OneTime)]
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in stay_strategy(), b in stay_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn overlap_matches_shared_nights(a in stay_strategy(), b in stay_strategy()) {
        let shares_night = a.nights_iter().any(|night| b.nights_iter().any(|other| other == night));

        prop_assert_eq!(a.overlaps(&b), shares_night);
    }

    #[test]
    fn available_range_never_touches_booked_nights(
        booked in proptest::collection::vec(stay_strategy(), 0..6),
        requested in stay_strategy(),
    ) {
        let calendar: Vec<Occupancy> = booked
            .into_iter()
            .map(|stay| Occupancy::new(BookingStatus::Confirmed, stay))
            .collect();

        let nights = booked_nights(&calendar, date(2000, 1, 1));
        let touches = requested.nights_iter().any(|night| nights.contains(&night));

        prop_assert_eq!(is_range_available(&requested, &calendar), !touches);
    }

    #[test]
    fn breakdown_always_adds_up(
        rate in 1_i64..10_000_000,
        nights in 1_u32..60,
        addons in proptest::collection::vec((1_i64..1_000_000, mode_strategy()), 0..4),
        percent in proptest::option::of(0_u8..=100),
    ) {
        let charges: Vec<AddonCharge<'_>> = addons
            .into_iter()
            .map(|(price, mode)| AddonCharge::new(Money::from_minor(price, NGN), mode))
            .collect();

        let discount = percent.and_then(|p| DiscountPercent::new(p).ok());

        let breakdown = price_stay(Money::from_minor(rate, NGN), nights, &charges, discount);

        prop_assert!(breakdown.is_ok(), "pricing failed: {:?}", breakdown);

        if let Ok(breakdown) = breakdown {
            prop_assert!(breakdown.verify());
            prop_assert!(breakdown.total.to_minor_units() >= 0);
            prop_assert!(breakdown.total.to_minor_units() <= breakdown.grand_total.to_minor_units());
        }
    }

    #[test]
    fn pricing_is_deterministic(rate in 1_i64..10_000_000, nights in 1_u32..60) {
        let first = price_stay(Money::from_minor(rate, NGN), nights, &[], None);
        let second = price_stay(Money::from_minor(rate, NGN), nights, &[], None);

        prop_assert_eq!(first, second);
    }
}
