//! App Router

use salvo::Router;

use crate::{apartments, auth, bookings, coupons, payments};

/// Routes reachable without a session: browsing, provider redirects and webhooks.
fn public_router() -> Router {
    Router::new()
        .push(
            Router::with_path("apartments/{apartment}")
                .push(Router::with_path("availability").get(apartments::availability::handler))
                .push(Router::with_path("booked-nights").get(apartments::booked_nights::handler))
                .push(Router::with_path("quotes").post(apartments::quote::handler)),
        )
        .push(Router::with_path("bookings/{booking}/confirm").post(bookings::confirm::handler))
        .push(Router::with_path("payments/webhook").post(payments::webhook::handler))
}

fn authenticated_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("bookings")
                .get(bookings::index::handler)
                .post(bookings::create::handler)
                .push(
                    Router::with_path("{booking}")
                        .get(bookings::get::handler)
                        .push(Router::with_path("checkout").post(bookings::checkout::handler))
                        .push(Router::with_path("cancel").post(bookings::cancel::handler))
                        .push(
                            Router::with_path("confirm-transfer")
                                .post(bookings::confirm_transfer::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("coupons")
                .post(coupons::create::handler)
                .push(Router::with_path("validate").post(coupons::validate::handler))
                .push(Router::with_path("{coupon}/usable").put(coupons::set_usable::handler)),
        )
}

pub fn app_router() -> Router {
    Router::new()
        .push(public_router())
        .push(authenticated_router())
}
