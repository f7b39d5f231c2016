//! List Bookings Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    bookings::{errors::into_status_error, handlers::BookingResponse},
    extensions::*,
    state::State,
};

/// List Bookings Handler
///
/// Returns the caller's own bookings, newest first.
#[endpoint(
    tags("bookings"),
    summary = "List Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Bookings"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<BookingResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let bookings = state
        .app
        .bookings
        .list_bookings(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}
