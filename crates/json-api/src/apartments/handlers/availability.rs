//! Apartment Availability Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    apartments::errors::into_status_error,
    extensions::*,
    state::State,
};

/// Availability Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailabilityResponse {
    /// Whether every night from check-in up to (not including) check-out is free
    pub available: bool,
}

/// Apartment Availability Handler
///
/// Reports whether an apartment can be booked for a stay. Only confirmed bookings hold nights.
#[endpoint(
    tags("apartments"),
    summary = "Check Availability",
    responses(
        (status_code = StatusCode::OK, description = "Availability computed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Apartment not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    apartment: PathParam<Uuid>,
    check_in: QueryParam<String, true>,
    check_out: QueryParam<String, true>,
    depot: &mut Depot,
) -> Result<Json<AvailabilityResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let check_in = parse_date(&check_in.into_inner(), "check_in")?;
    let check_out = parse_date(&check_out.into_inner(), "check_out")?;

    let available = state
        .app
        .availability
        .is_range_available(apartment.into_inner().into(), check_in, check_out)
        .await
        .map_err(into_status_error)?;

    Ok(Json(AvailabilityResponse { available }))
}
