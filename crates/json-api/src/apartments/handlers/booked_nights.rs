//! Booked Nights Handler

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

use crate::{apartments::errors::into_status_error, extensions::*, state::State};

/// Booked Nights Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookedNightsResponse {
    /// Confirmed nights on or after `from`, ascending, as `YYYY-MM-DD`
    pub nights: Vec<String>,
}

/// Booked Nights Handler
///
/// Lists the nights held by confirmed bookings, for greying out a calendar.
#[endpoint(
    tags("apartments"),
    summary = "List Booked Nights",
    responses(
        (status_code = StatusCode::OK, description = "Booked nights"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Apartment not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    apartment: PathParam<Uuid>,
    from: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<BookedNightsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let from = from.into_date_or_today("from")?;

    let nights = state
        .app
        .availability
        .list_booked_nights(apartment.into_inner().into(), from)
        .await
        .map_err(into_status_error)?;

    Ok(Json(BookedNightsResponse {
        nights: nights.iter().map(ToString::to_string).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use hearth_app::domain::{
        apartments::records::ApartmentUuid,
        availability::MockAvailabilityService,
    };

    use crate::test_helpers::{Mocks, public_service};

    use super::*;

    fn make_service(availability: MockAvailabilityService) -> Service {
        public_service(
            Mocks {
                availability,
                ..Mocks::default()
            },
            Router::with_path("apartments/{apartment}/booked-nights").get(handler),
        )
    }

    #[tokio::test]
    async fn test_lists_nights_in_order() -> TestResult {
        let apartment = ApartmentUuid::new();

        let mut availability = MockAvailabilityService::new();

        availability
            .expect_list_booked_nights()
            .once()
            .withf(move |a, from| *a == apartment && *from == date(2030, 6, 1))
            .return_once(|_, _| {
                Ok(BTreeSet::from([date(2030, 6, 3), date(2030, 6, 2)]))
            });

        let mut res = TestClient::get(format!(
            "http://example.com/apartments/{apartment}/booked-nights?from=2030-06-01"
        ))
        .send(&make_service(availability))
        .await;

        let body: BookedNightsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.nights, vec!["2030-06-02", "2030-06-03"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_from_defaults_to_today() -> TestResult {
        let mut availability = MockAvailabilityService::new();

        availability
            .expect_list_booked_nights()
            .once()
            .withf(|_, from| *from == today())
            .return_once(|_, _| Ok(BTreeSet::new()));

        let res = TestClient::get(format!(
            "http://example.com/apartments/{}/booked-nights",
            ApartmentUuid::new()
        ))
        .send(&make_service(availability))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
