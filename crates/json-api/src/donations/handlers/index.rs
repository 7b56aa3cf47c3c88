//! Donation Index Handler

use std::sync::Arc;

use salvo::{oapi::ToParameters, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::donations::{data::DonationFilter, records::DonationStatus};

use crate::{
    donations::{
        errors::into_status_error,
        handlers::stats::current_stats,
        models::{DayBound, DonationResponse, StatsEnvelope, parse_bound},
    },
    extensions::*,
    state::State,
};

/// Donation listing filters.
#[derive(Debug, Deserialize, ToParameters)]
#[serde(rename_all = "camelCase")]
#[salvo(parameters(rename_all = "camelCase", default_parameter_in = Query))]
pub(crate) struct DonationsQuery {
    /// `stats` returns fundraising progress instead of a listing
    #[serde(rename = "type")]
    #[salvo(parameter(rename = "type"))]
    pub kind: Option<String>,

    pub status: Option<String>,

    pub email: Option<String>,

    /// Earliest creation time, RFC 3339 or `YYYY-MM-DD`
    pub created_from: Option<String>,

    /// Latest creation time, RFC 3339 or `YYYY-MM-DD`
    pub created_to: Option<String>,

    pub limit: Option<u32>,
}

impl DonationsQuery {
    fn wants_stats(&self) -> bool {
        self.kind.as_deref() == Some("stats")
    }

    fn into_filter(self) -> Result<DonationFilter, StatusError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<DonationStatus>)
            .transpose()
            .or_400("Invalid donation status")?;

        Ok(DonationFilter {
            status,
            email: self.email.filter(|email| !email.trim().is_empty()),
            created_from: self
                .created_from
                .as_deref()
                .map(|value| parse_bound(value, DayBound::Start))
                .transpose()?,
            created_to: self
                .created_to
                .as_deref()
                .map(|value| parse_bound(value, DayBound::End))
                .transpose()?,
            limit: self.limit.unwrap_or(DonationFilter::DEFAULT_LIMIT),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DonationsResponse {
    /// Matching donations, newest first
    pub donations: Vec<DonationResponse>,
}

/// Either a donation listing or, with `?type=stats`, fundraising progress.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum DonationIndexResponse {
    Stats(StatsEnvelope),
    Donations(DonationsResponse),
}

/// Donation Index Handler
///
/// Listing donations requires an admin session. `?type=stats` is public.
#[endpoint(
    tags("donations"),
    summary = "List Donations",
    responses(
        (status_code = StatusCode::OK, description = "Donations listed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filter"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not an admin"),
    ),
)]
pub(crate) async fn handler(
    query: DonationsQuery,
    depot: &mut Depot,
) -> Result<Json<DonationIndexResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    if query.wants_stats() {
        return Ok(Json(DonationIndexResponse::Stats(
            current_stats(&state.app).await,
        )));
    }

    if !depot.access_scope().is_admin() {
        return Err(StatusError::unauthorized().brief("Authentication required"));
    }

    let donations = state
        .app
        .donations
        .list_donations(query.into_filter()?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(DonationIndexResponse::Donations(DonationsResponse {
        donations: donations.into_iter().map(Into::into).collect(),
    })))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::donations::{
            MockDonationsService, data::DonationStats, records::DonationUuid,
        },
    };

    use crate::{
        auth::middleware::detect_admin,
        test_helpers::{admin_token, make_donation, service, test_app},
    };

    use super::*;

    fn make_service(donations: MockDonationsService) -> Service {
        service(
            AppContext {
                donations: Arc::new(donations),
                ..test_app()
            },
            Router::with_path("donations").hoop(detect_admin).get(handler),
        )
    }

    #[tokio::test]
    async fn test_public_stats_query() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_stats()
            .once()
            .return_once(|| Ok(DonationStats::empty()));
        donations.expect_list_donations().never();

        let mut res = TestClient::get("http://example.com/donations?type=stats")
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: serde_json::Value = res.take_json().await?;

        assert!(body["stats"]["summary"].is_object());

        Ok(())
    }

    #[tokio::test]
    async fn test_public_listing_returns_401() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations.expect_list_donations().never();

        let mut res = TestClient::get("http://example.com/donations")
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Authentication required" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_listing_applies_filters() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_list_donations()
            .once()
            .withf(|filter| {
                filter.status == Some(DonationStatus::Completed)
                    && filter.email.as_deref() == Some("donor@example.org")
                    && filter.created_from.is_some()
                    && filter.created_to.is_none()
                    && filter.limit == 5
            })
            .return_once(|_| {
                Ok(vec![make_donation(DonationUuid::new(), DonationStatus::Completed)])
            });

        let body: serde_json::Value = TestClient::get(
            "http://example.com/donations?status=completed&email=donor@example.org&createdFrom=2026-01-01&limit=5",
        )
        .add_header("authorization", format!("Bearer {}", admin_token()?), true)
        .send(&make_service(donations))
        .await
        .take_json()
        .await?;

        assert_eq!(body["donations"][0]["status"], json!("completed"));
        assert_eq!(body["donations"][0]["confirmationNumber"], json!("DON-LOYW3V28-QX7RT"));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_listing_rejects_unknown_status() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations.expect_list_donations().never();

        let res = TestClient::get("http://example.com/donations?status=lost")
            .add_header("authorization", format!("Bearer {}", admin_token()?), true)
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
