//! Donation Stats Handler

use std::sync::Arc;

use salvo::prelude::*;
use tracing::error;

use storefront_app::{context::AppContext, domain::donations::data::DonationStats};

use crate::{donations::models::StatsEnvelope, extensions::*, state::State};

/// Fundraising progress. Falls back to zeroed statistics when the aggregate fails.
pub(crate) async fn current_stats(app: &AppContext) -> StatsEnvelope {
    let stats = match app.donations.stats().await {
        Ok(stats) => stats,
        Err(error) => {
            error!("failed to aggregate donation stats: {error}");

            DonationStats::empty()
        }
    };

    StatsEnvelope {
        stats: stats.into(),
    }
}

/// Donation Stats Handler
#[endpoint(
    tags("donations"),
    summary = "Donation Stats",
    responses(
        (status_code = StatusCode::OK, description = "Fundraising progress per category"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<StatsEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(current_stats(&state.app).await))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::donations::{DonationsServiceError, MockDonationsService};

    use crate::test_helpers::{service, test_app};

    use super::*;

    fn make_service(donations: MockDonationsService) -> Service {
        service(
            AppContext {
                donations: Arc::new(donations),
                ..test_app()
            },
            Router::with_path("donations/stats").get(handler),
        )
    }

    #[tokio::test]
    async fn test_stats_are_rendered() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_stats()
            .once()
            .return_once(|| Ok(DonationStats::empty()));

        let body: serde_json::Value = TestClient::get("http://example.com/donations/stats")
            .send(&make_service(donations))
            .await
            .take_json()
            .await?;

        assert_eq!(body["stats"]["categories"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["stats"]["summary"]["totalRaised"], json!(0.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_stats_failure_degrades_to_zeroes() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_stats()
            .once()
            .return_once(|| Err(DonationsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let mut res = TestClient::get("http://example.com/donations/stats")
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body["stats"]["summary"]["totalDonors"], json!(0));
        assert_eq!(body["stats"]["summary"]["percentageComplete"], json!(0.0));

        Ok(())
    }
}
