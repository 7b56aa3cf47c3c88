//! Update Donation Status Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::Deserialize;
use tracing::{Span, info};

use storefront_app::domain::donations::{
    data::{DonationLookup, DonationStatusUpdate, DonationValidationError},
    records::DonationStatus,
};

use crate::{
    donations::{errors::into_status_error, models::DonationEnvelope},
    extensions::*,
    state::State,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateDonationRequest {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl UpdateDonationRequest {
    fn into_update(self) -> Result<DonationStatusUpdate, StatusError> {
        let status = self.status.filter(|status| !status.trim().is_empty()).ok_or_else(|| {
            StatusError::bad_request().brief(DonationValidationError::MissingStatus.to_string())
        })?;

        Ok(DonationStatusUpdate {
            status: status
                .parse::<DonationStatus>()
                .or_400("Invalid donation status")?,
            transaction_id: self.transaction_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

/// Update Donation Status Handler
///
/// Completing a donation stamps its completion time.
#[endpoint(
    tags("donations"),
    summary = "Update Donation Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Donation updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid status or transition"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not an admin"),
        (status_code = StatusCode::NOT_FOUND, description = "Donation not found"),
        (status_code = StatusCode::CONFLICT, description = "Concurrent modification"),
    ),
)]
#[tracing::instrument(
    name = "donations.update",
    skip(id, json, depot),
    fields(donation = tracing::field::Empty, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateDonationRequest>,
    depot: &mut Depot,
) -> Result<Json<DonationEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let lookup = DonationLookup::parse(&id.into_inner());
    let update = json.into_inner().into_update()?;

    let span = Span::current();

    span.record("donation", tracing::field::display(&lookup));
    span.record("status", update.status.as_str());

    let donation = state
        .app
        .donations
        .update_status(lookup, update)
        .await
        .map_err(into_status_error)?;

    info!(
        confirmation_number = %donation.confirmation_number,
        status = %donation.status,
        "donation status updated"
    );

    Ok(Json(DonationEnvelope {
        donation: donation.into(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::donations::{
            MockDonationsService,
            records::{DonationUuid, InvalidDonationTransition},
        },
    };

    use crate::test_helpers::{make_donation, service, test_app};

    use super::*;

    fn make_service(donations: MockDonationsService) -> Service {
        service(
            AppContext {
                donations: Arc::new(donations),
                ..test_app()
            },
            Router::with_path("donations/{id}").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_complete_donation() -> TestResult {
        let uuid = DonationUuid::new();
        let mut donations = MockDonationsService::new();

        donations
            .expect_update_status()
            .once()
            .withf(move |lookup, update| {
                *lookup == DonationLookup::Uuid(uuid)
                    && update.status == DonationStatus::Completed
                    && update.transaction_id.as_deref() == Some("txn_1")
            })
            .return_once(move |_, _| {
                let mut donation = make_donation(uuid, DonationStatus::Completed);

                donation.transaction_id = Some("txn_1".to_string());
                donation.completed_at = Some(Timestamp::UNIX_EPOCH);

                Ok(donation)
            });

        let body: serde_json::Value =
            TestClient::patch(format!("http://example.com/donations/{uuid}"))
                .json(&json!({ "status": "completed", "transactionId": "txn_1" }))
                .send(&make_service(donations))
                .await
                .take_json()
                .await?;

        assert_eq!(body["donation"]["status"], json!("completed"));
        assert_eq!(body["donation"]["transactionId"], json!("txn_1"));
        assert!(body["donation"]["completedAt"].is_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_status_returns_400() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations.expect_update_status().never();

        let mut res = TestClient::patch("http://example.com/donations/DON-1")
            .json(&json!({}))
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Status is required" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_transition_returns_400() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations.expect_update_status().once().return_once(|_, _| {
            Err(InvalidDonationTransition {
                from: DonationStatus::Failed,
                to: DonationStatus::Completed,
            }
            .into())
        });

        let res = TestClient::patch("http://example.com/donations/DON-1")
            .json(&json!({ "status": "completed" }))
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
