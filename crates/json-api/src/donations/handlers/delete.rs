//! Delete Donation Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use storefront_app::domain::donations::data::DonationLookup;

use crate::{
    donations::{errors::into_status_error, models::DonationResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DonationDeletedResponse {
    pub success: bool,
    pub donation: DonationResponse,
}

/// Delete Donation Handler
#[endpoint(
    tags("donations"),
    summary = "Delete Donation",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Donation deleted"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not an admin"),
        (status_code = StatusCode::NOT_FOUND, description = "Donation not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<DonationDeletedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let donation = state
        .app
        .donations
        .delete_donation(DonationLookup::parse(&id.into_inner()))
        .await
        .map_err(into_status_error)?;

    info!(confirmation_number = %donation.confirmation_number, "donation deleted");

    Ok(Json(DonationDeletedResponse {
        success: true,
        donation: donation.into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::donations::{
            DonationsServiceError, MockDonationsService,
            records::{DonationStatus, DonationUuid},
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
            Router::with_path("donations/{id}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_donation() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_delete_donation()
            .once()
            .return_once(|_| Ok(make_donation(DonationUuid::new(), DonationStatus::Failed)));

        let body: serde_json::Value = TestClient::delete("http://example.com/donations/DON-1")
            .send(&make_service(donations))
            .await
            .take_json()
            .await?;

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["donation"]["status"], json!("failed"));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_donation_returns_404() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_delete_donation()
            .once()
            .return_once(|_| Err(DonationsServiceError::NotFound));

        let res = TestClient::delete("http://example.com/donations/DON-404")
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
