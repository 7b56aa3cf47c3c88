//! Create Donation Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use storefront_app::{
    domain::donations::{
        data::NewDonation,
        records::{DonationType, Donor, PaymentMethod},
    },
    money,
};

use crate::{
    donations::{errors::into_status_error, models::DonationResponse},
    extensions::*,
    state::State,
};

/// Donation pledge. The donor's details sit alongside the amount.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CreateDonationRequest {
    /// Amount in major units
    pub amount: Option<f64>,

    /// `one-time` (default) or `monthly`
    pub donation_type: Option<String>,

    /// `card` (default), `paypal` or `bank`
    pub payment_method: Option<String>,

    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub is_anonymous: bool,

    /// Category ids the amount is split across
    pub categories: Vec<String>,

    pub payment_intent_id: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl CreateDonationRequest {
    fn into_new_donation(self) -> Result<NewDonation, StatusError> {
        let amount = match self.amount {
            Some(amount) => money::to_cents(amount).or_400("Invalid donation amount")?,
            None => 0,
        };

        let donation_type = self
            .donation_type
            .as_deref()
            .map(str::parse::<DonationType>)
            .transpose()
            .or_400("Invalid donation type")?
            .unwrap_or_default();

        let payment_method = self
            .payment_method
            .as_deref()
            .map(str::parse::<PaymentMethod>)
            .transpose()
            .or_400("Invalid payment method")?
            .unwrap_or_default();

        Ok(NewDonation {
            amount,
            donation_type,
            payment_method,
            donor: Donor {
                email: self.email,
                first_name: non_blank(self.first_name),
                last_name: non_blank(self.last_name),
                phone: non_blank(self.phone),
                is_anonymous: self.is_anonymous,
            },
            categories: self.categories,
            payment_intent_id: non_blank(self.payment_intent_id),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DonationCreatedResponse {
    pub success: bool,
    pub donation: DonationResponse,
}

/// Create Donation Handler
///
/// Records a `pending` donation and splits it evenly across the chosen categories.
#[endpoint(
    tags("donations"),
    summary = "Create Donation",
    responses(
        (status_code = StatusCode::CREATED, description = "Donation recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing fields or unknown category"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateDonationRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DonationCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let donation = state
        .app
        .donations
        .create_donation(json.into_inner().into_new_donation()?)
        .await
        .map_err(into_status_error)?;

    info!(
        confirmation_number = %donation.confirmation_number,
        amount = donation.amount,
        "donation recorded"
    );

    res.status_code(StatusCode::CREATED);

    Ok(Json(DonationCreatedResponse {
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
            MockDonationsService,
            data::DonationValidationError,
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
            Router::with_path("donations").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_donation_returns_201() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_create_donation()
            .once()
            .withf(|donation| {
                donation.amount == 10_000
                    && donation.donation_type == DonationType::Monthly
                    && donation.payment_method == PaymentMethod::Card
                    && donation.donor.email == "donor@example.org"
                    && donation.categories == ["fws"]
            })
            .return_once(|_| Ok(make_donation(DonationUuid::new(), DonationStatus::Pending)));

        let mut res = TestClient::post("http://example.com/donations")
            .json(&json!({
                "amount": 100,
                "donationType": "monthly",
                "email": "donor@example.org",
                "firstName": "Grace",
                "categories": ["fws"]
            }))
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["donation"]["status"], json!("pending"));
        assert_eq!(body["donation"]["amount"], json!(100.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_surface_the_domain_message() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations
            .expect_create_donation()
            .once()
            .withf(|donation| donation.amount == 0)
            .return_once(|_| Err(DonationValidationError::MissingRequiredFields.into()));

        let mut res = TestClient::post("http://example.com/donations")
            .json(&json!({ "email": "donor@example.org", "categories": ["fws"] }))
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Missing required fields" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_method_is_rejected() -> TestResult {
        let mut donations = MockDonationsService::new();

        donations.expect_create_donation().never();

        let res = TestClient::post("http://example.com/donations")
            .json(&json!({
                "amount": 10,
                "paymentMethod": "barter",
                "email": "donor@example.org",
                "categories": ["fws"]
            }))
            .send(&make_service(donations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
