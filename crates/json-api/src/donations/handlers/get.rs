//! Get Donation Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront_app::domain::donations::data::DonationLookup;

use crate::{
    donations::{errors::into_status_error, models::DonationEnvelope},
    extensions::*,
    state::State,
};

/// Get Donation Handler
///
/// The id may be a uuid or a confirmation number.
#[endpoint(
    tags("donations"),
    summary = "Get Donation",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Donation found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not an admin"),
        (status_code = StatusCode::NOT_FOUND, description = "Donation not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<DonationEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let donation = state
        .app
        .donations
        .get_donation(DonationLookup::parse(&id.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(DonationEnvelope {
        donation: donation.into(),
    }))
}
