//! Donation Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::donations::DonationsServiceError;

pub(crate) fn into_status_error(error: DonationsServiceError) -> StatusError {
    match error {
        DonationsServiceError::Validation(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        DonationsServiceError::InvalidTransition(source) => {
            StatusError::bad_request().brief(format!("Invalid status transition: {source}"))
        }
        DonationsServiceError::NotFound => StatusError::not_found().brief("Donation not found"),
        DonationsServiceError::Conflict => {
            StatusError::conflict().brief("Donation was modified concurrently, please retry")
        }
        DonationsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Donation already exists")
        }
        DonationsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid donation data")
        }
        DonationsServiceError::Sql(source) => {
            error!("donation storage error: {source}");

            StatusError::internal_server_error().brief("Failed to process donation")
        }
    }
}
