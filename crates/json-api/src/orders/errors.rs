//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Validation(source) => StatusError::bad_request().brief(source.to_string()),
        OrdersServiceError::InvalidTransition(source) => {
            StatusError::bad_request().brief(format!("Invalid status transition: {source}"))
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Conflict => {
            StatusError::conflict().brief("Order was modified concurrently, please retry")
        }
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidData => StatusError::bad_request().brief("Invalid order data"),
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error().brief("Failed to process order")
        }
    }
}
