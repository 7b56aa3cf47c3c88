//! Cart Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::domain::{
    carts::{CartError, CartsServiceError},
    checkout::CheckoutError,
};

use crate::orders::errors::into_status_error as order_status_error;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::Cart(CartError::InvalidQuantity) => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        CartsServiceError::Cart(CartError::QuantityOverflow) => {
            StatusError::bad_request().brief("Quantity is too large")
        }
        CartsServiceError::Cart(CartError::ItemNotFound) => {
            StatusError::not_found().brief("Cart item not found")
        }
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::ProductUnavailable => {
            StatusError::bad_request().brief("Product is not available for purchase")
        }
        CartsServiceError::Conflict => {
            StatusError::conflict().brief("Cart was modified, please retry")
        }
        CartsServiceError::Products(source) => {
            error!("cart product lookup failed: {source}");

            StatusError::internal_server_error().brief("Failed to update cart")
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error().brief("Failed to update cart")
        }
    }
}

pub(crate) fn checkout_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutError::OutOfStock(unavailable) => {
            warn!(products = unavailable.len(), "checkout blocked by stock");

            StatusError::bad_request().brief("Some items are out of stock")
        }
        CheckoutError::Carts(source) => into_status_error(source),
        CheckoutError::Orders(source) => order_status_error(source),
        CheckoutError::Products(source) => {
            error!("checkout stock lookup failed: {source}");

            StatusError::internal_server_error().brief("Failed to process checkout")
        }
    }
}
