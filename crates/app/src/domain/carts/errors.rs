//! Cart errors.

use thiserror::Error;

use crate::domain::products::ProductsServiceError;

/// Rejected cart mutation. The cart is unchanged when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("quantity is too large")]
    QuantityOverflow,

    #[error("cart item not found")]
    ItemNotFound,
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("product not found")]
    ProductNotFound,

    #[error("product is not available for purchase")]
    ProductUnavailable,

    #[error("failed to look up product")]
    Products(#[source] ProductsServiceError),

    /// The cart kept changing between load and save.
    #[error("cart was modified concurrently")]
    Conflict,

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
