//! Checkout errors.

use thiserror::Error;

use crate::domain::{
    carts::CartsServiceError, orders::OrdersServiceError, products::ProductsServiceError,
    products::stock::StockCheck,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    /// The unavailable products, one entry per product.
    #[error("Some items are out of stock")]
    OutOfStock(Vec<StockCheck>),

    #[error(transparent)]
    Carts(#[from] CartsServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),

    #[error(transparent)]
    Products(#[from] ProductsServiceError),
}
