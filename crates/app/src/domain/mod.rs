//! Storefront Domain Concerns

pub mod carts;
pub mod checkout;
pub mod donations;
pub mod orders;
pub mod products;
