//! Carts

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;
pub mod store;

pub use errors::{CartError, CartsServiceError};
pub use service::*;
