//! Carts

pub(crate) mod errors;
mod handlers;
pub(crate) mod items;
pub(crate) mod models;
pub(crate) mod session;

pub(crate) use handlers::*;
