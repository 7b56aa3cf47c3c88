//! Product Handlers

pub(crate) mod check_stock;
pub(crate) mod get;
pub(crate) mod index;
