//! Storefront domain services, persistence and upstream gateway.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod gateway;
pub mod money;

#[cfg(test)]
mod test;

mod uuids;
