//! Admin authentication

pub(crate) mod credentials;
pub(crate) mod handlers;
pub(crate) mod middleware;

pub(crate) use credentials::ADMIN_SESSION_COOKIE;
