//! Media
//!
//! Media library routes forwarded to the content backend, plus a caching image proxy.

mod handlers;

pub(crate) use handlers::*;
