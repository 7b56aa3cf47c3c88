//! Blog
//!
//! Read-only views of posts held by the content backend.

mod handlers;

pub(crate) use handlers::*;
