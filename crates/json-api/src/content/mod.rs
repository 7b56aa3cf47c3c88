//! Content
//!
//! Read-only site content (testimonials, languages and page blocks) held by the content
//! backend.

mod handlers;

pub(crate) use handlers::*;
