//! Get Blog Post Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use crate::{
    extensions::*,
    gateway::{forwarded_query, into_status_error},
    state::State,
};

/// Get Blog Post Handler
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let slug = req
        .param::<String>("slug")
        .filter(|slug| !slug.is_empty())
        .ok_or_else(|| StatusError::bad_request().brief("Post slug is required"))?;

    let post = state
        .app
        .gateway
        .fetch_json(&format!("/api/blog/slug/{slug}"), forwarded_query(req))
        .await
        .map_err(|error| into_status_error(&error, "Failed to fetch blog post"))?;

    Ok(Json(post))
}
