//! Blog Index Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use crate::{
    extensions::*,
    gateway::{forwarded_query, into_status_error},
    state::State,
};

/// Blog Index Handler
///
/// Lists posts. Query parameters are passed to the backend unchanged.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let posts = state
        .app
        .gateway
        .fetch_json("/api/blog", forwarded_query(req))
        .await
        .map_err(|error| into_status_error(&error, "Failed to fetch blog posts"))?;

    Ok(Json(posts))
}
