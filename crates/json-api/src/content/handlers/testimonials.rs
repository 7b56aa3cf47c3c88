//! Testimonials Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use crate::{
    extensions::*,
    gateway::{forwarded_query, into_status_error},
    state::State,
};

/// Testimonials Handler
///
/// Query parameters such as `active_only` and `language` are passed through.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let testimonials = state
        .app
        .gateway
        .fetch_json("/api/content/testimonials", forwarded_query(req))
        .await
        .map_err(|error| into_status_error(&error, "Failed to fetch testimonials"))?;

    Ok(Json(testimonials))
}
