//! Get Media Item Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use crate::{
    extensions::*,
    gateway::{forwarded_query, into_status_error},
    state::State,
};

pub(crate) fn media_id(req: &Request) -> Result<String, StatusError> {
    req.param::<String>("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StatusError::bad_request().brief("Media id is required"))
}

/// Get Media Item Handler
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let id = media_id(req)?;

    let item = state
        .app
        .gateway
        .fetch_json(&format!("/api/media/{id}"), forwarded_query(req))
        .await
        .map_err(|error| into_status_error(&error, "Failed to fetch media item"))?;

    Ok(Json(item))
}
