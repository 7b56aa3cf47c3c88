//! Update Media Item Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use storefront_app::gateway::WriteMethod;

use crate::{
    extensions::*,
    gateway::{into_status_error, require_token, write_auth},
    media::handlers::get::media_id,
    state::State,
};

/// Update Media Item Handler
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let auth = write_auth(req, false);

    require_token(&auth)?;

    let id = media_id(req)?;

    let body = req
        .parse_json::<Value>()
        .await
        .or_400("Request body must be JSON")?;

    let updated = state
        .app
        .gateway
        .write_json(WriteMethod::Put, &format!("/api/media/{id}"), auth, Some(body))
        .await
        .map_err(|error| into_status_error(&error, "Failed to update media"))?;

    Ok(Json(updated))
}
