//! Delete Media Item Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;
use tracing::info;

use storefront_app::gateway::WriteMethod;

use crate::{
    extensions::*,
    gateway::{into_status_error, require_token, write_auth},
    media::handlers::get::media_id,
    state::State,
};

/// Delete Media Item Handler
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let auth = write_auth(req, false);

    require_token(&auth)?;

    let id = media_id(req)?;

    let deleted = state
        .app
        .gateway
        .write_json(WriteMethod::Delete, &format!("/api/media/{id}"), auth, None)
        .await
        .map_err(|error| into_status_error(&error, "Failed to delete media"))?;

    info!(media_id = %id, "media deleted");

    Ok(Json(deleted))
}
