//! Media Upload URL Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use storefront_app::gateway::WriteMethod;

use crate::{
    extensions::*,
    gateway::{into_status_error, require_token, write_auth},
    state::State,
};

/// Media Upload URL Handler
///
/// Asks the backend to import a remote file.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let auth = write_auth(req, false);

    require_token(&auth)?;

    let body = req
        .parse_json::<Value>()
        .await
        .or_400("Request body must be JSON")?;

    let uploaded = state
        .app
        .gateway
        .write_json(WriteMethod::Post, "/api/media/upload-url", auth, Some(body))
        .await
        .map_err(|error| into_status_error(&error, "Upload failed"))?;

    Ok(Json(uploaded))
}
