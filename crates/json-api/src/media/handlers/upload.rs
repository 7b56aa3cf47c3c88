//! Media Upload Handler

use std::sync::Arc;

use salvo::{http::header::CONTENT_TYPE, prelude::*};
use serde_json::Value;
use tracing::info;

use crate::{
    extensions::*,
    gateway::{into_status_error, write_auth},
    state::State,
};

/// Uploads larger than this are rejected before reaching the backend.
pub(crate) const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Media Upload Handler
///
/// Forwards the multipart body untouched. Without a bearer token the configured media API
/// key is used. The credential is settled before the body is read, so anonymous callers get
/// a 401 whatever they send.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let auth = write_auth(req, true);

    state
        .app
        .gateway
        .credential(&auth)
        .map_err(|error| into_status_error(&error, "Upload failed"))?;

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| StatusError::bad_request().brief("Content type is required"))?
        .to_string();

    let body = req
        .payload_with_max_size(MAX_UPLOAD_BYTES)
        .await
        .or_400("Upload is too large or unreadable")?
        .clone();

    let bytes = body.len();

    let uploaded = state
        .app
        .gateway
        .upload("/api/media/upload", auth, content_type, body)
        .await
        .map_err(|error| into_status_error(&error, "Upload failed"))?;

    info!(bytes, "media uploaded");

    Ok(Json(uploaded))
}
