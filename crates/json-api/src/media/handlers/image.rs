//! Media Image Proxy Handler

use std::sync::Arc;

use salvo::{
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    prelude::*,
};

use crate::{extensions::*, gateway::into_status_error, state::State};

const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Media Image Proxy Handler
///
/// Streams an image from the backend with long-lived cache headers.
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let path = req.param::<String>("path").unwrap_or_default();

    let asset = state
        .app
        .gateway
        .fetch_asset(&path)
        .await
        .map_err(|error| into_status_error(&error, "Image not found"))?;

    res.add_header(CONTENT_TYPE, asset.content_type, true)
        .or_500("failed to set content type")?
        .add_header(CACHE_CONTROL, IMMUTABLE, true)
        .or_500("failed to set cache control")?
        .write_body(asset.body)
        .or_500("failed to write image body")?;

    Ok(())
}
