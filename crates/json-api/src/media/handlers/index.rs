//! Media Index Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use crate::{extensions::*, gateway::into_status_error, state::State};

const DEFAULT_LIMIT: &str = "50";
const DEFAULT_OFFSET: &str = "0";

fn media_query(req: &Request) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(4);

    for key in ["search", "type"] {
        if let Some(value) = req.query::<String>(key).filter(|value| !value.is_empty()) {
            query.push((key.to_string(), value));
        }
    }

    let limit = req.query::<String>("limit");
    let offset = req.query::<String>("offset");

    query.push((
        "limit".to_string(),
        limit.unwrap_or_else(|| DEFAULT_LIMIT.to_string()),
    ));
    query.push((
        "offset".to_string(),
        offset.unwrap_or_else(|| DEFAULT_OFFSET.to_string()),
    ));

    query
}

/// Media Index Handler
///
/// Forwards `search`, `type`, `limit` (default 50) and `offset` (default 0).
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let media = state
        .app
        .gateway
        .fetch_json("/api/media", media_query(req))
        .await
        .map_err(|error| into_status_error(&error, "Failed to fetch media"))?;

    Ok(Json(media))
}
