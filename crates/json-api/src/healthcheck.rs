//! Healthcheck

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Answer for load balancers and uptime monitors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving requests
    pub status: String,

    /// Build version of the storefront API
    pub version: String,
}

/// Healthcheck
///
/// Touches no backing service, so it stays green while the content backend is down.
#[endpoint(tags("health"), summary = "Storefront liveness")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
