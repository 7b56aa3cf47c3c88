//! Create Admin Session Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::cookie::{Cookie, SameSite},
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{auth::ADMIN_SESSION_COOKIE, extensions::*, state::State};

/// Admin Login Request
#[derive(Deserialize, ToSchema)]
pub(crate) struct CreateSessionRequest {
    /// The admin passphrase
    pub passphrase: String,
}

impl std::fmt::Debug for CreateSessionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateSessionRequest").finish_non_exhaustive()
    }
}

/// Admin Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionResponse {
    pub success: bool,

    /// When the session stops being accepted
    pub expires_at: String,
}

/// Exchange the admin passphrase for a session cookie.
#[endpoint(
    tags("admin"),
    summary = "Create Admin Session",
    responses(
        (status_code = StatusCode::OK, description = "Session created"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid passphrase"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateSessionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let session = state
        .app
        .sessions
        .login(&json.into_inner().passphrase, Timestamp::now())
        .map_err(|error| {
            warn!(reason = %error, "admin login rejected");

            StatusError::unauthorized().brief("Invalid passphrase")
        })?;

    res.add_cookie(
        Cookie::build((ADMIN_SESSION_COOKIE, session.token))
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Strict)
            .path("/")
            .build(),
    );

    info!(expires_at = %session.expires_at, "admin session issued");

    Ok(Json(SessionResponse {
        success: true,
        expires_at: session.expires_at.to_string(),
    }))
}
