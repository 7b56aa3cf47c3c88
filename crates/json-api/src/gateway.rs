//! Shared plumbing for routes forwarded to the content backend.

use salvo::{http::StatusCode, prelude::*};
use tracing::{error, warn};

use storefront_app::gateway::{GatewayError, WriteAuth};

use crate::auth::credentials::{AUTH_TOKEN_COOKIE, cookie_or_bearer};

/// Query parameters to forward verbatim, repeated keys included.
pub(crate) fn forwarded_query(req: &Request) -> Vec<(String, String)> {
    req.queries()
        .iter_all()
        .flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.clone(), value.clone()))
        })
        .collect()
}

/// Credentials for a backend write.
pub(crate) fn write_auth(req: &Request, allow_api_key: bool) -> WriteAuth {
    WriteAuth {
        token: cookie_or_bearer(req, AUTH_TOKEN_COOKIE),
        allow_api_key,
    }
}

/// Reject a token-only write before contacting the backend.
pub(crate) fn require_token(auth: &WriteAuth) -> Result<(), StatusError> {
    if auth.token.is_none() {
        return Err(StatusError::unauthorized().brief("Authentication required"));
    }

    Ok(())
}

/// Map a gateway failure onto the `{ "error": ... }` envelope, keeping backend statuses.
pub(crate) fn into_status_error(error: &GatewayError, default: &str) -> StatusError {
    match error {
        GatewayError::Transport(source) => error!("content backend request failed: {source}"),
        GatewayError::Upstream { status, .. } => warn!(status, "content backend rejected request"),
        GatewayError::Unauthenticated | GatewayError::AssetNotFound | GatewayError::InvalidPath => {}
    }

    let code = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    StatusError::from_code(code)
        .unwrap_or_else(StatusError::internal_server_error)
        .brief(error.message_or(default))
}
