//! Error envelope

use salvo::{
    http::{ResBody, StatusCode},
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Human readable message
    pub error: String,
}

/// Catcher hoop rewriting error responses into `{ "error": <message> }`.
///
/// Handlers attach a message with `StatusError::brief`; errors raised without one (and
/// unmatched routes) fall back to the status' canonical reason.
#[handler]
pub(crate) async fn json_envelope(res: &mut Response, ctrl: &mut FlowCtrl) {
    let Some(status) = res.status_code else {
        return;
    };

    if !status.is_client_error() && !status.is_server_error() {
        return;
    }

    let message = match res.take_body() {
        ResBody::Error(error) => message_for(&error),
        _ => canonical_reason(status),
    };

    res.render(Json(ErrorResponse { error: message }));

    ctrl.skip_rest();
}

fn message_for(error: &StatusError) -> String {
    let unchanged = StatusError::from_code(error.code)
        .is_some_and(|default| default.brief == error.brief);

    if unchanged || error.brief.trim().is_empty() {
        canonical_reason(error.code)
    } else {
        error.brief.clone()
    }
}

fn canonical_reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Error").to_string()
}
