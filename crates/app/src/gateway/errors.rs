//! Gateway errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No bearer token, and no API key fallback for this route.
    #[error("Authentication required")]
    Unauthenticated,

    /// The backend answered with a non-success status.
    #[error("upstream returned status {status}")]
    Upstream { status: u16, message: Option<String> },

    #[error("asset not found")]
    AssetNotFound,

    #[error("invalid asset path")]
    InvalidPath,

    #[error("upstream request failed")]
    Transport(#[from] reqwest::Error),
}

impl GatewayError {
    /// HTTP status to answer with. Backend statuses are preserved when they are error
    /// statuses; anything else collapses to 500.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Upstream { status, .. } if (400..=599).contains(status) => *status,
            Self::AssetNotFound => 404,
            Self::InvalidPath => 400,
            Self::Upstream { .. } | Self::Transport(_) => 500,
        }
    }

    /// The message for the `{ "error": ... }` envelope, preferring the backend's own message
    /// and falling back to the route's default.
    #[must_use]
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self {
            Self::Unauthenticated => "Authentication required",
            Self::AssetNotFound => "Image not found",
            Self::InvalidPath => "Invalid image path",
            Self::Upstream {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message,
            Self::Upstream { .. } | Self::Transport(_) => default,
        }
    }
}
