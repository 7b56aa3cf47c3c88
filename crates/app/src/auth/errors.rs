//! Admin session errors.

use thiserror::Error;

use crate::auth::SessionTokenError;

#[derive(Debug, Error)]
pub enum AdminSessionError {
    #[error("invalid passphrase")]
    InvalidCredentials,

    #[error("session token is malformed")]
    Malformed(#[from] SessionTokenError),

    #[error("session token signature does not match")]
    Forged,

    #[error("session token has expired")]
    Expired,

    #[error("session secret must be at least {min} bytes", min = crate::auth::MIN_SECRET_BYTES)]
    WeakSecret,

    #[error("passphrase hash must be a 64 character BLAKE3 hex digest")]
    InvalidPassphraseHash,

    #[error("session lifetime is out of range")]
    InvalidLifetime,
}

impl AdminSessionError {
    /// Whether the caller presented a bad credential, as opposed to the server being
    /// misconfigured.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::Malformed(_) | Self::Forged | Self::Expired
        )
    }
}
