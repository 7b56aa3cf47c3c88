//! Admin Config

use clap::Args;
use jiff::SignedDuration;

use storefront_app::auth::{AdminSessionError, AdminSessions};

/// Admin session settings.
#[derive(Debug, Args)]
pub struct AdminConfig {
    /// Secret used to sign admin session tokens (at least 32 bytes)
    #[arg(long, env = "ADMIN_SESSION_SECRET", hide_env_values = true)]
    pub admin_session_secret: String,

    /// BLAKE3 hex digest of the admin passphrase
    #[arg(long, env = "ADMIN_PASSPHRASE_HASH", hide_env_values = true)]
    pub admin_passphrase_hash: String,

    /// Admin session lifetime in hours
    #[arg(
        long = "admin-session-ttl-hours",
        env = "ADMIN_SESSION_TTL_HOURS",
        default_value_t = 24_i64
    )]
    pub session_ttl_hours: i64,
}

impl AdminConfig {
    /// Build the session signer.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is too short, the hash is malformed or the lifetime
    /// is not positive.
    pub fn sessions(&self) -> Result<AdminSessions, AdminSessionError> {
        let ttl = self
            .session_ttl_hours
            .checked_mul(3600)
            .map(SignedDuration::from_secs)
            .ok_or(AdminSessionError::InvalidLifetime)?;

        AdminSessions::new(
            self.admin_session_secret.as_bytes(),
            &self.admin_passphrase_hash,
            ttl,
        )
    }
}
