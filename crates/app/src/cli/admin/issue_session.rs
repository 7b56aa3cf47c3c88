use clap::Args;
use jiff::{SignedDuration, Timestamp};
use storefront_app::auth::AdminSessions;

#[derive(Debug, Args)]
pub(crate) struct IssueSessionArgs {
    /// Secret used to sign admin sessions
    #[arg(long, env = "ADMIN_SESSION_SECRET", hide_env_values = true)]
    secret: String,

    /// BLAKE3 hex digest of the admin passphrase
    #[arg(long, env = "ADMIN_PASSPHRASE_HASH", hide_env_values = true)]
    passphrase_hash: String,

    /// Session lifetime in hours
    #[arg(long, env = "ADMIN_SESSION_TTL_HOURS", default_value_t = 24)]
    ttl_hours: i64,
}

pub(crate) fn run(args: &IssueSessionArgs) -> Result<(), String> {
    let ttl = args
        .ttl_hours
        .checked_mul(3600)
        .map(SignedDuration::from_secs)
        .ok_or_else(|| "ttl_hours is out of range".to_string())?;

    let sessions = AdminSessions::new(args.secret.as_bytes(), &args.passphrase_hash, ttl)
    .map_err(|error| format!("invalid admin session settings: {error}"))?;

    let session = sessions
        .issue(Timestamp::now())
        .map_err(|error| format!("failed to issue session: {error}"))?;

    println!("token: {}", session.token);
    println!("expires_at: {}", session.expires_at);

    Ok(())
}
