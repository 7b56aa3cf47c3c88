//! Listener Config

use std::time::Duration;

use clap::Args;

/// Where the storefront API listens and how long it drains on shutdown.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// Interface the storefront API binds to
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the storefront API listens on
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 3000_u16)]
    pub port: u16,

    /// Seconds to let in-flight checkouts and uploads finish after a stop signal
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 15_u64)]
    pub shutdown_grace_secs: u64,
}

impl ServerRuntimeConfig {
    /// `host:port` for the listener.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Zero disables the deadline and waits for every open request.
    #[must_use]
    pub fn shutdown_grace(&self) -> Option<Duration> {
        (self.shutdown_grace_secs > 0).then(|| Duration::from_secs(self.shutdown_grace_secs))
    }
}
