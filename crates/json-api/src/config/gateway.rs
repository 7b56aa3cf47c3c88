//! Upstream Config

use std::time::Duration;

use clap::Args;

use storefront_app::gateway::GatewayConfig;

/// Blog and media backend settings.
#[derive(Debug, Args)]
pub struct UpstreamConfig {
    /// Base URL of the content backend; a trailing `/api` is accepted
    #[arg(long, env = "UPSTREAM_API_URL")]
    pub upstream_api_url: String,

    /// API key sent on media uploads when the caller has no token
    #[arg(long, env = "MEDIA_API_KEY", hide_env_values = true)]
    pub media_api_key: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10_u64)]
    pub upstream_timeout_secs: u64,
}

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.upstream_api_url.clone(),
            media_api_key: self.media_api_key.clone(),
            timeout: self.timeout(),
        }
    }
}
