//! Database Config

use clap::Args;

/// Where carts, orders, products and donations are stored.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` URL for the storefront database, migrated with `storefront-app db migrate`
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}
