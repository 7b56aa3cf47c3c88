use clap::{Parser, Subcommand};

mod admin;
mod db;
mod donations;
mod orders;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Admin(admin::AdminCommand),
    Db(db::DbCommand),
    Donations(donations::DonationsCommand),
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Admin(command) => admin::run(command),
            Commands::Db(command) => db::run(command).await,
            Commands::Donations(command) => donations::run(command).await,
            Commands::Orders(command) => orders::run(command).await,
        }
    }
}
