use clap::{Args, Subcommand};

mod set_status;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// Move an order along its fulfilment lifecycle
    SetStatus(set_status::SetStatusArgs),
}

pub(crate) async fn run(command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::SetStatus(args) => set_status::run(args).await,
    }
}
