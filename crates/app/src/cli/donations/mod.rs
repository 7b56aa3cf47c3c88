use clap::{Args, Subcommand};

mod set_status;

#[derive(Debug, Args)]
pub(crate) struct DonationsCommand {
    #[command(subcommand)]
    command: DonationsSubcommand,
}

#[derive(Debug, Subcommand)]
enum DonationsSubcommand {
    /// Record the payment outcome of a donation
    SetStatus(set_status::SetStatusArgs),
}

pub(crate) async fn run(command: DonationsCommand) -> Result<(), String> {
    match command.command {
        DonationsSubcommand::SetStatus(args) => set_status::run(args).await,
    }
}
