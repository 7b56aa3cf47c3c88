use clap::{Args, Subcommand};

mod hash_passphrase;
mod issue_session;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Print the digest to configure as `ADMIN_PASSPHRASE_HASH`
    HashPassphrase(hash_passphrase::HashPassphraseArgs),

    /// Mint an admin session token without going through the login endpoint
    IssueSession(issue_session::IssueSessionArgs),
}

pub(crate) fn run(command: AdminCommand) -> Result<(), String> {
    match command.command {
        AdminSubcommand::HashPassphrase(args) => hash_passphrase::run(&args),
        AdminSubcommand::IssueSession(args) => issue_session::run(&args),
    }
}
