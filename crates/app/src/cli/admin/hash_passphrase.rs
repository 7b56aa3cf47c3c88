use clap::Args;
use storefront_app::auth::hash_passphrase;

#[derive(Debug, Args)]
pub(crate) struct HashPassphraseArgs {
    /// Admin passphrase to hash
    #[arg(long, env = "ADMIN_PASSPHRASE", hide_env_values = true)]
    passphrase: String,
}

pub(crate) fn run(args: &HashPassphraseArgs) -> Result<(), String> {
    if args.passphrase.trim().is_empty() {
        return Err("passphrase cannot be empty".to_string());
    }

    println!("{}", hash_passphrase(&args.passphrase));

    Ok(())
}
