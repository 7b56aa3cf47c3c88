use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::donations::{
        DonationsService, PgDonationsService,
        data::{DonationLookup, DonationStatusUpdate},
        records::DonationStatus,
    },
};

#[derive(Debug, Args)]
pub(crate) struct SetStatusArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Donation uuid or confirmation number
    #[arg(long)]
    donation: String,

    #[arg(long)]
    status: DonationStatus,

    #[arg(long)]
    transaction_id: Option<String>,
}

pub(crate) async fn run(args: SetStatusArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgDonationsService::new(&Db::new(pool));

    let donation = service
        .update_status(
            DonationLookup::parse(&args.donation),
            DonationStatusUpdate {
                status: args.status,
                transaction_id: args.transaction_id,
            },
        )
        .await
        .map_err(|error| format!("failed to update donation {}: {error}", args.donation))?;

    println!("{} is now {}", donation.confirmation_number, donation.status);

    Ok(())
}
