use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::orders::{
        OrdersService, PgOrdersService,
        data::{OrderLookup, StatusUpdate},
        status::OrderStatus,
    },
};

#[derive(Debug, Args)]
pub(crate) struct SetStatusArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Order uuid or order number (e.g. ISP-1000)
    #[arg(long)]
    order: String,

    /// Target status
    #[arg(long)]
    status: OrderStatus,

    /// Payment processor transaction reference
    #[arg(long)]
    transaction_id: Option<String>,
}

pub(crate) async fn run(args: SetStatusArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgOrdersService::new(&Db::new(pool));

    let order = service
        .update_status(
            OrderLookup::parse(&args.order),
            StatusUpdate {
                status: args.status,
                transaction_id: args.transaction_id,
            },
        )
        .await
        .map_err(|error| format!("failed to update order {}: {error}", args.order))?;

    println!("{} is now {}", order.order_number, order.status);

    Ok(())
}
