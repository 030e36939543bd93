use anyhow::{Context, Result};
use autoparts_store::{
    config,
    db,
    entities::{CustomerOrderModel, OrderStatus},
    migrator::Migrator,
    services::PaymentOutcome,
    AppState,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config().context("failed to load application config")?;
    config::init_tracing(&cfg.log_level, cfg.log_json);

    // Schema commands manage migrations themselves
    if matches!(cli.command, Commands::Migrate(_)) {
        cfg.auto_migrate = false;
    } else if cfg.is_development() {
        cfg.auto_migrate = true;
    }

    let state = AppState::connect(cfg)
        .await
        .context("failed to connect to database")?;

    match cli.command {
        Commands::Migrate(command) => handle_migrate_command(&state, command).await?,
        Commands::Pay(args) => handle_pay(&state, args, cli.json).await?,
        Commands::DiscountedTotal(args) => handle_discounted_total(&state, args, cli.json).await?,
        Commands::CustomerOrders(args) => handle_customer_orders(&state, args, cli.json).await?,
        Commands::SetStatus(args) => handle_set_status(&state, args, cli.json).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "autoparts", about = "Auto-parts shop database operations", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply or roll back the schema
    #[command(subcommand)]
    Migrate(MigrateCommands),
    /// Pay an order; it is marked Paid when the amount covers its total
    Pay(PayArgs),
    /// Sum of an order's line items after discounts
    DiscountedTotal(OrderArgs),
    /// List rows of the customer_orders view
    CustomerOrders(CustomerOrdersArgs),
    /// Change an order's status
    SetStatus(SetStatusArgs),
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Apply all pending migrations
    Up,
    /// Roll back migrations (all of them unless --steps is given)
    Down {
        #[arg(long)]
        steps: Option<u32>,
    },
    /// Drop everything and re-apply all migrations
    Fresh,
    /// Show applied and pending migrations
    Status,
}

#[derive(Args)]
struct PayArgs {
    order_id: i32,
    amount: Decimal,
}

#[derive(Args)]
struct OrderArgs {
    order_id: i32,
}

#[derive(Args)]
struct CustomerOrdersArgs {
    #[arg(long)]
    customer_id: Option<i32>,
}

#[derive(Args)]
struct SetStatusArgs {
    order_id: i32,
    /// One of Pending, Shipped, Delivered, Canceled, Paid
    status: OrderStatus,
}

async fn handle_migrate_command(state: &AppState, command: MigrateCommands) -> Result<()> {
    match command {
        MigrateCommands::Up => db::run_migrations(&state.db).await?,
        MigrateCommands::Down { steps } => db::rollback_migrations(&state.db, steps).await?,
        MigrateCommands::Fresh => db::reset_schema(&state.db).await?,
        MigrateCommands::Status => Migrator::status(&*state.db)
            .await
            .context("failed to read migration status")?,
    }
    Ok(())
}

async fn handle_pay(state: &AppState, args: PayArgs, json: bool) -> Result<()> {
    let outcome = state
        .payment_service()
        .process_order_payment(args.order_id, args.amount)
        .await
        .with_context(|| format!("payment for order {} failed", args.order_id))?;

    if json {
        return print_json(&outcome);
    }

    match outcome {
        PaymentOutcome::Paid { order_id, total, payment } => {
            println!("Order {} paid ({} received, total {})", order_id, payment, total)
        }
        PaymentOutcome::Insufficient { order_id, total, payment } => println!(
            "Order {} unchanged: payment {} is below total {}",
            order_id, payment, total
        ),
    }
    Ok(())
}

async fn handle_discounted_total(state: &AppState, args: OrderArgs, json: bool) -> Result<()> {
    let total = state
        .pricing_service()
        .calculate_discounted_total(args.order_id)
        .await?;

    if json {
        print_json(&json!({ "order_id": args.order_id, "discounted_total": total }))
    } else {
        println!("Order {} discounted total: {}", args.order_id, total);
        Ok(())
    }
}

async fn handle_customer_orders(
    state: &AppState,
    args: CustomerOrdersArgs,
    json: bool,
) -> Result<()> {
    let rows = state.order_service().customer_orders(args.customer_id).await?;

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No orders found");
    }
    for row in &rows {
        render_customer_order(row);
    }
    Ok(())
}

async fn handle_set_status(state: &AppState, args: SetStatusArgs, json: bool) -> Result<()> {
    let order = state
        .order_service()
        .update_status(args.order_id, args.status)
        .await?;

    if json {
        print_json(&order)
    } else {
        println!("Order {} is now {}", order.id, order.status);
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_customer_order(row: &CustomerOrderModel) {
    println!(
        "- Order {} • {} {} • {} • status {} • total {}",
        row.order_id, row.first_name, row.last_name, row.order_date, row.status, row.total_amount
    );
}
