//! `procura`: run procurement pricing queries against a JSON catalog snapshot.

mod config;
mod snapshot;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use procura_core::{AccountId, OrderPositionId, ProductId, Quantity, SupplierId};
use procura_infra::ProcurementService;
use procura_pricing::RankingCriterion;

use crate::config::ProcuraConfig;
use crate::snapshot::Snapshot;

#[derive(Parser)]
#[command(name = "procura", about = "Procurement pricing queries over a catalog snapshot", version)]
struct Cli {
    #[arg(long, help = "Path to the JSON catalog snapshot")]
    snapshot: PathBuf,
    #[arg(long, help = "Account whose data is queried")]
    account: AccountId,
    #[arg(
        long,
        global = true,
        default_value = "procura",
        help = "Config file name without extension (optional)"
    )]
    config: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Procurement plan and margin for each open order line.
    OrderMatrix(OrdersArgs),
    /// Single supplier suggestion for a product and quantity.
    Recommend(RecommendArgs),
    /// Order lines' planned purchases bucketed by supplier.
    GroupBySupplier(OrdersArgs),
    /// All offers per product, preferred offer first.
    PricingMatrix(PricingMatrixArgs),
    /// Top offer per product by priority or price.
    BestOffers(BestOffersArgs),
    /// Offer statistics per supplier.
    CompareSuppliers(CompareSuppliersArgs),
}

#[derive(Args)]
struct OrdersArgs {
    #[arg(long = "order", required = true, value_delimiter = ',', help = "Order position ids")]
    orders: Vec<OrderPositionId>,
}

#[derive(Args)]
struct RecommendArgs {
    #[arg(long)]
    product: ProductId,
    #[arg(long)]
    quantity: Decimal,
}

#[derive(Args)]
struct PricingMatrixArgs {
    #[arg(long = "product", required = true, value_delimiter = ',')]
    products: Vec<ProductId>,
    #[arg(long, help = "Only consider this supplier's offers")]
    supplier: Option<SupplierId>,
}

#[derive(Args)]
struct BestOffersArgs {
    #[arg(long = "product", required = true, value_delimiter = ',')]
    products: Vec<ProductId>,
    #[arg(long, help = "`price` or `priority`; defaults to pricing.default_criteria")]
    criteria: Option<String>,
}

#[derive(Args)]
struct CompareSuppliersArgs {
    #[arg(long = "supplier", required = true, value_delimiter = ',')]
    suppliers: Vec<SupplierId>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = ProcuraConfig::load(&cli.config).context("failed to load configuration")?;
    procura_observability::init(&config.log);

    let catalog = Snapshot::read(&cli.snapshot)?.into_catalog()?;
    let service = ProcurementService::new(catalog);
    let account = cli.account;

    match cli.command {
        Commands::OrderMatrix(args) => {
            print_json(&service.order_pricing_matrix(account, &args.orders)?)?
        }
        Commands::Recommend(args) => {
            let recommendation =
                service.recommend_supplier(account, args.product, Quantity::new(args.quantity))?;
            print_json(&recommendation)?
        }
        Commands::GroupBySupplier(args) => {
            print_json(&service.group_orders_by_supplier(account, &args.orders)?)?
        }
        Commands::PricingMatrix(args) => {
            print_json(&service.pricing_matrix(account, &args.products, args.supplier)?)?
        }
        Commands::BestOffers(args) => {
            let criterion = args
                .criteria
                .as_deref()
                .map(RankingCriterion::parse_lenient)
                .unwrap_or_else(|| config.pricing.default_criterion());
            print_json(&service.best_offers(account, &args.products, criterion)?)?
        }
        Commands::CompareSuppliers(args) => {
            print_json(&service.compare_suppliers(account, &args.suppliers)?)?
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
