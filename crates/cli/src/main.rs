//! Marketstall CLI - browse the catalog and keep a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List categories
//! stall categories
//!
//! # List products, optionally narrowed by category and search text
//! stall products --category electronics --search drive
//!
//! # Show one product
//! stall show 9
//!
//! # Manage the cart (kept in .stall-cart.json by default)
//! stall cart add 9
//! stall cart inc 9
//! stall cart dec 9
//! stall cart remove 9
//! stall cart show
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Catalog API base URL
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout
//! - `STALL_CART_FILE` - Cart snapshot path
//! - `RUST_LOG` - Log filter (default: warn)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marketstall_core::{Category, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "stall")]
#[command(author, version, about = "Marketstall terminal shop")]
struct Cli {
    /// Cart snapshot file
    #[arg(long, env = "STALL_CART_FILE", default_value = ".stall-cart.json", global = true)]
    cart_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List product categories
    Categories,
    /// List products
    Products {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<Category>,

        /// Only products whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show product details
    Show {
        /// Product ID
        id: ProductId,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one of a product
    Add { id: ProductId },
    /// Raise a line's quantity by one
    Inc { id: ProductId },
    /// Lower a line's quantity by one
    Dec { id: ProductId },
    /// Remove a line
    Remove { id: ProductId },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let shop = commands::open_shop(&cli.cart_file).await?;

    match cli.command {
        Commands::Categories => commands::catalog::categories(&shop),
        Commands::Products { category, search } => {
            commands::catalog::products(&shop, category, search).await?;
        }
        Commands::Show { id } => commands::catalog::show(&shop, id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&shop).await,
            CartAction::Add { id } => commands::cart::add(&shop, id).await?,
            CartAction::Inc { id } => commands::cart::increment(&shop, id).await?,
            CartAction::Dec { id } => commands::cart::decrement(&shop, id).await?,
            CartAction::Remove { id } => commands::cart::remove(&shop, id).await?,
        },
    }
    Ok(())
}
