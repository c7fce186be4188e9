//! Furniture Estimator CLI - catalog, cart and checkout from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Write the sample catalog into the catalog API's data file
//! estimator seed
//!
//! # Browse the catalog (the catalog API must be running)
//! estimator catalog list --status Active
//!
//! # Fill the cart
//! estimator cart add 0d5b3f7e-8c1a-4f65-9a57-0c2f3e1b9d44 --quantity 2
//! estimator cart show
//!
//! # Place the order
//! estimator checkout --name "Asha Rao" --email asha@example.in --phone 9876543210 \
//!     --address "12 MG Road" --city Bengaluru --state Karnataka --pincode 560001 \
//!     --method upi --upi-id asha@upi
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, show, add and delete catalog entries
//! - `cart` - Inspect and edit the persisted cart
//! - `checkout` - Run the checkout wizard end to end
//! - `seed` - Write sample furniture into the catalog file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use estimator_core::{FurnitureId, FurnitureStatus, PaymentMethod};

mod commands;

#[derive(Parser)]
#[command(name = "estimator")]
#[command(author, version, about = "Furniture estimator: catalog, cart and checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage the furniture catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Check out the current cart
    Checkout(CheckoutArgs),
    /// Write the sample catalog into the catalog data file
    Seed {
        /// YAML file of entries to use instead of the built-in samples
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Catalog file to write (default: `ADMIN_DATA_FILE`)
        #[arg(short, long)]
        data_file: Option<PathBuf>,

        /// Replace the catalog instead of appending to it
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List catalog entries
    List {
        /// Only show entries with this status (Active, Inactive, Draft)
        #[arg(short, long)]
        status: Option<FurnitureStatus>,
    },
    /// Show one entry
    Show {
        /// Furniture id
        id: FurnitureId,
    },
    /// Create an entry from a JSON file
    Add {
        /// JSON file with the new entry
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete an entry
    Delete {
        /// Furniture id
        id: FurnitureId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a catalog entry to the cart
    Add {
        /// Furniture id
        furniture_id: FurnitureId,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line (0 or less removes it)
    Set {
        /// Cart line id, as shown by `cart show`
        item_id: String,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a cart line
    Remove {
        /// Cart line id, as shown by `cart show`
        item_id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    pincode: String,

    /// Payment method (card, upi, netbanking, wallet)
    #[arg(long, default_value = "card")]
    method: PaymentMethod,

    #[arg(long, default_value = "")]
    card_number: String,
    #[arg(long, default_value = "")]
    expiry_date: String,
    #[arg(long, default_value = "")]
    cvv: String,
    #[arg(long, default_value = "")]
    card_name: String,
    #[arg(long, default_value = "")]
    upi_id: String,
    #[arg(long, default_value = "")]
    bank_name: String,
    #[arg(long, default_value = "")]
    wallet: String,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "estimator=info,estimator_storefront=info,estimator_admin=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { status } => commands::catalog::list(status).await?,
            CatalogAction::Show { id } => commands::catalog::show(id).await?,
            CatalogAction::Add { file } => commands::catalog::add(&file).await?,
            CatalogAction::Delete { id } => commands::catalog::delete(id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Add {
                furniture_id,
                quantity,
            } => commands::cart::add(furniture_id, quantity).await?,
            CartAction::Set { item_id, quantity } => commands::cart::set(&item_id, quantity)?,
            CartAction::Remove { item_id } => commands::cart::remove(&item_id)?,
            CartAction::Clear => commands::cart::clear()?,
        },
        Commands::Checkout(args) => commands::checkout::run(args.into()).await?,
        Commands::Seed {
            file,
            data_file,
            replace,
        } => commands::seed::furniture(file.as_deref(), data_file, replace).await?,
    }
    Ok(())
}

impl From<CheckoutArgs> for commands::checkout::CheckoutInput {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            customer: estimator_core::CustomerDetails {
                name: args.name,
                email: args.email,
                phone: args.phone,
                address: args.address,
                city: args.city,
                state: args.state,
                pincode: args.pincode,
            },
            method: args.method,
            payment: estimator_core::PaymentDetails {
                card_number: args.card_number,
                expiry_date: args.expiry_date,
                cvv: args.cvv,
                card_name: args.card_name,
                upi_id: args.upi_id,
                bank_name: args.bank_name,
                wallet: args.wallet,
            },
        }
    }
}
