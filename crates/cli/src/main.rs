//! Bazario CLI - drive the storefront engine from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! bazario cart show
//!
//! # Add two of a product (size-variant products take -s)
//! bazario cart add prod-123 -q 2 -s M
//!
//! # Change a line's quantity (0 removes the line)
//! bazario cart update prod-123 3
//!
//! # Save a buy-now snapshot and check out with it
//! bazario buy-now prod-456
//! bazario checkout --buy-now --name "Ayesha Khan" --email ayesha@example.com ...
//! ```
//!
//! # Environment Variables
//!
//! - `BAZARIO_API_BASE_URL`, `BAZARIO_API_TOKEN` - backend connection
//! - `BAZARIO_SESSION_USER_ID`, `BAZARIO_SESSION_EMAIL` - session handoff
//!   from the auth service; cart mutations require these

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazario")]
#[command(author, version, about = "Bazario storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and mutate the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Save a buy-now snapshot for a product
    BuyNow {
        /// Product id
        product_id: String,

        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Selected size for size-variant products
        #[arg(short, long)]
        size: Option<String>,
    },
    /// Run the checkout wizard and submit an order
    Checkout(commands::checkout::CheckoutArgs),
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: String,

        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Selected size for size-variant products
        #[arg(short, long)]
        size: Option<String>,
    },
    /// Remove a line from the cart
    Remove {
        /// Product id
        product_id: String,
    },
    /// Set a line's quantity (0 removes the line)
    Update {
        /// Product id
        product_id: String,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let storefront = commands::connect().await?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&storefront).await?,
            CartAction::Add {
                product_id,
                quantity,
                size,
            } => commands::cart::add(&storefront, &product_id, quantity, size.as_deref()).await?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&storefront, &product_id).await?;
            }
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&storefront, &product_id, quantity).await?,
            CartAction::Clear => commands::cart::clear(&storefront).await?,
        },
        Commands::BuyNow {
            product_id,
            quantity,
            size,
        } => {
            commands::checkout::save_buy_now(&storefront, &product_id, quantity, size.as_deref())
                .await?;
        }
        Commands::Checkout(args) => commands::checkout::run(&storefront, args).await?,
    }
    Ok(())
}
