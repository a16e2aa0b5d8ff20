//! Shopfront CLI - browse products, manage the cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! shop products list
//! shop products search dress
//! shop products featured --limit 3
//!
//! # Cart
//! shop cart add elegant-summer-dress --quantity 2
//! shop cart update elegant-summer-dress 1
//! shop cart show
//!
//! # Checkout
//! shop checkout --payment apple-pay
//! shop orders
//!
//! # Catalog administration
//! shop products add --name "Bucket Hat" --category Hat --price 25.00
//!
//! # Shipping addresses
//! shop addresses add --name "Jane Roe" --phone "+1 555 0100" \
//!     --street "9 Elm Road" --city Portland --state OR --zip-code 97201
//! shop addresses default <id>
//! ```
//!
//! # Commands
//!
//! - `products` - Browse the catalog and manage products
//! - `cart` - Show and edit the cart
//! - `checkout` - Place a simulated order
//! - `orders` - Show order history
//! - `notifications` - Show and manage the activity log
//! - `addresses` - Manage saved shipping addresses
//!
//! State lives under `SHOPFRONT_DATA_DIR` (or `--data-dir`), so the cart
//! survives between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_cart::{Shop, ShopfrontConfig};
use shopfront_core::{AddressId, AddressInput, NotificationId, PaymentMethod, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Shopfront storefront CLI")]
struct Cli {
    /// Directory holding the persisted cart, notifications and orders
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog and manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout {
        /// Payment method (`card`, `apple-pay`, `paypal`)
        #[arg(short, long, default_value = "card")]
        payment: PaymentMethod,
    },
    /// Show placed orders, newest first
    Orders,
    /// Show and manage notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationsAction,
    },
    /// Manage saved shipping addresses
    Addresses {
        #[command(subcommand)]
        action: AddressesAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product, newest first
    List,
    /// Show one product
    Show {
        /// Product id
        id: ProductId,
    },
    /// Search names, descriptions and categories
    Search {
        /// Case-insensitive search term
        term: String,
    },
    /// List top-rated products
    Featured {
        /// Maximum number of products
        #[arg(short, long, default_value_t = 4)]
        limit: usize,
    },
    /// List products in a category
    Category {
        /// Category name, e.g. `Dress`
        name: String,
    },
    /// Create a product
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        image_url: String,

        #[arg(long, default_value_t = 0.0)]
        rating: f64,

        /// Mark the product as out of stock
        #[arg(long)]
        out_of_stock: bool,
    },
    /// Change some fields of a product
    Update {
        /// Product id
        id: ProductId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image_url: Option<String>,

        #[arg(long)]
        rating: Option<f64>,

        #[arg(long)]
        in_stock: Option<bool>,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show line items and totals
    Show,
    /// Add a product (merges with an existing line)
    Add {
        /// Product id
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Set a line's quantity exactly (zero or less removes it)
    Update {
        /// Product id
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum NotificationsAction {
    /// List notifications, newest first
    List,
    /// Delete one notification
    Remove {
        /// Notification id
        id: NotificationId,
    },
    /// Delete every notification
    Clear,
}

#[derive(Subcommand)]
enum AddressesAction {
    /// List saved addresses
    List,
    /// Save a new address
    Add {
        #[command(flatten)]
        fields: AddressArgs,
    },
    /// Replace an address's fields
    Edit {
        /// Address id
        id: AddressId,

        #[command(flatten)]
        fields: AddressArgs,
    },
    /// Delete an address
    Delete {
        /// Address id
        id: AddressId,
    },
    /// Make an address the default
    Default {
        /// Address id
        id: AddressId,
    },
}

#[derive(Args)]
struct AddressArgs {
    /// Recipient name
    #[arg(long)]
    name: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    #[arg(long)]
    zip_code: String,

    #[arg(long, default_value = shopfront_core::DEFAULT_COUNTRY)]
    country: String,
}

impl From<AddressArgs> for AddressInput {
    fn from(args: AddressArgs) -> Self {
        Self {
            name: args.name,
            phone: args.phone,
            street: args.street,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            country: args.country,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopfrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_cart=info,shopfront_cli=info".into());

    let mut config = match ShopfrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let shop = Shop::open(config).await;
    let result = run(cli.command, &shop).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(command: Commands, shop: &Shop) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(shop).await?,
            ProductsAction::Show { id } => commands::products::show(shop, &id).await?,
            ProductsAction::Search { term } => commands::products::search(shop, &term).await?,
            ProductsAction::Featured { limit } => {
                commands::products::featured(shop, limit).await?;
            }
            ProductsAction::Category { name } => {
                commands::products::category(shop, &name).await?;
            }
            ProductsAction::Add {
                name,
                category,
                price,
                description,
                image_url,
                rating,
                out_of_stock,
            } => {
                let input = shopfront_core::NewProduct {
                    name,
                    category,
                    price,
                    description,
                    image_url,
                    rating,
                    in_stock: !out_of_stock,
                };
                commands::products::add(shop, input).await?;
            }
            ProductsAction::Update {
                id,
                name,
                category,
                price,
                description,
                image_url,
                rating,
                in_stock,
            } => {
                let update = shopfront_core::ProductUpdate {
                    name,
                    category,
                    price,
                    description,
                    image_url,
                    rating,
                    in_stock,
                };
                commands::products::update(shop, &id, update).await?;
            }
            ProductsAction::Delete { id } => commands::products::delete(shop, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(shop),
            CartAction::Add { id, quantity } => commands::cart::add(shop, &id, quantity).await?,
            CartAction::Remove { id } => commands::cart::remove(shop, &id).await,
            CartAction::Update { id, quantity } => {
                commands::cart::update(shop, &id, quantity).await;
            }
            CartAction::Clear => commands::cart::clear(shop).await,
        },
        Commands::Checkout { payment } => commands::checkout::place_order(shop, payment).await?,
        Commands::Orders => commands::checkout::orders(shop).await?,
        Commands::Notifications { action } => match action {
            NotificationsAction::List => commands::notifications::list(shop).await?,
            NotificationsAction::Remove { id } => {
                commands::notifications::remove(shop, id).await?;
            }
            NotificationsAction::Clear => commands::notifications::clear(shop).await?,
        },
        Commands::Addresses { action } => match action {
            AddressesAction::List => commands::addresses::list(shop).await?,
            AddressesAction::Add { fields } => {
                commands::addresses::add(shop, fields.into()).await?;
            }
            AddressesAction::Edit { id, fields } => {
                commands::addresses::edit(shop, &id, fields.into()).await?;
            }
            AddressesAction::Delete { id } => commands::addresses::delete(shop, &id).await?,
            AddressesAction::Default { id } => {
                commands::addresses::set_default(shop, &id).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_negative_quantity() {
        let cli = Cli::try_parse_from(["shop", "cart", "update", "cargo-pants", "-1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Update { quantity: -1, .. }
            })
        ));
    }

    #[test]
    fn test_address_add_requires_every_field_but_country() {
        let args = [
            "shop", "addresses", "add", "--name", "Jane Roe", "--phone", "555", "--street",
            "9 Elm Road", "--city", "Portland", "--state", "OR", "--zip-code", "97201",
        ];
        let Ok(Cli {
            command: Commands::Addresses {
                action: AddressesAction::Add { fields },
            },
            ..
        }) = Cli::try_parse_from(args)
        else {
            panic!("address add did not parse");
        };
        assert_eq!(fields.country, shopfront_core::DEFAULT_COUNTRY);

        assert!(Cli::try_parse_from(["shop", "addresses", "add", "--name", "Jane"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_payment_method() {
        assert!(Cli::try_parse_from(["shop", "checkout", "--payment", "cash"]).is_err());
    }
}
