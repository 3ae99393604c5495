//! Stockroom CLI - Manage inventory from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and sign in
//! stockroom register -u alice
//! stockroom login -u alice
//!
//! # Browse stock, 20 products per page
//! stockroom products list --page 2 --per-page 20
//!
//! # Add a product and adjust its stock
//! stockroom products add --name Widget --type Tools --sku W-1 --quantity 5 --price 19.99
//! stockroom products set-quantity 665f1c2e 0
//!
//! stockroom logout
//! ```
//!
//! # Environment Variables
//!
//! - `STOCKROOM_API_URL`, `STOCKROOM_SESSION_FILE`, `STOCKROOM_HTTP_TIMEOUT_SECS` -
//!   see `stockroom_client::config`
//! - `STOCKROOM_PASSWORD` - Password for `register` and `login` when `-p` is omitted
//! - `STOCKROOM_LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Error reporting (disabled when unset)
//! - `RUST_LOG` - Log filter (default: `stockroom=info,stockroom_client=info`)
//!
//! Results go to stdout. Logs, warnings and errors go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about = "Stockroom inventory client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Sign in and save the session
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Show whether a session is saved
    Status,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List one page of products
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Products per page
        #[arg(long, default_value_t = stockroom_core::PageRequest::DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    /// Add a new product
    Add {
        /// Product name
        #[arg(long)]
        name: String,

        /// Product type or category
        #[arg(long = "type")]
        product_type: String,

        /// Stock keeping unit
        #[arg(long)]
        sku: String,

        /// Units in stock
        #[arg(long, allow_hyphen_values = true)]
        quantity: String,

        /// Unit price
        #[arg(long, allow_hyphen_values = true)]
        price: String,

        /// Product image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Product description
        #[arg(long)]
        description: Option<String>,
    },
    /// Set the stock quantity of a product
    SetQuantity {
        /// Product id
        id: String,

        /// New quantity (0 marks the product out of stock)
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

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

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockroom=info,stockroom_client=info".into());

    let json = std::env::var("STOCKROOM_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before Sentry reads its DSN
    let _ = dotenvy::dotenv();

    // Sentry must be up before the tracing subscriber
    let _sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let client = commands::connect()?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Register {
            username,
            password,
            confirm,
        } => commands::auth::register(&client, &mut out, &username, password, confirm).await,
        Commands::Login { username, password } => {
            commands::auth::login(&client, &mut out, &username, password).await
        }
        Commands::Logout => commands::auth::logout(&client, &mut out),
        Commands::Status => commands::auth::status(&client, &mut out),
        Commands::Products { action } => match action {
            ProductsAction::List { page, per_page } => {
                commands::products::list(&client, &mut out, page, per_page).await
            }
            ProductsAction::Add {
                name,
                product_type,
                sku,
                quantity,
                price,
                image_url,
                description,
            } => {
                let draft = stockroom_core::ProductDraft {
                    name,
                    product_type,
                    sku,
                    quantity,
                    price,
                    image_url: image_url.unwrap_or_default(),
                    description: description.unwrap_or_default(),
                };
                commands::products::add(&client, &mut out, &draft).await
            }
            ProductsAction::SetQuantity { id, quantity } => {
                commands::products::set_quantity(&client, &mut out, &id, &quantity).await
            }
        },
    }
}
