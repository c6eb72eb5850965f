//! Simple Cart CLI - terminal front end for the cart and checkout.
//!
//! # Usage
//!
//! ```bash
//! # Add products (id, name, unit price)
//! cart add shoe "Running Shoe" 12500
//! cart add sock "Sock" 1250.50
//!
//! # Edit rows by the number shown in `cart show`
//! cart inc 2
//! cart qty 1 3
//! cart remove 1 2
//!
//! # Show the cart page with a delivery fee applied
//! cart show --surface page --delivery 1000
//!
//! # Pay (needs PAYSTACK_PUBLIC_KEY and a running verification proxy)
//! cart checkout --email ada@example.com --first-name Ada
//! ```
//!
//! # Commands
//!
//! - `add`, `qty`, `inc`, `dec`, `remove`, `clear` - Edit the cart
//! - `show` - Render a cart surface
//! - `count` - Print the number of items in the cart
//! - `checkout` - Pay for the cart and verify the payment

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};
use simple_cart_core::checkout::CheckoutForm;
use simple_cart_core::view::SurfaceKind;
use tokio::io::AsyncWriteExt;

mod commands;
mod config;
mod error;
mod render;
mod storage;
mod widget;

use commands::Session;
use config::CliConfig;
use error::CliError;

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "Simple Cart terminal front end")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
        /// Display name
        name: String,
        /// Unit price
        price: String,
    },
    /// Set the quantity of a row (0 removes it, empty means 1)
    Qty {
        /// Row number
        row: usize,
        /// New quantity
        #[arg(default_value = "")]
        value: String,
    },
    /// Add one to a row's quantity
    Inc {
        /// Row number
        row: usize,
    },
    /// Take one off a row's quantity (never below 1)
    Dec {
        /// Row number
        row: usize,
    },
    /// Remove one or more rows
    Remove {
        /// Row numbers
        #[arg(required = true)]
        rows: Vec<usize>,
    },
    /// Empty the cart
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show a cart surface
    Show {
        /// Which surface to render
        #[arg(short, long, value_enum, default_value_t = SurfaceArg::Page)]
        surface: SurfaceArg,

        /// Apply a delivery fee (modal and page only)
        #[arg(short, long)]
        delivery: Option<String>,
    },
    /// Print the number of items in the cart
    Count,
    /// Pay for the cart
    Checkout {
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, default_value = "")]
        phone: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SurfaceArg {
    Modal,
    Page,
    Checkout,
}

impl From<SurfaceArg> for SurfaceKind {
    fn from(arg: SurfaceArg) -> Self {
        match arg {
            SurfaceArg::Modal => Self::Modal,
            SurfaceArg::Page => Self::Page,
            SurfaceArg::Checkout => Self::Checkout,
        }
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with cart output
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

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = CliConfig::from_env()?;

    let output = match cli.command {
        Commands::Add { id, name, price } => {
            edit(&config, |session| commands::cart::add(session, &id, &name, &price))?
        }
        Commands::Qty { row, value } => {
            edit(&config, |session| commands::cart::set_quantity(session, row, &value))?
        }
        Commands::Inc { row } => edit(&config, |session| commands::cart::increase(session, row))?,
        Commands::Dec { row } => edit(&config, |session| commands::cart::decrease(session, row))?,
        Commands::Remove { rows } => {
            edit(&config, |session| commands::cart::remove(session, &rows))?
        }
        Commands::Clear { yes } => {
            if yes || commands::confirm("Clear the entire cart?").await? {
                edit(&config, commands::cart::clear)?
            } else {
                String::new()
            }
        }
        Commands::Show { surface, delivery } => {
            let kind = SurfaceKind::from(surface);
            let session = Session::open(&config, &[kind]);
            if let Some(fee) = delivery {
                commands::cart::show_delivery(&session, kind, &fee);
            }
            session.with_view(|sync| {
                sync.sink().surface(kind).unwrap_or_default().to_string()
            })
        }
        Commands::Count => {
            let session = Session::open(&config, &[]);
            let count = session.with_view(|sync| sync.sink().badge().unwrap_or(0));
            format!("{count}\n")
        }
        Commands::Checkout {
            first_name,
            last_name,
            email,
            phone,
        } => {
            let form = CheckoutForm {
                first_name,
                last_name,
                email,
                phone,
            };
            commands::checkout::run(&config, &form).await?
        }
    };

    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Open the cart page, apply one edit, and return the re-rendered page.
fn edit(
    config: &CliConfig,
    apply: impl FnOnce(&mut Session) -> Result<(), CliError>,
) -> Result<String, CliError> {
    let mut session = Session::open(config, &[SurfaceKind::Page]);
    apply(&mut session)?;
    Ok(session.screen())
}
