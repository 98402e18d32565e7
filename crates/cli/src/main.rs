//! Tech Store CLI - cart quotes and checkout checks from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Replay a cart script and show the totals
//! ts-cli quote cart.yaml
//!
//! # Same, shipped to Upper Egypt, as JSON
//! ts-cli quote cart.yaml --region UpperEgypt --json
//!
//! # Show the courier price list (built-in or from a file)
//! ts-cli rates --table rates.yaml
//!
//! # Validate a checkout form and build the order payload
//! ts-cli checkout form.yaml --cart cart.yaml --user-id 64f1c0ffee
//! ```
//!
//! # Commands
//!
//! - `quote` - Replay cart actions and price shipping
//! - `rates` - Print the shipping rate table
//! - `checkout` - Validate a checkout form

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use techstore_core::ShippingRegion;
use techstore_storefront::StorefrontConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ts-cli")]
#[command(author, version, about = "Tech Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a cart action script and show the totals
    Quote {
        /// YAML file with a list of cart actions
        script: PathBuf,

        /// Shipping region to start from (overrides `STOREFRONT_SHIPPING_REGION`)
        #[arg(short, long)]
        region: Option<ShippingRegion>,

        /// Print the cart summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the shipping rate table
    Rates {
        /// YAML rate table to show instead of the configured one
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a checkout form
    Checkout {
        /// YAML file with the checkout form fields
        form: PathBuf,

        /// Cart script; when given, the order payload is printed
        #[arg(short, long)]
        cart: Option<PathBuf>,

        /// Customer ID to place the order under
        #[arg(short, long, default_value = "guest")]
        user_id: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    match cli.command {
        Commands::Quote {
            script,
            region,
            json,
        } => commands::quote::run(&config, &script, region, json)?,
        Commands::Rates { table, json } => {
            commands::rates::run(&config.rates, table.as_deref(), json)?;
        }
        Commands::Checkout {
            form,
            cart,
            user_id,
        } => commands::checkout::run(&config, &form, cart.as_deref(), &user_id)?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_region_argument_parses() {
        let cli = Cli::try_parse_from(["ts-cli", "quote", "cart.yaml", "--region", "delta"]).unwrap();
        let Commands::Quote { region, .. } = cli.command else {
            panic!("expected quote command");
        };
        assert_eq!(region, Some(ShippingRegion::Delta));

        assert!(Cli::try_parse_from(["ts-cli", "quote", "cart.yaml", "--region", "Mars"]).is_err());
    }

    #[test]
    fn test_replay_script() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
- action: addItem
  product: {{ _id: s1, name: Bookshelf Speakers, price: 2200, category: Speakers }}
- action: addItem
  product: {{ _id: s1, name: Bookshelf Speakers, price: 2200, category: Speakers }}
- action: setShippingRegion
  region: Alexandria
"#
        )
        .unwrap();

        let cart =
            commands::quote::replay(&StorefrontConfig::default(), file.path(), None).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal().amount, Decimal::from(4400));
        // 3 kg ships as a light package
        assert_eq!(cart.shipping_cost().amount, Decimal::from(185));
    }

    #[test]
    fn test_invalid_checkout_form_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "firstName: Sara\nphone: '123'\n").unwrap();
        let result = commands::checkout::run(&StorefrontConfig::default(), file.path(), None, "u1");
        assert!(result.is_err());
    }
}
