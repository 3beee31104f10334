//! Aranceles - brokerage fee lookup
//!
//! Loads the fee schedule (local spreadsheet, CSV or published Google Sheet), keeps the
//! latest effective fee per (group, operation, instrument type, currency) and
//! answers lookups, optionally starting from an ESCO account number.
//!
//! # Environment Variables
//! - `ARANCELES_XLSX`, `ARANCELES_CSV`, `ARANCELES_SHEET_ID`, `ARANCELES_SHEET_GID`, `ARANCELES_SHEET_CSV_URL`
//! - `ESCO_BASE_URL`, `ESCO_API_VERSION`, `ESCO_ODATA_HEADERS`
//! - `ESCO_USERNAME`, `ESCO_PASSWORD`, `ESCO_CLIENT_ID`

use anyhow::{Context, Result};
use aranceles::application::{AccountFeeRequest, FeeCatalog, FeeLookupService};
use aranceles::config::Config;
use aranceles::domain::fees::FeeRow;
use aranceles::infrastructure::{EscoClient, fee_table_source_from_config};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show where the fee table comes from and how many current fees it holds
    Status,

    /// List fee groups present in the fee table
    Groups,

    /// List operation types of a fee group
    Operations {
        #[arg(short, long)]
        group: String,
    },

    /// List instrument types and currencies of an operation
    Options {
        #[arg(short, long)]
        group: String,

        /// Operation abbreviation (e.g. CV)
        #[arg(short, long)]
        op: String,

        /// Narrow currencies to this instrument type
        #[arg(short, long)]
        instrument: Option<String>,
    },

    /// Current fee for a fully specified key
    Fee {
        #[arg(short, long)]
        group: String,

        #[arg(short, long)]
        op: String,

        #[arg(short, long)]
        instrument: String,

        #[arg(short, long)]
        currency: String,
    },

    /// Current fees of every instrument type for an operation and currency
    Fees {
        #[arg(short, long)]
        group: String,

        #[arg(short, long)]
        op: String,

        #[arg(short, long)]
        currency: String,
    },

    /// Resolve an account's fee group through ESCO and walk the cascade
    Lookup {
        /// Account (comitente) number
        #[arg(short, long)]
        account: String,

        #[arg(short, long)]
        op: Option<String>,

        #[arg(short, long)]
        currency: Option<String>,

        /// Overrides ESCO_USERNAME
        #[arg(long)]
        username: Option<String>,

        /// Overrides ESCO_CLIENT_ID
        #[arg(long)]
        client_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let source = fee_table_source_from_config(&config.fee_source)?;
    let catalog = Arc::new(FeeCatalog::new(source));
    if let Err(e) = catalog.reload().await {
        warn!("Fee table not loaded: {}", e);
    }

    match cli.command {
        Commands::Status => {
            let status = catalog.status().await;
            println!("Source:    {}", status.origin);
            println!("Available: {}", status.available);
            println!("Fees:      {}", status.fee_count);
            if let Some(at) = status.loaded_at {
                println!("Loaded at: {}", at.to_rfc3339());
            }
            if let Some(err) = status.last_error {
                println!("Error:     {}", err);
            }
        }
        Commands::Groups => {
            let view = catalog.current().await?;
            for group in view.groups() {
                println!("{}", group);
            }
        }
        Commands::Operations { group } => {
            let view = catalog.current().await?;
            for op in view.list_operations(&group) {
                println!("{:<8} {}", op.abbreviation, op.description);
            }
        }
        Commands::Options { group, op, instrument } => {
            let view = catalog.current().await?;
            match instrument {
                Some(instrument) => {
                    println!("Currencies: {}", view.list_currencies(&group, &op, &instrument).join(", "));
                }
                None => {
                    println!("Instrument types: {}", view.list_instrument_types(&group, &op).join(", "));
                    println!("Currencies: {}", view.list_currencies_for_operation(&group, &op).join(", "));
                }
            }
        }
        Commands::Fee {
            group,
            op,
            instrument,
            currency,
        } => {
            let view = catalog.current().await?;
            match view.find_fee(&group, &op, &instrument, &currency) {
                Some(fee) => print_fees(&[fee]),
                None => println!("No current fee for that combination."),
            }
        }
        Commands::Fees { group, op, currency } => {
            let view = catalog.current().await?;
            let fees = view.list_fees_by_currency(&group, &op, &currency);
            if fees.is_empty() {
                println!("No current fees for that combination.");
            } else {
                print_fees(&fees);
            }
        }
        Commands::Lookup {
            account,
            op,
            currency,
            username,
            client_id,
        } => {
            let esco = Arc::new(EscoClient::new(&config.esco));
            esco.set_credentials(
                username.as_deref().unwrap_or(&config.esco.username),
                &config.esco.password,
                client_id.as_deref().unwrap_or(&config.esco.client_id),
            )
            .await;

            let service = FeeLookupService::new(catalog.clone(), esco);
            let report = service
                .lookup(&AccountFeeRequest {
                    account,
                    operation: op.clone(),
                    currency: currency.clone(),
                })
                .await?;

            info!("Lookup finished for account {}", report.account);
            println!("Account:    {}", report.account);
            println!("Fee group:  {} (code {})", report.group_name, report.group_code);
            println!("Operations:");
            for operation in &report.operations {
                println!("  {:<8} {}", operation.abbreviation, operation.description);
            }
            if op.is_some() {
                println!("Currencies: {}", report.currencies.join(", "));
            }
            if op.is_some() && currency.is_some() {
                if report.fees.is_empty() {
                    println!("No current fees for that combination.");
                } else {
                    print_fees(&report.fees.iter().collect::<Vec<_>>());
                }
            }
        }
    }

    Ok(())
}

fn print_fees(fees: &[&FeeRow]) {
    println!(
        "{:<24} {:<6} {:>12} {:>12} {:<8} {}",
        "Instrument", "Cur", "Pct", "Minimum", "Charge", "Effective"
    );
    for fee in fees {
        println!(
            "{:<24} {:<6} {:>12} {:>12} {:<8} {}",
            fee.instrument_type,
            fee.currency_symbol,
            fee.fee_percentage.map(|d| d.to_string()).unwrap_or_default(),
            fee.fee_minimum.map(|d| d.to_string()).unwrap_or_default(),
            fee.fee_charge_currency,
            fee.effective_date_iso()
        );
    }
}
