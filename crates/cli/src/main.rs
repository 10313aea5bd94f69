//! Realm Export - App Services user export tool for migration.
//!
//! # Usage
//!
//! ```bash
//! # Dry run: fetch everything, log a summary, write nothing
//! realm-export --dry-run
//!
//! # Full export into exports/users.json
//! realm-export --output-file users.json --pending-user-date 2020-12-01
//!
//! # Verbose logging (includes API error bodies)
//! realm-export --verbose --dry-run
//! ```
//!
//! # Environment Variables
//!
//! - `REALM_USERNAME` - Atlas programmatic API public key
//! - `REALM_API_KEY` - Atlas programmatic API private key
//! - `REALM_GROUP_ID` - Atlas project (group) ID
//! - `REALM_APP_ID` - App Services application ID
//!
//! All four are required and validated before any network call. A `.env`
//! file in the working directory is honored.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::Parser;

use realm_export_cli::commands;
use realm_export_cli::commands::export::ExportOptions;
use realm_export_cli::config::ExporterConfig;

/// Default `createdAt` date stamped onto pending users, which the server
/// stores without a creation timestamp.
const DEFAULT_PENDING_USER_DATE: &str = "2021-01-01";

#[derive(Parser)]
#[command(name = "realm-export")]
#[command(version, about = "Export App Services users and pending users for migration")]
struct Cli {
    /// Fetch and summarize without writing a file
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging (includes API error bodies)
    #[arg(long)]
    verbose: bool,

    /// Page size requested from the admin API
    #[arg(long, default_value_t = 100)]
    batch_size: u32,

    /// Output file name; always placed inside the exports/ directory
    #[arg(long)]
    output_file: Option<String>,

    /// Date (YYYY-MM-DD) stamped onto pending users as their creation date
    #[arg(long, default_value = DEFAULT_PENDING_USER_DATE)]
    pending_user_date: NaiveDate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Export failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing; `--verbose` raises the default level to debug.
/// An explicit `RUST_LOG` still wins.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Config is validated before any network call
    let config = ExporterConfig::from_env()?;

    let options = ExportOptions {
        dry_run: cli.dry_run,
        batch_size: cli.batch_size,
        output_file: cli.output_file,
        pending_user_date: cli.pending_user_date,
    };

    commands::export::run(&config, &options).await?;
    Ok(())
}
