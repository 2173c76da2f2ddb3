//! Ledger administration tool
//!
//! # Usage
//!
//! ```bash
//! # Create the schema, install the standard ledger and open 2024
//! ledger-admin bootstrap --year 2024
//!
//! # With an explicit database
//! LEDGER__DATABASE__URL=postgres://... ledger-admin trial-balance 2024
//! ```
//!
//! # Environment Variables
//!
//! * `LEDGER__DATABASE__URL` - PostgreSQL connection string
//! * `LEDGER__LOG__LEVEL` - trace, debug, info, warn, error (default: info)
//! * `LEDGER__LOG__FORMAT` - plain or json (default: plain)
//! * `LEDGER__TIMEZONE` - office timezone (default: Africa/Porto-Novo)
//! * `LEDGER_CONFIG` - configuration file, same as `--config`
//! * `RUST_LOG` - overrides the log level

use anyhow::Context;
use clap::Parser;
use interface_admin::{init_tracing, AppConfig, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log);

    tracing::info!(command = ?cli.command, timezone = config.timezone.name(), "Running ledger-admin");

    match cli.command.run(&config).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
