//! Administration Layer
//!
//! Start-up plumbing for the ledger: configuration loading, the tracing
//! subscriber, installation of the standard SYSCOHADA ledger, and the
//! commands behind the `ledger-admin` binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use clap::Parser;
//! use interface_admin::{AppConfig, Cli};
//!
//! let cli = Cli::parse_from(["ledger-admin", "bootstrap", "--year", "2024"]);
//! let config = AppConfig::load(cli.config.as_deref())?;
//! let output = cli.command.run(&config).await?;
//! ```

pub mod config;
pub mod error;
pub mod telemetry;
pub mod bootstrap;
pub mod command;

pub use config::{AppConfig, DatabaseSettings, LogFormat, LogSettings};
pub use error::AdminError;
pub use telemetry::init_tracing;
pub use bootstrap::{install_standard_ledger, open_fiscal_year, BootstrapReport};
pub use command::{year_or_current, Cli, Command};
