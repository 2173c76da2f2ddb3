//! Application configuration
//!
//! Loaded once at start-up from, in order of precedence: environment
//! variables prefixed `LEDGER` (nested keys joined with `__`, e.g.
//! `LEDGER__DATABASE__URL`), the configuration file, and the built-in
//! defaults. The file is `ledger-admin.toml` when present unless one is
//! named explicitly, in which case it must exist.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use core_kernel::Timezone;
use domain_recovery::SettlementConfig;
use infra_db::DatabaseConfig;
use serde::Deserialize;

use crate::error::AdminError;

/// Name of the optional configuration file, without extension
pub const CONFIG_FILE: &str = "ledger-admin";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub log: LogSettings,
    /// Office timezone; "today" for defaulted years and dates is taken here
    pub timezone: Timezone,
    pub settlement: SettlementConfig,
}

/// Database connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub lock_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/ledger".to_string(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 30,
            lock_timeout_secs: 5,
        }
    }
}

impl DatabaseSettings {
    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.url.clone())
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .lock_timeout(Duration::from_secs(self.lock_timeout_secs))
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Logging settings; `RUST_LOG` takes precedence over `level`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, AdminError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_FILE).required(false),
        };
        Self::build(
            Config::builder()
                .add_source(file)
                .add_source(Environment::with_prefix("LEDGER").separator("__")),
        )
    }

    /// Loads configuration from a TOML document only
    pub fn from_toml(document: &str) -> Result<Self, AdminError> {
        Self::build(Config::builder().add_source(File::from_str(document, FileFormat::Toml)))
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self, AdminError> {
        Ok(builder.build()?.try_deserialize()?)
    }
}
