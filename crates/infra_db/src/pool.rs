//! Connection pool and embedded migrations
//!
//! Every session is tagged with an application name and a lock timeout, so
//! a payment waiting on a locked case row fails instead of hanging.

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use crate::error::DatabaseError;

pub type DatabasePool = PgPool;

/// Schema migrations embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Pool settings
///
/// ```rust
/// use infra_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("postgres://localhost/ledger")
///     .max_connections(4)
///     .lock_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_connections, 4);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long to wait for a free connection
    pub connect_timeout: Duration,
    /// Upper bound on waiting for a row lock
    pub lock_timeout: Duration,
    pub application_name: String,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            lock_timeout: Duration::from_secs(5),
            application_name: "ledger-admin".to_string(),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Connection options derived from the URL and session settings
    pub fn connect_options(&self) -> Result<PgConnectOptions, DatabaseError> {
        let lock_timeout = format!("{}ms", self.lock_timeout.as_millis());
        Ok(PgConnectOptions::from_str(&self.url)
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?
            .application_name(&self.application_name)
            .options([("lock_timeout", lock_timeout.as_str())]))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("postgres://localhost/ledger")
    }
}

/// Opens a pool
///
/// # Errors
///
/// `DatabaseError::ConnectionFailed` when the URL is malformed or the
/// server cannot be reached within `connect_timeout`.
pub async fn create_pool(config: DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(
        max_connections = config.max_connections,
        application = %config.application_name,
        "Database pool ready"
    );
    Ok(pool)
}

pub async fn create_pool_from_url(url: &str) -> Result<DatabasePool, DatabaseError> {
    create_pool(DatabaseConfig::new(url)).await
}

/// Applies every pending migration
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!(migrations = MIGRATOR.iter().count(), "Running database migrations");
    MIGRATOR.run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.lock_timeout, Duration::from_secs(5));
        assert_eq!(config.application_name, "ledger-admin");
    }

    #[test]
    fn test_connect_options_from_url() {
        let options = DatabaseConfig::new("postgres://clerk:secret@db:5433/office")
            .application_name("ledger-tests")
            .connect_options()
            .unwrap();

        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("office"));
        assert_eq!(options.get_application_name(), Some("ledger-tests"));
    }

    #[test]
    fn test_malformed_url_is_refused() {
        let result = DatabaseConfig::new("not a url").connect_options();
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
    }

    #[test]
    fn test_migrations_are_embedded() {
        assert!(MIGRATOR.iter().count() >= 2);
    }
}
