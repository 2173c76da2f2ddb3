//! Administration error handling

use core_kernel::TemporalError;
use domain_ledger::LedgerError;
use infra_db::DatabaseError;
use thiserror::Error;

/// Errors raised by the administration commands
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Usage: {0}")]
    Usage(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl AdminError {
    pub fn usage(message: impl Into<String>) -> Self {
        AdminError::Usage(message.into())
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AdminError::Usage(_) => 2,
            AdminError::Config(_) => 3,
            _ => 1,
        }
    }
}
