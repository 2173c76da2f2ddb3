//! Repository implementations for the ledger and recovery domains
//!
//! Repositories load domain values from rows, run the domain checks, and
//! write the result inside one transaction. A rejected operation leaves
//! the database as it was.
//!
//! # Serialization points
//!
//! - Entry numbers: one counter row per journal + month prefix, bumped
//!   with an atomic upsert
//! - Lettrage codes: the account row is locked while its counter moves
//! - Payments: the case row is locked with `SELECT ... FOR UPDATE`

/// Two-way conversions between a domain enum and its Postgres twin
macro_rules! db_enum_conversions {
    ($db:ident <=> $domain:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                match value {
                    $($domain::$variant => $db::$variant,)+
                }
            }
        }

        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => $domain::$variant,)+
                }
            }
        }
    };
}

pub mod ledger;
pub mod recovery;

pub use ledger::LedgerRepository;
pub use recovery::RecoveryRepository;

use chrono::Utc;
use core_kernel::{AdapterHealth, HealthCheckResult};
use sqlx::PgPool;

/// Runs `SELECT 1` and reports how the database answered
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = std::time::Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        },
        Err(e) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(format!("Database error: {}", e)),
            checked_at: Utc::now(),
        },
    }
}
