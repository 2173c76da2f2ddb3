//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the ledger and the recovery desk, built on
//! SQLx with embedded migrations.
//!
//! # Architecture
//!
//! Repositories load domain values, let the domain crates decide, and
//! write the outcome back in a single transaction. Recovery operations
//! post their ledger entry inside the same transaction as the case and
//! payment updates, so money never moves on one side only.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool_from_url, run_migrations, LedgerRepository};
//!
//! let pool = create_pool_from_url("postgres://localhost/ledger").await?;
//! run_migrations(&pool).await?;
//! let ledger = LedgerRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
pub use error::DatabaseError;
pub use repositories::{LedgerRepository, RecoveryRepository};
