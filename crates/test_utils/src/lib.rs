//! Test Utilities Crate
//!
//! Shared test infrastructure for the ledger and recovery test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builders for entry drafts and recovery cases
//! - `database`: PostgreSQL test containers with migrations applied
//! - `assertions`: Assertion helpers for entries, balances and case totals
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
