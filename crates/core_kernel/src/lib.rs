//! Core Kernel - Foundational types for the ledger and settlement engine
//!
//! This crate provides the building blocks shared by the ledger and recovery domains:
//! - FCFA amounts and rates with exact decimal arithmetic
//! - Inclusive date ranges and the office timezone
//! - Strongly-typed identifiers
//! - Port marker traits implemented by persistence adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Amount, Rate, MoneyError};
pub use temporal::{DateRange, Timezone, TemporalError};
pub use identifiers::{
    IdError, AccountId, JournalId, PeriodId, EntryId, LineId, ReconciliationId,
    TemplateId, CaseId, PaymentId, AllocationId, PartyId,
};
pub use ports::{DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable, OperationMetadata};
