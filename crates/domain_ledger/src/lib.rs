//! Ledger Domain - Double-Entry Bookkeeping under SYSCOHADA
//!
//! This crate implements the general ledger of a bailiff office: the OHADA
//! chart of accounts, journals, accounting periods, balanced entries with
//! sequential numbering, lettrage of third-party accounts, and the trial
//! balance and general ledger reports.
//!
//! # Double-Entry Rules
//!
//! - Every line carries either a debit or a credit, never both
//! - A validated entry has equal debit and credit totals
//! - Validated entries are immutable; corrections go through a reversing entry
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{Ledger, EntryDraft, LineDraft};
//!
//! let draft = EntryDraft::new("CA", date, "Honoraires dossier 2024-017")
//!     .line(LineDraft::debit("571", amount))
//!     .line(LineDraft::credit("706", amount));
//!
//! let entry = ledger.post(draft)?;
//! ```

pub mod account;
pub mod journal;
pub mod period;
pub mod entry;
pub mod numbering;
pub mod reconciliation;
pub mod reports;
pub mod template;
pub mod ledger;
pub mod error;

pub use account::{Account, AccountClass, AccountKind, BalanceSide, ChartOfAccounts};
pub use journal::{Journal, JournalRegistry, JournalType};
pub use period::{AccountingPeriod, PeriodStatus};
pub use entry::{EntryDraft, EntryOrigin, EntryStatus, LedgerEntry, LedgerLine, LineDraft};
pub use numbering::EntrySequences;
pub use reconciliation::{Reconciliation, ReconciliationCode, ReconciliationEngine};
pub use reports::{
    BalanceScope, BalanceSheet, GeneralLedger, GeneralLedgerRow, IncomeStatement, StatementLine, TrialBalance,
    TrialBalanceRow,
};
pub use template::OperationTemplate;
pub use ledger::Ledger;
pub use error::LedgerError;
