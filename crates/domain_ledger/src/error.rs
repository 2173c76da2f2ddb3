//! Ledger domain errors

use chrono::NaiveDate;
use core_kernel::Amount;
use thiserror::Error;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Debit and credit totals differ at validation
    #[error("Unbalanced entry: debit={debit}, credit={credit}")]
    UnbalancedEntry {
        debit: Amount,
        credit: Amount,
    },

    /// Entry date outside the period, or the period is closed
    #[error("Invalid period for {date}: {reason}")]
    InvalidPeriod {
        date: NaiveDate,
        reason: String,
    },

    /// A line breaks the debit XOR credit rule
    #[error("Line constraint violated on account {account}: {reason}")]
    LineConstraint {
        account: String,
        reason: String,
    },

    /// Lines submitted for lettrage span more than one account
    #[error("Reconciliation mismatch: line on account {found} cannot be matched on {expected}")]
    ReconciliationMismatch {
        expected: String,
        found: String,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Account {0} is referenced by ledger lines")]
    AccountInUse(String),

    #[error("Account is inactive: {0}")]
    AccountInactive(String),

    #[error("Invalid account number: {0}")]
    InvalidAccountNumber(String),

    #[error("Journal not found: {0}")]
    JournalNotFound(String),

    #[error("Journal already exists: {0}")]
    JournalAlreadyExists(String),

    #[error("Journal is inactive: {0}")]
    JournalInactive(String),

    #[error("Invalid journal code: {0}")]
    InvalidJournalCode(String),

    #[error("Accounting period not found: {0}")]
    PeriodNotFound(String),

    /// Another open period already covers part of the range
    #[error("Period {label} overlaps open period {existing}")]
    PeriodOverlap {
        label: String,
        existing: String,
    },

    #[error("Period {label} still holds {drafts} draft entries")]
    PeriodHasDrafts {
        label: String,
        drafts: usize,
    },

    #[error("Invalid period bounds: {0}")]
    InvalidPeriodBounds(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Validated and cancelled entries cannot be edited
    #[error("Entry {number} is {status} and cannot be modified")]
    ImmutableEntry {
        number: String,
        status: String,
    },

    #[error("Entry {0} is not validated")]
    EntryNotValidated(String),

    #[error("Entry has no lines")]
    EmptyEntry,

    #[error("Line not found: {0}")]
    LineNotFound(String),

    #[error("Line {0} belongs to an entry that is not validated")]
    LineNotValidated(String),

    #[error("Line {line} is already reconciled under {code}")]
    LineAlreadyReconciled {
        line: String,
        code: String,
    },

    #[error("Account {0} is not a third-party account")]
    NotThirdPartyAccount(String),

    #[error("Reconciliation not found: {0}")]
    ReconciliationNotFound(String),

    #[error("Nothing to reconcile")]
    EmptyReconciliation,

    #[error("Reconciliation codes exhausted for account {0}")]
    CodeSpaceExhausted(String),

    #[error("Invalid reconciliation code: {0}")]
    InvalidReconciliationCode(String),

    #[error("Operation template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
