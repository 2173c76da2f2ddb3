//! Recovery domain errors

use core_kernel::Amount;
use domain_ledger::LedgerError;
use thiserror::Error;

use crate::tariff::TariffError;

/// Errors that can occur in the recovery domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Manual allocation larger than what the payment still holds in reserve
    #[error("Over-allocation: requested {requested}, reserved {reserved}")]
    OverAllocation {
        requested: Amount,
        reserved: Amount,
    },

    #[error("Payment {0} has already been reversed to the creditor")]
    AlreadyReversed(String),

    /// A manual split does not add up to the payment amount
    #[error("Allocation mismatch: payment of {amount} split into {split_total}")]
    AllocationMismatch {
        amount: Amount,
        split_total: Amount,
    },

    #[error("Recovery case {0} is closed")]
    CaseClosed(String),

    #[error("Recovery case not found: {0}")]
    CaseNotFound(String),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Payment {payment} does not belong to case {case}")]
    PaymentCaseMismatch {
        payment: String,
        case: String,
    },

    #[error("Payment {0} was reversed; its creditor share can no longer change")]
    ReversedPaymentLocked(String),

    /// Running totals of a case disagree with its payments
    #[error("Inconsistent {field} total: case holds {recorded}, payments give {computed}")]
    InconsistentTotals {
        field: String,
        recorded: Amount,
        computed: Amount,
    },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: String,
        to: String,
    },

    #[error("Tariff error: {0}")]
    Tariff(#[from] TariffError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
