//! Recovery case file

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Amount, CaseId, PartyId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::allocation::{AllocationCategory, AllocationSplit};
use crate::error::RecoveryError;

/// Recovery procedure type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryType {
    Amicable,
    Forced,
}

/// How collected funds are billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// Ordered allocation of every payment
    #[default]
    Standard,
    /// Everything goes to reserve until allocated by hand
    Reserved,
    /// Fees and tariff are invoiced to the bank separately
    Bank,
}

/// Case status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Open,
    Suspended,
    Closed,
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStatus::Open => "open",
            CaseStatus::Suspended => "suspended",
            CaseStatus::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Why a case was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    Recovered,
    Irrecoverable,
    Abandoned,
    Prescription,
    Settlement,
    Other,
}

/// Running totals maintained on the case as payments come in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaseTotals {
    pub paid: Amount,
    pub fees: Amount,
    pub tariff: Amount,
    pub interest: Amount,
    pub principal: Amount,
    pub reserved: Amount,
    /// Cumulative creditor share, reversed or not
    pub due_to_creditor: Amount,
    pub reversed: Amount,
}

impl CaseTotals {
    pub fn allocated(&self, category: AllocationCategory) -> Amount {
        match category {
            AllocationCategory::Fees => self.fees,
            AllocationCategory::Tariff => self.tariff,
            AllocationCategory::Interest => self.interest,
            AllocationCategory::Principal => self.principal,
        }
    }

    /// Adds a freshly registered payment
    pub fn record_payment(&mut self, amount: Amount, split: &AllocationSplit) {
        self.paid += amount;
        self.fees += split.fees;
        self.tariff += split.tariff;
        self.interest += split.interest;
        self.principal += split.principal;
        self.reserved += split.reserved;
        self.due_to_creditor += split.creditor_share();
    }

    /// Moves an amount out of reserve into a category
    pub fn record_allocation(&mut self, category: AllocationCategory, amount: Amount) {
        self.reserved -= amount;
        match category {
            AllocationCategory::Fees => self.fees += amount,
            AllocationCategory::Tariff => self.tariff += amount,
            AllocationCategory::Interest => self.interest += amount,
            AllocationCategory::Principal => self.principal += amount,
        }
        if category.is_creditor_share() {
            self.due_to_creditor += amount;
        }
    }

    /// Creditor share not yet reversed
    pub fn pending_due_to_creditor(&self) -> Amount {
        self.due_to_creditor - self.reversed
    }
}

/// Input for opening a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenCaseRequest {
    pub reference: String,
    pub creditor_id: PartyId,
    pub debtor_id: PartyId,
    pub recovery_type: RecoveryType,
    pub billing_mode: Option<BillingMode>,
    pub principal: Amount,
    pub interest: Amount,
    pub procedure_fees: Amount,
    pub opened_on: NaiveDate,
}

impl OpenCaseRequest {
    pub fn new(
        reference: impl Into<String>,
        creditor_id: PartyId,
        debtor_id: PartyId,
        recovery_type: RecoveryType,
        principal: Amount,
        opened_on: NaiveDate,
    ) -> Self {
        Self {
            reference: reference.into(),
            creditor_id,
            debtor_id,
            recovery_type,
            billing_mode: None,
            principal,
            interest: Amount::ZERO,
            procedure_fees: Amount::ZERO,
            opened_on,
        }
    }

    pub fn with_interest(mut self, interest: Amount) -> Self {
        self.interest = interest;
        self
    }

    pub fn with_procedure_fees(mut self, fees: Amount) -> Self {
        self.procedure_fees = fees;
        self
    }

    pub fn with_billing_mode(mut self, mode: BillingMode) -> Self {
        self.billing_mode = Some(mode);
        self
    }
}

/// A debt recovery case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryCase {
    pub id: CaseId,
    pub reference: String,
    pub creditor_id: PartyId,
    pub debtor_id: PartyId,
    pub recovery_type: RecoveryType,
    pub billing_mode: BillingMode,
    pub status: CaseStatus,
    pub closure_reason: Option<ClosureReason>,
    pub principal: Amount,
    pub interest: Amount,
    pub procedure_fees: Amount,
    pub tariff_fee: Amount,
    pub totals: CaseTotals,
    pub opened_on: NaiveDate,
    pub closed_at: Option<DateTime<Utc>>,
}

impl RecoveryCase {
    /// Amount due in a category
    pub fn due(&self, category: AllocationCategory) -> Amount {
        match category {
            AllocationCategory::Fees => self.procedure_fees,
            AllocationCategory::Tariff => self.tariff_fee,
            AllocationCategory::Interest => self.interest,
            AllocationCategory::Principal => self.principal,
        }
    }

    /// Due minus already allocated, floored at zero
    pub fn remaining(&self, category: AllocationCategory) -> Amount {
        self.due(category).remaining_after(self.totals.allocated(category))
    }

    pub fn total_due(&self) -> Amount {
        AllocationCategory::ORDER.iter().map(|c| self.due(*c)).sum()
    }

    pub fn is_closed(&self) -> bool {
        self.status == CaseStatus::Closed
    }

    /// Open and suspended cases accept payments
    pub fn ensure_accepts_payments(&self) -> Result<(), RecoveryError> {
        if self.is_closed() {
            return Err(RecoveryError::CaseClosed(self.reference.clone()));
        }
        Ok(())
    }

    pub fn suspend(&mut self) -> Result<(), RecoveryError> {
        self.transition(CaseStatus::Open, CaseStatus::Suspended)
    }

    pub fn resume(&mut self) -> Result<(), RecoveryError> {
        self.transition(CaseStatus::Suspended, CaseStatus::Open)
    }

    /// Closes the case for good
    pub fn close(&mut self, reason: ClosureReason) -> Result<(), RecoveryError> {
        self.ensure_accepts_payments()?;
        self.status = CaseStatus::Closed;
        self.closure_reason = Some(reason);
        self.closed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, from: CaseStatus, to: CaseStatus) -> Result<(), RecoveryError> {
        if self.status != from {
            return Err(RecoveryError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}
