//! Payments collected on a recovery case

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Amount, CaseId, PaymentId};
use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationCategory, AllocationSplit};
use crate::error::RecoveryError;

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Cheque,
    Transfer,
    MobileMoney,
    Other,
}

impl PaymentMode {
    /// Cash goes through the till, everything else through the bank
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMode::Cash)
    }
}

/// Input for registering a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub date: NaiveDate,
    pub mode: PaymentMode,
    pub reference: Option<String>,
    pub observations: Option<String>,
    /// Used verbatim instead of the allocation policy
    pub manual_split: Option<AllocationSplit>,
}

impl PaymentRequest {
    pub fn new(amount: Amount, date: NaiveDate, mode: PaymentMode) -> Self {
        Self {
            amount,
            date,
            mode,
            reference: None,
            observations: None,
            manual_split: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = Some(observations.into());
        self
    }

    pub fn with_split(mut self, split: AllocationSplit) -> Self {
        self.manual_split = Some(split);
        self
    }
}

/// A payment and how it was allocated
///
/// `allocation.total()` always equals `amount`, and `due_to_creditor`
/// always equals `allocation.creditor_share()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub case_id: CaseId,
    pub date: NaiveDate,
    pub amount: Amount,
    pub mode: PaymentMode,
    pub reference: Option<String>,
    pub observations: Option<String>,
    pub allocation: AllocationSplit,
    pub due_to_creditor: Amount,
    pub reversed: bool,
    pub reversed_on: Option<NaiveDate>,
    pub reversal_reference: Option<String>,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(case_id: CaseId, request: PaymentRequest, allocation: AllocationSplit, actor: impl Into<String>) -> Self {
        Self {
            id: PaymentId::new(),
            case_id,
            date: request.date,
            amount: request.amount,
            mode: request.mode,
            reference: request.reference,
            observations: request.observations,
            due_to_creditor: allocation.creditor_share(),
            allocation,
            reversed: false,
            reversed_on: None,
            reversal_reference: None,
            recorded_by: actor.into(),
            recorded_at: Utc::now(),
        }
    }

    pub fn reserved(&self) -> Amount {
        self.allocation.reserved
    }

    pub fn ensure_belongs_to(&self, case_id: &CaseId) -> Result<(), RecoveryError> {
        if &self.case_id != case_id {
            return Err(RecoveryError::PaymentCaseMismatch {
                payment: self.id.to_string(),
                case: case_id.to_string(),
            });
        }
        Ok(())
    }

    /// Moves part of the reserve into a category
    pub fn allocate(&mut self, category: AllocationCategory, amount: Amount) -> Result<(), RecoveryError> {
        if !amount.is_positive() {
            return Err(RecoveryError::InvalidAmount(format!("allocation of {} must be positive", amount)));
        }
        if amount > self.allocation.reserved {
            return Err(RecoveryError::OverAllocation {
                requested: amount,
                reserved: self.allocation.reserved,
            });
        }
        if self.reversed && category.is_creditor_share() {
            return Err(RecoveryError::ReversedPaymentLocked(self.id.to_string()));
        }

        self.allocation.reserved -= amount;
        self.allocation.add(category, amount);
        self.due_to_creditor = self.allocation.creditor_share();
        Ok(())
    }

    /// Marks the creditor share as paid out
    pub fn mark_reversed(&mut self, date: NaiveDate, reference: Option<String>) -> Result<(), RecoveryError> {
        if self.reversed {
            return Err(RecoveryError::AlreadyReversed(self.id.to_string()));
        }
        self.reversed = true;
        self.reversed_on = Some(date);
        self.reversal_reference = reference;
        Ok(())
    }
}
