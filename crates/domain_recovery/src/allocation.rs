//! Allocation buckets of a payment

use chrono::{DateTime, Utc};
use core_kernel::{AllocationId, Amount, CaseId, PaymentId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RecoveryError;

/// Category a collected amount is allocated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationCategory {
    /// Procedure fees engaged by the office
    Fees,
    /// Statutory tariff fee
    Tariff,
    Interest,
    Principal,
}

impl AllocationCategory {
    /// Canonical allocation order
    pub const ORDER: [AllocationCategory; 4] = [
        AllocationCategory::Fees,
        AllocationCategory::Tariff,
        AllocationCategory::Interest,
        AllocationCategory::Principal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationCategory::Fees => "fees",
            AllocationCategory::Tariff => "tariff",
            AllocationCategory::Interest => "interest",
            AllocationCategory::Principal => "principal",
        }
    }

    /// Interest and principal are owed to the creditor
    pub fn is_creditor_share(&self) -> bool {
        matches!(self, AllocationCategory::Interest | AllocationCategory::Principal)
    }
}

impl fmt::Display for AllocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a payment amount is spread over the categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllocationSplit {
    pub fees: Amount,
    pub tariff: Amount,
    pub interest: Amount,
    pub principal: Amount,
    /// Collected but not yet allocated
    pub reserved: Amount,
}

impl AllocationSplit {
    pub fn new(fees: Amount, tariff: Amount, interest: Amount, principal: Amount, reserved: Amount) -> Self {
        Self { fees, tariff, interest, principal, reserved }
    }

    /// Everything held in reserve
    pub fn reserved(amount: Amount) -> Self {
        Self { reserved: amount, ..Self::default() }
    }

    pub fn get(&self, category: AllocationCategory) -> Amount {
        match category {
            AllocationCategory::Fees => self.fees,
            AllocationCategory::Tariff => self.tariff,
            AllocationCategory::Interest => self.interest,
            AllocationCategory::Principal => self.principal,
        }
    }

    pub fn add(&mut self, category: AllocationCategory, amount: Amount) {
        match category {
            AllocationCategory::Fees => self.fees += amount,
            AllocationCategory::Tariff => self.tariff += amount,
            AllocationCategory::Interest => self.interest += amount,
            AllocationCategory::Principal => self.principal += amount,
        }
    }

    /// Sum of every bucket, reserve included
    pub fn total(&self) -> Amount {
        self.allocated() + self.reserved
    }

    /// Sum of the four categories
    pub fn allocated(&self) -> Amount {
        self.fees + self.tariff + self.interest + self.principal
    }

    /// Amount owed to the creditor: interest plus principal
    pub fn creditor_share(&self) -> Amount {
        self.interest + self.principal
    }

    /// Checks a manually supplied split against the payment amount
    pub fn check_against(&self, amount: Amount) -> Result<(), RecoveryError> {
        let buckets = [self.fees, self.tariff, self.interest, self.principal, self.reserved];
        if buckets.iter().any(Amount::is_negative) {
            return Err(RecoveryError::InvalidAmount("allocation buckets cannot be negative".to_string()));
        }
        if self.total() != amount {
            return Err(RecoveryError::AllocationMismatch {
                amount,
                split_total: self.total(),
            });
        }
        Ok(())
    }
}

/// Audit record of a reserved amount moved into a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAllocation {
    pub id: AllocationId,
    pub payment_id: PaymentId,
    pub case_id: CaseId,
    pub category: AllocationCategory,
    pub amount: Amount,
    pub allocated_at: DateTime<Utc>,
    pub actor: String,
    pub observations: Option<String>,
}

impl ManualAllocation {
    pub fn new(
        payment_id: PaymentId,
        case_id: CaseId,
        category: AllocationCategory,
        amount: Amount,
        actor: impl Into<String>,
        observations: Option<String>,
    ) -> Self {
        Self {
            id: AllocationId::new(),
            payment_id,
            case_id,
            category,
            amount,
            allocated_at: Utc::now(),
            actor: actor.into(),
            observations: observations.filter(|o| !o.trim().is_empty()),
        }
    }
}
