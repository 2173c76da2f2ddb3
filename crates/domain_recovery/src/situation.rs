//! Case situation and payment history
//!
//! Both views are recomputed from the payments alone, so they can be
//! compared with the running totals the case maintains incrementally.

use chrono::NaiveDate;
use core_kernel::{Amount, CaseId, PaymentId};
use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationCategory, AllocationSplit};
use crate::case::{CaseTotals, RecoveryCase, RecoveryType};
use crate::error::RecoveryError;
use crate::payment::{Payment, PaymentMode};
use crate::tariff::FeeBreakdown;

/// Rebuilds a case's running totals from its payments
pub fn recompute_totals<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> CaseTotals {
    let mut totals = CaseTotals::default();
    for payment in payments {
        totals.record_payment(payment.amount, &payment.allocation);
        if payment.reversed {
            totals.reversed += payment.due_to_creditor;
        }
    }
    totals
}

/// Due, allocated and remaining amounts for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySituation {
    pub due: Amount,
    pub allocated: Amount,
    /// Floored at zero
    pub remaining: Amount,
}

impl CategorySituation {
    fn new(due: Amount, allocated: Amount) -> Self {
        Self {
            due,
            allocated,
            remaining: due.remaining_after(allocated),
        }
    }
}

/// Financial situation of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSituation {
    pub case_id: CaseId,
    pub reference: String,
    pub recovery_type: RecoveryType,
    pub fees: CategorySituation,
    pub tariff: CategorySituation,
    pub interest: CategorySituation,
    pub principal: CategorySituation,
    pub total_due: Amount,
    pub total_paid: Amount,
    pub total_reserved: Amount,
    pub total_due_to_creditor: Amount,
    pub pending_due_to_creditor: Amount,
    pub total_reversed: Amount,
    pub payment_count: usize,
    pub tariff_breakdown: FeeBreakdown,
    pub is_settled: bool,
    /// Totals recomputed from the payments
    pub totals: CaseTotals,
}

impl CaseSituation {
    pub(crate) fn build(case: &RecoveryCase, payments: &[Payment], tariff_breakdown: FeeBreakdown) -> Self {
        let totals = recompute_totals(payments);
        let category = |c: AllocationCategory| CategorySituation::new(case.due(c), totals.allocated(c));

        let interest = category(AllocationCategory::Interest);
        let principal = category(AllocationCategory::Principal);

        Self {
            case_id: case.id,
            reference: case.reference.clone(),
            recovery_type: case.recovery_type,
            fees: category(AllocationCategory::Fees),
            tariff: category(AllocationCategory::Tariff),
            interest,
            principal,
            total_due: case.total_due(),
            total_paid: totals.paid,
            total_reserved: totals.reserved,
            total_due_to_creditor: totals.due_to_creditor,
            pending_due_to_creditor: totals.pending_due_to_creditor(),
            total_reversed: totals.reversed,
            payment_count: payments.len(),
            tariff_breakdown,
            is_settled: principal.remaining.is_zero() && interest.remaining.is_zero(),
            totals,
        }
    }

    pub fn category(&self, category: AllocationCategory) -> &CategorySituation {
        match category {
            AllocationCategory::Fees => &self.fees,
            AllocationCategory::Tariff => &self.tariff,
            AllocationCategory::Interest => &self.interest,
            AllocationCategory::Principal => &self.principal,
        }
    }

    /// Checks the recomputed totals against the case's running totals
    pub fn verify_against(&self, case: &RecoveryCase) -> Result<(), RecoveryError> {
        let recorded = &case.totals;
        let computed = &self.totals;
        let checks = [
            ("paid", recorded.paid, computed.paid),
            ("fees", recorded.fees, computed.fees),
            ("tariff", recorded.tariff, computed.tariff),
            ("interest", recorded.interest, computed.interest),
            ("principal", recorded.principal, computed.principal),
            ("reserved", recorded.reserved, computed.reserved),
            ("due_to_creditor", recorded.due_to_creditor, computed.due_to_creditor),
            ("reversed", recorded.reversed, computed.reversed),
        ];

        for (field, recorded, computed) in checks {
            if recorded != computed {
                return Err(RecoveryError::InconsistentTotals {
                    field: field.to_string(),
                    recorded,
                    computed,
                });
            }
        }
        Ok(())
    }
}

/// Running totals after each payment of the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CumulativeTotals {
    pub paid: Amount,
    pub fees: Amount,
    pub tariff: Amount,
    pub interest: Amount,
    pub principal: Amount,
}

/// One line of the payment history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReportRow {
    pub payment_id: PaymentId,
    pub date: NaiveDate,
    pub amount: Amount,
    pub mode: PaymentMode,
    pub reference: Option<String>,
    pub allocation: AllocationSplit,
    pub due_to_creditor: Amount,
    pub reversed: bool,
    pub reversed_on: Option<NaiveDate>,
    pub cumulative: CumulativeTotals,
}

/// Chronological payment history of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReport {
    pub case_id: CaseId,
    pub reference: String,
    pub rows: Vec<PaymentReportRow>,
    pub totals: CumulativeTotals,
    pub total_reserved: Amount,
    pub total_reversed: Amount,
    pub pending_due_to_creditor: Amount,
}

impl PaymentReport {
    pub(crate) fn build(case: &RecoveryCase, payments: &[Payment]) -> Self {
        let mut ordered: Vec<&Payment> = payments.iter().collect();
        ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.recorded_at.cmp(&b.recorded_at)));

        let mut cumulative = CumulativeTotals::default();
        let mut total_reserved = Amount::ZERO;
        let mut total_reversed = Amount::ZERO;
        let mut pending = Amount::ZERO;
        let mut rows = Vec::with_capacity(ordered.len());

        for payment in ordered {
            cumulative.paid += payment.amount;
            cumulative.fees += payment.allocation.fees;
            cumulative.tariff += payment.allocation.tariff;
            cumulative.interest += payment.allocation.interest;
            cumulative.principal += payment.allocation.principal;
            total_reserved += payment.allocation.reserved;
            if payment.reversed {
                total_reversed += payment.due_to_creditor;
            } else {
                pending += payment.due_to_creditor;
            }

            rows.push(PaymentReportRow {
                payment_id: payment.id,
                date: payment.date,
                amount: payment.amount,
                mode: payment.mode,
                reference: payment.reference.clone(),
                allocation: payment.allocation,
                due_to_creditor: payment.due_to_creditor,
                reversed: payment.reversed,
                reversed_on: payment.reversed_on,
                cumulative,
            });
        }

        Self {
            case_id: case.id,
            reference: case.reference.clone(),
            rows,
            totals: cumulative,
            total_reserved,
            total_reversed,
            pending_due_to_creditor: pending,
        }
    }
}
