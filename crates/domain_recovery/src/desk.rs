//! In-memory recovery desk
//!
//! Keeps cases, payments and manual allocations, and posts every recovery
//! operation to the ledger in the same step. State is only committed once
//! the ledger posting has succeeded, so a failed posting leaves both the
//! desk and the ledger untouched.

use std::collections::HashMap;

use chrono::NaiveDate;
use core_kernel::{Amount, CaseId, EntryId, OperationMetadata, PaymentId};
use domain_ledger::Ledger;
use tracing::info;

use crate::allocation::{AllocationCategory, ManualAllocation};
use crate::case::{ClosureReason, OpenCaseRequest, RecoveryCase};
use crate::error::RecoveryError;
use crate::payment::{Payment, PaymentRequest};
use crate::settlement::SettlementAllocator;
use crate::situation::{CaseSituation, PaymentReport};

/// Cases and payments of the office, posted to the ledger as they change
#[derive(Debug, Default)]
pub struct RecoveryDesk {
    allocator: SettlementAllocator,
    cases: HashMap<CaseId, RecoveryCase>,
    payments: HashMap<PaymentId, Payment>,
    allocations: Vec<ManualAllocation>,
}

impl RecoveryDesk {
    pub fn new(allocator: SettlementAllocator) -> Self {
        Self {
            allocator,
            ..Default::default()
        }
    }

    pub fn allocator(&self) -> &SettlementAllocator {
        &self.allocator
    }

    pub fn open_case(&mut self, request: OpenCaseRequest) -> Result<&RecoveryCase, RecoveryError> {
        let case = self.allocator.open_case(request)?;
        let id = case.id;
        Ok(self.cases.entry(id).or_insert(case))
    }

    pub fn case(&self, id: &CaseId) -> Result<&RecoveryCase, RecoveryError> {
        self.cases
            .get(id)
            .ok_or_else(|| RecoveryError::CaseNotFound(id.to_string()))
    }

    pub fn payment(&self, id: &PaymentId) -> Result<&Payment, RecoveryError> {
        self.payments
            .get(id)
            .ok_or_else(|| RecoveryError::PaymentNotFound(id.to_string()))
    }

    /// Payments of a case in registration order
    pub fn payments_of(&self, case_id: &CaseId) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .payments
            .values()
            .filter(|p| &p.case_id == case_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then(a.id.as_uuid().cmp(b.id.as_uuid())));
        payments
    }

    pub fn allocations_of(&self, payment_id: &PaymentId) -> impl Iterator<Item = &ManualAllocation> + '_ {
        let payment_id = *payment_id;
        self.allocations.iter().filter(move |a| a.payment_id == payment_id)
    }

    /// Registers a payment and posts its receipt
    pub fn register_payment(
        &mut self,
        ledger: &mut Ledger,
        case_id: &CaseId,
        request: PaymentRequest,
        meta: &OperationMetadata,
    ) -> Result<(Payment, EntryId), RecoveryError> {
        let case = self.case(case_id)?;
        let (next_case, payment) = self.allocator.register_payment(case, request, meta)?;

        let draft = self.allocator.config().posting.payment_receipt(&next_case, &payment)?;
        let entry_id = ledger.post(draft)?.id;

        self.cases.insert(next_case.id, next_case);
        self.payments.insert(payment.id, payment.clone());
        Ok((payment, entry_id))
    }

    /// Allocates part of a payment's reserve and posts the transfer
    pub fn allocate_reserved(
        &mut self,
        ledger: &mut Ledger,
        payment_id: &PaymentId,
        category: AllocationCategory,
        amount: Amount,
        date: NaiveDate,
        observations: Option<String>,
        meta: &OperationMetadata,
    ) -> Result<(ManualAllocation, EntryId), RecoveryError> {
        let payment = self.payment(payment_id)?;
        let case = self.case(&payment.case_id)?;
        let (next_case, next_payment, allocation) =
            self.allocator
                .allocate_reserved(case, payment, category, amount, observations, meta)?;

        let draft = self
            .allocator
            .config()
            .posting
            .reserved_allocation(&next_case, &next_payment, category, amount, date);
        let entry_id = ledger.post(draft)?.id;

        self.cases.insert(next_case.id, next_case);
        self.payments.insert(next_payment.id, next_payment);
        self.allocations.push(allocation.clone());
        Ok((allocation, entry_id))
    }

    /// Reverses a payment's creditor share and posts the bank transfer
    ///
    /// Returns `None` when nothing was due to the creditor.
    pub fn reverse_to_creditor(
        &mut self,
        ledger: &mut Ledger,
        payment_id: &PaymentId,
        date: NaiveDate,
        reference: Option<String>,
    ) -> Result<Option<EntryId>, RecoveryError> {
        let payment = self.payment(payment_id)?;
        let case = self.case(&payment.case_id)?;
        let (next_case, next_payment) = self.allocator.reverse_to_creditor(case, payment, date, reference)?;
        if !next_payment.reversed {
            return Ok(None);
        }

        let draft = self
            .allocator
            .config()
            .posting
            .creditor_reversal(&next_case, &next_payment, date);
        let entry_id = ledger.post(draft)?.id;

        info!(payment = %next_payment.id, entry = %entry_id, "Creditor reversal posted");
        self.cases.insert(next_case.id, next_case);
        self.payments.insert(next_payment.id, next_payment);
        Ok(Some(entry_id))
    }

    pub fn suspend(&mut self, case_id: &CaseId) -> Result<(), RecoveryError> {
        self.case_mut(case_id)?.suspend()
    }

    pub fn resume(&mut self, case_id: &CaseId) -> Result<(), RecoveryError> {
        self.case_mut(case_id)?.resume()
    }

    pub fn close(&mut self, case_id: &CaseId, reason: ClosureReason) -> Result<(), RecoveryError> {
        self.case_mut(case_id)?.close(reason)
    }

    pub fn situation(&self, case_id: &CaseId) -> Result<CaseSituation, RecoveryError> {
        let case = self.case(case_id)?;
        self.allocator.compute_case_situation(case, &self.payments_of(case_id))
    }

    pub fn payment_report(&self, case_id: &CaseId) -> Result<PaymentReport, RecoveryError> {
        let case = self.case(case_id)?;
        self.allocator.payment_report(case, &self.payments_of(case_id))
    }

    fn case_mut(&mut self, id: &CaseId) -> Result<&mut RecoveryCase, RecoveryError> {
        self.cases
            .get_mut(id)
            .ok_or_else(|| RecoveryError::CaseNotFound(id.to_string()))
    }
}
