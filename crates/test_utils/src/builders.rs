//! Test Data Builders
//!
//! Builders for entry drafts and recovery inputs. Tests set only the
//! fields they care about; everything else comes from the fixtures.

use chrono::NaiveDate;
use core_kernel::{Amount, PartyId};
use domain_ledger::{EntryDraft, EntryOrigin, LineDraft};
use domain_recovery::{BillingMode, OpenCaseRequest, PaymentMode, PaymentRequest, RecoveryType};

use crate::fixtures::{AmountFixtures, DateFixtures, IdFixtures, StringFixtures};

/// Builder for a two-line balanced entry draft
pub struct TestEntryDraftBuilder {
    journal_code: String,
    date: NaiveDate,
    label: String,
    debit_account: String,
    credit_account: String,
    amount: Amount,
    reference: Option<String>,
    third_party: Option<String>,
    origin: EntryOrigin,
}

impl Default for TestEntryDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEntryDraftBuilder {
    /// Cash fee receipt: debit 571, credit 7063
    pub fn new() -> Self {
        Self {
            journal_code: "CA".to_string(),
            date: DateFixtures::payment_date(),
            label: "Honoraires".to_string(),
            debit_account: StringFixtures::cash_account().to_string(),
            credit_account: "7063".to_string(),
            amount: AmountFixtures::fcfa(10_000),
            reference: None,
            third_party: None,
            origin: EntryOrigin::Manual,
        }
    }

    pub fn with_journal(mut self, code: impl Into<String>) -> Self {
        self.journal_code = code.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn debit(mut self, account: impl Into<String>) -> Self {
        self.debit_account = account.into();
        self
    }

    pub fn credit(mut self, account: impl Into<String>) -> Self {
        self.credit_account = account.into();
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Tags both lines with a third party, as lettrage expects
    pub fn with_third_party(mut self, third_party: impl Into<String>) -> Self {
        self.third_party = Some(third_party.into());
        self
    }

    pub fn with_origin(mut self, origin: EntryOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn build(self) -> EntryDraft {
        let mut debit = LineDraft::debit(self.debit_account, self.amount);
        let mut credit = LineDraft::credit(self.credit_account, self.amount);
        if let Some(third_party) = &self.third_party {
            debit = debit.with_third_party(third_party.clone());
            credit = credit.with_third_party(third_party.clone());
        }

        let draft = EntryDraft::new(self.journal_code, self.date, self.label)
            .with_origin(self.origin)
            .line(debit)
            .line(credit);

        match self.reference {
            Some(reference) => draft.with_reference(reference),
            None => draft,
        }
    }
}

/// Builder for case opening requests
pub struct TestCaseRequestBuilder {
    reference: String,
    creditor_id: PartyId,
    debtor_id: PartyId,
    recovery_type: RecoveryType,
    billing_mode: Option<BillingMode>,
    principal: Amount,
    interest: Amount,
    procedure_fees: Amount,
    opened_on: NaiveDate,
}

impl Default for TestCaseRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCaseRequestBuilder {
    /// Forced recovery of 1 000 000 with 50 000 interest and 25 000 fees
    pub fn new() -> Self {
        Self {
            reference: StringFixtures::case_reference().to_string(),
            creditor_id: IdFixtures::creditor_id(),
            debtor_id: IdFixtures::debtor_id(),
            recovery_type: RecoveryType::Forced,
            billing_mode: None,
            principal: AmountFixtures::principal(),
            interest: AmountFixtures::interest(),
            procedure_fees: AmountFixtures::procedure_fees(),
            opened_on: DateFixtures::case_opened_on(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn amicable(mut self) -> Self {
        self.recovery_type = RecoveryType::Amicable;
        self
    }

    pub fn with_billing_mode(mut self, mode: BillingMode) -> Self {
        self.billing_mode = Some(mode);
        self
    }

    pub fn with_principal(mut self, principal: Amount) -> Self {
        self.principal = principal;
        self
    }

    pub fn with_interest(mut self, interest: Amount) -> Self {
        self.interest = interest;
        self
    }

    pub fn with_procedure_fees(mut self, fees: Amount) -> Self {
        self.procedure_fees = fees;
        self
    }

    pub fn opened_on(mut self, date: NaiveDate) -> Self {
        self.opened_on = date;
        self
    }

    pub fn build(self) -> OpenCaseRequest {
        let request = OpenCaseRequest::new(
            self.reference,
            self.creditor_id,
            self.debtor_id,
            self.recovery_type,
            self.principal,
            self.opened_on,
        )
        .with_interest(self.interest)
        .with_procedure_fees(self.procedure_fees);

        match self.billing_mode {
            Some(mode) => request.with_billing_mode(mode),
            None => request,
        }
    }
}

/// Builder for payment requests
pub struct TestPaymentRequestBuilder {
    amount: Amount,
    date: NaiveDate,
    mode: PaymentMode,
    reference: Option<String>,
}

impl Default for TestPaymentRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPaymentRequestBuilder {
    pub fn new() -> Self {
        Self {
            amount: AmountFixtures::partial_payment(),
            date: DateFixtures::payment_date(),
            mode: PaymentMode::Cash,
            reference: None,
        }
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_mode(mut self, mode: PaymentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn build(self) -> PaymentRequest {
        let request = PaymentRequest::new(self.amount, self.date, self.mode);
        match self.reference {
            Some(reference) => request.with_reference(reference),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_draft_builder_is_balanced() {
        let draft = TestEntryDraftBuilder::new()
            .with_amount(AmountFixtures::fcfa(42_000))
            .with_third_party("REC-2024-017")
            .build();

        let (debit, credit) = draft.totals();
        assert_eq!(debit, credit);
        assert_eq!(debit, AmountFixtures::fcfa(42_000));
        assert!(draft.check_lines().is_ok());
    }

    #[test]
    fn test_case_request_builder_defaults() {
        let request = TestCaseRequestBuilder::new().build();
        assert_eq!(request.reference, "REC-2024-017");
        assert_eq!(request.recovery_type, RecoveryType::Forced);
        assert_eq!(request.billing_mode, None);
    }

    #[test]
    fn test_payment_request_builder_reference() {
        let request = TestPaymentRequestBuilder::new().with_reference("RC-118").build();
        assert_eq!(request.reference.as_deref(), Some("RC-118"));
    }
}
