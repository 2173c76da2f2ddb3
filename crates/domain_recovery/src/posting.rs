//! Ledger postings for recovery operations
//!
//! Each builder returns a balanced [`EntryDraft`] ready for
//! `Ledger::post`. The creditor share always lands on the creditor payable
//! account so that receipts and reversals can be lettered together.

use chrono::NaiveDate;
use core_kernel::Amount;
use domain_ledger::{EntryDraft, EntryOrigin, LineDraft};
use serde::{Deserialize, Serialize};

use crate::allocation::AllocationCategory;
use crate::case::RecoveryCase;
use crate::error::RecoveryError;
use crate::payment::Payment;

/// Accounts and journals used by recovery postings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingAccounts {
    pub cash: String,
    pub bank: String,
    pub fees_income: String,
    pub tariff_income: String,
    pub creditor_payable: String,
    /// Holds reserved funds until they are allocated
    pub suspense: String,
    pub cash_journal: String,
    pub bank_journal: String,
    /// Journal for internal reallocations
    pub misc_journal: String,
}

impl Default for PostingAccounts {
    fn default() -> Self {
        Self {
            cash: "571".to_string(),
            bank: "5211".to_string(),
            fees_income: "7063".to_string(),
            tariff_income: "7062".to_string(),
            creditor_payable: "4722".to_string(),
            suspense: "471".to_string(),
            cash_journal: "CA".to_string(),
            bank_journal: "BQ".to_string(),
            misc_journal: "OD".to_string(),
        }
    }
}

impl PostingAccounts {
    /// Account credited for an allocation category
    pub fn account_for(&self, category: AllocationCategory) -> &str {
        match category {
            AllocationCategory::Fees => &self.fees_income,
            AllocationCategory::Tariff => &self.tariff_income,
            AllocationCategory::Interest | AllocationCategory::Principal => &self.creditor_payable,
        }
    }

    /// Debit treasury, credit each non-empty bucket
    pub fn payment_receipt(&self, case: &RecoveryCase, payment: &Payment) -> Result<EntryDraft, RecoveryError> {
        if !payment.amount.is_positive() {
            return Err(RecoveryError::InvalidAmount(format!("cannot post a payment of {}", payment.amount)));
        }

        let (journal, treasury) = if payment.mode.is_cash() {
            (&self.cash_journal, &self.cash)
        } else {
            (&self.bank_journal, &self.bank)
        };

        let split = &payment.allocation;
        let credits = [
            (self.fees_income.as_str(), split.fees, "Frais de procédure"),
            (self.tariff_income.as_str(), split.tariff, "Émoluments"),
            (self.creditor_payable.as_str(), split.creditor_share(), "Part créancier"),
            (self.suspense.as_str(), split.reserved, "Montant réservé"),
        ];

        let mut draft = EntryDraft::new(journal.clone(), payment.date, format!("Encaissement dossier {}", case.reference))
            .with_origin(EntryOrigin::Treasury)
            .with_reference(payment_reference(payment))
            .line(LineDraft::debit(treasury.clone(), payment.amount).with_third_party(case.reference.clone()));

        for (account, amount, label) in credits {
            if amount.is_positive() {
                draft = draft.line(
                    LineDraft::credit(account, amount)
                        .with_label(label)
                        .with_third_party(case.reference.clone()),
                );
            }
        }

        Ok(draft)
    }

    /// Debit suspense, credit the target category
    pub fn reserved_allocation(
        &self,
        case: &RecoveryCase,
        payment: &Payment,
        category: AllocationCategory,
        amount: Amount,
        date: NaiveDate,
    ) -> EntryDraft {
        EntryDraft::new(self.misc_journal.clone(), date, format!("Imputation réserve dossier {} ({})", case.reference, category))
            .with_origin(EntryOrigin::Automatic)
            .with_reference(payment_reference(payment))
            .line(LineDraft::debit(self.suspense.clone(), amount).with_third_party(case.reference.clone()))
            .line(LineDraft::credit(self.account_for(category), amount).with_third_party(case.reference.clone()))
    }

    /// Debit creditor payable, credit the bank
    pub fn creditor_reversal(&self, case: &RecoveryCase, payment: &Payment, date: NaiveDate) -> EntryDraft {
        let reference = payment
            .reversal_reference
            .clone()
            .unwrap_or_else(|| payment_reference(payment));

        EntryDraft::new(self.bank_journal.clone(), date, format!("Reversement créancier dossier {}", case.reference))
            .with_origin(EntryOrigin::Treasury)
            .with_reference(reference)
            .line(
                LineDraft::debit(self.creditor_payable.clone(), payment.due_to_creditor)
                    .with_third_party(case.reference.clone()),
            )
            .line(LineDraft::credit(self.bank.clone(), payment.due_to_creditor))
    }
}

fn payment_reference(payment: &Payment) -> String {
    payment
        .reference
        .clone()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| payment.id.to_string())
}
