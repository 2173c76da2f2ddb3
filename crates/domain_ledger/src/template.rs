//! Quick-entry operation templates
//!
//! Staff without bookkeeping training record common operations ("I paid
//! the rent", "I received a deposit") by picking a template and typing an
//! amount. The template fixes the journal and both accounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, TemplateId};
use crate::entry::{EntryDraft, EntryOrigin, LineDraft};
use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTemplate {
    pub id: TemplateId,
    pub code: String,
    pub label: String,
    pub journal_code: String,
    pub debit_account: String,
    pub credit_account: String,
    pub display_order: i32,
    pub is_active: bool,
}

impl OperationTemplate {
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        journal_code: impl Into<String>,
        debit_account: impl Into<String>,
        credit_account: impl Into<String>,
        display_order: i32,
    ) -> Self {
        Self {
            id: TemplateId::new(),
            code: code.into(),
            label: label.into(),
            journal_code: journal_code.into(),
            debit_account: debit_account.into(),
            credit_account: credit_account.into(),
            display_order,
            is_active: true,
        }
    }

    /// Two-line draft for `amount`
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` unless `amount` is strictly positive.
    pub fn to_draft(
        &self,
        date: NaiveDate,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<EntryDraft, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "template {} needs a positive amount, got {}",
                self.code, amount
            )));
        }
        let label = description.filter(|d| !d.trim().is_empty()).unwrap_or(&self.label);

        Ok(EntryDraft::new(self.journal_code.clone(), date, label)
            .with_origin(EntryOrigin::Manual)
            .line(LineDraft::debit(self.debit_account.clone(), amount))
            .line(LineDraft::credit(self.credit_account.clone(), amount)))
    }

    /// Templates shipped with the standard chart
    pub fn standard() -> Vec<OperationTemplate> {
        vec![
            Self::new("ENCAISS_HONORAIRES", "J'ai encaissé des honoraires", "VE", "5211", "7061", 1),
            Self::new("ENCAISS_HONORAIRES_CAISSE", "J'ai encaissé des honoraires en espèces", "CA", "571", "7061", 2),
            Self::new("ENCAISS_EMOLUMENTS", "J'ai encaissé des émoluments", "VE", "5211", "7062", 3),
            Self::new("PAIEMENT_LOYER", "J'ai payé le loyer", "BQ", "6131", "5211", 10),
            Self::new("ACHAT_FOURNITURES", "J'ai acheté des fournitures", "AC", "601", "5211", 11),
            Self::new("PAIEMENT_SALAIRE", "J'ai payé un salaire", "BQ", "6411", "5211", 12),
            Self::new("RECU_CONSIGNATION", "J'ai reçu une consignation client", "BQ", "5211", "4721", 20),
            Self::new("REVERSER_CONSIGNATION", "J'ai reversé au créancier", "BQ", "4721", "5211", 21),
            Self::new("PAIEMENT_CARBURANT", "J'ai payé du carburant", "CA", "6254", "571", 30),
            Self::new("PAIEMENT_TELEPHONE", "J'ai payé le téléphone/internet", "BQ", "6262", "5211", 31),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_uses_description_when_given() {
        let template = &OperationTemplate::standard()[3];
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        let draft = template.to_draft(date, Amount::from_units(150_000), Some("Loyer mai")).unwrap();
        assert_eq!(draft.label, "Loyer mai");
        assert_eq!(draft.journal_code, "BQ");
        assert_eq!(draft.totals(), (Amount::from_units(150_000), Amount::from_units(150_000)));

        let default_label = template.to_draft(date, Amount::from_units(1), Some("  ")).unwrap();
        assert_eq!(default_label.label, template.label);
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let template = &OperationTemplate::standard()[0];
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert!(matches!(
            template.to_draft(date, Amount::ZERO, None),
            Err(LedgerError::InvalidAmount(_))
        ));
    }
}
