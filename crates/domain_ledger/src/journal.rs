//! Accounting journals
//!
//! Each entry is booked in exactly one journal. The journal code is part of
//! the entry number, so codes are short uppercase tokens.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::JournalId;
use crate::error::LedgerError;

/// Kind of journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalType {
    Purchases,
    Sales,
    Bank,
    Cash,
    Miscellaneous,
    Opening,
    Closing,
}

impl JournalType {
    /// The conventional two-letter code
    pub fn code(&self) -> &'static str {
        match self {
            JournalType::Purchases => "AC",
            JournalType::Sales => "VE",
            JournalType::Bank => "BQ",
            JournalType::Cash => "CA",
            JournalType::Miscellaneous => "OD",
            JournalType::Opening => "AN",
            JournalType::Closing => "CL",
        }
    }

    /// Treasury journals carry a counterpart cash or bank account
    pub fn is_treasury(&self) -> bool {
        matches!(self, JournalType::Bank | JournalType::Cash)
    }
}

/// A journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    pub id: JournalId,
    pub code: String,
    pub label: String,
    pub journal_type: JournalType,
    /// Counterpart account number, for treasury journals
    pub counterpart_account: Option<String>,
    pub is_active: bool,
}

impl Journal {
    /// Creates a journal
    ///
    /// # Errors
    ///
    /// Returns `InvalidJournalCode` unless the code is 1 to 5 uppercase
    /// ASCII letters or digits.
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        journal_type: JournalType,
    ) -> Result<Self, LedgerError> {
        let code = code.into();
        let valid = (1..=5).contains(&code.len())
            && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !valid {
            return Err(LedgerError::InvalidJournalCode(code));
        }

        Ok(Self {
            id: JournalId::new(),
            code,
            label: label.into(),
            journal_type,
            counterpart_account: None,
            is_active: true,
        })
    }

    pub fn with_counterpart(mut self, account_number: impl Into<String>) -> Self {
        self.counterpart_account = Some(account_number.into());
        self
    }
}

/// Registry of the office journals, keyed by code
#[derive(Debug, Clone, Default)]
pub struct JournalRegistry {
    journals: BTreeMap<String, Journal>,
}

impl JournalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, journal: Journal) -> Result<&Journal, LedgerError> {
        if self.journals.contains_key(&journal.code) {
            return Err(LedgerError::JournalAlreadyExists(journal.code));
        }
        let code = journal.code.clone();
        Ok(self.journals.entry(code).or_insert(journal))
    }

    pub fn get(&self, code: &str) -> Option<&Journal> {
        self.journals.get(code)
    }

    pub fn get_by_id(&self, id: &JournalId) -> Option<&Journal> {
        self.journals.values().find(|j| &j.id == id)
    }

    /// Looks up a journal that accepts new entries
    pub fn require_active(&self, code: &str) -> Result<&Journal, LedgerError> {
        let journal = self
            .get(code)
            .ok_or_else(|| LedgerError::JournalNotFound(code.to_string()))?;
        if !journal.is_active {
            return Err(LedgerError::JournalInactive(code.to_string()));
        }
        Ok(journal)
    }

    pub fn deactivate(&mut self, code: &str) -> Result<(), LedgerError> {
        let journal = self
            .journals
            .get_mut(code)
            .ok_or_else(|| LedgerError::JournalNotFound(code.to_string()))?;
        journal.is_active = false;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Journal> {
        self.journals.values()
    }

    /// The standard journals of the office
    pub fn standard() -> Result<Self, LedgerError> {
        let mut registry = Self::new();
        registry.add(Journal::new("AC", "Journal des achats", JournalType::Purchases)?)?;
        registry.add(Journal::new("VE", "Journal des ventes", JournalType::Sales)?)?;
        registry.add(Journal::new("BQ", "Journal de banque", JournalType::Bank)?.with_counterpart("5211"))?;
        registry.add(Journal::new("CA", "Journal de caisse", JournalType::Cash)?.with_counterpart("571"))?;
        registry.add(Journal::new("OD", "Opérations diverses", JournalType::Miscellaneous)?)?;
        registry.add(Journal::new("AN", "À nouveau", JournalType::Opening)?)?;
        registry.add(Journal::new("CL", "Clôture", JournalType::Closing)?)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_code_rules() {
        assert!(Journal::new("BQ2", "Banque 2", JournalType::Bank).is_ok());
        assert!(Journal::new("", "x", JournalType::Bank).is_err());
        assert!(Journal::new("bq", "x", JournalType::Bank).is_err());
        assert!(Journal::new("BANQUE", "x", JournalType::Bank).is_err());
    }

    #[test]
    fn test_standard_registry_codes_match_types() {
        let registry = JournalRegistry::standard().unwrap();
        for journal in registry.iter() {
            assert_eq!(journal.code, journal.journal_type.code());
        }
        assert_eq!(registry.get("CA").unwrap().counterpart_account.as_deref(), Some("571"));
    }

    #[test]
    fn test_duplicate_and_inactive() {
        let mut registry = JournalRegistry::standard().unwrap();
        let dup = Journal::new("OD", "Doublon", JournalType::Miscellaneous).unwrap();
        assert!(matches!(registry.add(dup), Err(LedgerError::JournalAlreadyExists(_))));

        registry.deactivate("AN").unwrap();
        assert!(matches!(registry.require_active("AN"), Err(LedgerError::JournalInactive(_))));
        assert!(matches!(registry.require_active("XX"), Err(LedgerError::JournalNotFound(_))));
    }
}
