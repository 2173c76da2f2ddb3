//! Ledger entries and lines
//!
//! Entries are built from drafts. A draft names accounts and the journal
//! by their codes; turning it into a `LedgerEntry` resolves them against
//! the chart and the registry and checks every line.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AccountId, Amount, EntryId, JournalId, LineId, PeriodId};
use crate::account::ChartOfAccounts;
use crate::error::LedgerError;
use crate::journal::Journal;
use crate::period::AccountingPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Draft,
    Validated,
    Cancelled,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Validated => "validated",
            EntryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an entry comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    Manual,
    Invoice,
    Treasury,
    Automatic,
    Closing,
}

/// A line as submitted, before account resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDraft {
    pub account_number: String,
    pub label: Option<String>,
    pub debit: Amount,
    pub credit: Amount,
    /// Client, creditor or supplier the line concerns
    pub third_party: Option<String>,
}

impl LineDraft {
    pub fn debit(account_number: impl Into<String>, amount: Amount) -> Self {
        Self {
            account_number: account_number.into(),
            label: None,
            debit: amount,
            credit: Amount::ZERO,
            third_party: None,
        }
    }

    pub fn credit(account_number: impl Into<String>, amount: Amount) -> Self {
        Self {
            account_number: account_number.into(),
            label: None,
            debit: Amount::ZERO,
            credit: amount,
            third_party: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_third_party(mut self, third_party: impl Into<String>) -> Self {
        self.third_party = Some(third_party.into());
        self
    }

    /// Exactly one of debit and credit is strictly positive
    ///
    /// # Errors
    ///
    /// Returns `LineConstraint` for negative amounts, for lines carrying
    /// both sides, and for empty lines.
    pub fn check(&self) -> Result<(), LedgerError> {
        let violation = |reason: &str| LedgerError::LineConstraint {
            account: self.account_number.clone(),
            reason: reason.to_string(),
        };

        if self.debit.is_negative() || self.credit.is_negative() {
            return Err(violation("amounts cannot be negative"));
        }
        match (self.debit.is_positive(), self.credit.is_positive()) {
            (true, true) => Err(violation("a line cannot carry both a debit and a credit")),
            (false, false) => Err(violation("a line must carry a debit or a credit")),
            _ => Ok(()),
        }
    }
}

/// An entry as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub journal_code: String,
    pub date: NaiveDate,
    pub label: String,
    /// External reference (invoice number, receipt, case reference)
    pub reference: Option<String>,
    pub origin: EntryOrigin,
    pub reverses: Option<EntryId>,
    pub lines: Vec<LineDraft>,
}

impl EntryDraft {
    pub fn new(journal_code: impl Into<String>, date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            journal_code: journal_code.into(),
            date,
            label: label.into(),
            reference: None,
            origin: EntryOrigin::Manual,
            reverses: None,
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, line: LineDraft) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_origin(mut self, origin: EntryOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Total debit and total credit
    pub fn totals(&self) -> (Amount, Amount) {
        totals(self.lines.iter().map(|l| (l.debit, l.credit)))
    }

    /// Checks every line and rejects empty drafts
    pub fn check_lines(&self) -> Result<(), LedgerError> {
        check_lines(&self.lines)
    }
}

pub(crate) fn check_lines(lines: &[LineDraft]) -> Result<(), LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }
    lines.iter().try_for_each(LineDraft::check)
}

fn totals(amounts: impl Iterator<Item = (Amount, Amount)>) -> (Amount, Amount) {
    amounts.fold((Amount::ZERO, Amount::ZERO), |(d, c), (debit, credit)| (d + debit, c + credit))
}

/// A booked line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub id: LineId,
    pub entry_id: EntryId,
    pub account_id: AccountId,
    pub account_number: String,
    pub label: String,
    pub debit: Amount,
    pub credit: Amount,
    pub third_party: Option<String>,
}

impl LedgerLine {
    /// `debit - credit`
    pub fn signed(&self) -> Amount {
        self.debit - self.credit
    }
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    /// Sequential number, e.g. "CA2024030007"
    pub number: String,
    pub date: NaiveDate,
    pub journal_id: JournalId,
    pub journal_code: String,
    pub period_id: PeriodId,
    pub label: String,
    pub reference: Option<String>,
    pub status: EntryStatus,
    pub origin: EntryOrigin,
    pub created_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
    /// The entry this one reverses
    pub reverses: Option<EntryId>,
    pub lines: Vec<LedgerLine>,
}

impl LedgerEntry {
    /// Builds a draft entry from a submitted draft
    ///
    /// The journal must be active, the period must accept the date, every
    /// line must satisfy the debit XOR credit rule and reference an active
    /// account. Balance is only enforced at validation.
    pub fn from_draft(
        draft: EntryDraft,
        number: String,
        journal: &Journal,
        period: &AccountingPeriod,
        chart: &ChartOfAccounts,
    ) -> Result<Self, LedgerError> {
        if !journal.is_active {
            return Err(LedgerError::JournalInactive(journal.code.clone()));
        }
        period.ensure_accepts(draft.date)?;

        let id = EntryId::new();
        let lines = resolve_lines(id, &draft.label, draft.lines, chart)?;

        Ok(Self {
            id,
            number,
            date: draft.date,
            journal_id: journal.id,
            journal_code: journal.code.clone(),
            period_id: period.id,
            label: draft.label,
            reference: draft.reference,
            status: EntryStatus::Draft,
            origin: draft.origin,
            created_at: Utc::now(),
            validated_at: None,
            reverses: draft.reverses,
            lines,
        })
    }

    pub fn totals(&self) -> (Amount, Amount) {
        totals(self.lines.iter().map(|l| (l.debit, l.credit)))
    }

    pub fn is_balanced(&self) -> bool {
        let (debit, credit) = self.totals();
        debit == credit
    }

    pub fn is_draft(&self) -> bool {
        self.status == EntryStatus::Draft
    }

    pub fn is_validated(&self) -> bool {
        self.status == EntryStatus::Validated
    }

    pub fn ensure_draft(&self) -> Result<(), LedgerError> {
        if self.is_draft() {
            Ok(())
        } else {
            Err(LedgerError::ImmutableEntry {
                number: self.number.clone(),
                status: self.status.to_string(),
            })
        }
    }

    pub fn ensure_balanced(&self) -> Result<(), LedgerError> {
        let (debit, credit) = self.totals();
        if debit != credit {
            return Err(LedgerError::UnbalancedEntry { debit, credit });
        }
        Ok(())
    }

    /// Moves a balanced draft to validated
    ///
    /// The caller checks that the period is still open.
    pub fn validate(&mut self) -> Result<(), LedgerError> {
        self.ensure_draft()?;
        if self.lines.is_empty() {
            return Err(LedgerError::EmptyEntry);
        }
        self.ensure_balanced()?;
        self.status = EntryStatus::Validated;
        self.validated_at = Some(Utc::now());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), LedgerError> {
        self.ensure_draft()?;
        self.status = EntryStatus::Cancelled;
        Ok(())
    }

    /// Replaces the lines of a draft
    pub fn replace_lines(&mut self, lines: Vec<LineDraft>, chart: &ChartOfAccounts) -> Result<(), LedgerError> {
        self.ensure_draft()?;
        self.lines = resolve_lines(self.id, &self.label, lines, chart)?;
        Ok(())
    }

    /// Draft of the entry cancelling this one, debit and credit swapped
    pub fn reversal_draft(&self, date: NaiveDate, label: impl Into<String>) -> Result<EntryDraft, LedgerError> {
        if !self.is_validated() {
            return Err(LedgerError::EntryNotValidated(self.number.clone()));
        }
        let mut draft = EntryDraft::new(self.journal_code.clone(), date, label)
            .with_reference(self.number.clone())
            .with_origin(EntryOrigin::Automatic);
        draft.reverses = Some(self.id);
        draft.lines = self
            .lines
            .iter()
            .map(|line| LineDraft {
                account_number: line.account_number.clone(),
                label: Some(line.label.clone()),
                debit: line.credit,
                credit: line.debit,
                third_party: line.third_party.clone(),
            })
            .collect();
        Ok(draft)
    }
}

fn resolve_lines(
    entry_id: EntryId,
    entry_label: &str,
    drafts: Vec<LineDraft>,
    chart: &ChartOfAccounts,
) -> Result<Vec<LedgerLine>, LedgerError> {
    check_lines(&drafts)?;
    drafts
        .into_iter()
        .map(|draft| -> Result<LedgerLine, LedgerError> {
            let account = chart.require_active(&draft.account_number)?;
            Ok(LedgerLine {
                id: LineId::new(),
                entry_id,
                account_id: account.id,
                account_number: account.number.clone(),
                label: draft.label.unwrap_or_else(|| entry_label.to_string()),
                debit: draft.debit,
                credit: draft.credit,
                third_party: draft.third_party,
            })
        })
        .collect()
}
