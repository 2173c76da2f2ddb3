//! In-memory general ledger
//!
//! `Ledger` owns the chart, the journals, the periods, the entries and the
//! lettrage state of one office. Every mutating method runs all its checks
//! before touching any state, so a failed call leaves the ledger unchanged.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use core_kernel::{Amount, DateRange, EntryId, LineId, PeriodId};
use crate::account::{Account, AccountClass, ChartOfAccounts};
use crate::entry::{EntryDraft, LedgerEntry, LedgerLine, LineDraft};
use crate::error::LedgerError;
use crate::journal::{Journal, JournalRegistry};
use crate::numbering::EntrySequences;
use crate::period::AccountingPeriod;
use crate::reconciliation::{Reconciliation, ReconciliationCode, ReconciliationEngine};
use crate::reports::{BalanceScope, BalanceSheet, GeneralLedger, GeneralLedgerRow, IncomeStatement, TrialBalance};
use crate::template::OperationTemplate;

/// The general ledger of an office
///
/// # Invariants
///
/// - Validated entries balance and are never modified
/// - Entry numbers never repeat within a journal and month
/// - A line belongs to at most one reconciliation
#[derive(Debug, Clone)]
pub struct Ledger {
    chart: ChartOfAccounts,
    journals: JournalRegistry,
    periods: Vec<AccountingPeriod>,
    entries: Vec<LedgerEntry>,
    index: HashMap<EntryId, usize>,
    sequences: EntrySequences,
    reconciliations: ReconciliationEngine,
    templates: BTreeMap<String, OperationTemplate>,
}

impl Ledger {
    pub fn new(chart: ChartOfAccounts, journals: JournalRegistry) -> Self {
        Self {
            chart,
            journals,
            periods: Vec::new(),
            entries: Vec::new(),
            index: HashMap::new(),
            sequences: EntrySequences::new(),
            reconciliations: ReconciliationEngine::new(),
            templates: BTreeMap::new(),
        }
    }

    /// A ledger with the SYSCOHADA chart, the standard journals and templates
    pub fn standard() -> Result<Self, LedgerError> {
        let mut ledger = Self::new(ChartOfAccounts::syscohada_standard()?, JournalRegistry::standard()?);
        for template in OperationTemplate::standard() {
            ledger.add_template(template)?;
        }
        Ok(ledger)
    }

    // ------------------------------------------------------------------
    // Reference data
    // ------------------------------------------------------------------

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    pub fn journals(&self) -> &JournalRegistry {
        &self.journals
    }

    pub fn add_account(&mut self, account: Account) -> Result<&Account, LedgerError> {
        self.chart.add(account)
    }

    pub fn deactivate_account(&mut self, number: &str) -> Result<(), LedgerError> {
        self.chart.deactivate(number)
    }

    /// Fails with `AccountInUse` once any line references the account
    pub fn ensure_account_unused(&self, number: &str) -> Result<(), LedgerError> {
        let used = self
            .entries
            .iter()
            .flat_map(|e| e.lines.iter())
            .any(|l| l.account_number == number);
        if used {
            return Err(LedgerError::AccountInUse(number.to_string()));
        }
        Ok(())
    }

    pub fn add_journal(&mut self, journal: Journal) -> Result<&Journal, LedgerError> {
        self.journals.add(journal)
    }

    pub fn add_template(&mut self, template: OperationTemplate) -> Result<(), LedgerError> {
        self.journals.require_active(&template.journal_code)?;
        self.chart.require_active(&template.debit_account)?;
        self.chart.require_active(&template.credit_account)?;
        self.templates.insert(template.code.clone(), template);
        Ok(())
    }

    /// Active templates in display order
    pub fn templates(&self) -> Vec<&OperationTemplate> {
        let mut templates: Vec<_> = self.templates.values().filter(|t| t.is_active).collect();
        templates.sort_by_key(|t| (t.display_order, t.label.clone()));
        templates
    }

    // ------------------------------------------------------------------
    // Periods
    // ------------------------------------------------------------------

    /// Registers an open period
    ///
    /// # Errors
    ///
    /// Returns `PeriodOverlap` if another open period covers any of its days.
    pub fn open_period(&mut self, period: AccountingPeriod) -> Result<PeriodId, LedgerError> {
        if let Some(existing) = self.periods.iter().find(|p| p.conflicts_with(&period)) {
            return Err(LedgerError::PeriodOverlap {
                label: period.label.clone(),
                existing: existing.label.clone(),
            });
        }
        let id = period.id;
        info!(period = %period.label, start = %period.range.start, end = %period.range.end, "Accounting period opened");
        self.periods.push(period);
        Ok(id)
    }

    pub fn period(&self, id: &PeriodId) -> Result<&AccountingPeriod, LedgerError> {
        self.periods
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| LedgerError::PeriodNotFound(id.to_string()))
    }

    /// The open period containing `date`
    pub fn open_period_for(&self, date: NaiveDate) -> Result<&AccountingPeriod, LedgerError> {
        self.periods
            .iter()
            .find(|p| p.is_open() && p.contains(date))
            .ok_or_else(|| LedgerError::InvalidPeriod {
                date,
                reason: "no open period contains this date".to_string(),
            })
    }

    /// Closes a period
    ///
    /// # Errors
    ///
    /// Returns `PeriodHasDrafts` while draft entries remain in the period.
    pub fn close_period(&mut self, id: &PeriodId) -> Result<(), LedgerError> {
        let drafts = self
            .entries
            .iter()
            .filter(|e| &e.period_id == id && e.is_draft())
            .count();
        let period = self
            .periods
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| LedgerError::PeriodNotFound(id.to_string()))?;
        if drafts > 0 {
            return Err(LedgerError::PeriodHasDrafts {
                label: period.label.clone(),
                drafts,
            });
        }
        period.close();
        info!(period = %period.label, "Accounting period closed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Reserves the next entry number of a journal for the month of `date`
    pub fn generate_entry_number(&mut self, journal_code: &str, date: NaiveDate) -> Result<String, LedgerError> {
        let journal = self
            .journals
            .get(journal_code)
            .ok_or_else(|| LedgerError::JournalNotFound(journal_code.to_string()))?;
        Ok(self.sequences.next(&journal.code, date))
    }

    /// Creates a draft entry in `period_id`
    ///
    /// # Errors
    ///
    /// - `InvalidPeriod` if the date is outside the period or the period is closed
    /// - `LineConstraint` if a line breaks the debit XOR credit rule
    /// - `JournalNotFound`, `JournalInactive`, `AccountNotFound`, `AccountInactive`, `EmptyEntry`
    pub fn create_entry(&mut self, period_id: &PeriodId, draft: EntryDraft) -> Result<&LedgerEntry, LedgerError> {
        let entry = self.build_entry(period_id, draft)?;
        Ok(self.insert(entry))
    }

    fn build_entry(&mut self, period_id: &PeriodId, draft: EntryDraft) -> Result<LedgerEntry, LedgerError> {
        let journal = self.journals.require_active(&draft.journal_code)?;
        let period = self.period(period_id)?;
        let mut entry = LedgerEntry::from_draft(draft, String::new(), journal, period, &self.chart)?;
        entry.number = self.sequences.next(&entry.journal_code, entry.date);
        Ok(entry)
    }

    fn insert(&mut self, entry: LedgerEntry) -> &LedgerEntry {
        debug!(number = %entry.number, journal = %entry.journal_code, lines = entry.lines.len(), "Entry created");
        let position = self.entries.len();
        self.index.insert(entry.id, position);
        self.entries.push(entry);
        &self.entries[position]
    }

    pub fn entry(&self, id: &EntryId) -> Result<&LedgerEntry, LedgerError> {
        self.index
            .get(id)
            .map(|i| &self.entries[*i])
            .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))
    }

    pub fn entry_by_number(&self, number: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.number == number)
    }

    /// Entries in creation order
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    fn entry_mut(&mut self, id: &EntryId) -> Result<&mut LedgerEntry, LedgerError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))?;
        Ok(&mut self.entries[position])
    }

    /// Validates a draft entry
    ///
    /// # Errors
    ///
    /// - `UnbalancedEntry` if debit and credit totals differ; the entry stays draft
    /// - `InvalidPeriod` if its period has been closed since creation
    /// - `ImmutableEntry` if the entry is not a draft
    pub fn validate(&mut self, id: &EntryId) -> Result<&LedgerEntry, LedgerError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))?;
        let entry = &self.entries[position];
        let period = self
            .periods
            .iter()
            .find(|p| p.id == entry.period_id)
            .ok_or_else(|| LedgerError::PeriodNotFound(entry.period_id.to_string()))?;
        period.ensure_accepts(entry.date)?;

        let entry = &mut self.entries[position];
        entry.validate()?;
        info!(number = %entry.number, "Entry validated");
        Ok(&self.entries[position])
    }

    /// Cancels a draft entry
    pub fn cancel(&mut self, id: &EntryId) -> Result<(), LedgerError> {
        let entry = self.entry_mut(id)?;
        entry.cancel()?;
        info!(number = %entry.number, "Entry cancelled");
        Ok(())
    }

    /// Replaces all lines of a draft entry
    pub fn replace_lines(&mut self, id: &EntryId, lines: Vec<LineDraft>) -> Result<&LedgerEntry, LedgerError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))?;
        self.entries[position].replace_lines(lines, &self.chart)?;
        Ok(&self.entries[position])
    }

    /// Creates and validates an entry in the open period containing its date
    ///
    /// Nothing is recorded, and no number is consumed, unless the entry
    /// balances.
    pub fn post(&mut self, draft: EntryDraft) -> Result<&LedgerEntry, LedgerError> {
        let journal = self.journals.require_active(&draft.journal_code)?;
        let period = self.open_period_for(draft.date)?;
        let mut entry = LedgerEntry::from_draft(draft, String::new(), journal, period, &self.chart)?;
        entry.validate()?;
        entry.number = self.sequences.next(&entry.journal_code, entry.date);
        info!(number = %entry.number, origin = ?entry.origin, "Entry posted");
        Ok(self.insert(entry))
    }

    /// Posts the reversing entry of a validated entry
    pub fn reverse(&mut self, id: &EntryId, date: NaiveDate, label: &str) -> Result<&LedgerEntry, LedgerError> {
        let draft = self.entry(id)?.reversal_draft(date, label)?;
        self.post(draft)
    }

    /// Creates a draft from a quick-entry template
    pub fn create_from_template(
        &mut self,
        template_code: &str,
        date: NaiveDate,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<&LedgerEntry, LedgerError> {
        let template = self
            .templates
            .get(template_code)
            .filter(|t| t.is_active)
            .ok_or_else(|| LedgerError::TemplateNotFound(template_code.to_string()))?;
        let draft = template.to_draft(date, amount, description)?;
        let period_id = self.open_period_for(date)?.id;
        self.create_entry(&period_id, draft)
    }

    // ------------------------------------------------------------------
    // Balances and reports
    // ------------------------------------------------------------------

    fn validated_lines(&self) -> impl Iterator<Item = (&LedgerEntry, &LedgerLine)> {
        self.entries
            .iter()
            .filter(|e| e.is_validated())
            .flat_map(|e| e.lines.iter().map(move |l| (e, l)))
    }

    /// Signed balance `sum(debit) - sum(credit)` of validated lines
    ///
    /// Read it on the account's normal side with `BalanceSide::normalize`.
    pub fn account_balance(&self, number: &str, scope: BalanceScope) -> Result<Amount, LedgerError> {
        let account = self
            .chart
            .get(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))?;
        let range = match scope {
            BalanceScope::Period { id } => Some(self.period(&id)?.range),
            BalanceScope::Range { range } => Some(range),
            BalanceScope::AllTime => None,
        };

        Ok(self
            .validated_lines()
            .filter(|(e, l)| l.account_id == account.id && range.map_or(true, |r| r.contains(e.date)))
            .map(|(_, l)| l.signed())
            .sum())
    }

    /// Trial balance over `range`, optionally restricted to one class
    pub fn trial_balance(&self, range: DateRange, class: Option<AccountClass>) -> TrialBalance {
        let movements = self
            .validated_lines()
            .filter(|(e, _)| range.contains(e.date))
            .filter_map(|(_, l)| self.chart.get(&l.account_number).map(|a| (a, l)))
            .filter(|(a, _)| a.is_active && class.map_or(true, |c| a.class == c))
            .map(|(a, l)| (a, l.debit, l.credit));
        TrialBalance::from_movements(range, movements)
    }

    pub fn income_statement(&self, range: DateRange) -> IncomeStatement {
        IncomeStatement::from_trial_balance(&self.trial_balance(range, None), &self.chart)
    }

    /// Balance sheet over `range` with that range's net result carried
    pub fn balance_sheet(&self, range: DateRange) -> BalanceSheet {
        let trial_balance = self.trial_balance(range, None);
        let result = IncomeStatement::from_trial_balance(&trial_balance, &self.chart).net_result;
        BalanceSheet::from_trial_balance(&trial_balance, result)
    }

    /// Validated movements of one account in date order with running balance
    pub fn general_ledger(&self, number: &str, range: DateRange) -> Result<GeneralLedger, LedgerError> {
        let account = self
            .chart
            .get(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))?;

        let mut opening = Amount::ZERO;
        let mut rows = Vec::new();
        for (entry, line) in self.validated_lines().filter(|(_, l)| l.account_id == account.id) {
            if entry.date < range.start {
                opening += line.signed();
            } else if range.contains(entry.date) {
                rows.push(GeneralLedgerRow {
                    date: entry.date,
                    entry_number: entry.number.clone(),
                    journal_code: entry.journal_code.clone(),
                    label: line.label.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    running_balance: Amount::ZERO,
                    reconciliation_code: self.reconciliations.for_line(&line.id).map(|r| r.code.to_string()),
                });
            }
        }
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.entry_number.cmp(&b.entry_number)));
        Ok(GeneralLedger::build(account, range, opening, rows))
    }

    // ------------------------------------------------------------------
    // Lettrage
    // ------------------------------------------------------------------

    /// Matches validated lines of a third-party account
    ///
    /// # Errors
    ///
    /// - `ReconciliationMismatch` if a line sits on another account
    /// - `LineNotFound`, `LineNotValidated`, `LineAlreadyReconciled`
    /// - `NotThirdPartyAccount`, `EmptyReconciliation`, `CodeSpaceExhausted`
    pub fn match_lines(
        &mut self,
        account_number: &str,
        line_ids: &[LineId],
        actor: &str,
        comment: Option<String>,
    ) -> Result<Reconciliation, LedgerError> {
        let account = self
            .chart
            .get(account_number)
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))?;

        let mut lines = Vec::with_capacity(line_ids.len());
        for line_id in line_ids {
            let (entry, line) = self
                .entries
                .iter()
                .find_map(|e| e.lines.iter().find(|l| &l.id == line_id).map(|l| (e, l)))
                .ok_or_else(|| LedgerError::LineNotFound(line_id.to_string()))?;
            if !entry.is_validated() {
                return Err(LedgerError::LineNotValidated(line_id.to_string()));
            }
            lines.push(line);
        }

        self.reconciliations.match_lines(account, &lines, actor, comment)
    }

    /// Undoes a reconciliation, freeing its lines
    pub fn unmatch(&mut self, account_number: &str, code: &str) -> Result<Reconciliation, LedgerError> {
        let account = self
            .chart
            .get(account_number)
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))?;
        let code: ReconciliationCode = code.parse()?;
        self.reconciliations.unmatch(&account.id, &code)
    }

    pub fn reconciliations(&self) -> &ReconciliationEngine {
        &self.reconciliations
    }
}
