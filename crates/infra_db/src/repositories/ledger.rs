//! Ledger repository
//!
//! Persists the chart of accounts, journals, periods, entries and
//! lettrage. Mutating methods load the domain values they need, run the
//! same checks as the in-memory `Ledger`, then write inside the
//! transaction they read in.
//!
//! The free functions taking a `&mut PgConnection` are shared with the
//! recovery repository, which posts receipts in its own transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use core_kernel::{
    AccountId, Amount, DateRange, DomainPort, EntryId, HealthCheckResult, HealthCheckable,
    JournalId, LineId, PeriodId, ReconciliationId, TemplateId,
};
use domain_ledger::numbering::{entry_prefix, format_entry_number};
use domain_ledger::{
    Account, AccountClass, AccountKind, AccountingPeriod, BalanceScope, BalanceSheet, BalanceSide,
    ChartOfAccounts, EntryDraft, EntryOrigin, EntryStatus, GeneralLedger, GeneralLedgerRow,
    IncomeStatement, Journal, JournalRegistry, JournalType, LedgerEntry, LedgerError, LedgerLine, LineDraft,
    OperationTemplate, PeriodStatus, Reconciliation, ReconciliationCode, TrialBalance,
    TrialBalanceRow,
};

use crate::error::{classify, DatabaseError};

/// Repository for the general ledger
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ------------------------------------------------------------------
    // Chart of accounts, journals and templates
    // ------------------------------------------------------------------

    /// Inserts every account of `chart` that is not stored yet
    ///
    /// Returns the number of accounts inserted.
    #[instrument(skip(self, chart), fields(accounts = chart.len()))]
    pub async fn install_chart(&self, chart: &ChartOfAccounts) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        // Number order puts parents before their children
        for account in chart.iter() {
            let parent = account
                .parent_id
                .and_then(|id| chart.get_by_id(&id))
                .map(|p| p.number.as_str());
            inserted += insert_account(&mut tx, account, parent, true).await?;
        }
        tx.commit().await?;

        info!(inserted, "Chart of accounts installed");
        Ok(inserted)
    }

    /// Adds one account, linked to its closest stored ancestor
    #[instrument(skip(self, account), fields(number = %account.number))]
    pub async fn add_account(&self, account: Account) -> Result<Account, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut chart = load_chart(&mut tx).await?;
        let added = chart.add(account)?.clone();
        let parent = added
            .parent_id
            .and_then(|id| chart.get_by_id(&id))
            .map(|p| p.number.as_str());
        insert_account(&mut tx, &added, parent, false).await?;
        tx.commit().await?;

        debug!(number = %added.number, "Account added");
        Ok(added)
    }

    /// Deactivates an account; it stays readable for reports
    #[instrument(skip(self))]
    pub async fn deactivate_account(&self, number: &str) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, Uuid>("UPDATE accounts SET is_active = FALSE WHERE number = $1 RETURNING id")
            .bind(number)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))?;

        info!(number, "Account deactivated");
        Ok(())
    }

    pub async fn chart(&self) -> Result<ChartOfAccounts, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        load_chart(&mut conn).await
    }

    /// Inserts every journal of `journals` that is not stored yet
    #[instrument(skip(self, journals))]
    pub async fn install_journals(&self, journals: &JournalRegistry) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for journal in journals.iter() {
            inserted += insert_journal(&mut tx, journal, true).await?;
        }
        tx.commit().await?;

        info!(inserted, "Journals installed");
        Ok(inserted)
    }

    #[instrument(skip(self, journal), fields(code = %journal.code))]
    pub async fn add_journal(&self, journal: Journal) -> Result<Journal, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut registry = load_journals(&mut tx).await?;
        let added = registry.add(journal)?.clone();
        if let Some(counterpart) = &added.counterpart_account {
            load_chart(&mut tx).await?.require_active(counterpart)?;
        }
        insert_journal(&mut tx, &added, false).await?;
        tx.commit().await?;
        Ok(added)
    }

    pub async fn journals(&self) -> Result<JournalRegistry, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        load_journals(&mut conn).await
    }

    /// Inserts the templates not stored yet
    ///
    /// Each template must name an active journal and two active accounts.
    #[instrument(skip(self, templates), fields(templates = templates.len()))]
    pub async fn install_templates(&self, templates: &[OperationTemplate]) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let chart = load_chart(&mut tx).await?;
        let journals = load_journals(&mut tx).await?;

        let mut inserted = 0;
        for template in templates {
            journals.require_active(&template.journal_code)?;
            chart.require_active(&template.debit_account)?;
            chart.require_active(&template.credit_account)?;

            inserted += sqlx::query(
                r#"
                INSERT INTO operation_templates
                    (id, code, label, journal_code, debit_account, credit_account, display_order, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (code) DO NOTHING
                "#,
            )
            .bind(template.id.as_uuid())
            .bind(&template.code)
            .bind(&template.label)
            .bind(&template.journal_code)
            .bind(&template.debit_account)
            .bind(&template.credit_account)
            .bind(template.display_order)
            .bind(template.is_active)
            .execute(&mut *tx)
            .await
            .map_err(classify)?
            .rows_affected();
        }
        tx.commit().await?;

        info!(inserted, "Operation templates installed");
        Ok(inserted)
    }

    /// Active templates in display order
    pub async fn templates(&self) -> Result<Vec<OperationTemplate>, DatabaseError> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, code, label, journal_code, debit_account, credit_account, display_order, is_active
            FROM operation_templates
            WHERE is_active
            ORDER BY display_order, label
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TemplateRow::into_domain).collect())
    }

    // ------------------------------------------------------------------
    // Periods
    // ------------------------------------------------------------------

    /// Registers a period
    ///
    /// # Errors
    ///
    /// Returns `PeriodOverlap` if another open period covers any of its days.
    #[instrument(skip(self, period), fields(period = %period.label))]
    pub async fn open_period(&self, period: &AccountingPeriod) -> Result<PeriodId, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        if period.is_open() {
            let existing = sqlx::query_scalar::<_, String>(
                r#"
                SELECT label FROM accounting_periods
                WHERE status = 'open'
                  AND daterange(start_date, end_date, '[]') && daterange($1, $2, '[]')
                LIMIT 1
                "#,
            )
            .bind(period.range.start)
            .bind(period.range.end)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(existing) = existing {
                return Err(LedgerError::PeriodOverlap {
                    label: period.label.clone(),
                    existing,
                }
                .into());
            }
        }

        sqlx::query(
            r#"
            INSERT INTO accounting_periods (id, label, start_date, end_date, status, is_first, closed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(period.id.as_uuid())
        .bind(&period.label)
        .bind(period.range.start)
        .bind(period.range.end)
        .bind(DbPeriodStatus::from(period.status))
        .bind(period.is_first)
        .bind(period.closed_at)
        .execute(&mut *tx)
        .await
        .map_err(classify)?;
        tx.commit().await?;

        info!(start = %period.range.start, end = %period.range.end, "Accounting period opened");
        Ok(period.id)
    }

    pub async fn period(&self, id: &PeriodId) -> Result<AccountingPeriod, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        load_period(&mut conn, id, RowLock::None).await
    }

    /// The open period containing `date`
    pub async fn open_period_for(&self, date: NaiveDate) -> Result<AccountingPeriod, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        find_open_period(&mut conn, date, RowLock::None).await
    }

    /// Closes a period once it holds no draft entry
    #[instrument(skip(self), fields(period = %id))]
    pub async fn close_period(&self, id: &PeriodId) -> Result<AccountingPeriod, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut period = load_period(&mut tx, id, RowLock::Update).await?;

        let drafts = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ledger_entries WHERE period_id = $1 AND status = 'draft'",
        )
        .bind(id.as_uuid())
        .fetch_one(&mut *tx)
        .await?;
        if drafts > 0 {
            return Err(LedgerError::PeriodHasDrafts {
                label: period.label.clone(),
                drafts: drafts as usize,
            }
            .into());
        }

        period.close();
        sqlx::query("UPDATE accounting_periods SET status = $2, closed_at = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(DbPeriodStatus::from(period.status))
            .bind(period.closed_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(period = %period.label, "Accounting period closed");
        Ok(period)
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Reserves the next number of a journal for the month of `date`
    #[instrument(skip(self))]
    pub async fn generate_entry_number(&self, journal_code: &str, date: NaiveDate) -> Result<String, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        load_journals(&mut tx)
            .await?
            .get(journal_code)
            .ok_or_else(|| LedgerError::JournalNotFound(journal_code.to_string()))?;
        let number = next_entry_number(&mut tx, journal_code, date).await?;
        tx.commit().await?;
        Ok(number)
    }

    /// Creates a draft entry in `period_id`
    #[instrument(skip(self, draft), fields(journal = %draft.journal_code, date = %draft.date))]
    pub async fn create_entry(&self, period_id: &PeriodId, draft: EntryDraft) -> Result<LedgerEntry, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let period = load_period(&mut tx, period_id, RowLock::Share).await?;
        let entry = create_draft(&mut tx, &period, draft).await?;
        tx.commit().await?;
        Ok(entry)
    }

    pub async fn entry(&self, id: &EntryId) -> Result<LedgerEntry, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        load_entry(&mut conn, id, RowLock::None).await
    }

    pub async fn entry_by_number(&self, number: &str) -> Result<LedgerEntry, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM ledger_entries WHERE number = $1")
            .bind(number)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| LedgerError::EntryNotFound(number.to_string()))?;
        load_entry(&mut conn, &EntryId::from_uuid(id), RowLock::None).await
    }

    /// Validates a draft entry
    ///
    /// # Errors
    ///
    /// - `UnbalancedEntry` if debit and credit totals differ; the entry stays draft
    /// - `InvalidPeriod` if its period has been closed since creation
    /// - `ImmutableEntry` if the entry is not a draft
    #[instrument(skip(self), fields(entry = %id))]
    pub async fn validate(&self, id: &EntryId) -> Result<LedgerEntry, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut entry = load_entry(&mut tx, id, RowLock::Update).await?;
        let period = load_period(&mut tx, &entry.period_id, RowLock::Share).await?;
        period.ensure_accepts(entry.date)?;
        entry.validate()?;

        sqlx::query("UPDATE ledger_entries SET status = $2, validated_at = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(DbEntryStatus::from(entry.status))
            .bind(entry.validated_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(number = %entry.number, "Entry validated");
        Ok(entry)
    }

    /// Cancels a draft entry
    #[instrument(skip(self), fields(entry = %id))]
    pub async fn cancel(&self, id: &EntryId) -> Result<LedgerEntry, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut entry = load_entry(&mut tx, id, RowLock::Update).await?;
        entry.cancel()?;

        sqlx::query("UPDATE ledger_entries SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(DbEntryStatus::from(entry.status))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(number = %entry.number, "Entry cancelled");
        Ok(entry)
    }

    /// Replaces all lines of a draft entry
    #[instrument(skip(self, lines), fields(entry = %id, lines = lines.len()))]
    pub async fn replace_lines(&self, id: &EntryId, lines: Vec<LineDraft>) -> Result<LedgerEntry, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut entry = load_entry(&mut tx, id, RowLock::Update).await?;
        let chart = load_chart(&mut tx).await?;
        entry.replace_lines(lines, &chart)?;

        sqlx::query("DELETE FROM ledger_lines WHERE entry_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, &entry).await?;
        tx.commit().await?;
        Ok(entry)
    }

    /// Creates and validates an entry in the open period containing its date
    ///
    /// No number is consumed unless the entry balances.
    #[instrument(skip(self, draft), fields(journal = %draft.journal_code, date = %draft.date))]
    pub async fn post(&self, draft: EntryDraft) -> Result<LedgerEntry, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let entry = post_entry(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(entry)
    }

    /// Posts the reversing entry of a validated entry
    #[instrument(skip(self, label), fields(entry = %id))]
    pub async fn reverse(&self, id: &EntryId, date: NaiveDate, label: &str) -> Result<LedgerEntry, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let original = load_entry(&mut tx, id, RowLock::Share).await?;
        let draft = original.reversal_draft(date, label)?;
        let reversal = post_entry(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(reversal)
    }

    /// Creates a draft from a quick-entry template
    #[instrument(skip(self, description))]
    pub async fn create_from_template(
        &self,
        template_code: &str,
        date: NaiveDate,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<LedgerEntry, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let template = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, code, label, journal_code, debit_account, credit_account, display_order, is_active
            FROM operation_templates
            WHERE code = $1 AND is_active
            "#,
        )
        .bind(template_code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| LedgerError::TemplateNotFound(template_code.to_string()))?
        .into_domain();

        let draft = template.to_draft(date, amount, description)?;
        let period = find_open_period(&mut tx, date, RowLock::Share).await?;
        let entry = create_draft(&mut tx, &period, draft).await?;
        tx.commit().await?;
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // Balances and reports
    // ------------------------------------------------------------------

    /// Signed balance `sum(debit) - sum(credit)` of validated lines
    #[instrument(skip(self))]
    pub async fn account_balance(&self, number: &str, scope: BalanceScope) -> Result<Amount, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let account = load_account(&mut conn, number, RowLock::None).await?;
        let range = match scope {
            BalanceScope::Period { id } => Some(load_period(&mut conn, &id, RowLock::None).await?.range),
            BalanceScope::Range { range } => Some(range),
            BalanceScope::AllTime => None,
        };

        let balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(l.debit - l.credit), 0)
            FROM ledger_lines l
            JOIN ledger_entries e ON e.id = l.entry_id
            WHERE l.account_id = $1
              AND e.status = 'validated'
              AND ($2::date IS NULL OR e.entry_date BETWEEN $2 AND $3)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .fetch_one(&mut *conn)
        .await?;

        Ok(Amount::new(balance))
    }

    /// Trial balance over `range`, optionally restricted to one class
    #[instrument(skip(self))]
    pub async fn trial_balance(&self, range: DateRange, class: Option<AccountClass>) -> Result<TrialBalance, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let (_, trial_balance) = load_trial_balance(&mut conn, range, class).await?;
        Ok(trial_balance)
    }

    /// Income statement over `range`
    #[instrument(skip(self))]
    pub async fn income_statement(&self, range: DateRange) -> Result<IncomeStatement, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let (chart, trial_balance) = load_trial_balance(&mut conn, range, None).await?;
        Ok(IncomeStatement::from_trial_balance(&trial_balance, &chart))
    }

    /// Balance sheet over `range`, carrying that range's net result
    #[instrument(skip(self))]
    pub async fn balance_sheet(&self, range: DateRange) -> Result<BalanceSheet, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let (chart, trial_balance) = load_trial_balance(&mut conn, range, None).await?;
        let result = IncomeStatement::from_trial_balance(&trial_balance, &chart).net_result;
        Ok(BalanceSheet::from_trial_balance(&trial_balance, result))
    }

    /// Validated movements of one account with running balance
    #[instrument(skip(self))]
    pub async fn general_ledger(&self, number: &str, range: DateRange) -> Result<GeneralLedger, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let account = load_account(&mut conn, number, RowLock::None).await?;

        let opening = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(l.debit - l.credit), 0)
            FROM ledger_lines l
            JOIN ledger_entries e ON e.id = l.entry_id
            WHERE l.account_id = $1 AND e.status = 'validated' AND e.entry_date < $2
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(range.start)
        .fetch_one(&mut *conn)
        .await?;

        let rows = sqlx::query_as::<_, LedgerMovementRow>(
            r#"
            SELECT e.entry_date, e.number AS entry_number, e.journal_code, l.label, l.debit, l.credit,
                   r.code AS reconciliation_code
            FROM ledger_lines l
            JOIN ledger_entries e ON e.id = l.entry_id
            LEFT JOIN reconciliation_lines rl ON rl.line_id = l.id
            LEFT JOIN reconciliations r ON r.id = rl.reconciliation_id
            WHERE l.account_id = $1 AND e.status = 'validated' AND e.entry_date BETWEEN $2 AND $3
            ORDER BY e.entry_date, e.number, l.line_no
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&mut *conn)
        .await?;

        let rows = rows.into_iter().map(LedgerMovementRow::into_domain).collect();
        Ok(GeneralLedger::build(&account, range, Amount::new(opening), rows))
    }

    // ------------------------------------------------------------------
    // Lettrage
    // ------------------------------------------------------------------

    /// Matches validated lines of a third-party account
    ///
    /// The account row stays locked until commit, so two matchings on the
    /// same account never draw the same code.
    #[instrument(skip(self, line_ids, comment), fields(lines = line_ids.len()))]
    pub async fn match_lines(
        &self,
        account_number: &str,
        line_ids: &[LineId],
        actor: &str,
        comment: Option<String>,
    ) -> Result<Reconciliation, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let account = load_account(&mut tx, account_number, RowLock::NoKeyUpdate).await?;

        let ids: Vec<Uuid> = line_ids.iter().map(|id| *id.as_uuid()).collect();
        let found: HashMap<Uuid, LineStatusRow> = sqlx::query_as::<_, LineStatusRow>(
            r#"
            SELECT l.id, l.entry_id, l.account_id, l.account_number, l.label, l.debit, l.credit,
                   l.third_party, e.status AS entry_status
            FROM ledger_lines l
            JOIN ledger_entries e ON e.id = l.entry_id
            WHERE l.id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|row| (row.line.id, row))
        .collect();

        let mut lines = Vec::with_capacity(line_ids.len());
        for line_id in line_ids {
            let row = found
                .get(line_id.as_uuid())
                .ok_or_else(|| LedgerError::LineNotFound(line_id.to_string()))?;
            if row.entry_status != DbEntryStatus::Validated {
                return Err(LedgerError::LineNotValidated(line_id.to_string()).into());
            }
            lines.push(row.line.clone().into_domain());
        }

        let taken: HashMap<Uuid, String> = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT rl.line_id, r.code
            FROM reconciliation_lines rl
            JOIN reconciliations r ON r.id = rl.reconciliation_id
            WHERE rl.line_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .collect();
        if let Some(line) = lines.iter().find(|l| taken.contains_key(l.id.as_uuid())) {
            return Err(LedgerError::LineAlreadyReconciled {
                line: line.id.to_string(),
                code: taken[line.id.as_uuid()].clone(),
            }
            .into());
        }

        let code = next_reconciliation_code(&mut tx, &account).await?;
        let members: Vec<&LedgerLine> = lines.iter().collect();
        let reconciliation = Reconciliation::build(&account, &members, code, actor, comment)?;
        insert_reconciliation(&mut tx, &reconciliation).await?;
        tx.commit().await?;

        info!(
            account = %account.number,
            code = %reconciliation.code,
            partial = reconciliation.partial,
            "Lines matched"
        );
        Ok(reconciliation)
    }

    /// Undoes a reconciliation, freeing its lines; codes are not reused
    #[instrument(skip(self))]
    pub async fn unmatch(&self, account_number: &str, code: &str) -> Result<Reconciliation, DatabaseError> {
        let code: ReconciliationCode = code.parse()?;
        let mut tx = self.pool.begin().await?;
        let account = load_account(&mut tx, account_number, RowLock::NoKeyUpdate).await?;

        let row = sqlx::query_as::<_, ReconciliationRow>(
            r#"
            SELECT id, code, account_id, account_number, total_debit, total_credit, amount, partial,
                   actor, matched_at, comment
            FROM reconciliations
            WHERE account_id = $1 AND code = $2
            FOR UPDATE
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(code.to_string())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| LedgerError::ReconciliationNotFound(code.to_string()))?;

        let line_ids = reconciliation_line_ids(&mut tx, row.id).await?;
        sqlx::query("DELETE FROM reconciliations WHERE id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(account = %account.number, code = %code, "Lines unmatched");
        row.into_domain(line_ids)
    }

    /// Reconciliations of an account in code order
    pub async fn reconciliations(&self, account_number: &str) -> Result<Vec<Reconciliation>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let account = load_account(&mut conn, account_number, RowLock::None).await?;

        let rows = sqlx::query_as::<_, ReconciliationRow>(
            r#"
            SELECT id, code, account_id, account_number, total_debit, total_credit, amount, partial,
                   actor, matched_at, comment
            FROM reconciliations
            WHERE account_id = $1
            ORDER BY code
            "#,
        )
        .bind(account.id.as_uuid())
        .fetch_all(&mut *conn)
        .await?;

        let mut reconciliations = Vec::with_capacity(rows.len());
        for row in rows {
            let line_ids = reconciliation_line_ids(&mut conn, row.id).await?;
            reconciliations.push(row.into_domain(line_ids)?);
        }
        Ok(reconciliations)
    }
}

impl DomainPort for LedgerRepository {}

#[async_trait]
impl HealthCheckable for LedgerRepository {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-ledger-repository").await
    }
}

// ----------------------------------------------------------------------
// Shared transactional steps
// ----------------------------------------------------------------------

/// Row lock taken by a `SELECT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowLock {
    None,
    Share,
    NoKeyUpdate,
    Update,
}

impl RowLock {
    pub(crate) fn clause(self) -> &'static str {
        match self {
            RowLock::None => "",
            RowLock::Share => " FOR SHARE",
            RowLock::NoKeyUpdate => " FOR NO KEY UPDATE",
            RowLock::Update => " FOR UPDATE",
        }
    }
}

/// Creates, validates, numbers and stores an entry in the open period of its date
pub(crate) async fn post_entry(conn: &mut PgConnection, draft: EntryDraft) -> Result<LedgerEntry, DatabaseError> {
    let journals = load_journals(conn).await?;
    let journal = journals.require_active(&draft.journal_code)?;
    let period = find_open_period(conn, draft.date, RowLock::Share).await?;
    let chart = load_chart(conn).await?;

    let mut entry = LedgerEntry::from_draft(draft, String::new(), journal, &period, &chart)?;
    entry.validate()?;
    entry.number = next_entry_number(conn, &entry.journal_code, entry.date).await?;
    insert_entry(conn, &entry).await?;

    info!(number = %entry.number, origin = ?entry.origin, "Entry posted");
    Ok(entry)
}

async fn create_draft(
    conn: &mut PgConnection,
    period: &AccountingPeriod,
    draft: EntryDraft,
) -> Result<LedgerEntry, DatabaseError> {
    let journals = load_journals(conn).await?;
    let journal = journals.require_active(&draft.journal_code)?;
    let chart = load_chart(conn).await?;

    let mut entry = LedgerEntry::from_draft(draft, String::new(), journal, period, &chart)?;
    entry.number = next_entry_number(conn, &entry.journal_code, entry.date).await?;
    insert_entry(conn, &entry).await?;

    debug!(number = %entry.number, journal = %entry.journal_code, lines = entry.lines.len(), "Entry created");
    Ok(entry)
}

/// Bumps the counter of the entry's journal + month prefix
///
/// The upsert holds the counter row until the transaction ends, so
/// concurrent postings on the same prefix get consecutive numbers and a
/// rolled back posting gives its number back.
pub(crate) async fn next_entry_number(
    conn: &mut PgConnection,
    journal_code: &str,
    date: NaiveDate,
) -> Result<String, DatabaseError> {
    let prefix = entry_prefix(journal_code, date);
    let counter = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO entry_sequences (prefix, last_value)
        VALUES ($1, 1)
        ON CONFLICT (prefix) DO UPDATE SET last_value = entry_sequences.last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(&prefix)
    .fetch_one(&mut *conn)
    .await?;

    let counter = u32::try_from(counter)
        .map_err(|_| DatabaseError::SerializationError(format!("counter {} of {}", counter, prefix)))?;
    Ok(format_entry_number(&prefix, counter))
}

/// Chart and trial balance read on one connection
async fn load_trial_balance(
    conn: &mut PgConnection,
    range: DateRange,
    class: Option<AccountClass>,
) -> Result<(ChartOfAccounts, TrialBalance), DatabaseError> {
    let chart = load_chart(conn).await?;

    let movements = sqlx::query_as::<_, MovementRow>(
        r#"
        SELECT l.account_number, SUM(l.debit) AS total_debit, SUM(l.credit) AS total_credit
        FROM ledger_lines l
        JOIN ledger_entries e ON e.id = l.entry_id
        WHERE e.status = 'validated' AND e.entry_date BETWEEN $1 AND $2
        GROUP BY l.account_number
        "#,
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(&mut *conn)
    .await?;

    let rows = movements
        .into_iter()
        .filter_map(|m| chart.get(&m.account_number).map(|a| (a, m)))
        .filter(|(a, _)| a.is_active && class.map_or(true, |c| a.class == c))
        .map(|(a, m)| TrialBalanceRow::new(a, Amount::new(m.total_debit), Amount::new(m.total_credit)))
        .collect();

    Ok((chart, TrialBalance::from_rows(range, rows)))
}

pub(crate) async fn load_chart(conn: &mut PgConnection) -> Result<ChartOfAccounts, DatabaseError> {
    let rows = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT id, number, label, class, balance_side, kind, parent_id, description, is_active
        FROM accounts
        ORDER BY number
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut chart = ChartOfAccounts::new();
    for row in rows {
        chart.add(row.into_domain()?)?;
    }
    Ok(chart)
}

async fn load_account(conn: &mut PgConnection, number: &str, lock: RowLock) -> Result<Account, DatabaseError> {
    let sql = format!(
        "SELECT id, number, label, class, balance_side, kind, parent_id, description, is_active \
         FROM accounts WHERE number = $1{}",
        lock.clause()
    );
    sqlx::query_as::<_, AccountRow>(&sql)
        .bind(number)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))?
        .into_domain()
}

pub(crate) async fn load_journals(conn: &mut PgConnection) -> Result<JournalRegistry, DatabaseError> {
    let rows = sqlx::query_as::<_, JournalRow>(
        "SELECT id, code, label, journal_type, counterpart_account, is_active FROM journals ORDER BY code",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut registry = JournalRegistry::new();
    for row in rows {
        registry.add(row.into_domain())?;
    }
    Ok(registry)
}

async fn insert_account(
    conn: &mut PgConnection,
    account: &Account,
    parent_number: Option<&str>,
    skip_existing: bool,
) -> Result<u64, DatabaseError> {
    let sql = format!(
        r#"
        INSERT INTO accounts (id, number, label, class, balance_side, kind, parent_id, description, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, (SELECT id FROM accounts WHERE number = $7), $8, $9)
        {}
        "#,
        if skip_existing { "ON CONFLICT (number) DO NOTHING" } else { "" }
    );
    let result = sqlx::query(&sql)
        .bind(account.id.as_uuid())
        .bind(&account.number)
        .bind(&account.label)
        .bind(i16::from(account.class.digit()))
        .bind(DbBalanceSide::from(account.balance_side))
        .bind(DbAccountKind::from(account.kind))
        .bind(parent_number)
        .bind(&account.description)
        .bind(account.is_active)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    Ok(result.rows_affected())
}

async fn insert_journal(conn: &mut PgConnection, journal: &Journal, skip_existing: bool) -> Result<u64, DatabaseError> {
    let sql = format!(
        r#"
        INSERT INTO journals (id, code, label, journal_type, counterpart_account, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        {}
        "#,
        if skip_existing { "ON CONFLICT (code) DO NOTHING" } else { "" }
    );
    let result = sqlx::query(&sql)
        .bind(journal.id.as_uuid())
        .bind(&journal.code)
        .bind(&journal.label)
        .bind(DbJournalType::from(journal.journal_type))
        .bind(&journal.counterpart_account)
        .bind(journal.is_active)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    Ok(result.rows_affected())
}

async fn load_period(conn: &mut PgConnection, id: &PeriodId, lock: RowLock) -> Result<AccountingPeriod, DatabaseError> {
    let sql = format!(
        "SELECT id, label, start_date, end_date, status, is_first, closed_at \
         FROM accounting_periods WHERE id = $1{}",
        lock.clause()
    );
    sqlx::query_as::<_, PeriodRow>(&sql)
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| LedgerError::PeriodNotFound(id.to_string()))?
        .into_domain()
}

async fn find_open_period(conn: &mut PgConnection, date: NaiveDate, lock: RowLock) -> Result<AccountingPeriod, DatabaseError> {
    let sql = format!(
        "SELECT id, label, start_date, end_date, status, is_first, closed_at \
         FROM accounting_periods \
         WHERE status = 'open' AND $1 BETWEEN start_date AND end_date{}",
        lock.clause()
    );
    sqlx::query_as::<_, PeriodRow>(&sql)
        .bind(date)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| LedgerError::InvalidPeriod {
            date,
            reason: "no open period contains this date".to_string(),
        })?
        .into_domain()
}

async fn load_entry(conn: &mut PgConnection, id: &EntryId, lock: RowLock) -> Result<LedgerEntry, DatabaseError> {
    let sql = format!(
        "SELECT id, number, entry_date, journal_id, journal_code, period_id, label, reference, status, \
                origin, created_at, validated_at, reverses \
         FROM ledger_entries WHERE id = $1{}",
        lock.clause()
    );
    let row = sqlx::query_as::<_, EntryRow>(&sql)
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))?;

    let lines = sqlx::query_as::<_, LineRow>(
        r#"
        SELECT id, entry_id, account_id, account_number, label, debit, credit, third_party
        FROM ledger_lines
        WHERE entry_id = $1
        ORDER BY line_no
        "#,
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(row.into_domain(lines.into_iter().map(LineRow::into_domain).collect()))
}

async fn insert_entry(conn: &mut PgConnection, entry: &LedgerEntry) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO ledger_entries
            (id, number, entry_date, journal_id, journal_code, period_id, label, reference,
             status, origin, created_at, validated_at, reverses)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(entry.id.as_uuid())
    .bind(&entry.number)
    .bind(entry.date)
    .bind(entry.journal_id.as_uuid())
    .bind(&entry.journal_code)
    .bind(entry.period_id.as_uuid())
    .bind(&entry.label)
    .bind(&entry.reference)
    .bind(DbEntryStatus::from(entry.status))
    .bind(DbEntryOrigin::from(entry.origin))
    .bind(entry.created_at)
    .bind(entry.validated_at)
    .bind(entry.reverses.map(Uuid::from))
    .execute(&mut *conn)
    .await
    .map_err(classify)?;

    insert_lines(conn, entry).await
}

async fn insert_lines(conn: &mut PgConnection, entry: &LedgerEntry) -> Result<(), DatabaseError> {
    for (index, line) in entry.lines.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO ledger_lines
                (id, entry_id, line_no, account_id, account_number, label, debit, credit, third_party)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(line.id.as_uuid())
        .bind(entry.id.as_uuid())
        .bind(index as i32 + 1)
        .bind(line.account_id.as_uuid())
        .bind(&line.account_number)
        .bind(&line.label)
        .bind(line.debit.value())
        .bind(line.credit.value())
        .bind(&line.third_party)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    }
    Ok(())
}

/// Draws the next lettrage code of an account whose row is locked
async fn next_reconciliation_code(conn: &mut PgConnection, account: &Account) -> Result<ReconciliationCode, DatabaseError> {
    let last = sqlx::query_scalar::<_, String>("SELECT last_code FROM reconciliation_counters WHERE account_id = $1")
        .bind(account.id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;

    let code = match last {
        None => ReconciliationCode::first(),
        Some(last) => last
            .parse::<ReconciliationCode>()?
            .next()
            .ok_or_else(|| LedgerError::CodeSpaceExhausted(account.number.clone()))?,
    };

    sqlx::query(
        r#"
        INSERT INTO reconciliation_counters (account_id, last_code)
        VALUES ($1, $2)
        ON CONFLICT (account_id) DO UPDATE SET last_code = EXCLUDED.last_code
        "#,
    )
    .bind(account.id.as_uuid())
    .bind(code.to_string())
    .execute(&mut *conn)
    .await?;

    Ok(code)
}

async fn insert_reconciliation(conn: &mut PgConnection, reconciliation: &Reconciliation) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO reconciliations
            (id, code, account_id, account_number, total_debit, total_credit, amount, partial,
             actor, matched_at, comment)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(reconciliation.id.as_uuid())
    .bind(reconciliation.code.to_string())
    .bind(reconciliation.account_id.as_uuid())
    .bind(&reconciliation.account_number)
    .bind(reconciliation.total_debit.value())
    .bind(reconciliation.total_credit.value())
    .bind(reconciliation.amount.value())
    .bind(reconciliation.partial)
    .bind(&reconciliation.actor)
    .bind(reconciliation.matched_at)
    .bind(&reconciliation.comment)
    .execute(&mut *conn)
    .await
    .map_err(classify)?;

    for line_id in &reconciliation.line_ids {
        sqlx::query("INSERT INTO reconciliation_lines (line_id, reconciliation_id) VALUES ($1, $2)")
            .bind(line_id.as_uuid())
            .bind(reconciliation.id.as_uuid())
            .execute(&mut *conn)
            .await
            .map_err(classify)?;
    }
    Ok(())
}

async fn reconciliation_line_ids(conn: &mut PgConnection, reconciliation_id: Uuid) -> Result<Vec<LineId>, DatabaseError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT line_id FROM reconciliation_lines WHERE reconciliation_id = $1 ORDER BY line_id",
    )
    .bind(reconciliation_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ids.into_iter().map(LineId::from_uuid).collect())
}

// ----------------------------------------------------------------------
// Rows
// ----------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub number: String,
    pub label: String,
    pub class: i16,
    pub balance_side: DbBalanceSide,
    pub kind: DbAccountKind,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
    pub is_active: bool,
}

impl AccountRow {
    pub fn into_domain(self) -> Result<Account, DatabaseError> {
        let digit = u8::try_from(self.class).map_err(|_| {
            DatabaseError::SerializationError(format!("account {} has class {}", self.number, self.class))
        })?;
        Ok(Account {
            id: AccountId::from_uuid(self.id),
            number: self.number,
            label: self.label,
            class: AccountClass::new(digit)?,
            balance_side: self.balance_side.into(),
            kind: self.kind.into(),
            parent_id: self.parent_id.map(AccountId::from_uuid),
            description: self.description,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalRow {
    pub id: Uuid,
    pub code: String,
    pub label: String,
    pub journal_type: DbJournalType,
    pub counterpart_account: Option<String>,
    pub is_active: bool,
}

impl JournalRow {
    pub fn into_domain(self) -> Journal {
        Journal {
            id: JournalId::from_uuid(self.id),
            code: self.code,
            label: self.label,
            journal_type: self.journal_type.into(),
            counterpart_account: self.counterpart_account,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeriodRow {
    pub id: Uuid,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: DbPeriodStatus,
    pub is_first: bool,
    pub closed_at: Option<DateTime<Utc>>,
}

impl PeriodRow {
    pub fn into_domain(self) -> Result<AccountingPeriod, DatabaseError> {
        let range = DateRange::new(self.start_date, self.end_date)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        Ok(AccountingPeriod {
            id: PeriodId::from_uuid(self.id),
            label: self.label,
            range,
            status: self.status.into(),
            is_first: self.is_first,
            closed_at: self.closed_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub number: String,
    pub entry_date: NaiveDate,
    pub journal_id: Uuid,
    pub journal_code: String,
    pub period_id: Uuid,
    pub label: String,
    pub reference: Option<String>,
    pub status: DbEntryStatus,
    pub origin: DbEntryOrigin,
    pub created_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
    pub reverses: Option<Uuid>,
}

impl EntryRow {
    pub fn into_domain(self, lines: Vec<LedgerLine>) -> LedgerEntry {
        LedgerEntry {
            id: EntryId::from_uuid(self.id),
            number: self.number,
            date: self.entry_date,
            journal_id: JournalId::from_uuid(self.journal_id),
            journal_code: self.journal_code,
            period_id: PeriodId::from_uuid(self.period_id),
            label: self.label,
            reference: self.reference,
            status: self.status.into(),
            origin: self.origin.into(),
            created_at: self.created_at,
            validated_at: self.validated_at,
            reverses: self.reverses.map(EntryId::from_uuid),
            lines,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LineRow {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub account_id: Uuid,
    pub account_number: String,
    pub label: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub third_party: Option<String>,
}

impl LineRow {
    pub fn into_domain(self) -> LedgerLine {
        LedgerLine {
            id: LineId::from_uuid(self.id),
            entry_id: EntryId::from_uuid(self.entry_id),
            account_id: AccountId::from_uuid(self.account_id),
            account_number: self.account_number,
            label: self.label,
            debit: Amount::new(self.debit),
            credit: Amount::new(self.credit),
            third_party: self.third_party,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct LineStatusRow {
    #[sqlx(flatten)]
    line: LineRow,
    entry_status: DbEntryStatus,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReconciliationRow {
    pub id: Uuid,
    pub code: String,
    pub account_id: Uuid,
    pub account_number: String,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub amount: Decimal,
    pub partial: bool,
    pub actor: String,
    pub matched_at: DateTime<Utc>,
    pub comment: Option<String>,
}

impl ReconciliationRow {
    pub fn into_domain(self, line_ids: Vec<LineId>) -> Result<Reconciliation, DatabaseError> {
        Ok(Reconciliation {
            id: ReconciliationId::from_uuid(self.id),
            code: self.code.parse()?,
            account_id: AccountId::from_uuid(self.account_id),
            account_number: self.account_number,
            line_ids,
            total_debit: Amount::new(self.total_debit),
            total_credit: Amount::new(self.total_credit),
            amount: Amount::new(self.amount),
            partial: self.partial,
            actor: self.actor,
            matched_at: self.matched_at,
            comment: self.comment,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub code: String,
    pub label: String,
    pub journal_code: String,
    pub debit_account: String,
    pub credit_account: String,
    pub display_order: i32,
    pub is_active: bool,
}

impl TemplateRow {
    pub fn into_domain(self) -> OperationTemplate {
        OperationTemplate {
            id: TemplateId::from_uuid(self.id),
            code: self.code,
            label: self.label,
            journal_code: self.journal_code,
            debit_account: self.debit_account,
            credit_account: self.credit_account,
            display_order: self.display_order,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    account_number: String,
    total_debit: Decimal,
    total_credit: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct LedgerMovementRow {
    entry_date: NaiveDate,
    entry_number: String,
    journal_code: String,
    label: String,
    debit: Decimal,
    credit: Decimal,
    reconciliation_code: Option<String>,
}

impl LedgerMovementRow {
    fn into_domain(self) -> GeneralLedgerRow {
        GeneralLedgerRow {
            date: self.entry_date,
            entry_number: self.entry_number,
            journal_code: self.journal_code,
            label: self.label,
            debit: Amount::new(self.debit),
            credit: Amount::new(self.credit),
            running_balance: Amount::ZERO,
            reconciliation_code: self.reconciliation_code,
        }
    }
}

// ----------------------------------------------------------------------
// Postgres enum types
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "balance_side", rename_all = "snake_case")]
pub enum DbBalanceSide {
    Debit,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "account_kind", rename_all = "snake_case")]
pub enum DbAccountKind {
    General,
    Auxiliary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "journal_type", rename_all = "snake_case")]
pub enum DbJournalType {
    Purchases,
    Sales,
    Bank,
    Cash,
    Miscellaneous,
    Opening,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "period_status", rename_all = "snake_case")]
pub enum DbPeriodStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "entry_status", rename_all = "snake_case")]
pub enum DbEntryStatus {
    Draft,
    Validated,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "entry_origin", rename_all = "snake_case")]
pub enum DbEntryOrigin {
    Manual,
    Invoice,
    Treasury,
    Automatic,
    Closing,
}

db_enum_conversions!(DbBalanceSide <=> BalanceSide { Debit, Credit });
db_enum_conversions!(DbAccountKind <=> AccountKind { General, Auxiliary });
db_enum_conversions!(DbJournalType <=> JournalType { Purchases, Sales, Bank, Cash, Miscellaneous, Opening, Closing });
db_enum_conversions!(DbPeriodStatus <=> PeriodStatus { Open, Closed });
db_enum_conversions!(DbEntryStatus <=> EntryStatus { Draft, Validated, Cancelled });
db_enum_conversions!(DbEntryOrigin <=> EntryOrigin { Manual, Invoice, Treasury, Automatic, Closing });
