//! Recovery repository
//!
//! Stores cases, payments and manual allocations. Every operation that
//! moves money locks the case row first, runs the settlement allocator on
//! the locked state, posts the matching ledger entry and writes the new
//! case and payment state in the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use core_kernel::{
    AllocationId, Amount, CaseId, DomainPort, HealthCheckResult, HealthCheckable,
    OperationMetadata, PartyId, PaymentId,
};
use domain_ledger::LedgerEntry;
use domain_recovery::{
    AllocationCategory, AllocationSplit, BillingMode, CaseSituation, CaseStatus, CaseTotals,
    ClosureReason, ManualAllocation, OpenCaseRequest, Payment, PaymentMode, PaymentReport,
    PaymentRequest, RecoveryCase, RecoveryError, RecoveryType, SettlementAllocator, SurchargedInterest,
};

use super::ledger::{post_entry, RowLock};
use crate::error::{classify, DatabaseError};

/// Repository for recovery cases and their payments
#[derive(Debug, Clone)]
pub struct RecoveryRepository {
    pool: PgPool,
    allocator: SettlementAllocator,
}

impl RecoveryRepository {
    pub fn new(pool: PgPool, allocator: SettlementAllocator) -> Self {
        Self { pool, allocator }
    }

    pub fn allocator(&self) -> &SettlementAllocator {
        &self.allocator
    }

    /// Opens a case; its tariff fee is computed on the principal
    #[instrument(skip(self, request), fields(reference = %request.reference))]
    pub async fn open_case(&self, request: OpenCaseRequest) -> Result<RecoveryCase, DatabaseError> {
        let case = self.allocator.open_case(request)?;

        let mut tx = self.pool.begin().await?;
        let taken = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM recovery_cases WHERE reference = $1)")
            .bind(&case.reference)
            .fetch_one(&mut *tx)
            .await?;
        if taken {
            return Err(DatabaseError::duplicate("Recovery case", "reference", &case.reference));
        }

        sqlx::query(
            r#"
            INSERT INTO recovery_cases
                (id, reference, creditor_id, debtor_id, recovery_type, billing_mode, status,
                 principal, interest, procedure_fees, tariff_fee, opened_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(case.id.as_uuid())
        .bind(&case.reference)
        .bind(case.creditor_id.as_uuid())
        .bind(case.debtor_id.as_uuid())
        .bind(DbRecoveryType::from(case.recovery_type))
        .bind(DbBillingMode::from(case.billing_mode))
        .bind(DbCaseStatus::from(case.status))
        .bind(case.principal.value())
        .bind(case.interest.value())
        .bind(case.procedure_fees.value())
        .bind(case.tariff_fee.value())
        .bind(case.opened_on)
        .execute(&mut *tx)
        .await
        .map_err(classify)?;
        tx.commit().await?;

        Ok(case)
    }

    pub async fn case(&self, id: &CaseId) -> Result<RecoveryCase, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        load_case(&mut conn, id, RowLock::None).await
    }

    pub async fn case_by_reference(&self, reference: &str) -> Result<RecoveryCase, DatabaseError> {
        let sql = format!("{} WHERE reference = $1", CASE_SELECT);
        sqlx::query_as::<_, CaseRow>(&sql)
            .bind(reference)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RecoveryError::CaseNotFound(reference.to_string()))?
            .into_domain()
    }

    pub async fn payment(&self, id: &PaymentId) -> Result<Payment, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        load_payment(&mut conn, id, RowLock::None).await
    }

    /// Payments of a case in registration order
    pub async fn payments_of(&self, case_id: &CaseId) -> Result<Vec<Payment>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        load_payments(&mut conn, case_id).await
    }

    /// Manual allocations of a payment, oldest first
    pub async fn allocations_of(&self, payment_id: &PaymentId) -> Result<Vec<ManualAllocation>, DatabaseError> {
        let rows = sqlx::query_as::<_, AllocationRow>(
            r#"
            SELECT id, payment_id, case_id, category, amount, allocated_at, actor, observations
            FROM manual_allocations
            WHERE payment_id = $1
            ORDER BY allocated_at, id
            "#,
        )
        .bind(payment_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AllocationRow::into_domain).collect())
    }

    /// Registers a payment, posts its receipt and updates the case totals
    #[instrument(
        skip(self, request, meta),
        fields(case = %case_id, amount = %request.amount, correlation_id = ?meta.correlation_id)
    )]
    pub async fn register_payment(
        &self,
        case_id: &CaseId,
        request: PaymentRequest,
        meta: &OperationMetadata,
    ) -> Result<(Payment, LedgerEntry), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let case = load_case(&mut tx, case_id, RowLock::Update).await?;

        let (next_case, payment) = self.allocator.register_payment(&case, request, meta)?;
        let draft = self.allocator.config().posting.payment_receipt(&next_case, &payment)?;
        let receipt = post_entry(&mut tx, draft).await?;

        insert_payment(&mut tx, &payment, &receipt).await?;
        update_case(&mut tx, &next_case).await?;
        tx.commit().await?;

        debug!(payment = %payment.id, receipt = %receipt.number, "Payment stored");
        Ok((payment, receipt))
    }

    /// Allocates part of a payment's reserve and posts the transfer
    #[instrument(skip(self, observations, meta), fields(payment = %payment_id, %category, %amount))]
    pub async fn allocate_reserved(
        &self,
        payment_id: &PaymentId,
        category: AllocationCategory,
        amount: Amount,
        date: NaiveDate,
        observations: Option<String>,
        meta: &OperationMetadata,
    ) -> Result<(ManualAllocation, LedgerEntry), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let (case, payment) = lock_case_and_payment(&mut tx, payment_id).await?;

        let (next_case, next_payment, allocation) =
            self.allocator
                .allocate_reserved(&case, &payment, category, amount, observations, meta)?;
        let draft = self
            .allocator
            .config()
            .posting
            .reserved_allocation(&next_case, &next_payment, category, amount, date);
        let transfer = post_entry(&mut tx, draft).await?;

        update_payment(&mut tx, &next_payment).await?;
        insert_allocation(&mut tx, &allocation, &transfer).await?;
        update_case(&mut tx, &next_case).await?;
        tx.commit().await?;

        Ok((allocation, transfer))
    }

    /// Reverses a payment's creditor share and posts the bank transfer
    ///
    /// Returns `None`, and writes nothing, when nothing was due to the creditor.
    #[instrument(skip(self, reference), fields(payment = %payment_id))]
    pub async fn reverse_to_creditor(
        &self,
        payment_id: &PaymentId,
        date: NaiveDate,
        reference: Option<String>,
    ) -> Result<Option<LedgerEntry>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let (case, payment) = lock_case_and_payment(&mut tx, payment_id).await?;

        let (next_case, next_payment) = self.allocator.reverse_to_creditor(&case, &payment, date, reference)?;
        if !next_payment.reversed {
            tx.rollback().await?;
            return Ok(None);
        }

        let draft = self
            .allocator
            .config()
            .posting
            .creditor_reversal(&next_case, &next_payment, date);
        let transfer = post_entry(&mut tx, draft).await?;

        update_payment(&mut tx, &next_payment).await?;
        update_case(&mut tx, &next_case).await?;
        tx.commit().await?;

        info!(payment = %payment_id, entry = %transfer.number, "Creditor reversal stored");
        Ok(Some(transfer))
    }

    #[instrument(skip(self))]
    pub async fn suspend(&self, case_id: &CaseId) -> Result<RecoveryCase, DatabaseError> {
        self.change_status(case_id, RecoveryCase::suspend).await
    }

    #[instrument(skip(self))]
    pub async fn resume(&self, case_id: &CaseId) -> Result<RecoveryCase, DatabaseError> {
        self.change_status(case_id, RecoveryCase::resume).await
    }

    #[instrument(skip(self))]
    pub async fn close(&self, case_id: &CaseId, reason: ClosureReason) -> Result<RecoveryCase, DatabaseError> {
        self.change_status(case_id, |case| case.close(reason)).await
    }

    async fn change_status<F>(&self, case_id: &CaseId, change: F) -> Result<RecoveryCase, DatabaseError>
    where
        F: FnOnce(&mut RecoveryCase) -> Result<(), RecoveryError>,
    {
        let mut tx = self.pool.begin().await?;
        let mut case = load_case(&mut tx, case_id, RowLock::Update).await?;
        change(&mut case)?;
        update_case(&mut tx, &case).await?;
        tx.commit().await?;

        info!(case = %case.reference, status = %case.status, "Case status changed");
        Ok(case)
    }

    /// Situation of a case recomputed from its payments
    pub async fn situation(&self, case_id: &CaseId) -> Result<CaseSituation, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let case = load_case(&mut conn, case_id, RowLock::None).await?;
        let payments = load_payments(&mut conn, case_id).await?;
        Ok(self.allocator.compute_case_situation(&case, &payments)?)
    }

    /// Legal interest on the principal still due on the case up to `until`
    pub async fn accrued_interest(
        &self,
        case_id: &CaseId,
        until: NaiveDate,
        enforceable_on: Option<NaiveDate>,
    ) -> Result<SurchargedInterest, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let case = load_case(&mut conn, case_id, RowLock::None).await?;
        Ok(self.allocator.accrued_interest(&case, until, enforceable_on))
    }

    /// Recomputes the situation and checks it against the stored running totals
    ///
    /// # Errors
    ///
    /// Returns `InconsistentTotals` naming the first total that drifted.
    #[instrument(skip(self))]
    pub async fn verify_case(&self, case_id: &CaseId) -> Result<CaseSituation, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let case = load_case(&mut conn, case_id, RowLock::Share).await?;
        let payments = load_payments(&mut conn, case_id).await?;
        let situation = self.allocator.compute_case_situation(&case, &payments)?;
        situation.verify_against(&case)?;
        Ok(situation)
    }

    pub async fn payment_report(&self, case_id: &CaseId) -> Result<PaymentReport, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let case = load_case(&mut conn, case_id, RowLock::None).await?;
        let payments = load_payments(&mut conn, case_id).await?;
        Ok(self.allocator.payment_report(&case, &payments)?)
    }
}

impl DomainPort for RecoveryRepository {}

#[async_trait]
impl HealthCheckable for RecoveryRepository {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-recovery-repository").await
    }
}

const CASE_SELECT: &str = r#"
    SELECT id, reference, creditor_id, debtor_id, recovery_type, billing_mode, status, closure_reason,
           principal, interest, procedure_fees, tariff_fee,
           total_paid, total_fees, total_tariff, total_interest, total_principal, total_reserved,
           total_due_to_creditor, total_reversed, opened_on, closed_at
    FROM recovery_cases"#;

const PAYMENT_SELECT: &str = r#"
    SELECT id, case_id, payment_date, amount, mode, reference, observations,
           allocated_fees, allocated_tariff, allocated_interest, allocated_principal, reserved,
           due_to_creditor, reversed, reversed_on, reversal_reference, recorded_by, recorded_at
    FROM recovery_payments"#;

async fn load_case(conn: &mut PgConnection, id: &CaseId, lock: RowLock) -> Result<RecoveryCase, DatabaseError> {
    let sql = format!("{} WHERE id = $1{}", CASE_SELECT, lock.clause());
    sqlx::query_as::<_, CaseRow>(&sql)
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RecoveryError::CaseNotFound(id.to_string()))?
        .into_domain()
}

async fn load_payment(conn: &mut PgConnection, id: &PaymentId, lock: RowLock) -> Result<Payment, DatabaseError> {
    let sql = format!("{} WHERE id = $1{}", PAYMENT_SELECT, lock.clause());
    sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RecoveryError::PaymentNotFound(id.to_string()))?
        .into_domain()
}

async fn load_payments(conn: &mut PgConnection, case_id: &CaseId) -> Result<Vec<Payment>, DatabaseError> {
    let sql = format!("{} WHERE case_id = $1 ORDER BY recorded_at, id", PAYMENT_SELECT);
    sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(case_id.as_uuid())
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(PaymentRow::into_domain)
        .collect()
}

/// Locks the case of a payment, then the payment itself
///
/// Always taking the case first keeps lock order the same as
/// `register_payment`.
async fn lock_case_and_payment(
    conn: &mut PgConnection,
    payment_id: &PaymentId,
) -> Result<(RecoveryCase, Payment), DatabaseError> {
    let case_id = sqlx::query_scalar::<_, Uuid>("SELECT case_id FROM recovery_payments WHERE id = $1")
        .bind(payment_id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RecoveryError::PaymentNotFound(payment_id.to_string()))?;

    let case = load_case(conn, &CaseId::from_uuid(case_id), RowLock::Update).await?;
    let payment = load_payment(conn, payment_id, RowLock::Update).await?;
    Ok((case, payment))
}

async fn update_case(conn: &mut PgConnection, case: &RecoveryCase) -> Result<(), DatabaseError> {
    let totals = &case.totals;
    sqlx::query(
        r#"
        UPDATE recovery_cases SET
            status = $2,
            closure_reason = $3,
            total_paid = $4,
            total_fees = $5,
            total_tariff = $6,
            total_interest = $7,
            total_principal = $8,
            total_reserved = $9,
            total_due_to_creditor = $10,
            total_reversed = $11,
            closed_at = $12
        WHERE id = $1
        "#,
    )
    .bind(case.id.as_uuid())
    .bind(DbCaseStatus::from(case.status))
    .bind(case.closure_reason.map(DbClosureReason::from))
    .bind(totals.paid.value())
    .bind(totals.fees.value())
    .bind(totals.tariff.value())
    .bind(totals.interest.value())
    .bind(totals.principal.value())
    .bind(totals.reserved.value())
    .bind(totals.due_to_creditor.value())
    .bind(totals.reversed.value())
    .bind(case.closed_at)
    .execute(&mut *conn)
    .await
    .map_err(classify)?;
    Ok(())
}

async fn insert_payment(conn: &mut PgConnection, payment: &Payment, receipt: &LedgerEntry) -> Result<(), DatabaseError> {
    let split = &payment.allocation;
    sqlx::query(
        r#"
        INSERT INTO recovery_payments
            (id, case_id, payment_date, amount, mode, reference, observations,
             allocated_fees, allocated_tariff, allocated_interest, allocated_principal, reserved,
             due_to_creditor, reversed, reversed_on, reversal_reference, recorded_by, recorded_at,
             receipt_entry_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        "#,
    )
    .bind(payment.id.as_uuid())
    .bind(payment.case_id.as_uuid())
    .bind(payment.date)
    .bind(payment.amount.value())
    .bind(DbPaymentMode::from(payment.mode))
    .bind(&payment.reference)
    .bind(&payment.observations)
    .bind(split.fees.value())
    .bind(split.tariff.value())
    .bind(split.interest.value())
    .bind(split.principal.value())
    .bind(split.reserved.value())
    .bind(payment.due_to_creditor.value())
    .bind(payment.reversed)
    .bind(payment.reversed_on)
    .bind(&payment.reversal_reference)
    .bind(&payment.recorded_by)
    .bind(payment.recorded_at)
    .bind(receipt.id.as_uuid())
    .execute(&mut *conn)
    .await
    .map_err(classify)?;
    Ok(())
}

async fn update_payment(conn: &mut PgConnection, payment: &Payment) -> Result<(), DatabaseError> {
    let split = &payment.allocation;
    sqlx::query(
        r#"
        UPDATE recovery_payments SET
            allocated_fees = $2,
            allocated_tariff = $3,
            allocated_interest = $4,
            allocated_principal = $5,
            reserved = $6,
            due_to_creditor = $7,
            reversed = $8,
            reversed_on = $9,
            reversal_reference = $10
        WHERE id = $1
        "#,
    )
    .bind(payment.id.as_uuid())
    .bind(split.fees.value())
    .bind(split.tariff.value())
    .bind(split.interest.value())
    .bind(split.principal.value())
    .bind(split.reserved.value())
    .bind(payment.due_to_creditor.value())
    .bind(payment.reversed)
    .bind(payment.reversed_on)
    .bind(&payment.reversal_reference)
    .execute(&mut *conn)
    .await
    .map_err(classify)?;
    Ok(())
}

async fn insert_allocation(
    conn: &mut PgConnection,
    allocation: &ManualAllocation,
    transfer: &LedgerEntry,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO manual_allocations
            (id, payment_id, case_id, category, amount, allocated_at, actor, observations, entry_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(allocation.id.as_uuid())
    .bind(allocation.payment_id.as_uuid())
    .bind(allocation.case_id.as_uuid())
    .bind(DbAllocationCategory::from(allocation.category))
    .bind(allocation.amount.value())
    .bind(allocation.allocated_at)
    .bind(&allocation.actor)
    .bind(&allocation.observations)
    .bind(transfer.id.as_uuid())
    .execute(&mut *conn)
    .await
    .map_err(classify)?;
    Ok(())
}

// ----------------------------------------------------------------------
// Rows
// ----------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CaseRow {
    pub id: Uuid,
    pub reference: String,
    pub creditor_id: Uuid,
    pub debtor_id: Uuid,
    pub recovery_type: DbRecoveryType,
    pub billing_mode: DbBillingMode,
    pub status: DbCaseStatus,
    pub closure_reason: Option<DbClosureReason>,
    pub principal: Decimal,
    pub interest: Decimal,
    pub procedure_fees: Decimal,
    pub tariff_fee: Decimal,
    pub total_paid: Decimal,
    pub total_fees: Decimal,
    pub total_tariff: Decimal,
    pub total_interest: Decimal,
    pub total_principal: Decimal,
    pub total_reserved: Decimal,
    pub total_due_to_creditor: Decimal,
    pub total_reversed: Decimal,
    pub opened_on: NaiveDate,
    pub closed_at: Option<DateTime<Utc>>,
}

impl CaseRow {
    pub fn into_domain(self) -> Result<RecoveryCase, DatabaseError> {
        Ok(RecoveryCase {
            id: CaseId::from_uuid(self.id),
            reference: self.reference,
            creditor_id: PartyId::from_uuid(self.creditor_id),
            debtor_id: PartyId::from_uuid(self.debtor_id),
            recovery_type: self.recovery_type.into(),
            billing_mode: self.billing_mode.into(),
            status: self.status.into(),
            closure_reason: self.closure_reason.map(Into::into),
            principal: Amount::new(self.principal),
            interest: Amount::new(self.interest),
            procedure_fees: Amount::new(self.procedure_fees),
            tariff_fee: Amount::new(self.tariff_fee),
            totals: CaseTotals {
                paid: Amount::new(self.total_paid),
                fees: Amount::new(self.total_fees),
                tariff: Amount::new(self.total_tariff),
                interest: Amount::new(self.total_interest),
                principal: Amount::new(self.total_principal),
                reserved: Amount::new(self.total_reserved),
                due_to_creditor: Amount::new(self.total_due_to_creditor),
                reversed: Amount::new(self.total_reversed),
            },
            opened_on: self.opened_on,
            closed_at: self.closed_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub case_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub mode: DbPaymentMode,
    pub reference: Option<String>,
    pub observations: Option<String>,
    pub allocated_fees: Decimal,
    pub allocated_tariff: Decimal,
    pub allocated_interest: Decimal,
    pub allocated_principal: Decimal,
    pub reserved: Decimal,
    pub due_to_creditor: Decimal,
    pub reversed: bool,
    pub reversed_on: Option<NaiveDate>,
    pub reversal_reference: Option<String>,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
}

impl PaymentRow {
    /// Rebuilds the payment, refusing rows whose split does not add up
    pub fn into_domain(self) -> Result<Payment, DatabaseError> {
        let amount = Amount::new(self.amount);
        let allocation = AllocationSplit::new(
            Amount::new(self.allocated_fees),
            Amount::new(self.allocated_tariff),
            Amount::new(self.allocated_interest),
            Amount::new(self.allocated_principal),
            Amount::new(self.reserved),
        );
        allocation.check_against(amount)?;

        Ok(Payment {
            id: PaymentId::from_uuid(self.id),
            case_id: CaseId::from_uuid(self.case_id),
            date: self.payment_date,
            amount,
            mode: self.mode.into(),
            reference: self.reference,
            observations: self.observations,
            allocation,
            due_to_creditor: Amount::new(self.due_to_creditor),
            reversed: self.reversed,
            reversed_on: self.reversed_on,
            reversal_reference: self.reversal_reference,
            recorded_by: self.recorded_by,
            recorded_at: self.recorded_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AllocationRow {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub case_id: Uuid,
    pub category: DbAllocationCategory,
    pub amount: Decimal,
    pub allocated_at: DateTime<Utc>,
    pub actor: String,
    pub observations: Option<String>,
}

impl AllocationRow {
    pub fn into_domain(self) -> ManualAllocation {
        ManualAllocation {
            id: AllocationId::from_uuid(self.id),
            payment_id: PaymentId::from_uuid(self.payment_id),
            case_id: CaseId::from_uuid(self.case_id),
            category: self.category.into(),
            amount: Amount::new(self.amount),
            allocated_at: self.allocated_at,
            actor: self.actor,
            observations: self.observations,
        }
    }
}

// ----------------------------------------------------------------------
// Postgres enum types
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "recovery_type", rename_all = "snake_case")]
pub enum DbRecoveryType {
    Amicable,
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "billing_mode", rename_all = "snake_case")]
pub enum DbBillingMode {
    Standard,
    Reserved,
    Bank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "case_status", rename_all = "snake_case")]
pub enum DbCaseStatus {
    Open,
    Suspended,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "closure_reason", rename_all = "snake_case")]
pub enum DbClosureReason {
    Recovered,
    Irrecoverable,
    Abandoned,
    Prescription,
    Settlement,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_mode", rename_all = "snake_case")]
pub enum DbPaymentMode {
    Cash,
    Cheque,
    Transfer,
    MobileMoney,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "allocation_category", rename_all = "snake_case")]
pub enum DbAllocationCategory {
    Fees,
    Tariff,
    Interest,
    Principal,
}

db_enum_conversions!(DbRecoveryType <=> RecoveryType { Amicable, Forced });
db_enum_conversions!(DbBillingMode <=> BillingMode { Standard, Reserved, Bank });
db_enum_conversions!(DbCaseStatus <=> CaseStatus { Open, Suspended, Closed });
db_enum_conversions!(DbClosureReason <=> ClosureReason { Recovered, Irrecoverable, Abandoned, Prescription, Settlement, Other });
db_enum_conversions!(DbPaymentMode <=> PaymentMode { Cash, Cheque, Transfer, MobileMoney, Other });
db_enum_conversions!(DbAllocationCategory <=> AllocationCategory { Fees, Tariff, Interest, Principal });
