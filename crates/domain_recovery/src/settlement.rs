//! Settlement allocator
//!
//! A pure service: every operation takes the current case (and payment)
//! and returns their next state without touching any store. Callers
//! persist the returned values together or not at all.
//!
//! # Allocation policy
//!
//! Unless a manual split is supplied, a payment first covers the procedure
//! fees still due, then the tariff fee, then interest, then principal.
//! Whatever is left stays in reserve until allocated by hand.

use chrono::NaiveDate;
use core_kernel::{Amount, CaseId, OperationMetadata};
use tracing::{debug, info};

use crate::allocation::{AllocationCategory, AllocationSplit, ManualAllocation};
use crate::case::{BillingMode, CaseStatus, CaseTotals, OpenCaseRequest, RecoveryCase};
use crate::config::SettlementConfig;
use crate::error::RecoveryError;
use crate::payment::{Payment, PaymentRequest};
use crate::situation::{CaseSituation, PaymentReport};
use crate::interest::SurchargedInterest;
use crate::tariff::{FeeBreakdown, TariffKind};

/// Allocates payments on recovery cases
#[derive(Debug, Clone, Default)]
pub struct SettlementAllocator {
    config: SettlementConfig,
}

impl SettlementAllocator {
    pub fn new(config: SettlementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Opens a case and computes its tariff fee on the principal
    pub fn open_case(&self, request: OpenCaseRequest) -> Result<RecoveryCase, RecoveryError> {
        for (what, amount) in [
            ("principal", request.principal),
            ("interest", request.interest),
            ("procedure fees", request.procedure_fees),
        ] {
            if amount.is_negative() {
                return Err(RecoveryError::InvalidAmount(format!("{} cannot be negative: {}", what, amount)));
            }
        }

        let tariff_fee = self
            .config
            .schedule_for(request.recovery_type)
            .calculate_fee(request.principal);

        let case = RecoveryCase {
            id: CaseId::new(),
            reference: request.reference,
            creditor_id: request.creditor_id,
            debtor_id: request.debtor_id,
            recovery_type: request.recovery_type,
            billing_mode: request.billing_mode.unwrap_or(self.config.default_billing_mode),
            status: CaseStatus::Open,
            closure_reason: None,
            principal: request.principal,
            interest: request.interest,
            procedure_fees: request.procedure_fees,
            tariff_fee,
            totals: CaseTotals::default(),
            opened_on: request.opened_on,
            closed_at: None,
        };

        info!(case = %case.reference, tariff_fee = %case.tariff_fee, "Recovery case opened");
        Ok(case)
    }

    /// Splits an amount according to the case's billing mode
    pub fn default_split(&self, case: &RecoveryCase, amount: Amount) -> AllocationSplit {
        let categories: &[AllocationCategory] = match case.billing_mode {
            BillingMode::Standard => &AllocationCategory::ORDER,
            BillingMode::Bank => &[AllocationCategory::Interest, AllocationCategory::Principal],
            BillingMode::Reserved => &[],
        };

        let mut split = AllocationSplit::default();
        let mut remaining = amount;
        for category in categories {
            if !remaining.is_positive() {
                break;
            }
            let share = remaining.min(case.remaining(*category));
            split.add(*category, share);
            remaining -= share;
        }
        split.reserved = remaining;
        split
    }

    /// Registers a payment and updates the case's running totals
    pub fn register_payment(
        &self,
        case: &RecoveryCase,
        request: PaymentRequest,
        meta: &OperationMetadata,
    ) -> Result<(RecoveryCase, Payment), RecoveryError> {
        if !request.amount.is_positive() {
            return Err(RecoveryError::InvalidAmount(format!("payment of {} must be positive", request.amount)));
        }
        case.ensure_accepts_payments()?;

        let split = match request.manual_split {
            Some(split) => {
                split.check_against(request.amount)?;
                split
            }
            None => self.default_split(case, request.amount),
        };
        debug!(case = %case.reference, ?split, "Payment split computed");

        let payment = Payment::new(case.id, request, split, meta.actor());
        let mut next = case.clone();
        next.totals.record_payment(payment.amount, &payment.allocation);

        info!(
            case = %next.reference,
            payment = %payment.id,
            amount = %payment.amount,
            due_to_creditor = %payment.due_to_creditor,
            "Payment registered"
        );
        Ok((next, payment))
    }

    /// Moves part of a payment's reserve into a category
    pub fn allocate_reserved(
        &self,
        case: &RecoveryCase,
        payment: &Payment,
        category: AllocationCategory,
        amount: Amount,
        observations: Option<String>,
        meta: &OperationMetadata,
    ) -> Result<(RecoveryCase, Payment, ManualAllocation), RecoveryError> {
        payment.ensure_belongs_to(&case.id)?;
        case.ensure_accepts_payments()?;

        let mut next_payment = payment.clone();
        next_payment.allocate(category, amount)?;

        let mut next_case = case.clone();
        next_case.totals.record_allocation(category, amount);

        let allocation = ManualAllocation::new(payment.id, case.id, category, amount, meta.actor(), observations);
        info!(
            case = %case.reference,
            payment = %payment.id,
            %category,
            %amount,
            "Reserved amount allocated"
        );
        Ok((next_case, next_payment, allocation))
    }

    /// Marks a payment's creditor share as paid out
    ///
    /// A payment with nothing due to the creditor is returned unchanged.
    pub fn reverse_to_creditor(
        &self,
        case: &RecoveryCase,
        payment: &Payment,
        date: NaiveDate,
        reference: Option<String>,
    ) -> Result<(RecoveryCase, Payment), RecoveryError> {
        payment.ensure_belongs_to(&case.id)?;
        if payment.reversed {
            return Err(RecoveryError::AlreadyReversed(payment.id.to_string()));
        }
        if payment.due_to_creditor.is_zero() {
            debug!(payment = %payment.id, "Nothing due to the creditor, reversal skipped");
            return Ok((case.clone(), payment.clone()));
        }

        let mut next_payment = payment.clone();
        next_payment.mark_reversed(date, reference)?;

        let mut next_case = case.clone();
        next_case.totals.reversed += next_payment.due_to_creditor;

        info!(
            case = %case.reference,
            payment = %payment.id,
            amount = %next_payment.due_to_creditor,
            "Payment reversed to creditor"
        );
        Ok((next_case, next_payment))
    }

    /// Tariff itemization of the case's principal
    pub fn tariff_breakdown(&self, case: &RecoveryCase) -> FeeBreakdown {
        self.config.schedule_for(case.recovery_type).detail_breakdown(case.principal)
    }

    /// Complementary fee on the principal, owed by the creditor when steps are repeated
    pub fn complementary_fee(&self, case: &RecoveryCase) -> FeeBreakdown {
        self.config.schedule(TariffKind::Complementary).detail_breakdown(case.principal)
    }

    /// Legal interest on the principal still due, from the opening date to `until`
    pub fn accrued_interest(
        &self,
        case: &RecoveryCase,
        until: NaiveDate,
        enforceable_on: Option<NaiveDate>,
    ) -> SurchargedInterest {
        let principal = case.remaining(AllocationCategory::Principal);
        let interest = self
            .config
            .interest_calculator()
            .interest_with_surcharge(principal, case.opened_on, until, enforceable_on);
        debug!(case = %case.reference, %principal, total = %interest.total, "Interest accrued");
        interest
    }

    /// Recomputes the case situation from its payments
    pub fn compute_case_situation(&self, case: &RecoveryCase, payments: &[Payment]) -> Result<CaseSituation, RecoveryError> {
        for payment in payments {
            payment.ensure_belongs_to(&case.id)?;
        }
        Ok(CaseSituation::build(case, payments, self.tariff_breakdown(case)))
    }

    /// Chronological payment history with cumulative totals
    pub fn payment_report(&self, case: &RecoveryCase, payments: &[Payment]) -> Result<PaymentReport, RecoveryError> {
        for payment in payments {
            payment.ensure_belongs_to(&case.id)?;
        }
        debug!(case = %case.reference, payments = payments.len(), "Payment report built");
        Ok(PaymentReport::build(case, payments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::RecoveryType;
    use crate::payment::PaymentMode;
    use core_kernel::PartyId;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn open(allocator: &SettlementAllocator, mode: BillingMode) -> RecoveryCase {
        allocator
            .open_case(
                OpenCaseRequest::new(
                    "REC-2024-001",
                    PartyId::new(),
                    PartyId::new(),
                    RecoveryType::Forced,
                    Amount::from_units(1_000_000),
                    date(1),
                )
                .with_interest(Amount::from_units(50_000))
                .with_procedure_fees(Amount::from_units(25_000))
                .with_billing_mode(mode),
            )
            .unwrap()
    }

    #[test]
    fn test_open_case_computes_tariff_fee() {
        let allocator = SettlementAllocator::default();
        let case = open(&allocator, BillingMode::Standard);
        assert_eq!(case.tariff_fee, Amount::from_units(100_000));
    }

    #[test]
    fn test_default_split_follows_order() {
        let allocator = SettlementAllocator::default();
        let case = open(&allocator, BillingMode::Standard);

        let split = allocator.default_split(&case, Amount::from_units(200_000));
        assert_eq!(split.fees, Amount::from_units(25_000));
        assert_eq!(split.tariff, Amount::from_units(100_000));
        assert_eq!(split.interest, Amount::from_units(50_000));
        assert_eq!(split.principal, Amount::from_units(25_000));
        assert_eq!(split.reserved, Amount::ZERO);
    }

    #[test]
    fn test_surplus_goes_to_reserve() {
        let allocator = SettlementAllocator::default();
        let case = open(&allocator, BillingMode::Standard);

        let split = allocator.default_split(&case, Amount::from_units(1_200_000));
        assert_eq!(split.principal, Amount::from_units(1_000_000));
        assert_eq!(split.reserved, Amount::from_units(25_000));
    }

    #[test]
    fn test_billing_modes() {
        let allocator = SettlementAllocator::default();

        let reserved = open(&allocator, BillingMode::Reserved);
        assert_eq!(
            allocator.default_split(&reserved, Amount::from_units(80_000)),
            AllocationSplit::reserved(Amount::from_units(80_000))
        );

        let bank = open(&allocator, BillingMode::Bank);
        let split = allocator.default_split(&bank, Amount::from_units(80_000));
        assert_eq!(split.fees, Amount::ZERO);
        assert_eq!(split.tariff, Amount::ZERO);
        assert_eq!(split.interest, Amount::from_units(50_000));
        assert_eq!(split.principal, Amount::from_units(30_000));
    }

    #[test]
    fn test_closed_case_refuses_payments() {
        let allocator = SettlementAllocator::default();
        let mut case = open(&allocator, BillingMode::Standard);
        case.close(crate::case::ClosureReason::Abandoned).unwrap();

        let result = allocator.register_payment(
            &case,
            PaymentRequest::new(Amount::from_units(1000), date(2), PaymentMode::Cash),
            &OperationMetadata::default(),
        );
        assert!(matches!(result, Err(RecoveryError::CaseClosed(_))));
    }

    #[test]
    fn test_closed_case_refuses_reserved_allocation() {
        let allocator = SettlementAllocator::default();
        let case = open(&allocator, BillingMode::Reserved);
        let (mut case, payment) = allocator
            .register_payment(
                &case,
                PaymentRequest::new(Amount::from_units(80_000), date(2), PaymentMode::Cash),
                &OperationMetadata::default(),
            )
            .unwrap();
        case.close(crate::case::ClosureReason::Abandoned).unwrap();

        let result = allocator.allocate_reserved(
            &case,
            &payment,
            AllocationCategory::Principal,
            Amount::from_units(10_000),
            None,
            &OperationMetadata::default(),
        );
        assert!(matches!(result, Err(RecoveryError::CaseClosed(_))));
    }

    #[test]
    fn test_accrued_interest_follows_configured_rates() {
        use crate::interest::LegalRateTable;
        use core_kernel::Rate;
        use rust_decimal_macros::dec;

        let standard = SettlementAllocator::default();
        let case = open(&standard, BillingMode::Standard);
        // 1 000 000 over 73 days from the 1st of March
        let until = date(1) + chrono::Days::new(73);

        let at_fallback = standard.accrued_interest(&case, until, None);
        assert_eq!(at_fallback.total, Amount::from_units(11_000));

        let custom = SettlementAllocator::new(SettlementConfig {
            legal_rates: LegalRateTable::default().with_rate(2024, Rate::from_percentage(dec!(7.3))),
            ..Default::default()
        });
        let at_custom = custom.accrued_interest(&case, until, None);
        assert_eq!(at_custom.total, Amount::from_units(14_600));
        assert_eq!(at_custom.detail[0].rate, Rate::from_percentage(dec!(7.3)));
    }

    #[test]
    fn test_complementary_fee_uses_its_own_schedule() {
        use crate::tariff::{TariffBracket, TariffSchedule};
        use rust_decimal_macros::dec;

        let standard = SettlementAllocator::default();
        let case = open(&standard, BillingMode::Standard);
        assert_eq!(standard.complementary_fee(&case).total, Amount::from_units(100_000));

        let custom = SettlementAllocator::new(SettlementConfig {
            complementary_schedule: TariffSchedule::new(vec![TariffBracket::beyond(dec!(2))]).unwrap(),
            ..Default::default()
        });
        assert_eq!(custom.complementary_fee(&case).total, Amount::from_units(20_000));
        assert_eq!(open(&custom, BillingMode::Standard).tariff_fee, Amount::from_units(100_000));
    }
}
