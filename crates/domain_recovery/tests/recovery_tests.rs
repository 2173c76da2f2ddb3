//! Integration tests for domain_recovery

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{Amount, OperationMetadata, PartyId, Rate};
use domain_ledger::period::AccountingPeriod;
use domain_ledger::reports::BalanceScope;
use domain_ledger::Ledger;
use domain_recovery::{
    AllocationCategory, AllocationSplit, BillingMode, CaseStatus, ClosureReason, InterestCalculator,
    OpenCaseRequest, PaymentMode, PaymentRequest, RecoveryCase, RecoveryDesk, RecoveryError, RecoveryType,
    SettlementAllocator, TariffSchedule,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn fcfa(units: i64) -> Amount {
    Amount::from_units(units)
}

fn clerk() -> OperationMetadata {
    OperationMetadata::by("clerk.houngbo")
}

/// Forced recovery of 1 000 000 with 50 000 interest and 25 000 fees
fn case_request(mode: BillingMode) -> OpenCaseRequest {
    OpenCaseRequest::new(
        "REC-2024-017",
        PartyId::new(),
        PartyId::new(),
        RecoveryType::Forced,
        fcfa(1_000_000),
        d(2024, 2, 1),
    )
    .with_interest(fcfa(50_000))
    .with_procedure_fees(fcfa(25_000))
    .with_billing_mode(mode)
}

fn open_case(mode: BillingMode) -> (SettlementAllocator, RecoveryCase) {
    let allocator = SettlementAllocator::default();
    let case = allocator.open_case(case_request(mode)).unwrap();
    (allocator, case)
}

fn ledger_2024() -> Ledger {
    let mut ledger = Ledger::standard().unwrap();
    ledger
        .open_period(AccountingPeriod::new("Exercice 2024", d(2024, 1, 1), d(2024, 12, 31)).unwrap())
        .unwrap();
    ledger
}

// ============================================================================
// Tariff
// ============================================================================

mod tariff_tests {
    use super::*;

    #[test]
    fn test_amicable_first_bracket() {
        assert_eq!(TariffSchedule::amicable().calculate_fee(fcfa(5_000_000)), fcfa(500_000));
    }

    #[test]
    fn test_forced_twenty_five_million() {
        let schedule = TariffSchedule::forced();
        assert_eq!(domain_recovery::calculate_fee(fcfa(25_000_000), &schedule), fcfa(1_125_000));

        let breakdown = domain_recovery::detail_breakdown(fcfa(25_000_000), &schedule);
        let fees: Vec<Amount> = breakdown.lines.iter().map(|l| l.fee_in_bracket).collect();
        assert_eq!(fees, vec![fcfa(500_000), fcfa(525_000), fcfa(100_000)]);
    }

    #[test]
    fn test_complementary_matches_forced() {
        let amount = fcfa(73_250_000);
        assert_eq!(
            TariffSchedule::complementary().calculate_fee(amount),
            TariffSchedule::forced().calculate_fee(amount)
        );
    }

    #[test]
    fn test_breakdown_serializes_open_bracket_as_null() {
        let breakdown = TariffSchedule::forced().detail_breakdown(fcfa(60_000_000));
        let json = serde_json::to_value(&breakdown).unwrap();
        assert!(json["lines"][3]["range_max"].is_null());
    }

    proptest! {
        #[test]
        fn fee_is_monotonic(a in 0i64..200_000_000, b in 0i64..200_000_000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            for schedule in [TariffSchedule::amicable(), TariffSchedule::forced()] {
                prop_assert!(schedule.calculate_fee(fcfa(low)) <= schedule.calculate_fee(fcfa(high)));
            }
        }

        #[test]
        fn breakdown_sums_to_fee(amount in 1i64..500_000_000) {
            for schedule in [TariffSchedule::amicable(), TariffSchedule::forced()] {
                let breakdown = schedule.detail_breakdown(fcfa(amount));
                let fee_sum: Amount = breakdown.lines.iter().map(|l| l.fee_in_bracket).sum();
                let taxable_sum: Amount = breakdown.lines.iter().map(|l| l.taxable_in_bracket).sum();
                prop_assert_eq!(fee_sum, schedule.calculate_fee(fcfa(amount)));
                prop_assert_eq!(taxable_sum, fcfa(amount));
            }
        }
    }
}

// ============================================================================
// Settlement allocator
// ============================================================================

mod settlement_tests {
    use super::*;

    #[test]
    fn test_payment_follows_canonical_order() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let (case, payment) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(200_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();

        assert_eq!(payment.allocation.fees, fcfa(25_000));
        assert_eq!(payment.allocation.tariff, fcfa(100_000));
        assert_eq!(payment.allocation.interest, fcfa(50_000));
        assert_eq!(payment.allocation.principal, fcfa(25_000));
        assert_eq!(payment.due_to_creditor, fcfa(75_000));
        assert_eq!(payment.recorded_by, "clerk.houngbo");
        assert_eq!(case.totals.paid, fcfa(200_000));
        assert_eq!(case.remaining(AllocationCategory::Principal), fcfa(975_000));
    }

    #[test]
    fn test_second_payment_continues_where_first_stopped() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let (case, _) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(100_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();
        let (_, second) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(100_000), d(2024, 4, 5), PaymentMode::Transfer), &clerk())
            .unwrap();

        assert_eq!(second.allocation.fees, Amount::ZERO);
        assert_eq!(second.allocation.tariff, fcfa(25_000));
        assert_eq!(second.allocation.interest, fcfa(50_000));
        assert_eq!(second.allocation.principal, fcfa(25_000));
    }

    #[test]
    fn test_manual_split_is_used_verbatim() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let split = AllocationSplit::new(Amount::ZERO, Amount::ZERO, Amount::ZERO, fcfa(60_000), fcfa(40_000));
        let (_, payment) = allocator
            .register_payment(
                &case,
                PaymentRequest::new(fcfa(100_000), d(2024, 3, 5), PaymentMode::Cheque).with_split(split),
                &clerk(),
            )
            .unwrap();

        assert_eq!(payment.allocation, split);
        assert_eq!(payment.due_to_creditor, fcfa(60_000));
    }

    #[test]
    fn test_manual_split_must_add_up() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let split = AllocationSplit::new(Amount::ZERO, Amount::ZERO, Amount::ZERO, fcfa(60_000), Amount::ZERO);
        let result = allocator.register_payment(
            &case,
            PaymentRequest::new(fcfa(100_000), d(2024, 3, 5), PaymentMode::Cheque).with_split(split),
            &clerk(),
        );

        assert_eq!(
            result.unwrap_err(),
            RecoveryError::AllocationMismatch { amount: fcfa(100_000), split_total: fcfa(60_000) }
        );
    }

    #[test]
    fn test_non_positive_payment_rejected() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let result =
            allocator.register_payment(&case, PaymentRequest::new(Amount::ZERO, d(2024, 3, 5), PaymentMode::Cash), &clerk());
        assert!(matches!(result, Err(RecoveryError::InvalidAmount(_))));
    }

    #[test]
    fn test_allocate_reserved() {
        let (allocator, case) = open_case(BillingMode::Reserved);
        let (case, payment) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(80_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();
        assert_eq!(payment.reserved(), fcfa(80_000));
        assert_eq!(payment.due_to_creditor, Amount::ZERO);

        let (case, payment, allocation) = allocator
            .allocate_reserved(&case, &payment, AllocationCategory::Principal, fcfa(30_000), None, &clerk())
            .unwrap();

        assert_eq!(payment.reserved(), fcfa(50_000));
        assert_eq!(payment.allocation.principal, fcfa(30_000));
        assert_eq!(payment.due_to_creditor, fcfa(30_000));
        assert_eq!(case.totals.reserved, fcfa(50_000));
        assert_eq!(case.totals.due_to_creditor, fcfa(30_000));
        assert_eq!(allocation.actor, "clerk.houngbo");
        assert_eq!(allocation.category, AllocationCategory::Principal);
    }

    #[test]
    fn test_over_allocation_rejected() {
        let (allocator, case) = open_case(BillingMode::Reserved);
        let (case, payment) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(80_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();

        let result = allocator.allocate_reserved(&case, &payment, AllocationCategory::Fees, fcfa(80_001), None, &clerk());
        assert_eq!(
            result.unwrap_err(),
            RecoveryError::OverAllocation { requested: fcfa(80_001), reserved: fcfa(80_000) }
        );
    }

    #[test]
    fn test_payment_of_another_case_rejected() {
        let (allocator, case) = open_case(BillingMode::Reserved);
        let other = allocator.open_case(case_request(BillingMode::Reserved)).unwrap();
        let (_, payment) = allocator
            .register_payment(&other, PaymentRequest::new(fcfa(10_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();

        let result = allocator.allocate_reserved(&case, &payment, AllocationCategory::Fees, fcfa(1_000), None, &clerk());
        assert!(matches!(result, Err(RecoveryError::PaymentCaseMismatch { .. })));
    }

    #[test]
    fn test_double_reversal_rejected() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let (case, payment) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(200_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();

        let (case, payment) = allocator
            .reverse_to_creditor(&case, &payment, d(2024, 3, 20), Some("VIR-0042".to_string()))
            .unwrap();
        assert!(payment.reversed);
        assert_eq!(payment.reversed_on, Some(d(2024, 3, 20)));
        assert_eq!(case.totals.reversed, fcfa(75_000));

        let again = allocator.reverse_to_creditor(&case, &payment, d(2024, 3, 21), None);
        assert_eq!(again.unwrap_err(), RecoveryError::AlreadyReversed(payment.id.to_string()));
        assert_eq!(case.totals.reversed, fcfa(75_000));
    }

    #[test]
    fn test_reversal_with_nothing_due_is_a_no_op() {
        let (allocator, case) = open_case(BillingMode::Reserved);
        let (case, payment) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(10_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();

        let (next_case, next_payment) = allocator.reverse_to_creditor(&case, &payment, d(2024, 3, 6), None).unwrap();
        assert_eq!(next_case, case);
        assert_eq!(next_payment, payment);
        assert!(!next_payment.reversed);
    }

    #[test]
    fn test_reversed_payment_locks_creditor_share() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let (case, payment) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(1_200_000), d(2024, 3, 5), PaymentMode::Transfer), &clerk())
            .unwrap();
        assert_eq!(payment.reserved(), fcfa(25_000));

        let (case, payment) = allocator.reverse_to_creditor(&case, &payment, d(2024, 3, 10), None).unwrap();

        let locked = allocator.allocate_reserved(&case, &payment, AllocationCategory::Principal, fcfa(5_000), None, &clerk());
        assert!(matches!(locked, Err(RecoveryError::ReversedPaymentLocked(_))));

        let fees = allocator.allocate_reserved(&case, &payment, AllocationCategory::Fees, fcfa(5_000), None, &clerk());
        assert!(fees.is_ok());
    }

    #[test]
    fn test_case_lifecycle() {
        let (allocator, mut case) = open_case(BillingMode::Standard);

        case.suspend().unwrap();
        assert_eq!(case.status, CaseStatus::Suspended);
        let accepted =
            allocator.register_payment(&case, PaymentRequest::new(fcfa(1_000), d(2024, 3, 5), PaymentMode::Cash), &clerk());
        assert!(accepted.is_ok());

        case.resume().unwrap();
        case.close(ClosureReason::Recovered).unwrap();
        assert_eq!(case.closure_reason, Some(ClosureReason::Recovered));
        assert!(case.closed_at.is_some());

        assert!(matches!(case.close(ClosureReason::Other), Err(RecoveryError::CaseClosed(_))));
        assert!(matches!(case.suspend(), Err(RecoveryError::InvalidStatusTransition { .. })));
    }
}

// ============================================================================
// Situation and report
// ============================================================================

mod situation_tests {
    use super::*;

    #[test]
    fn test_situation_of_a_settled_case() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let (case, p1) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(600_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();
        let (case, p2) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(600_000), d(2024, 4, 5), PaymentMode::Transfer), &clerk())
            .unwrap();
        let (case, p2) = allocator.reverse_to_creditor(&case, &p2, d(2024, 4, 10), None).unwrap();

        let situation = allocator.compute_case_situation(&case, &[p1, p2]).unwrap();

        assert!(situation.is_settled);
        assert_eq!(situation.total_paid, fcfa(1_200_000));
        assert_eq!(situation.total_reserved, fcfa(25_000));
        assert_eq!(situation.principal.remaining, Amount::ZERO);
        assert_eq!(situation.tariff.due, fcfa(100_000));
        assert_eq!(situation.tariff_breakdown.total, fcfa(100_000));
        assert_eq!(situation.total_due_to_creditor, fcfa(1_050_000));
        assert_eq!(situation.total_reversed, fcfa(575_000));
        assert_eq!(situation.pending_due_to_creditor, fcfa(475_000));
        assert!(situation.verify_against(&case).is_ok());
    }

    #[test]
    fn test_remaining_is_floored_at_zero() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let split = AllocationSplit::new(fcfa(40_000), Amount::ZERO, Amount::ZERO, Amount::ZERO, Amount::ZERO);
        let (case, payment) = allocator
            .register_payment(
                &case,
                PaymentRequest::new(fcfa(40_000), d(2024, 3, 5), PaymentMode::Cash).with_split(split),
                &clerk(),
            )
            .unwrap();

        let situation = allocator.compute_case_situation(&case, &[payment]).unwrap();
        assert_eq!(situation.fees.allocated, fcfa(40_000));
        assert_eq!(situation.fees.remaining, Amount::ZERO);
        assert!(!situation.is_settled);
    }

    #[test]
    fn test_tampered_totals_detected() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let (mut case, payment) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(50_000), d(2024, 3, 5), PaymentMode::Cash), &clerk())
            .unwrap();
        case.totals.paid = fcfa(49_000);

        let situation = allocator.compute_case_situation(&case, &[payment]).unwrap();
        assert!(matches!(
            situation.verify_against(&case),
            Err(RecoveryError::InconsistentTotals { ref field, .. }) if field == "paid"
        ));
    }

    #[test]
    fn test_payment_report_is_chronological() {
        let (allocator, case) = open_case(BillingMode::Standard);
        let (case, late) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(30_000), d(2024, 5, 2), PaymentMode::Cash), &clerk())
            .unwrap();
        let (case, early) = allocator
            .register_payment(&case, PaymentRequest::new(fcfa(20_000), d(2024, 4, 2), PaymentMode::MobileMoney), &clerk())
            .unwrap();

        let report = allocator.payment_report(&case, &[late.clone(), early.clone()]).unwrap();

        assert_eq!(report.rows[0].payment_id, early.id);
        assert_eq!(report.rows[0].cumulative.paid, fcfa(20_000));
        assert_eq!(report.rows[1].payment_id, late.id);
        assert_eq!(report.rows[1].cumulative.paid, fcfa(50_000));
        assert_eq!(report.totals.fees, fcfa(25_000));
        assert_eq!(report.totals.tariff, fcfa(25_000));
        assert_eq!(report.pending_due_to_creditor, Amount::ZERO);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Pay { amount: i64, reserved_mode: bool },
        Allocate { payment: usize, category: usize, amount: i64 },
        Reverse { payment: usize },
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (1i64..600_000, any::<bool>()).prop_map(|(amount, reserved_mode)| Step::Pay { amount, reserved_mode }),
            (0usize..8, 0usize..4, 1i64..200_000)
                .prop_map(|(payment, category, amount)| Step::Allocate { payment, category, amount }),
            (0usize..8).prop_map(|payment| Step::Reverse { payment }),
        ]
    }

    proptest! {
        #[test]
        fn situation_matches_running_totals(steps in prop::collection::vec(step(), 1..20)) {
            let (allocator, mut case) = open_case(BillingMode::Standard);
            let mut payments = Vec::new();

            for step in steps {
                match step {
                    Step::Pay { amount, reserved_mode } => {
                        let mut request = PaymentRequest::new(fcfa(amount), d(2024, 3, 5), PaymentMode::Cash);
                        if reserved_mode {
                            request = request.with_split(AllocationSplit::reserved(fcfa(amount)));
                        }
                        let (next, payment) = allocator.register_payment(&case, request, &clerk()).unwrap();
                        case = next;
                        payments.push(payment);
                    }
                    Step::Allocate { payment, category, amount } => {
                        if payments.is_empty() {
                            continue;
                        }
                        let index = payment % payments.len();
                        let category = AllocationCategory::ORDER[category];
                        if let Ok((next, updated, _)) =
                            allocator.allocate_reserved(&case, &payments[index], category, fcfa(amount), None, &clerk())
                        {
                            case = next;
                            payments[index] = updated;
                        }
                    }
                    Step::Reverse { payment } => {
                        if payments.is_empty() {
                            continue;
                        }
                        let index = payment % payments.len();
                        if let Ok((next, updated)) =
                            allocator.reverse_to_creditor(&case, &payments[index], d(2024, 3, 6), None)
                        {
                            case = next;
                            payments[index] = updated;
                        }
                    }
                }
            }

            let situation = allocator.compute_case_situation(&case, &payments).unwrap();
            prop_assert!(situation.verify_against(&case).is_ok());
            prop_assert_eq!(situation.totals, case.totals);

            let reversed: Amount = payments.iter().filter(|p| p.reversed).map(|p| p.due_to_creditor).sum();
            prop_assert_eq!(case.totals.reversed, reversed);

            for payment in &payments {
                prop_assert_eq!(payment.allocation.total(), payment.amount);
                prop_assert_eq!(payment.due_to_creditor, payment.allocation.creditor_share());
            }
        }
    }
}

// ============================================================================
// Recovery desk with ledger postings
// ============================================================================

mod desk_tests {
    use super::*;

    #[test]
    fn test_payment_and_reversal_are_posted() {
        let mut ledger = ledger_2024();
        let mut desk = RecoveryDesk::default();
        let case_id = desk.open_case(case_request(BillingMode::Standard)).unwrap().id;

        let (payment, receipt_id) = desk
            .register_payment(
                &mut ledger,
                &case_id,
                PaymentRequest::new(fcfa(200_000), d(2024, 3, 5), PaymentMode::Cash).with_reference("RC-118"),
                &clerk(),
            )
            .unwrap();

        let receipt = ledger.entry(&receipt_id).unwrap();
        assert!(receipt.is_validated());
        assert_eq!(receipt.journal_code, "CA");
        assert_eq!(receipt.lines.len(), 4);
        assert_eq!(ledger.account_balance("571", BalanceScope::AllTime).unwrap(), fcfa(200_000));
        assert_eq!(ledger.account_balance("7063", BalanceScope::AllTime).unwrap(), fcfa(-25_000));
        assert_eq!(ledger.account_balance("7062", BalanceScope::AllTime).unwrap(), fcfa(-100_000));
        assert_eq!(ledger.account_balance("4722", BalanceScope::AllTime).unwrap(), fcfa(-75_000));

        let reversal_id = desk
            .reverse_to_creditor(&mut ledger, &payment.id, d(2024, 3, 20), Some("VIR-0042".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(ledger.entry(&reversal_id).unwrap().journal_code, "BQ");
        assert_eq!(ledger.account_balance("4722", BalanceScope::AllTime).unwrap(), Amount::ZERO);
        assert_eq!(ledger.account_balance("5211", BalanceScope::AllTime).unwrap(), fcfa(-75_000));

        let again = desk.reverse_to_creditor(&mut ledger, &payment.id, d(2024, 3, 21), None);
        assert!(matches!(again, Err(RecoveryError::AlreadyReversed(_))));
        assert_eq!(ledger.entries().count(), 2);

        let situation = desk.situation(&case_id).unwrap();
        assert!(situation.verify_against(desk.case(&case_id).unwrap()).is_ok());
    }

    #[test]
    fn test_reserved_funds_go_through_suspense() {
        let mut ledger = ledger_2024();
        let mut desk = RecoveryDesk::default();
        let case_id = desk.open_case(case_request(BillingMode::Reserved)).unwrap().id;

        let (payment, _) = desk
            .register_payment(
                &mut ledger,
                &case_id,
                PaymentRequest::new(fcfa(80_000), d(2024, 3, 5), PaymentMode::Transfer),
                &clerk(),
            )
            .unwrap();
        assert_eq!(ledger.account_balance("5211", BalanceScope::AllTime).unwrap(), fcfa(80_000));
        assert_eq!(ledger.account_balance("471", BalanceScope::AllTime).unwrap(), fcfa(-80_000));

        let (allocation, entry_id) = desk
            .allocate_reserved(
                &mut ledger,
                &payment.id,
                AllocationCategory::Principal,
                fcfa(30_000),
                d(2024, 3, 8),
                Some("Accord du créancier".to_string()),
                &clerk(),
            )
            .unwrap();
        assert_eq!(ledger.entry(&entry_id).unwrap().journal_code, "OD");
        assert_eq!(ledger.account_balance("471", BalanceScope::AllTime).unwrap(), fcfa(-50_000));
        assert_eq!(ledger.account_balance("4722", BalanceScope::AllTime).unwrap(), fcfa(-30_000));
        assert_eq!(desk.allocations_of(&payment.id).count(), 1);
        assert_eq!(allocation.observations.as_deref(), Some("Accord du créancier"));

        let over = desk.allocate_reserved(
            &mut ledger,
            &payment.id,
            AllocationCategory::Fees,
            fcfa(60_000),
            d(2024, 3, 9),
            None,
            &clerk(),
        );
        assert_eq!(
            over.unwrap_err(),
            RecoveryError::OverAllocation { requested: fcfa(60_000), reserved: fcfa(50_000) }
        );
        assert_eq!(ledger.entries().count(), 2);
    }

    #[test]
    fn test_failed_posting_leaves_desk_untouched() {
        let mut ledger = ledger_2024();
        let mut desk = RecoveryDesk::default();
        let case_id = desk.open_case(case_request(BillingMode::Standard)).unwrap().id;

        let result = desk.register_payment(
            &mut ledger,
            &case_id,
            PaymentRequest::new(fcfa(10_000), d(2025, 1, 3), PaymentMode::Cash),
            &clerk(),
        );

        assert!(matches!(result, Err(RecoveryError::Ledger(_))));
        assert_eq!(desk.case(&case_id).unwrap().totals.paid, Amount::ZERO);
        assert!(desk.payments_of(&case_id).is_empty());
        assert_eq!(ledger.entries().count(), 0);
    }

    #[test]
    fn test_reversal_with_nothing_due_posts_nothing() {
        let mut ledger = ledger_2024();
        let mut desk = RecoveryDesk::default();
        let case_id = desk.open_case(case_request(BillingMode::Reserved)).unwrap().id;
        let (payment, _) = desk
            .register_payment(
                &mut ledger,
                &case_id,
                PaymentRequest::new(fcfa(5_000), d(2024, 3, 5), PaymentMode::Cash),
                &clerk(),
            )
            .unwrap();

        let posted = desk.reverse_to_creditor(&mut ledger, &payment.id, d(2024, 3, 6), None).unwrap();
        assert!(posted.is_none());
        assert_eq!(ledger.entries().count(), 1);
    }

    #[test]
    fn test_closed_case_through_desk() {
        let mut ledger = ledger_2024();
        let mut desk = RecoveryDesk::default();
        let case_id = desk.open_case(case_request(BillingMode::Standard)).unwrap().id;
        desk.close(&case_id, ClosureReason::Irrecoverable).unwrap();

        let result = desk.register_payment(
            &mut ledger,
            &case_id,
            PaymentRequest::new(fcfa(5_000), d(2024, 3, 5), PaymentMode::Cash),
            &clerk(),
        );
        assert!(matches!(result, Err(RecoveryError::CaseClosed(_))));
    }
}

// ============================================================================
// Interest
// ============================================================================

mod interest_tests {
    use super::*;
    use domain_recovery::LegalRateTable;

    #[test]
    fn test_interest_to_accrue_defaults_to_one_month() {
        let calc = InterestCalculator::default();
        let interest = calc.interest_to_accrue(fcfa(1_000_000), Rate::from_percentage(dec!(7.3)), None);
        assert_eq!(interest, fcfa(6_000));
    }

    #[test]
    fn test_surcharge_when_start_is_after_surcharge_date() {
        let calc = InterestCalculator::default().with_rates(LegalRateTable::new(Rate::from_percentage(dec!(7.3))));

        let result = calc.interest_with_surcharge(fcfa(1_000_000), d(2024, 6, 1), d(2024, 6, 11), Some(d(2024, 1, 1)));

        // 10 days at 7.3% = 2 000, raised by half
        assert_eq!(result.normal, Amount::ZERO);
        assert_eq!(result.surcharged, fcfa(3_000));
        assert_eq!(result.total, fcfa(3_000));
    }

    proptest! {
        #[test]
        fn multi_year_total_is_sum_of_detail(
            principal in 1i64..100_000_000,
            offset in 0i64..2_000,
            length in 0i64..1_500,
        ) {
            let calc = InterestCalculator::default();
            let start = d(2020, 1, 1) + chrono::Duration::days(offset);
            let end = start + chrono::Duration::days(length);

            let result = calc.interest_multi_year(fcfa(principal), start, end);
            let sum: Amount = result.detail.iter().map(|p| p.interest).sum();
            let days: i64 = result.detail.iter().map(|p| p.days).sum();
            prop_assert_eq!(result.total, sum);
            prop_assert_eq!(days, length);
        }
    }
}
