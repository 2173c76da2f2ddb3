//! Integration tests for the PostgreSQL repositories
//!
//! Each test starts its own container with the standard ledger installed.
//! Run with `cargo test -p infra_db -- --ignored` on a host with Docker.

use core_kernel::{Amount, DateRange, LineId};
use domain_ledger::{AccountingPeriod, BalanceScope, EntryStatus, LedgerError, LineDraft};
use domain_recovery::{
    AllocationCategory, BillingMode, CaseStatus, ClosureReason, PaymentMode, RecoveryError, SettlementAllocator,
};
use infra_db::{DatabaseError, LedgerRepository, RecoveryRepository};
use test_utils::{
    assert_case_totals_consistent, assert_entry_posted, assert_line, assert_trial_balance_balanced,
    create_isolated_test_database, AmountFixtures, DateFixtures, LedgerFixtures, TestCaseRequestBuilder,
    TestDatabase, TestEntryDraftBuilder, TestPaymentRequestBuilder,
};

fn fcfa(units: i64) -> Amount {
    AmountFixtures::fcfa(units)
}

async fn setup() -> (TestDatabase, LedgerRepository, RecoveryRepository) {
    let db = create_isolated_test_database()
        .await
        .expect("Failed to create test database");
    let ledger = LedgerRepository::new(db.pool().clone());
    let recovery = RecoveryRepository::new(db.pool().clone(), SettlementAllocator::default());
    (db, ledger, recovery)
}

// ============================================================================
// Chart, journals and periods
// ============================================================================

mod setup_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_standard_ledger_round_trips() {
        let (_db, ledger, _) = setup().await;

        let chart = ledger.chart().await.unwrap();
        assert_eq!(chart.len(), test_utils::STANDARD_CHART.len());
        assert!(chart.get("4722").unwrap().parent_id.is_some());

        let journals = ledger.journals().await.unwrap();
        assert!(journals.get("CA").is_some());
        assert!(journals.get("OD").is_some());

        assert_eq!(ledger.templates().await.unwrap().len(), LedgerFixtures::templates().len());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_installing_twice_inserts_nothing() {
        let (_db, ledger, _) = setup().await;
        assert_eq!(ledger.install_chart(&test_utils::STANDARD_CHART).await.unwrap(), 0);
        assert_eq!(ledger.install_journals(&test_utils::STANDARD_JOURNALS).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_overlapping_open_period_is_refused() {
        let (_db, ledger, _) = setup().await;
        let march = AccountingPeriod::new("Mars 2024", DateFixtures::date(2024, 3, 1), DateFixtures::date(2024, 3, 31))
            .unwrap();

        let result = ledger.open_period(&march).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Ledger(LedgerError::PeriodOverlap { .. }))
        ));
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_close_period_with_draft_is_refused() {
        let (_db, ledger, _) = setup().await;
        let period = ledger.open_period_for(DateFixtures::payment_date()).await.unwrap();
        ledger
            .create_entry(&period.id, TestEntryDraftBuilder::new().build())
            .await
            .unwrap();

        let result = ledger.close_period(&period.id).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Ledger(LedgerError::PeriodHasDrafts { .. }))
        ));
    }
}

// ============================================================================
// Entries
// ============================================================================

mod entry_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_entry_numbers_follow_journal_and_month() {
        let (_db, ledger, _) = setup().await;

        let first = ledger.post(TestEntryDraftBuilder::new().build()).await.unwrap();
        let second = ledger.post(TestEntryDraftBuilder::new().build()).await.unwrap();
        let april = ledger
            .post(TestEntryDraftBuilder::new().with_date(DateFixtures::date(2024, 4, 2)).build())
            .await
            .unwrap();

        assert_eq!(first.number, "CA2024030001");
        assert_eq!(second.number, "CA2024030002");
        assert_eq!(april.number, "CA2024040001");
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_draft_lifecycle() {
        let (_db, ledger, _) = setup().await;
        let period = ledger.open_period_for(DateFixtures::payment_date()).await.unwrap();

        let draft = ledger
            .create_entry(&period.id, TestEntryDraftBuilder::new().build())
            .await
            .unwrap();
        assert_eq!(draft.status, EntryStatus::Draft);

        let replaced = ledger
            .replace_lines(
                &draft.id,
                vec![
                    LineDraft::debit("571", fcfa(15_000)),
                    LineDraft::credit("7063", fcfa(15_000)),
                ],
            )
            .await
            .unwrap();
        assert_eq!(replaced.totals(), (fcfa(15_000), fcfa(15_000)));

        let validated = ledger.validate(&draft.id).await.unwrap();
        assert_entry_posted(&validated);

        let cancel = ledger.cancel(&draft.id).await;
        assert!(matches!(cancel, Err(DatabaseError::Ledger(_))));

        let reloaded = ledger.entry_by_number(&validated.number).await.unwrap();
        assert_eq!(reloaded.id, validated.id);
        assert_eq!(reloaded.lines.len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_unbalanced_draft_cannot_be_validated() {
        let (_db, ledger, _) = setup().await;
        let period = ledger.open_period_for(DateFixtures::payment_date()).await.unwrap();
        let draft = ledger
            .create_entry(&period.id, TestEntryDraftBuilder::new().build())
            .await
            .unwrap();
        ledger
            .replace_lines(&draft.id, vec![LineDraft::debit("571", fcfa(15_000))])
            .await
            .unwrap();

        let result = ledger.validate(&draft.id).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Ledger(LedgerError::UnbalancedEntry { .. }))
        ));
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_reversal_nets_balances_to_zero() {
        let (_db, ledger, _) = setup().await;
        let entry = ledger.post(TestEntryDraftBuilder::new().build()).await.unwrap();

        let reversal = ledger
            .reverse(&entry.id, DateFixtures::date(2024, 3, 31), "Annulation")
            .await
            .unwrap();
        assert_eq!(reversal.reverses, Some(entry.id));
        assert_eq!(ledger.account_balance("571", BalanceScope::AllTime).await.unwrap(), Amount::ZERO);
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_template_creates_draft() {
        let (_db, ledger, _) = setup().await;
        let entry = ledger
            .create_from_template("PAIEMENT_LOYER", DateFixtures::date(2024, 5, 2), fcfa(150_000), Some("Loyer mai"))
            .await
            .unwrap();

        assert!(entry.is_draft());
        assert_eq!(entry.journal_code, "BQ");
        assert_eq!(entry.label, "Loyer mai");
    }
}

// ============================================================================
// Reports
// ============================================================================

mod report_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_trial_balance_and_general_ledger() {
        let (_db, ledger, _) = setup().await;
        ledger
            .post(TestEntryDraftBuilder::new().with_amount(fcfa(40_000)).build())
            .await
            .unwrap();
        ledger
            .post(
                TestEntryDraftBuilder::new()
                    .with_date(DateFixtures::date(2024, 6, 10))
                    .with_amount(fcfa(10_000))
                    .debit("6254")
                    .credit("571")
                    .build(),
            )
            .await
            .unwrap();

        let trial = ledger.trial_balance(DateFixtures::fiscal_year(), None).await.unwrap();
        assert_trial_balance_balanced(&trial);
        assert_eq!(trial.total_debit, fcfa(50_000));

        let june = DateRange::new(DateFixtures::date(2024, 6, 1), DateFixtures::date(2024, 6, 30)).unwrap();
        let cash = ledger.general_ledger("571", june).await.unwrap();
        assert_eq!(cash.opening_balance, fcfa(40_000));
        assert_eq!(cash.rows.len(), 1);
        assert_eq!(cash.closing_balance, fcfa(30_000));
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_financial_statements() {
        let (_db, ledger, _) = setup().await;
        ledger
            .post(TestEntryDraftBuilder::new().with_amount(fcfa(40_000)).build())
            .await
            .unwrap();
        ledger
            .post(
                TestEntryDraftBuilder::new()
                    .with_amount(fcfa(10_000))
                    .debit("6254")
                    .credit("571")
                    .build(),
            )
            .await
            .unwrap();

        let statement = ledger.income_statement(DateFixtures::fiscal_year()).await.unwrap();
        assert_eq!(statement.total_products, fcfa(40_000));
        assert_eq!(statement.total_charges, fcfa(10_000));
        assert_eq!(statement.net_result, fcfa(30_000));

        let sheet = ledger.balance_sheet(DateFixtures::fiscal_year()).await.unwrap();
        assert!(sheet.is_balanced);
        assert_eq!(sheet.total_assets, fcfa(30_000));
        assert_eq!(sheet.net_result, fcfa(30_000));
    }
}

// ============================================================================
// Lettrage
// ============================================================================

mod lettrage_tests {
    use super::*;

    async fn consignation_lines(ledger: &LedgerRepository) -> (LineId, LineId) {
        let received = ledger
            .post(
                TestEntryDraftBuilder::new()
                    .with_journal("BQ")
                    .debit("5211")
                    .credit("4722")
                    .with_amount(fcfa(75_000))
                    .with_third_party("REC-2024-017")
                    .build(),
            )
            .await
            .unwrap();
        let paid_out = ledger
            .post(
                TestEntryDraftBuilder::new()
                    .with_journal("BQ")
                    .with_date(DateFixtures::date(2024, 3, 20))
                    .debit("4722")
                    .credit("5211")
                    .with_amount(fcfa(75_000))
                    .with_third_party("REC-2024-017")
                    .build(),
            )
            .await
            .unwrap();

        let on_4722 = |entry: &domain_ledger::LedgerEntry| {
            entry.lines.iter().find(|l| l.account_number == "4722").unwrap().id
        };
        (on_4722(&received), on_4722(&paid_out))
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_match_unmatch_and_codes_move_forward() {
        let (_db, ledger, _) = setup().await;
        let (credit, debit) = consignation_lines(&ledger).await;

        let first = ledger
            .match_lines("4722", &[credit, debit], "clerk.houngbo", None)
            .await
            .unwrap();
        assert_eq!(first.code.to_string(), "AAA001");
        assert!(!first.partial);

        let again = ledger.match_lines("4722", &[credit], "clerk.houngbo", None).await;
        assert!(matches!(
            again,
            Err(DatabaseError::Ledger(LedgerError::LineAlreadyReconciled { .. }))
        ));

        ledger.unmatch("4722", "AAA001").await.unwrap();
        assert!(ledger.reconciliations("4722").await.unwrap().is_empty());

        let second = ledger
            .match_lines("4722", &[credit, debit], "clerk.houngbo", None)
            .await
            .unwrap();
        assert_eq!(second.code.to_string(), "AAA002");
    }
}

// ============================================================================
// Recovery
// ============================================================================

mod recovery_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_duplicate_case_reference_is_refused() {
        let (_db, _, recovery) = setup().await;
        recovery.open_case(TestCaseRequestBuilder::new().build()).await.unwrap();

        let result = recovery.open_case(TestCaseRequestBuilder::new().build()).await;
        assert!(matches!(result, Err(DatabaseError::DuplicateEntry(_))));
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_payment_receipt_and_reversal() {
        let (_db, ledger, recovery) = setup().await;
        let case = recovery.open_case(TestCaseRequestBuilder::new().build()).await.unwrap();

        let (payment, receipt) = recovery
            .register_payment(
                &case.id,
                TestPaymentRequestBuilder::new().with_reference("RC-118").build(),
                &LedgerFixtures::clerk(),
            )
            .await
            .unwrap();
        assert_entry_posted(&receipt);
        assert_eq!(receipt.journal_code, "CA");
        assert_line(&receipt, "571", fcfa(200_000), Amount::ZERO);
        assert_line(&receipt, "7063", Amount::ZERO, fcfa(25_000));
        assert_line(&receipt, "7062", Amount::ZERO, fcfa(100_000));
        assert_line(&receipt, "4722", Amount::ZERO, fcfa(75_000));

        let transfer = recovery
            .reverse_to_creditor(&payment.id, DateFixtures::date(2024, 3, 20), Some("VIR-0042".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(transfer.journal_code, "BQ");
        assert_eq!(ledger.account_balance("4722", BalanceScope::AllTime).await.unwrap(), Amount::ZERO);

        let again = recovery
            .reverse_to_creditor(&payment.id, DateFixtures::date(2024, 3, 21), None)
            .await;
        assert!(matches!(
            again,
            Err(DatabaseError::Recovery(RecoveryError::AlreadyReversed(_)))
        ));

        let stored = recovery.case(&case.id).await.unwrap();
        assert_eq!(stored.totals.reversed, fcfa(75_000));
        assert_case_totals_consistent(&stored, &recovery.payments_of(&case.id).await.unwrap());
        recovery.verify_case(&case.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_reserved_payment_allocated_by_hand() {
        let (_db, ledger, recovery) = setup().await;
        let case = recovery
            .open_case(TestCaseRequestBuilder::new().with_billing_mode(BillingMode::Reserved).build())
            .await
            .unwrap();

        let (payment, _) = recovery
            .register_payment(
                &case.id,
                TestPaymentRequestBuilder::new()
                    .with_amount(fcfa(80_000))
                    .with_mode(PaymentMode::Transfer)
                    .build(),
                &LedgerFixtures::clerk(),
            )
            .await
            .unwrap();
        assert_eq!(ledger.account_balance("471", BalanceScope::AllTime).await.unwrap(), fcfa(-80_000));

        let (allocation, transfer) = recovery
            .allocate_reserved(
                &payment.id,
                AllocationCategory::Principal,
                fcfa(30_000),
                DateFixtures::date(2024, 3, 8),
                Some("Accord du créancier".to_string()),
                &LedgerFixtures::clerk(),
            )
            .await
            .unwrap();
        assert_eq!(transfer.journal_code, "OD");
        assert_eq!(allocation.observations.as_deref(), Some("Accord du créancier"));
        assert_eq!(ledger.account_balance("471", BalanceScope::AllTime).await.unwrap(), fcfa(-50_000));
        assert_eq!(recovery.allocations_of(&payment.id).await.unwrap().len(), 1);

        let over = recovery
            .allocate_reserved(
                &payment.id,
                AllocationCategory::Fees,
                fcfa(60_000),
                DateFixtures::date(2024, 3, 9),
                None,
                &LedgerFixtures::clerk(),
            )
            .await;
        assert!(matches!(over, Err(DatabaseError::Recovery(_))));
        assert_eq!(ledger.account_balance("471", BalanceScope::AllTime).await.unwrap(), fcfa(-50_000));

        let situation = recovery.verify_case(&case.id).await.unwrap();
        assert_eq!(situation.totals.reserved, fcfa(50_000));
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_closed_case_refuses_payments() {
        let (_db, _, recovery) = setup().await;
        let case = recovery.open_case(TestCaseRequestBuilder::new().build()).await.unwrap();

        let suspended = recovery.suspend(&case.id).await.unwrap();
        assert_eq!(suspended.status, CaseStatus::Suspended);
        recovery.resume(&case.id).await.unwrap();

        let closed = recovery.close(&case.id, ClosureReason::Irrecoverable).await.unwrap();
        assert_eq!(closed.closure_reason, Some(ClosureReason::Irrecoverable));

        let result = recovery
            .register_payment(&case.id, TestPaymentRequestBuilder::new().build(), &LedgerFixtures::clerk())
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Recovery(RecoveryError::CaseClosed(_)))
        ));
        assert!(recovery.payments_of(&case.id).await.unwrap().is_empty());
    }
}
