//! Property-Based Test Generators
//!
//! Proptest strategies for ledger and recovery data that respect the
//! domain invariants: whole FCFA amounts, dates inside the 2024 year,
//! accounts that exist in the standard chart.

use chrono::{Days, NaiveDate};
use core_kernel::Amount;
use domain_ledger::{EntryDraft, LineDraft};
use domain_recovery::{BillingMode, OpenCaseRequest, PaymentMode, RecoveryType};
use proptest::prelude::*;

use crate::builders::TestCaseRequestBuilder;
use crate::fixtures::DateFixtures;

/// Posting accounts of the standard chart usable on any journal
pub const POSTABLE_ACCOUNTS: &[&str] = &["571", "5211", "4111", "4722", "471", "6261", "7062", "7063"];

/// Strategy for strictly positive whole FCFA amounts
pub fn positive_amount_strategy() -> impl Strategy<Value = Amount> {
    (1i64..50_000_000i64).prop_map(Amount::from_units)
}

/// Strategy for amounts that may be zero
pub fn non_negative_amount_strategy() -> impl Strategy<Value = Amount> {
    (0i64..50_000_000i64).prop_map(Amount::from_units)
}

/// Strategy for dates inside 2024
pub fn date_2024_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..366u64).prop_map(|offset| {
        DateFixtures::fiscal_year_start()
            .checked_add_days(Days::new(offset))
            .unwrap_or_else(DateFixtures::fiscal_year_end)
    })
}

pub fn account_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(POSTABLE_ACCOUNTS)
}

pub fn recovery_type_strategy() -> impl Strategy<Value = RecoveryType> {
    prop_oneof![Just(RecoveryType::Amicable), Just(RecoveryType::Forced)]
}

pub fn billing_mode_strategy() -> impl Strategy<Value = BillingMode> {
    prop_oneof![
        Just(BillingMode::Standard),
        Just(BillingMode::Reserved),
        Just(BillingMode::Bank),
    ]
}

pub fn payment_mode_strategy() -> impl Strategy<Value = PaymentMode> {
    prop_oneof![
        Just(PaymentMode::Cash),
        Just(PaymentMode::Cheque),
        Just(PaymentMode::Transfer),
        Just(PaymentMode::MobileMoney),
        Just(PaymentMode::Other),
    ]
}

/// Strategy for a balanced miscellaneous draft of two to six lines
///
/// Each debit line is mirrored by a credit line of the same amount.
pub fn balanced_draft_strategy() -> impl Strategy<Value = EntryDraft> {
    (
        date_2024_strategy(),
        prop::collection::vec((account_strategy(), account_strategy(), positive_amount_strategy()), 1..=3),
    )
        .prop_map(|(date, pairs)| {
            pairs.into_iter().fold(
                EntryDraft::new("OD", date, "Opération diverse"),
                |draft, (debit, credit, amount)| {
                    draft
                        .line(LineDraft::debit(debit, amount))
                        .line(LineDraft::credit(credit, amount))
                },
            )
        })
}

/// Strategy for case opening requests
pub fn case_request_strategy() -> impl Strategy<Value = OpenCaseRequest> {
    (
        recovery_type_strategy(),
        billing_mode_strategy(),
        positive_amount_strategy(),
        (0i64..5_000_000i64).prop_map(Amount::from_units),
        (0i64..1_000_000i64).prop_map(Amount::from_units),
    )
        .prop_map(|(recovery_type, mode, principal, interest, fees)| {
            let builder = TestCaseRequestBuilder::new()
                .with_billing_mode(mode)
                .with_principal(principal)
                .with_interest(interest)
                .with_procedure_fees(fees);
            match recovery_type {
                RecoveryType::Amicable => builder.amicable().build(),
                RecoveryType::Forced => builder.build(),
            }
        })
}

/// Strategy for a run of payments on one case
pub fn payment_amounts_strategy() -> impl Strategy<Value = Vec<Amount>> {
    prop::collection::vec((1i64..2_000_000i64).prop_map(Amount::from_units), 1..8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::STANDARD_CHART;

    proptest! {
        #[test]
        fn balanced_drafts_balance(draft in balanced_draft_strategy()) {
            let (debit, credit) = draft.totals();
            prop_assert_eq!(debit, credit);
            prop_assert!(draft.check_lines().is_ok());
        }

        #[test]
        fn generated_dates_stay_in_2024(date in date_2024_strategy()) {
            prop_assert!(DateFixtures::fiscal_year().contains(date));
        }

        #[test]
        fn generated_accounts_exist(account in account_strategy()) {
            prop_assert!(STANDARD_CHART.get(account).is_some());
        }
    }
}
