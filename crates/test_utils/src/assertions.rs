//! Custom Test Assertions
//!
//! Assertion helpers for ledger and recovery values that print the
//! figures involved when they fail.

use core_kernel::Amount;
use domain_ledger::{LedgerEntry, TrialBalance};
use domain_recovery::{recompute_totals, Payment, RecoveryCase};

/// Asserts that an entry has equal debit and credit totals
pub fn assert_entry_balanced(entry: &LedgerEntry) {
    let (debit, credit) = entry.totals();
    assert_eq!(
        debit, credit,
        "Entry {} is unbalanced: debit={}, credit={}",
        entry.number, debit, credit
    );
}

/// Asserts that an entry is validated and balanced
pub fn assert_entry_posted(entry: &LedgerEntry) {
    assert!(
        entry.is_validated(),
        "Expected entry {} to be validated, got {}",
        entry.number,
        entry.status
    );
    assert_entry_balanced(entry);
}

/// Asserts that an entry carries a line of `amount` on each given side
///
/// # Panics
///
/// Panics if no line matches the account and side.
pub fn assert_line(entry: &LedgerEntry, account_number: &str, debit: Amount, credit: Amount) {
    let found = entry
        .lines
        .iter()
        .any(|l| l.account_number == account_number && l.debit == debit && l.credit == credit);
    assert!(
        found,
        "Entry {} has no line {} debit={} credit={}; lines: {:?}",
        entry.number,
        account_number,
        debit,
        credit,
        entry
            .lines
            .iter()
            .map(|l| (l.account_number.as_str(), l.debit, l.credit))
            .collect::<Vec<_>>()
    );
}

/// Asserts that a trial balance has equal totals on both sides
pub fn assert_trial_balance_balanced(balance: &TrialBalance) {
    assert!(
        balance.is_balanced,
        "Trial balance is off: debit={}, credit={}, debit balances={}, credit balances={}",
        balance.total_debit,
        balance.total_credit,
        balance.total_debit_balance,
        balance.total_credit_balance
    );
}

/// Asserts that a payment's split adds up to its amount
pub fn assert_split_matches_amount(payment: &Payment) {
    assert_eq!(
        payment.allocation.total(),
        payment.amount,
        "Payment {} split {:?} does not add up to {}",
        payment.id,
        payment.allocation,
        payment.amount
    );
}

/// Asserts that the running totals on a case match its payments
pub fn assert_case_totals_consistent(case: &RecoveryCase, payments: &[Payment]) {
    let computed = recompute_totals(payments);
    assert_eq!(
        case.totals, computed,
        "Case {} totals drifted from its payments",
        case.reference
    );
}
