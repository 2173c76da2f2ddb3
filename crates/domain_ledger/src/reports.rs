//! Trial balance, general ledger and financial statements
//!
//! Every report only reads validated lines. They are plain serializable
//! DTOs so reporting can render them without touching the ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{Amount, DateRange, PeriodId};
use crate::account::{Account, AccountClass, ChartOfAccounts};

/// Which lines a balance covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum BalanceScope {
    Period { id: PeriodId },
    Range { range: DateRange },
    AllTime,
}

/// One account in the trial balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_number: String,
    pub account_label: String,
    pub class: AccountClass,
    pub total_debit: Amount,
    pub total_credit: Amount,
    pub debit_balance: Amount,
    pub credit_balance: Amount,
}

impl TrialBalanceRow {
    pub fn new(account: &Account, total_debit: Amount, total_credit: Amount) -> Self {
        let signed = total_debit - total_credit;
        Self {
            account_number: account.number.clone(),
            account_label: account.label.clone(),
            class: account.class,
            total_debit,
            total_credit,
            debit_balance: signed.clamp_non_negative(),
            credit_balance: (-signed).clamp_non_negative(),
        }
    }
}

/// Balance of every account with movement over a range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub range: DateRange,
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Amount,
    pub total_credit: Amount,
    pub total_debit_balance: Amount,
    pub total_credit_balance: Amount,
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Assembles the report from per-account rows
    pub fn from_rows(range: DateRange, mut rows: Vec<TrialBalanceRow>) -> Self {
        rows.retain(|r| !(r.total_debit.is_zero() && r.total_credit.is_zero()));
        rows.sort_by(|a, b| a.account_number.cmp(&b.account_number));

        let total_debit: Amount = rows.iter().map(|r| r.total_debit).sum();
        let total_credit: Amount = rows.iter().map(|r| r.total_credit).sum();
        let total_debit_balance: Amount = rows.iter().map(|r| r.debit_balance).sum();
        let total_credit_balance: Amount = rows.iter().map(|r| r.credit_balance).sum();

        Self {
            range,
            rows,
            total_debit,
            total_credit,
            total_debit_balance,
            total_credit_balance,
            is_balanced: total_debit == total_credit && total_debit_balance == total_credit_balance,
        }
    }

    /// Accumulates `(account, debit, credit)` movements into rows
    pub fn from_movements<'a>(
        range: DateRange,
        movements: impl IntoIterator<Item = (&'a Account, Amount, Amount)>,
    ) -> Self {
        let mut totals: BTreeMap<&str, (&Account, Amount, Amount)> = BTreeMap::new();
        for (account, debit, credit) in movements {
            let slot = totals.entry(account.number.as_str()).or_insert((account, Amount::ZERO, Amount::ZERO));
            slot.1 += debit;
            slot.2 += credit;
        }
        let rows = totals
            .into_values()
            .map(|(account, debit, credit)| TrialBalanceRow::new(account, debit, credit))
            .collect();
        Self::from_rows(range, rows)
    }
}

/// A validated line as seen by the general ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedgerRow {
    pub date: NaiveDate,
    pub entry_number: String,
    pub journal_code: String,
    pub label: String,
    pub debit: Amount,
    pub credit: Amount,
    /// `debit - credit` accumulated since the opening balance
    pub running_balance: Amount,
    pub reconciliation_code: Option<String>,
}

/// Movements of one account over a range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedger {
    pub account_number: String,
    pub account_label: String,
    pub range: DateRange,
    /// Signed balance of everything before `range.start`
    pub opening_balance: Amount,
    pub rows: Vec<GeneralLedgerRow>,
    pub total_debit: Amount,
    pub total_credit: Amount,
    pub closing_balance: Amount,
}

impl GeneralLedger {
    /// Builds the report; `rows` must already be in date then number order
    ///
    /// Running balances are recomputed from `opening_balance`.
    pub fn build(account: &Account, range: DateRange, opening_balance: Amount, mut rows: Vec<GeneralLedgerRow>) -> Self {
        let mut running = opening_balance;
        for row in rows.iter_mut() {
            running += row.debit - row.credit;
            row.running_balance = running;
        }
        let total_debit: Amount = rows.iter().map(|r| r.debit).sum();
        let total_credit: Amount = rows.iter().map(|r| r.credit).sum();

        Self {
            account_number: account.number.clone(),
            account_label: account.label.clone(),
            range,
            opening_balance,
            rows,
            total_debit,
            total_credit,
            closing_balance: running,
        }
    }
}

/// One line of a financial statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Class digit on the balance sheet, two-digit heading on the income statement
    pub code: String,
    pub label: String,
    pub amount: Amount,
}

fn heading_of(number: &str) -> &str {
    number.get(..2).unwrap_or(number)
}

/// Sums `amount(row)` per heading, labelled from the chart when it knows the heading
fn by_heading<'a>(
    rows: impl Iterator<Item = &'a TrialBalanceRow>,
    chart: &ChartOfAccounts,
    amount: impl Fn(&TrialBalanceRow) -> Amount,
) -> Vec<StatementLine> {
    let mut headings: BTreeMap<String, (AccountClass, Amount)> = BTreeMap::new();
    for row in rows {
        let slot = headings
            .entry(heading_of(&row.account_number).to_string())
            .or_insert((row.class, Amount::ZERO));
        slot.1 += amount(row);
    }
    headings
        .into_iter()
        .map(|(code, (class, amount))| StatementLine {
            label: chart.get(&code).map_or_else(|| class.label().to_string(), |a| a.label.clone()),
            code,
            amount,
        })
        .collect()
}

/// Charges (class 6) against products (class 7) over a range
///
/// Class 8 movements are netted into `other_result` and count toward the
/// net result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub range: DateRange,
    pub products: Vec<StatementLine>,
    pub charges: Vec<StatementLine>,
    pub total_products: Amount,
    pub total_charges: Amount,
    /// Credit minus debit on class 8
    pub other_result: Amount,
    /// Profit when positive, loss when negative
    pub net_result: Amount,
}

impl IncomeStatement {
    /// Aggregates a trial balance that covers every class
    pub fn from_trial_balance(trial_balance: &TrialBalance, chart: &ChartOfAccounts) -> Self {
        let of_class = |digit: u8| trial_balance.rows.iter().filter(move |r| r.class.digit() == digit);

        let products = by_heading(of_class(7), chart, |r| r.total_credit - r.total_debit);
        let charges = by_heading(of_class(6), chart, |r| r.total_debit - r.total_credit);
        let other_result: Amount = of_class(8).map(|r| r.total_credit - r.total_debit).sum();

        let total_products: Amount = products.iter().map(|l| l.amount).sum();
        let total_charges: Amount = charges.iter().map(|l| l.amount).sum();

        Self {
            range: trial_balance.range,
            products,
            charges,
            total_products,
            total_charges,
            other_result,
            net_result: total_products - total_charges + other_result,
        }
    }
}

/// Assets against liabilities on classes 1 to 5, with the net result carried
///
/// Each account lands on the side of its own balance, so a customer in
/// credit (419) reads as a liability and an overdrawn bank as a debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub range: DateRange,
    pub assets: Vec<StatementLine>,
    pub liabilities: Vec<StatementLine>,
    /// Net result of the income statement, carried to liabilities
    pub net_result: Amount,
    pub total_assets: Amount,
    pub total_liabilities: Amount,
    pub is_balanced: bool,
}

impl BalanceSheet {
    /// Aggregates a trial balance that covers every class
    pub fn from_trial_balance(trial_balance: &TrialBalance, net_result: Amount) -> Self {
        let mut assets: BTreeMap<AccountClass, Amount> = BTreeMap::new();
        let mut liabilities: BTreeMap<AccountClass, Amount> = BTreeMap::new();

        for row in trial_balance.rows.iter().filter(|r| r.class.is_balance_sheet()) {
            if row.debit_balance.is_positive() {
                *assets.entry(row.class).or_insert(Amount::ZERO) += row.debit_balance;
            }
            if row.credit_balance.is_positive() {
                *liabilities.entry(row.class).or_insert(Amount::ZERO) += row.credit_balance;
            }
        }

        let lines = |totals: BTreeMap<AccountClass, Amount>| -> Vec<StatementLine> {
            totals
                .into_iter()
                .map(|(class, amount)| StatementLine {
                    code: class.to_string(),
                    label: class.label().to_string(),
                    amount,
                })
                .collect()
        };
        let assets = lines(assets);
        let liabilities = lines(liabilities);

        let total_assets: Amount = assets.iter().map(|l| l.amount).sum();
        let total_liabilities: Amount = liabilities.iter().map(|l| l.amount).sum::<Amount>() + net_result;

        Self {
            range: trial_balance.range,
            assets,
            liabilities,
            net_result,
            total_assets,
            total_liabilities,
            is_balanced: total_assets == total_liabilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::BalanceSide;

    #[test]
    fn test_row_splits_balance_by_side() {
        let bank = Account::new("5211", "Banque", BalanceSide::Debit).unwrap();
        let row = TrialBalanceRow::new(&bank, Amount::from_units(300), Amount::from_units(500));
        assert_eq!(row.debit_balance, Amount::ZERO);
        assert_eq!(row.credit_balance, Amount::from_units(200));
    }

    #[test]
    fn test_movements_are_grouped_and_sorted() {
        let cash = Account::new("571", "Caisse", BalanceSide::Debit).unwrap();
        let fees = Account::new("706", "Services", BalanceSide::Credit).unwrap();
        let range = DateRange::year(2024).unwrap();
        let amount = Amount::from_units(1000);

        let tb = TrialBalance::from_movements(
            range,
            vec![(&fees, Amount::ZERO, amount), (&cash, amount, Amount::ZERO), (&cash, amount, Amount::ZERO), (&fees, Amount::ZERO, amount)],
        );
        assert_eq!(tb.rows.len(), 2);
        assert_eq!(tb.rows[0].account_number, "571");
        assert_eq!(tb.rows[0].debit_balance, Amount::from_units(2000));
        assert!(tb.is_balanced);
    }

    fn statement_fixture() -> (ChartOfAccounts, TrialBalance) {
        let chart = ChartOfAccounts::syscohada_standard().unwrap();
        let account = |n: &str| chart.get(n).unwrap().clone();
        let units = Amount::from_units;
        let range = DateRange::year(2024).unwrap();

        // Capital 500000 paid into the bank, fees invoiced 300000 of which
        // 200000 collected, rent 80000 paid by bank
        let rows = vec![
            TrialBalanceRow::new(&account("101"), Amount::ZERO, units(500_000)),
            TrialBalanceRow::new(&account("4111"), units(300_000), units(200_000)),
            TrialBalanceRow::new(&account("5211"), units(700_000), units(80_000)),
            TrialBalanceRow::new(&account("6131"), units(80_000), Amount::ZERO),
            TrialBalanceRow::new(&account("7061"), Amount::ZERO, units(300_000)),
        ];
        (chart.clone(), TrialBalance::from_rows(range, rows))
    }

    #[test]
    fn test_income_statement_nets_products_against_charges() {
        let (chart, tb) = statement_fixture();
        let statement = IncomeStatement::from_trial_balance(&tb, &chart);

        assert_eq!(statement.total_products, Amount::from_units(300_000));
        assert_eq!(statement.total_charges, Amount::from_units(80_000));
        assert_eq!(statement.net_result, Amount::from_units(220_000));
        assert_eq!(statement.products[0].code, "70");
        assert_eq!(statement.charges[0].code, "61");
        assert_eq!(statement.charges[0].label, "Services extérieurs");
    }

    #[test]
    fn test_balance_sheet_balances_once_result_is_carried() {
        let (chart, tb) = statement_fixture();
        let result = IncomeStatement::from_trial_balance(&tb, &chart).net_result;
        let sheet = BalanceSheet::from_trial_balance(&tb, result);

        assert_eq!(sheet.total_assets, Amount::from_units(720_000));
        assert_eq!(sheet.total_liabilities, Amount::from_units(720_000));
        assert!(sheet.is_balanced);
        assert!(!BalanceSheet::from_trial_balance(&tb, Amount::ZERO).is_balanced);
    }
}
