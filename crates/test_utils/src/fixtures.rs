//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the ledger and recovery suites. Amounts are in
//! FCFA, which has no minor unit.

use chrono::NaiveDate;
use core_kernel::{Amount, CaseId, DateRange, OperationMetadata, PartyId};
use domain_ledger::{AccountingPeriod, ChartOfAccounts, JournalRegistry, Ledger, OperationTemplate};
use once_cell::sync::Lazy;
use uuid::Uuid;

/// Standard SYSCOHADA chart, built once per test binary
pub static STANDARD_CHART: Lazy<ChartOfAccounts> =
    Lazy::new(|| ChartOfAccounts::syscohada_standard().expect("standard chart must build"));

/// Standard journal registry, built once per test binary
pub static STANDARD_JOURNALS: Lazy<JournalRegistry> =
    Lazy::new(|| JournalRegistry::standard().expect("standard journals must build"));

/// Fixture for FCFA amounts
pub struct AmountFixtures;

impl AmountFixtures {
    pub fn fcfa(units: i64) -> Amount {
        Amount::from_units(units)
    }

    /// Principal of the reference forced recovery case
    pub fn principal() -> Amount {
        Amount::from_units(1_000_000)
    }

    /// Contractual interest of the reference case
    pub fn interest() -> Amount {
        Amount::from_units(50_000)
    }

    /// Procedure fees of the reference case
    pub fn procedure_fees() -> Amount {
        Amount::from_units(25_000)
    }

    /// Forced-recovery tariff on the reference principal
    pub fn forced_tariff_on_principal() -> Amount {
        Amount::from_units(100_000)
    }

    /// A partial payment that covers fees and tariff with some left for the creditor
    pub fn partial_payment() -> Amount {
        Amount::from_units(200_000)
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }

    pub fn fiscal_year_start() -> NaiveDate {
        Self::date(2024, 1, 1)
    }

    pub fn fiscal_year_end() -> NaiveDate {
        Self::date(2024, 12, 31)
    }

    pub fn case_opened_on() -> NaiveDate {
        Self::date(2024, 2, 1)
    }

    pub fn payment_date() -> NaiveDate {
        Self::date(2024, 3, 5)
    }

    pub fn fiscal_year() -> DateRange {
        DateRange::new(Self::fiscal_year_start(), Self::fiscal_year_end()).expect("valid fixture range")
    }

    /// The 2024 financial year as an open period
    pub fn fiscal_year_period() -> AccountingPeriod {
        AccountingPeriod::new("Exercice 2024", Self::fiscal_year_start(), Self::fiscal_year_end())
            .expect("valid fixture period")
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Deterministic creditor for testing
    pub fn creditor_id() -> PartyId {
        PartyId::from_uuid(Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440001))
    }

    /// Deterministic debtor for testing
    pub fn debtor_id() -> PartyId {
        PartyId::from_uuid(Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440002))
    }

    pub fn case_id() -> CaseId {
        CaseId::from_uuid(Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440003))
    }
}

/// Fixture for string values
pub struct StringFixtures;

impl StringFixtures {
    pub fn case_reference() -> &'static str {
        "REC-2024-017"
    }

    pub fn clerk() -> &'static str {
        "clerk.houngbo"
    }

    pub fn cash_account() -> &'static str {
        "571"
    }

    pub fn bank_account() -> &'static str {
        "5211"
    }

    pub fn creditor_payable_account() -> &'static str {
        "4722"
    }

    pub fn suspense_account() -> &'static str {
        "471"
    }
}

/// Fixture for a ready-to-post ledger
pub struct LedgerFixtures;

impl LedgerFixtures {
    /// Standard ledger with the 2024 period open
    pub fn ledger_2024() -> Ledger {
        let mut ledger = Ledger::standard().expect("standard ledger must build");
        ledger
            .open_period(DateFixtures::fiscal_year_period())
            .expect("2024 period must open");
        ledger
    }

    pub fn templates() -> Vec<OperationTemplate> {
        OperationTemplate::standard()
    }

    pub fn clerk() -> OperationMetadata {
        OperationMetadata::by(StringFixtures::clerk())
    }
}
