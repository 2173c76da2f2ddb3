//! Installation of the standard ledger
//!
//! Installs the SYSCOHADA chart, the standard journals and the quick-entry
//! templates. Everything already present is left alone, so running it
//! again is harmless.

use chrono::NaiveDate;
use core_kernel::PeriodId;
use domain_ledger::{AccountingPeriod, ChartOfAccounts, JournalRegistry, OperationTemplate};
use infra_db::LedgerRepository;
use tracing::info;

use crate::error::AdminError;

/// What an installation run added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub accounts: u64,
    pub journals: u64,
    pub templates: u64,
}

impl BootstrapReport {
    pub fn is_empty(&self) -> bool {
        self.accounts == 0 && self.journals == 0 && self.templates == 0
    }
}

/// Installs the standard chart, journals and templates
pub async fn install_standard_ledger(ledger: &LedgerRepository) -> Result<BootstrapReport, AdminError> {
    let chart = ChartOfAccounts::syscohada_standard()?;
    let journals = JournalRegistry::standard()?;

    let report = BootstrapReport {
        accounts: ledger.install_chart(&chart).await?,
        journals: ledger.install_journals(&journals).await?,
        templates: ledger.install_templates(&OperationTemplate::standard()).await?,
    };

    info!(
        accounts = report.accounts,
        journals = report.journals,
        templates = report.templates,
        "Standard ledger installed"
    );
    Ok(report)
}

/// The calendar year as a period labelled "Exercice <year>"
pub fn fiscal_year(year: i32, first: bool) -> Result<AccountingPeriod, AdminError> {
    let bound = |month, day| {
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| AdminError::usage(format!("year {} is out of range", year)))
    };

    let period = AccountingPeriod::new(format!("Exercice {}", year), bound(1, 1)?, bound(12, 31)?)?;
    Ok(if first { period.first() } else { period })
}

/// Opens the calendar year as an accounting period
pub async fn open_fiscal_year(ledger: &LedgerRepository, year: i32, first: bool) -> Result<PeriodId, AdminError> {
    let period = fiscal_year(year, first)?;
    Ok(ledger.open_period(&period).await?)
}
