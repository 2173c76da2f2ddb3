//! Administration commands
//!
//! The `ledger-admin` command line and its execution against the database.
//! Reports are printed as pretty JSON. Commands that take an optional year
//! or date default to today at the office, in the configured timezone.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use core_kernel::{DateRange, HealthCheckable, Timezone};
use domain_ledger::AccountClass;
use domain_recovery::SettlementAllocator;
use infra_db::{create_pool, run_migrations, DatabasePool, LedgerRepository, RecoveryRepository};
use tracing::info;

use crate::bootstrap::{fiscal_year, install_standard_ledger, open_fiscal_year};
use crate::config::AppConfig;
use crate::error::AdminError;

/// Administration of the office ledger and recovery cases
#[derive(Debug, Parser)]
#[clap(name = "ledger-admin", version, long_about = None)]
pub struct Cli {
    /// Configuration file; `ledger-admin.toml` is read when present
    #[clap(short, long, env = "LEDGER_CONFIG", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Migrate, install the standard ledger and optionally open the first year
    Bootstrap {
        /// First fiscal year to open
        #[clap(long)]
        year: Option<i32>,
    },
    /// Open a calendar year as an accounting period
    OpenYear { year: Option<i32> },
    /// Print the trial balance of a year
    TrialBalance {
        year: Option<i32>,
        /// Restrict to one account class (1-9)
        #[clap(long, value_parser = parse_class)]
        class: Option<AccountClass>,
    },
    /// Print the income statement of a year
    IncomeStatement { year: Option<i32> },
    /// Print the balance sheet of a year
    BalanceSheet { year: Option<i32> },
    /// Print the situation of a recovery case
    CaseSituation { reference: String },
    /// Print the legal interest accrued on a case's unpaid principal
    CaseInterest {
        reference: String,
        #[clap(long, value_name = "YYYY-MM-DD")]
        until: Option<NaiveDate>,
        /// Date the decision became enforceable
        #[clap(long, value_name = "YYYY-MM-DD")]
        enforceable_on: Option<NaiveDate>,
    },
    /// Check a case's running totals against its payments
    VerifyCase { reference: String },
    /// Check database connectivity
    Health,
}

/// `year`, else the current year at the office
pub fn year_or_current(year: Option<i32>, timezone: &Timezone) -> i32 {
    year.unwrap_or_else(|| timezone.today().year())
}

fn year_range(year: Option<i32>, config: &AppConfig) -> Result<DateRange, AdminError> {
    Ok(fiscal_year(year_or_current(year, &config.timezone), false)?.range)
}

impl Command {
    /// Runs the command and returns what should be printed
    pub async fn run(self, config: &AppConfig) -> Result<String, AdminError> {
        let pool = create_pool(config.database.pool_config()).await?;
        self.run_with(config, pool).await
    }

    pub async fn run_with(self, config: &AppConfig, pool: DatabasePool) -> Result<String, AdminError> {
        let ledger = LedgerRepository::new(pool.clone());
        let recovery = RecoveryRepository::new(pool.clone(), SettlementAllocator::new(config.settlement.clone()));

        match self {
            Command::Migrate => {
                run_migrations(&pool).await?;
                Ok("Migrations applied".to_string())
            }
            Command::Bootstrap { year } => {
                run_migrations(&pool).await?;
                let report = install_standard_ledger(&ledger).await?;
                let mut output = format!(
                    "Installed {} accounts, {} journals, {} templates",
                    report.accounts, report.journals, report.templates
                );
                if let Some(year) = year {
                    let id = open_fiscal_year(&ledger, year, true).await?;
                    output.push_str(&format!("\nOpened Exercice {} ({})", year, id));
                }
                Ok(output)
            }
            Command::OpenYear { year } => {
                let year = year_or_current(year, &config.timezone);
                let id = open_fiscal_year(&ledger, year, false).await?;
                info!(year, period = %id, "Fiscal year opened");
                Ok(format!("Opened Exercice {} ({})", year, id))
            }
            Command::TrialBalance { year, class } => {
                let balance = ledger.trial_balance(year_range(year, config)?, class).await?;
                Ok(serde_json::to_string_pretty(&balance)?)
            }
            Command::IncomeStatement { year } => {
                let statement = ledger.income_statement(year_range(year, config)?).await?;
                Ok(serde_json::to_string_pretty(&statement)?)
            }
            Command::BalanceSheet { year } => {
                let sheet = ledger.balance_sheet(year_range(year, config)?).await?;
                Ok(serde_json::to_string_pretty(&sheet)?)
            }
            Command::CaseSituation { reference } => {
                let case = recovery.case_by_reference(&reference).await?;
                let situation = recovery.situation(&case.id).await?;
                Ok(serde_json::to_string_pretty(&situation)?)
            }
            Command::CaseInterest { reference, until, enforceable_on } => {
                let case = recovery.case_by_reference(&reference).await?;
                let until = until.unwrap_or_else(|| config.timezone.today());
                let interest = recovery.accrued_interest(&case.id, until, enforceable_on).await?;
                Ok(serde_json::to_string_pretty(&interest)?)
            }
            Command::VerifyCase { reference } => {
                let case = recovery.case_by_reference(&reference).await?;
                let situation = recovery.verify_case(&case.id).await?;
                Ok(format!(
                    "Case {} is consistent: {} payments, {} paid",
                    case.reference, situation.payment_count, situation.total_paid
                ))
            }
            Command::Health => {
                let result = ledger.health_check().await;
                Ok(format!("{}: {:?} in {} ms", result.adapter_id, result.status, result.latency_ms))
            }
        }
    }
}

fn parse_class(value: &str) -> Result<AccountClass, String> {
    let digit: u8 = value
        .parse()
        .map_err(|_| format!("'{}' is not an account class", value))?;
    AccountClass::new(digit).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("ledger-admin").chain(args.iter().copied())).map(|cli| cli.command)
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_every_subcommand() {
        assert_eq!(parse(&["migrate"]).unwrap(), Command::Migrate);
        assert_eq!(parse(&["bootstrap"]).unwrap(), Command::Bootstrap { year: None });
        assert_eq!(parse(&["bootstrap", "--year", "2024"]).unwrap(), Command::Bootstrap { year: Some(2024) });
        assert_eq!(parse(&["bootstrap", "--year=2025"]).unwrap(), Command::Bootstrap { year: Some(2025) });
        assert_eq!(parse(&["open-year", "2025"]).unwrap(), Command::OpenYear { year: Some(2025) });
        assert_eq!(parse(&["open-year"]).unwrap(), Command::OpenYear { year: None });
        assert_eq!(
            parse(&["trial-balance", "2024", "--class", "4"]).unwrap(),
            Command::TrialBalance {
                year: Some(2024),
                class: Some(AccountClass::new(4).unwrap())
            }
        );
        assert_eq!(parse(&["income-statement", "2024"]).unwrap(), Command::IncomeStatement { year: Some(2024) });
        assert_eq!(parse(&["balance-sheet"]).unwrap(), Command::BalanceSheet { year: None });
        assert_eq!(
            parse(&["case-situation", "REC-2024-001"]).unwrap(),
            Command::CaseSituation { reference: "REC-2024-001".to_string() }
        );
        assert_eq!(
            parse(&["case-interest", "REC-2024-001", "--until", "2024-06-30"]).unwrap(),
            Command::CaseInterest {
                reference: "REC-2024-001".to_string(),
                until: NaiveDate::from_ymd_opt(2024, 6, 30),
                enforceable_on: None,
            }
        );
        assert_eq!(
            parse(&["verify-case", "REC-2024-001"]).unwrap(),
            Command::VerifyCase { reference: "REC-2024-001".to_string() }
        );
        assert_eq!(parse(&["health"]).unwrap(), Command::Health);
    }

    #[test]
    fn test_config_file_is_global() {
        let cli = Cli::try_parse_from(["ledger-admin", "health", "--config", "office.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("office.toml")));
    }

    #[test]
    fn test_help_and_bad_arguments() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse(&["payroll"]).unwrap_err().kind(), ErrorKind::InvalidSubcommand);
        assert!(parse(&[]).is_err());
        assert_eq!(parse(&["trial-balance", "2024", "--class", "0"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["open-year", "soon"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["case-situation"]).unwrap_err().kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_year_defaults_to_office_today() {
        let timezone = Timezone::default();
        assert_eq!(year_or_current(Some(2023), &timezone), 2023);
        assert_eq!(year_or_current(None, &timezone), timezone.today().year());
    }
}
