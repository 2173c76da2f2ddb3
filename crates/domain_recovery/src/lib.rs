//! Recovery Domain - Debt Recovery Settlement
//!
//! This crate handles the money side of a bailiff office's recovery cases:
//! the statutory degressive tariff, ordered allocation of incoming payments
//! across fees, tariff, interest and principal, reserved funds allocated by
//! hand, reversal of the creditor's share, statutory interest, and the
//! ledger postings that mirror each of these operations.
//!
//! # Allocation order
//!
//! Procedure fees, then tariff fee, then interest, then principal. Any
//! surplus is held in reserve.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_recovery::{RecoveryDesk, PaymentRequest, PaymentMode};
//!
//! let (payment, entry_id) = desk.register_payment(
//!     &mut ledger,
//!     &case_id,
//!     PaymentRequest::new(amount, date, PaymentMode::Cash),
//!     &OperationMetadata::by("clerk"),
//! )?;
//! ```

pub mod tariff;
pub mod allocation;
pub mod case;
pub mod payment;
pub mod settlement;
pub mod situation;
pub mod interest;
pub mod posting;
pub mod config;
pub mod desk;
pub mod error;

pub use tariff::{calculate_fee, detail_breakdown, BracketDetail, FeeBreakdown, TariffBracket, TariffError, TariffKind, TariffSchedule};
pub use allocation::{AllocationCategory, AllocationSplit, ManualAllocation};
pub use case::{BillingMode, CaseStatus, CaseTotals, ClosureReason, OpenCaseRequest, RecoveryCase, RecoveryType};
pub use payment::{Payment, PaymentMode, PaymentRequest};
pub use settlement::SettlementAllocator;
pub use situation::{recompute_totals, CaseSituation, CategorySituation, CumulativeTotals, PaymentReport, PaymentReportRow};
pub use interest::{DayCountBasis, InterestCalculator, InterestComputation, InterestPeriod, LegalRateTable, SurchargedInterest};
pub use posting::PostingAccounts;
pub use config::SettlementConfig;
pub use desk::RecoveryDesk;
pub use error::RecoveryError;
