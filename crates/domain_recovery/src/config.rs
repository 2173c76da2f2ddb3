//! Settlement configuration
//!
//! Tariff schedules, the default billing mode, the interest basis and the
//! posting accounts live in one immutable struct loaded at start-up.

use serde::{Deserialize, Serialize};

use crate::case::{BillingMode, RecoveryType};
use crate::interest::{DayCountBasis, InterestCalculator, LegalRateTable};
use crate::posting::PostingAccounts;
use crate::tariff::{TariffKind, TariffSchedule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    pub amicable_schedule: TariffSchedule,
    pub forced_schedule: TariffSchedule,
    pub complementary_schedule: TariffSchedule,
    pub default_billing_mode: BillingMode,
    pub interest_basis: DayCountBasis,
    pub legal_rates: LegalRateTable,
    pub posting: PostingAccounts,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            amicable_schedule: TariffSchedule::amicable(),
            forced_schedule: TariffSchedule::forced(),
            complementary_schedule: TariffSchedule::complementary(),
            default_billing_mode: BillingMode::Standard,
            interest_basis: DayCountBasis::Actual365,
            legal_rates: LegalRateTable::default(),
            posting: PostingAccounts::default(),
        }
    }
}

impl SettlementConfig {
    pub fn schedule(&self, kind: TariffKind) -> &TariffSchedule {
        match kind {
            TariffKind::Amicable => &self.amicable_schedule,
            TariffKind::Forced => &self.forced_schedule,
            TariffKind::Complementary => &self.complementary_schedule,
        }
    }

    /// Schedule used for a case's tariff fee
    pub fn schedule_for(&self, recovery_type: RecoveryType) -> &TariffSchedule {
        match recovery_type {
            RecoveryType::Amicable => self.schedule(TariffKind::Amicable),
            RecoveryType::Forced => self.schedule(TariffKind::Forced),
        }
    }

    /// Calculator on the configured day count basis and legal rates
    pub fn interest_calculator(&self) -> InterestCalculator {
        InterestCalculator::new(self.interest_basis).with_rates(self.legal_rates.clone())
    }
}
