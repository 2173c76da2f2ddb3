//! Statutory degressive tariff
//!
//! Recovery fees are computed bracket by bracket: each bounded bracket
//! consumes at most its width of the claim at its own rate and the single
//! unbounded bracket takes whatever remains. Every bracket's contribution
//! is rounded to the franc before summing, as the decree prescribes.

use core_kernel::{Amount, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Schedule configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TariffError {
    #[error("Tariff schedule has no bracket")]
    EmptySchedule,

    #[error("Bracket {index}: upper bound must be positive")]
    NonPositiveBound { index: usize },

    #[error("Bracket {index}: upper bound must exceed the previous one")]
    NonIncreasingBound { index: usize },

    #[error("Bracket {index}: rate {rate} is outside [0, 1]")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("Tariff schedule has no unbounded bracket")]
    MissingUnboundedBracket,

    #[error("Bracket {index} is unbounded but not last")]
    UnboundedNotLast { index: usize },
}

/// One bracket of a schedule; `upper` is `None` for the open-ended last one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffBracket {
    pub upper: Option<Amount>,
    pub rate: Rate,
}

impl TariffBracket {
    /// Bracket ending at `upper` francs, rate given in percent
    pub fn up_to(upper: i64, percentage: Decimal) -> Self {
        Self {
            upper: Some(Amount::from_units(upper)),
            rate: Rate::from_percentage(percentage),
        }
    }

    /// Open-ended bracket, rate given in percent
    pub fn beyond(percentage: Decimal) -> Self {
        Self {
            upper: None,
            rate: Rate::from_percentage(percentage),
        }
    }
}

/// Which statutory schedule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffKind {
    /// Creditor-borne fee for amicable recovery
    Amicable,
    /// Debtor-borne fee for forced recovery
    Forced,
    /// Creditor-borne fee for repeated steps
    Complementary,
}

/// A validated bracket schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TariffBracket>", into = "Vec<TariffBracket>")]
pub struct TariffSchedule {
    brackets: Vec<TariffBracket>,
}

impl TariffSchedule {
    /// Builds a schedule, checking bounds ordering and the unbounded tail
    pub fn new(brackets: Vec<TariffBracket>) -> Result<Self, TariffError> {
        if brackets.is_empty() {
            return Err(TariffError::EmptySchedule);
        }

        let last = brackets.len() - 1;
        let mut previous = Amount::ZERO;
        for (index, bracket) in brackets.iter().enumerate() {
            let rate = bracket.rate.as_decimal();
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(TariffError::InvalidRate { index, rate });
            }
            match bracket.upper {
                Some(upper) => {
                    if !upper.is_positive() {
                        return Err(TariffError::NonPositiveBound { index });
                    }
                    if upper <= previous {
                        return Err(TariffError::NonIncreasingBound { index });
                    }
                    if index == last {
                        return Err(TariffError::MissingUnboundedBracket);
                    }
                    previous = upper;
                }
                None if index != last => return Err(TariffError::UnboundedNotLast { index }),
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Amicable recovery fee: 10%, 8%, 6%, then 4%
    pub fn amicable() -> Self {
        Self {
            brackets: vec![
                TariffBracket::up_to(5_000_000, dec!(10)),
                TariffBracket::up_to(20_000_000, dec!(8)),
                TariffBracket::up_to(50_000_000, dec!(6)),
                TariffBracket::beyond(dec!(4)),
            ],
        }
    }

    /// Forced recovery fee: 10%, 3.5%, 2%, then 1%
    pub fn forced() -> Self {
        Self {
            brackets: vec![
                TariffBracket::up_to(5_000_000, dec!(10)),
                TariffBracket::up_to(20_000_000, dec!(3.5)),
                TariffBracket::up_to(50_000_000, dec!(2)),
                TariffBracket::beyond(dec!(1)),
            ],
        }
    }

    /// Complementary fee, same brackets as the forced schedule
    pub fn complementary() -> Self {
        Self::forced()
    }

    pub fn standard(kind: TariffKind) -> Self {
        match kind {
            TariffKind::Amicable => Self::amicable(),
            TariffKind::Forced => Self::forced(),
            TariffKind::Complementary => Self::complementary(),
        }
    }

    pub fn brackets(&self) -> &[TariffBracket] {
        &self.brackets
    }

    /// Computes the fee due on `amount`
    pub fn calculate_fee(&self, amount: Amount) -> Amount {
        self.detail_breakdown(amount).total
    }

    /// Itemizes the fee bracket by bracket
    pub fn detail_breakdown(&self, amount: Amount) -> FeeBreakdown {
        let mut lines = Vec::new();
        let mut total = Amount::ZERO;
        let mut remaining = amount;
        let mut previous = Amount::ZERO;

        for bracket in &self.brackets {
            if !remaining.is_positive() {
                break;
            }

            let taxable = match bracket.upper {
                Some(upper) => remaining.min(upper - previous),
                None => remaining,
            };
            let fee = bracket.rate.apply_rounded(taxable);

            lines.push(BracketDetail {
                range_min: if previous.is_zero() { Amount::ZERO } else { previous + Amount::from_units(1) },
                range_max: bracket.upper,
                rate_percent: bracket.rate.as_percentage(),
                taxable_in_bracket: taxable,
                fee_in_bracket: fee,
            });

            total += fee;
            remaining -= taxable;
            if let Some(upper) = bracket.upper {
                previous = upper;
            }
        }

        FeeBreakdown { amount, total, lines }
    }
}

impl TryFrom<Vec<TariffBracket>> for TariffSchedule {
    type Error = TariffError;

    fn try_from(brackets: Vec<TariffBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<TariffSchedule> for Vec<TariffBracket> {
    fn from(schedule: TariffSchedule) -> Self {
        schedule.brackets
    }
}

/// Computes the fee due on `amount` under `schedule`
pub fn calculate_fee(amount: Amount, schedule: &TariffSchedule) -> Amount {
    schedule.calculate_fee(amount)
}

/// Itemizes the fee due on `amount` under `schedule`
pub fn detail_breakdown(amount: Amount, schedule: &TariffSchedule) -> FeeBreakdown {
    schedule.detail_breakdown(amount)
}

/// One bracket's share of a fee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketDetail {
    pub range_min: Amount,
    pub range_max: Option<Amount>,
    pub rate_percent: Decimal,
    pub taxable_in_bracket: Amount,
    pub fee_in_bracket: Amount,
}

/// Fee itemization for audit and display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub amount: Amount,
    pub total: Amount,
    pub lines: Vec<BracketDetail>,
}
