//! Statutory interest
//!
//! The first day of a period counts and the last one does not. Yearly
//! rates come from an explicit [`LegalRateTable`]; each calendar year is
//! computed and rounded on its own. Sixty days after a decision becomes
//! enforceable the rate is raised by half.

use chrono::{Datelike, Days, NaiveDate};
use core_kernel::{Amount, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days after an enforceable decision before the surcharge applies
pub const SURCHARGE_DELAY_DAYS: u64 = 60;

/// Multiplier applied to the rate once the surcharge applies
pub const SURCHARGE_FACTOR: Decimal = dec!(1.5);

/// Day count basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayCountBasis {
    /// Civil year
    #[default]
    #[serde(rename = "365")]
    Actual365,
    /// Banking convention
    #[serde(rename = "360")]
    Actual360,
}

impl DayCountBasis {
    pub fn days(&self) -> Decimal {
        match self {
            DayCountBasis::Actual365 => dec!(365),
            DayCountBasis::Actual360 => dec!(360),
        }
    }
}

/// Legal interest rate per calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalRateTable {
    rates: BTreeMap<i32, Rate>,
    /// Used when no year is known at all
    fallback: Rate,
}

impl Default for LegalRateTable {
    fn default() -> Self {
        Self::new(Rate::from_percentage(dec!(5.5)))
    }
}

impl LegalRateTable {
    pub fn new(fallback: Rate) -> Self {
        Self {
            rates: BTreeMap::new(),
            fallback,
        }
    }

    pub fn with_rate(mut self, year: i32, rate: Rate) -> Self {
        self.rates.insert(year, rate);
        self
    }

    pub fn set(&mut self, year: i32, rate: Rate) {
        self.rates.insert(year, rate);
    }

    /// Rate of `year`, else the most recent known rate, else the fallback
    pub fn rate_for(&self, year: i32) -> Rate {
        self.rates
            .get(&year)
            .or_else(|| self.rates.values().next_back())
            .copied()
            .unwrap_or(self.fallback)
    }
}

/// Interest for one slice of a computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestPeriod {
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
    pub rate: Rate,
    pub interest: Amount,
    /// Set on slices after the surcharge date
    pub surcharged: bool,
    pub surcharged_rate: Option<Rate>,
    pub surcharged_interest: Option<Amount>,
}

/// Multi-year interest with per-year detail
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterestComputation {
    pub total: Amount,
    pub detail: Vec<InterestPeriod>,
}

/// Interest split between the normal and surcharged parts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurchargedInterest {
    pub normal: Amount,
    pub surcharged: Amount,
    pub total: Amount,
    pub detail: Vec<InterestPeriod>,
}

/// Interest calculator bound to a day count basis and a legal rate table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterestCalculator {
    pub basis: DayCountBasis,
    pub rates: LegalRateTable,
}

impl InterestCalculator {
    pub fn new(basis: DayCountBasis) -> Self {
        Self {
            basis,
            rates: LegalRateTable::default(),
        }
    }

    pub fn with_rates(mut self, rates: LegalRateTable) -> Self {
        self.rates = rates;
        self
    }

    /// Days between two dates, start counted, end excluded
    pub fn count_days(start: NaiveDate, end: NaiveDate) -> i64 {
        if end <= start {
            0
        } else {
            (end - start).num_days()
        }
    }

    fn raw_interest(&self, principal: Amount, rate: Rate, days: i64) -> Decimal {
        principal.value() * rate.as_decimal() * Decimal::from(days) / self.basis.days()
    }

    /// Interest at a fixed annual rate over a period
    pub fn interest_for_period(&self, principal: Amount, rate: Rate, start: NaiveDate, end: NaiveDate) -> Amount {
        Amount::new_half_up(self.raw_interest(principal, rate, Self::count_days(start, end)))
    }

    /// Interest split by calendar year at each year's legal rate
    pub fn interest_multi_year(
        &self,
        principal: Amount,
        start: NaiveDate,
        end: NaiveDate,
    ) -> InterestComputation {
        let mut computation = InterestComputation::default();
        if end <= start {
            return computation;
        }

        for year in start.year()..=end.year() {
            let (Some(year_start), Some(next_year)) =
                (NaiveDate::from_ymd_opt(year, 1, 1), NaiveDate::from_ymd_opt(year + 1, 1, 1))
            else {
                continue;
            };
            let slice_start = start.max(year_start);
            let slice_end = end.min(next_year);
            if slice_end <= slice_start {
                continue;
            }

            let rate = self.rates.rate_for(year);
            let days = Self::count_days(slice_start, slice_end);
            let interest = Amount::new_half_up(self.raw_interest(principal, rate, days));

            computation.total += interest;
            computation.detail.push(InterestPeriod {
                year,
                start: slice_start,
                end: slice_end,
                days,
                rate,
                interest,
                surcharged: false,
                surcharged_rate: None,
                surcharged_interest: None,
            });
        }

        computation
    }

    /// Interest raised by half from sixty days after an enforceable decision
    pub fn interest_with_surcharge(
        &self,
        principal: Amount,
        start: NaiveDate,
        end: NaiveDate,
        enforceable_on: Option<NaiveDate>,
    ) -> SurchargedInterest {
        let surcharge_from = enforceable_on.and_then(|d| d.checked_add_days(Days::new(SURCHARGE_DELAY_DAYS)));

        let surcharge_from = match surcharge_from {
            Some(from) if end > from => from,
            _ => {
                let normal = self.interest_multi_year(principal, start, end);
                return SurchargedInterest {
                    normal: normal.total,
                    surcharged: Amount::ZERO,
                    total: normal.total,
                    detail: normal.detail,
                };
            }
        };

        let mut result = SurchargedInterest::default();
        if start < surcharge_from {
            let normal = self.interest_multi_year(principal, start, surcharge_from);
            result.normal = normal.total;
            result.detail.extend(normal.detail);
        }

        let raised = self.interest_multi_year(principal, start.max(surcharge_from), end);
        result.surcharged = Amount::new_half_up(raised.total.value() * SURCHARGE_FACTOR);
        result.detail.extend(raised.detail.into_iter().map(|mut period| {
            period.surcharged = true;
            period.surcharged_rate = Some(period.rate.scaled(SURCHARGE_FACTOR));
            period.surcharged_interest = Some(Amount::new_half_up(period.interest.value() * SURCHARGE_FACTOR));
            period
        }));
        result.total = result.normal + result.surcharged;
        result
    }

    /// Interest falling due over the coming `days`, one month by default
    pub fn interest_to_accrue(&self, principal: Amount, rate: Rate, days: Option<i64>) -> Amount {
        Amount::new_half_up(self.raw_interest(principal, rate, days.unwrap_or(30)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_count() {
        assert_eq!(InterestCalculator::count_days(date(2024, 1, 1), date(2024, 1, 31)), 30);
        assert_eq!(InterestCalculator::count_days(date(2024, 1, 31), date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_simple_period() {
        let calc = InterestCalculator::default();
        // 1 000 000 x 5.5% x 73 / 365 = 11 000
        let interest = calc.interest_for_period(
            Amount::from_units(1_000_000),
            Rate::from_percentage(dec!(5.5)),
            date(2023, 1, 1),
            date(2023, 3, 15),
        );
        assert_eq!(interest, Amount::from_units(11_000));
    }

    #[test]
    fn test_360_basis() {
        let calc = InterestCalculator::new(DayCountBasis::Actual360);
        let interest = calc.interest_to_accrue(Amount::from_units(1_200_000), Rate::from_percentage(dec!(6)), None);
        assert_eq!(interest, Amount::from_units(6_000));
    }

    #[test]
    fn test_rate_table_lookup() {
        let table = LegalRateTable::default()
            .with_rate(2022, Rate::from_percentage(dec!(4)))
            .with_rate(2023, Rate::from_percentage(dec!(5)));

        assert_eq!(table.rate_for(2022), Rate::from_percentage(dec!(4)));
        assert_eq!(table.rate_for(2030), Rate::from_percentage(dec!(5)));
        assert_eq!(LegalRateTable::default().rate_for(2024), Rate::from_percentage(dec!(5.5)));
    }

    #[test]
    fn test_multi_year_split() {
        let calc = InterestCalculator::default().with_rates(
            LegalRateTable::default()
                .with_rate(2023, Rate::from_percentage(dec!(3.65)))
                .with_rate(2024, Rate::from_percentage(dec!(7.3))),
        );

        let result = calc.interest_multi_year(Amount::from_units(1_000_000), date(2023, 12, 2), date(2024, 1, 11));

        assert_eq!(result.detail.len(), 2);
        assert_eq!(result.detail[0].days, 30);
        assert_eq!(result.detail[0].interest, Amount::from_units(3_000));
        assert_eq!(result.detail[1].days, 10);
        assert_eq!(result.detail[1].interest, Amount::from_units(2_000));
        assert_eq!(result.total, Amount::from_units(5_000));
    }

    #[test]
    fn test_surcharge_after_sixty_days() {
        let calc = InterestCalculator::default().with_rates(LegalRateTable::new(Rate::from_percentage(dec!(7.3))));

        let result = calc.interest_with_surcharge(
            Amount::from_units(1_000_000),
            date(2024, 1, 1),
            date(2024, 4, 10),
            Some(date(2024, 1, 1)),
        );

        // 60 days at 7.3% then 40 days at 7.3% raised by half
        assert_eq!(result.normal, Amount::from_units(12_000));
        assert_eq!(result.surcharged, Amount::from_units(12_000));
        assert_eq!(result.total, Amount::from_units(24_000));
        assert!(result.detail.last().unwrap().surcharged);
    }

    #[test]
    fn test_no_surcharge_before_delay() {
        let calc = InterestCalculator::default().with_rates(LegalRateTable::new(Rate::from_percentage(dec!(7.3))));

        let result = calc.interest_with_surcharge(
            Amount::from_units(1_000_000),
            date(2024, 1, 1),
            date(2024, 2, 1),
            Some(date(2024, 1, 1)),
        );

        assert_eq!(result.surcharged, Amount::ZERO);
        assert_eq!(result.total, result.normal);
    }
}
