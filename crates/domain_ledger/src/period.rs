//! Accounting periods (fiscal years)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DateRange, PeriodId};
use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Open,
    Closed,
}

/// A fiscal period. Entries can only be created and validated while it is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    pub id: PeriodId,
    pub label: String,
    pub range: DateRange,
    pub status: PeriodStatus,
    /// First period of the office, which has no opening balances to carry
    pub is_first: bool,
    pub closed_at: Option<DateTime<Utc>>,
}

impl AccountingPeriod {
    /// Creates an open period
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriodBounds` unless `end` is after `start`.
    pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if end <= start {
            return Err(LedgerError::InvalidPeriodBounds(format!(
                "end {} must be after start {}",
                end, start
            )));
        }
        let range = DateRange::new(start, end)
            .map_err(|e| LedgerError::InvalidPeriodBounds(e.to_string()))?;

        Ok(Self {
            id: PeriodId::new(),
            label: label.into(),
            range,
            status: PeriodStatus::Open,
            is_first: false,
            closed_at: None,
        })
    }

    pub fn first(mut self) -> Self {
        self.is_first = true;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range.contains(date)
    }

    /// Checks that an entry dated `date` may be booked in this period
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` if the period is closed or does not cover `date`.
    pub fn ensure_accepts(&self, date: NaiveDate) -> Result<(), LedgerError> {
        if !self.is_open() {
            return Err(LedgerError::InvalidPeriod {
                date,
                reason: format!("period {} is closed", self.label),
            });
        }
        if !self.contains(date) {
            return Err(LedgerError::InvalidPeriod {
                date,
                reason: format!(
                    "outside period {} ({} to {})",
                    self.label, self.range.start, self.range.end
                ),
            });
        }
        Ok(())
    }

    /// Open periods may not overlap
    pub fn conflicts_with(&self, other: &AccountingPeriod) -> bool {
        self.is_open() && other.is_open() && self.range.overlaps(&other.range)
    }

    pub fn close(&mut self) {
        self.status = PeriodStatus::Closed;
        self.closed_at = Some(Utc::now());
    }
}
