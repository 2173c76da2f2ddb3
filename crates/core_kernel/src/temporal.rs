//! Date handling for accounting periods and statements
//!
//! Bookkeeping works on calendar dates. Ranges are inclusive on both ends,
//! which matches how fiscal periods and statements are expressed.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// The office timezone
///
/// Wraps chrono_tz::Tz with string serialization so it can live in
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name
    pub fn parse(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(name.to_string()))
    }

    /// Calendar date of a UTC instant in this timezone
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }

    /// Today's date at the office
    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Africa::PortoNovo)
    }
}

/// Errors related to dates and ranges
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid range: start {start} must not be after end {end}")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Date out of supported range")]
    OutOfRange,
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single day
    pub fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Result<Self, TemporalError> {
        let start = date.with_day(1).ok_or(TemporalError::OutOfRange)?;
        let next = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        }
        .ok_or(TemporalError::OutOfRange)?;
        let end = next.pred_opt().ok_or(TemporalError::OutOfRange)?;
        Ok(Self { start, end })
    }

    /// The calendar year
    pub fn year(year: i32) -> Result<Self, TemporalError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(TemporalError::OutOfRange)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(TemporalError::OutOfRange)?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(DateRange::new(d(2024, 2, 1), d(2024, 1, 31)).is_err());
        assert!(DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_month_of_handles_leap_february() {
        let feb = DateRange::month_of(d(2024, 2, 14)).unwrap();
        assert_eq!(feb.end, d(2024, 2, 29));
        assert_eq!(feb.days(), 29);

        let dec = DateRange::month_of(d(2023, 12, 5)).unwrap();
        assert_eq!(dec.end, d(2023, 12, 31));
    }

    #[test]
    fn test_default_timezone_is_porto_novo() {
        assert_eq!(Timezone::default().name(), "Africa/Porto-Novo");
    }
}
