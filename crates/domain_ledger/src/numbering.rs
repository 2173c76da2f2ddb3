//! Sequential entry numbers
//!
//! Numbers are `journal code + YYYY + MM + 4-digit counter`, the counter
//! running per prefix: `VE2024030001`, `VE2024030002`, then
//! `VE2024040001` in April.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Prefix shared by all entries of a journal in a month
pub fn entry_prefix(journal_code: &str, date: NaiveDate) -> String {
    format!("{}{}{:02}", journal_code, date.year(), date.month())
}

pub fn format_entry_number(prefix: &str, counter: u32) -> String {
    format!("{}{:04}", prefix, counter)
}

/// Per-prefix counters
///
/// Taking `&mut self` serializes number generation within one ledger.
#[derive(Debug, Clone, Default)]
pub struct EntrySequences {
    last: HashMap<String, u32>,
}

impl EntrySequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next number for `journal_code` in the month of `date`
    pub fn next(&mut self, journal_code: &str, date: NaiveDate) -> String {
        let prefix = entry_prefix(journal_code, date);
        let counter = self.last.entry(prefix.clone()).or_insert(0);
        *counter += 1;
        format_entry_number(&prefix, *counter)
    }

    /// Last counter handed out for a prefix
    pub fn last(&self, prefix: &str) -> u32 {
        self.last.get(prefix).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_restart_each_month() {
        let mut sequences = EntrySequences::new();
        let march = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let april = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();

        assert_eq!(sequences.next("VE", march), "VE2024030001");
        assert_eq!(sequences.next("VE", march), "VE2024030002");
        assert_eq!(sequences.next("VE", april), "VE2024040001");
        assert_eq!(sequences.next("CA", march), "CA2024030001");
        assert_eq!(sequences.last("VE202403"), 2);
    }
}
