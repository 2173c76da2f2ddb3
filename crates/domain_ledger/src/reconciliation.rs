//! Lettrage of third-party accounts
//!
//! Matching groups debit and credit lines of one account, typically an
//! invoice and the payments settling it. Each group gets a code unique to
//! the account: three letters and a three-digit counter, `AAA001` first,
//! `AAA999` followed by `AAB001`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AccountId, Amount, LineId, ReconciliationId};
use crate::account::Account;
use crate::entry::LedgerLine;
use crate::error::LedgerError;

const MAX_COUNTER: u16 = 999;

/// A lettrage code such as `AAB017`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReconciliationCode {
    letters: [u8; 3],
    counter: u16,
}

impl ReconciliationCode {
    pub fn first() -> Self {
        Self { letters: *b"AAA", counter: 1 }
    }

    /// The code following this one, `None` after `ZZZ999`
    pub fn next(&self) -> Option<Self> {
        if self.counter < MAX_COUNTER {
            return Some(Self { letters: self.letters, counter: self.counter + 1 });
        }

        let mut letters = self.letters;
        for slot in letters.iter_mut().rev() {
            if *slot < b'Z' {
                *slot += 1;
                return Some(Self { letters, counter: 1 });
            }
            *slot = b'A';
        }
        None
    }
}

impl fmt::Display for ReconciliationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = self.letters.iter().map(|b| *b as char).collect();
        write!(f, "{}{:03}", letters, self.counter)
    }
}

impl FromStr for ReconciliationCode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidReconciliationCode(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 6
            || !bytes[..3].iter().all(u8::is_ascii_uppercase)
            || !bytes[3..].iter().all(u8::is_ascii_digit)
        {
            return Err(invalid());
        }
        let counter: u16 = s[3..].parse().map_err(|_| invalid())?;
        if counter == 0 || counter > MAX_COUNTER {
            return Err(invalid());
        }
        Ok(Self { letters: [bytes[0], bytes[1], bytes[2]], counter })
    }
}

impl Serialize for ReconciliationCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReconciliationCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A group of matched lines on one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub id: ReconciliationId,
    pub code: ReconciliationCode,
    pub account_id: AccountId,
    pub account_number: String,
    pub line_ids: Vec<LineId>,
    pub total_debit: Amount,
    pub total_credit: Amount,
    /// Matched amount: the common total, or the smaller side when partial
    pub amount: Amount,
    pub partial: bool,
    pub actor: String,
    pub matched_at: DateTime<Utc>,
    pub comment: Option<String>,
}

impl Reconciliation {
    /// Builds a reconciliation over `lines`
    ///
    /// # Errors
    ///
    /// - `EmptyReconciliation` when no line is given
    /// - `NotThirdPartyAccount` outside class 4
    /// - `ReconciliationMismatch` when a line sits on another account
    pub fn build(
        account: &Account,
        lines: &[&LedgerLine],
        code: ReconciliationCode,
        actor: impl Into<String>,
        comment: Option<String>,
    ) -> Result<Self, LedgerError> {
        if lines.is_empty() {
            return Err(LedgerError::EmptyReconciliation);
        }
        if !account.is_third_party() {
            return Err(LedgerError::NotThirdPartyAccount(account.number.clone()));
        }
        if let Some(stray) = lines.iter().find(|l| l.account_id != account.id) {
            return Err(LedgerError::ReconciliationMismatch {
                expected: account.number.clone(),
                found: stray.account_number.clone(),
            });
        }

        let mut seen = HashSet::new();
        let members: Vec<&LedgerLine> = lines.iter().copied().filter(|l| seen.insert(l.id)).collect();

        let total_debit: Amount = members.iter().map(|l| l.debit).sum();
        let total_credit: Amount = members.iter().map(|l| l.credit).sum();
        let partial = total_debit != total_credit;
        let amount = if partial { total_debit.min(total_credit) } else { total_debit };

        Ok(Self {
            id: ReconciliationId::new(),
            code,
            account_id: account.id,
            account_number: account.number.clone(),
            line_ids: members.iter().map(|l| l.id).collect(),
            total_debit,
            total_credit,
            amount,
            partial,
            actor: actor.into(),
            matched_at: Utc::now(),
            comment,
        })
    }
}

/// Keeps reconciliations, the line index and per-account code counters
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    reconciliations: BTreeMap<ReconciliationId, Reconciliation>,
    by_line: HashMap<LineId, ReconciliationId>,
    last_code: HashMap<AccountId, ReconciliationCode>,
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code the next reconciliation on `account` will receive
    pub fn next_code(&self, account: &Account) -> Result<ReconciliationCode, LedgerError> {
        match self.last_code.get(&account.id) {
            None => Ok(ReconciliationCode::first()),
            Some(last) => last
                .next()
                .ok_or_else(|| LedgerError::CodeSpaceExhausted(account.number.clone())),
        }
    }

    /// Matches lines of `account`
    ///
    /// The caller guarantees the lines belong to validated entries. Nothing
    /// is recorded unless every check passes.
    pub fn match_lines(
        &mut self,
        account: &Account,
        lines: &[&LedgerLine],
        actor: &str,
        comment: Option<String>,
    ) -> Result<Reconciliation, LedgerError> {
        for line in lines {
            if let Some(existing) = self.for_line(&line.id) {
                return Err(LedgerError::LineAlreadyReconciled {
                    line: line.id.to_string(),
                    code: existing.code.to_string(),
                });
            }
        }
        let code = self.next_code(account)?;
        let reconciliation = Reconciliation::build(account, lines, code, actor, comment)?;

        for line_id in &reconciliation.line_ids {
            self.by_line.insert(*line_id, reconciliation.id);
        }
        self.last_code.insert(account.id, code);
        self.reconciliations.insert(reconciliation.id, reconciliation.clone());

        tracing::info!(
            account = %account.number,
            code = %code,
            partial = reconciliation.partial,
            "Lines matched"
        );
        Ok(reconciliation)
    }

    /// Removes a reconciliation and frees its lines; codes are not reused
    pub fn unmatch(&mut self, account_id: &AccountId, code: &ReconciliationCode) -> Result<Reconciliation, LedgerError> {
        let id = self
            .reconciliations
            .values()
            .find(|r| &r.account_id == account_id && &r.code == code)
            .map(|r| r.id)
            .ok_or_else(|| LedgerError::ReconciliationNotFound(code.to_string()))?;
        let removed = self
            .reconciliations
            .remove(&id)
            .ok_or_else(|| LedgerError::ReconciliationNotFound(code.to_string()))?;
        for line_id in &removed.line_ids {
            self.by_line.remove(line_id);
        }
        tracing::info!(account = %removed.account_number, code = %code, "Lines unmatched");
        Ok(removed)
    }

    pub fn for_line(&self, line_id: &LineId) -> Option<&Reconciliation> {
        self.by_line.get(line_id).and_then(|id| self.reconciliations.get(id))
    }

    pub fn for_account<'a>(&'a self, account_id: &'a AccountId) -> impl Iterator<Item = &'a Reconciliation> {
        self.reconciliations.values().filter(move |r| &r.account_id == account_id)
    }
}
