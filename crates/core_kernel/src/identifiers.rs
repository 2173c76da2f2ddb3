//! Typed identifiers
//!
//! Every persisted record carries a UUIDv7, so identifiers sort in creation
//! order. Each type displays with a short prefix taken from the office's
//! paper forms (`DOS-...` for a case file, `LET-...` for a lettering).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Identifier text that could not be read back
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("expected a {expected} identifier, found prefix {found}")]
    WrongPrefix { expected: &'static str, found: String },

    #[error("malformed identifier: {0}")]
    Malformed(String),
}

macro_rules! ids {
    ($($(#[$doc:meta])* $name:ident => $prefix:literal;)+) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, IdError> {
                parse_prefixed(s, $prefix).map(Self)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    )+};
}

/// Accepts `PREFIX-uuid` or a bare UUID
fn parse_prefixed(s: &str, prefix: &'static str) -> Result<Uuid, IdError> {
    let body = match s.split_once('-') {
        Some((head, rest)) if head.len() == 3 && head.chars().all(|c| c.is_ascii_uppercase()) => {
            if head != prefix {
                return Err(IdError::WrongPrefix { expected: prefix, found: head.to_string() });
            }
            rest
        }
        _ => s,
    };
    Uuid::parse_str(body).map_err(|_| IdError::Malformed(s.to_string()))
}

ids! {
    AccountId => "ACC";
    JournalId => "JRN";
    /// An accounting period, usually a fiscal year
    PeriodId => "PER";
    EntryId => "ENT";
    LineId => "LIN";
    /// A lettering group of matched lines
    ReconciliationId => "LET";
    TemplateId => "TPL";
    /// A recovery case file
    CaseId => "DOS";
    PaymentId => "PAY";
    /// One slice of a payment charged to one bucket
    AllocationId => "IMP";
    /// Creditor or debtor; parties are owned by case management
    PartyId => "PTY";
}
