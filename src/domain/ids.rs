//! Strongly-typed identifiers
//!
//! Every identifier is an opaque string made of a namespace prefix and a
//! fixed-width hexadecimal sequence. Fixed width keeps lexicographic order
//! equal to generation order inside a namespace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Number of hex digits after the prefix.
pub const SEQUENCE_WIDTH: usize = 16;

/// The three disjoint identifier namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Account,
    Transfer,
    Entry,
}

impl Namespace {
    /// Prefix carried by every id of this namespace (separator included).
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Account => "acct_",
            Namespace::Transfer => "xfer_",
            Namespace::Entry => "entr_",
        }
    }

    /// Render a sequence value as an id string of this namespace.
    pub fn format(self, sequence: u64) -> String {
        format!("{}{:0width$x}", self.prefix(), sequence, width = SEQUENCE_WIDTH)
    }

    /// Check that `raw` is a well-formed id of this namespace.
    pub fn validate(self, raw: &str) -> Result<(), ValidationError> {
        let digits = raw
            .strip_prefix(self.prefix())
            .ok_or_else(|| ValidationError::invalid_id(self, raw))?;

        let well_formed = digits.len() == SEQUENCE_WIDTH
            && digits
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));

        if well_formed {
            Ok(())
        } else {
            Err(ValidationError::invalid_id(self, raw))
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Namespace::Account => "account",
            Namespace::Transfer => "transfer",
            Namespace::Entry => "entry",
        };
        f.write_str(name)
    }
}

/// Identifier of an account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

/// Identifier of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(String);

/// Identifier of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

macro_rules! impl_prefixed_id {
    ($t:ty, $ns:expr) => {
        impl $t {
            pub const NAMESPACE: Namespace = $ns;

            /// Build an id from a generated sequence value.
            pub(crate) fn from_sequence(sequence: u64) -> Self {
                Self(Self::NAMESPACE.format(sequence))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::NAMESPACE.validate(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_prefixed_id!(AccountId, Namespace::Account);
impl_prefixed_id!(TransferId, Namespace::Transfer);
impl_prefixed_id!(EntryId, Namespace::Entry);
