//! Journal entries
//!
//! Append-only per-account legs. Each entry records the balance before and
//! after it, so past balances are read straight off the log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, EntryId, TransferId};

/// One leg of a transfer, bound to one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub account_id: AccountId,
    pub transfer_id: TransferId,
    /// Signed: negative on the source leg, positive on the destination leg
    pub amount: Decimal,
    pub account_previous_balance: Decimal,
    pub account_current_balance: Decimal,
    /// Account version after this entry
    pub account_version: i64,
    pub created_at: DateTime<Utc>,
    pub event_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Journal of a single account, ordered by entry id.
#[derive(Debug, Clone, Default)]
pub struct EntryLog {
    entries: Vec<Entry>,
}

impl EntryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Ids come from a monotonic allocator and appends are
    /// serialised by the account row lock, so order by id is commit order.
    pub fn append(&mut self, entry: Entry) {
        debug_assert!(self.entries.last().map_or(true, |last| last.id < entry.id));
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Balance as of `timestamp`: the current balance recorded by the latest
    /// entry created at or before it, or zero if there is none.
    pub fn balance_at(&self, timestamp: DateTime<Utc>) -> Decimal {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.created_at <= timestamp)
            .map_or(Decimal::ZERO, |entry| entry.account_current_balance)
    }
}
