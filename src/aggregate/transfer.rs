//! Transfer record
//!
//! Immutable once committed; written together with its two journal entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, TransferId};

/// A committed movement of `amount` from one account to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Decimal,
    /// Commit time
    pub created_at: DateTime<Utc>,
    /// Business time; equals `created_at` unless the caller backdated it
    pub event_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Transfer {
    /// True if the transfer debits or credits `account_id`.
    pub fn touches(&self, account_id: &AccountId) -> bool {
        &self.from_account_id == account_id || &self.to_account_id == account_id
    }
}
