//! Unit of Work
//!
//! Exclusive access to every account row touched by one request or batch.
//! Rows are locked in ascending id order whatever the transfer direction,
//! so two requests over the same accounts can never wait on each other in a
//! cycle. Guards are released when the unit of work is dropped, on every
//! exit path.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::OwnedMutexGuard;

use crate::aggregate::{Account, PlannedLeg};
use crate::domain::{AccountId, TransferId};

use super::repository::{AccountRow, AccountSlot};
use super::StoreError;

/// A leg validated against the working state of its batch.
#[derive(Debug, Clone)]
pub struct PendingLeg {
    pub account_id: AccountId,
    pub leg: PlannedLeg,
}

/// A transfer that passed every check and waits for commit.
#[derive(Debug, Clone)]
pub struct PendingTransfer {
    pub id: TransferId,
    pub amount: Decimal,
    /// `None` means "use the commit time"
    pub event_at: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
    pub debit: PendingLeg,
    pub credit: PendingLeg,
}

pub struct UnitOfWork {
    guards: BTreeMap<AccountId, OwnedMutexGuard<AccountSlot>>,
}

impl UnitOfWork {
    /// Lock `rows` one by one in key order.
    pub async fn lock(rows: BTreeMap<AccountId, AccountRow>) -> Self {
        let mut guards = BTreeMap::new();
        for (id, row) in rows {
            let guard = row.lock_owned().await;
            guards.insert(id, guard);
        }
        Self { guards }
    }

    pub fn holds(&self, id: &AccountId) -> bool {
        self.guards.contains_key(id)
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.guards.get(id).map(|slot| &slot.account)
    }

    /// Locked ids, in the order they were acquired.
    pub fn locked_ids(&self) -> impl Iterator<Item = &AccountId> {
        self.guards.keys()
    }

    pub(crate) fn slot_mut(&mut self, id: &AccountId) -> Result<&mut AccountSlot, StoreError> {
        self.guards
            .get_mut(id)
            .map(|guard| &mut **guard)
            .ok_or_else(|| StoreError::RowNotLocked(id.clone()))
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("locked", &self.guards.keys().collect::<Vec<_>>())
            .finish()
    }
}
