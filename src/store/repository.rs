//! Ledger Store Repository
//!
//! Tables of the engine. Cloning a [`LedgerStore`] is cheap and every clone
//! sees the same data, the way a connection pool handle would.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::aggregate::{Account, Transfer};
use crate::domain::{AccountId, TransferId};
use crate::id_generator::IdGenerators;
use crate::journal::{Entry, EntryLog};

use super::unit_of_work::{PendingTransfer, UnitOfWork};
use super::StoreError;

/// An account row: the account record and its journal.
#[derive(Debug)]
pub struct AccountSlot {
    pub account: Account,
    pub entries: EntryLog,
}

/// Lockable handle on one account row.
pub type AccountRow = Arc<Mutex<AccountSlot>>;

#[derive(Debug, Default)]
struct Tables {
    accounts: RwLock<HashMap<AccountId, AccountRow>>,
    /// Short synchronous sections only; never held across an await
    transfers: parking_lot::RwLock<HashMap<TransferId, Transfer>>,
    ids: IdGenerators,
}

/// Shared handle on the ledger tables.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    tables: Arc<Tables>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &IdGenerators {
        &self.tables.ids
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Insert a freshly opened account.
    pub async fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self.tables.accounts.write().await;
        if accounts.contains_key(account.id()) {
            return Err(StoreError::DuplicateAccount(account.id().clone()));
        }

        let slot = AccountSlot {
            account,
            entries: EntryLog::new(),
        };
        accounts.insert(slot.account.id().clone(), Arc::new(Mutex::new(slot)));
        Ok(())
    }

    pub async fn account_row(&self, id: &AccountId) -> Option<AccountRow> {
        self.tables.accounts.read().await.get(id).cloned()
    }

    /// Rows for every id that exists, keyed (and therefore ordered) by id.
    pub async fn account_rows<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a AccountId>,
    ) -> BTreeMap<AccountId, AccountRow> {
        let accounts = self.tables.accounts.read().await;
        ids.into_iter()
            .filter_map(|id| accounts.get(id).map(|row| (id.clone(), Arc::clone(row))))
            .collect()
    }

    /// Committed snapshot of one account.
    pub async fn account(&self, id: &AccountId) -> Option<Account> {
        let row = self.account_row(id).await?;
        let slot = row.lock().await;
        Some(slot.account.clone())
    }

    /// Committed journal of one account, id ascending.
    pub async fn entries(&self, id: &AccountId) -> Option<Vec<Entry>> {
        let row = self.account_row(id).await?;
        let slot = row.lock().await;
        Some(slot.entries.entries().to_vec())
    }

    /// Balance of one account as of `timestamp`.
    pub async fn balance_at(
        &self,
        id: &AccountId,
        timestamp: DateTime<Utc>,
    ) -> Option<rust_decimal::Decimal> {
        let row = self.account_row(id).await?;
        let slot = row.lock().await;
        Some(slot.entries.balance_at(timestamp))
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    pub fn transfer(&self, id: &TransferId) -> Option<Transfer> {
        self.tables.transfers.read().get(id).cloned()
    }

    /// Transfers touching `account_id`, id ascending.
    pub fn transfers_for(&self, account_id: &AccountId) -> Vec<Transfer> {
        let mut found: Vec<Transfer> = self
            .tables
            .transfers
            .read()
            .values()
            .filter(|transfer| transfer.touches(account_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Write a validated batch: apply every leg, append the entries and
    /// insert the transfer rows.
    ///
    /// All checks run before the first write and nothing here awaits, so the
    /// batch is applied completely or not at all. The transfer table is only
    /// locked for the final inserts; readers of the touched accounts block on
    /// the row locks held by `uow` until the caller drops it.
    pub fn commit(
        &self,
        uow: &mut UnitOfWork,
        batch: Vec<PendingTransfer>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transfer>, StoreError> {
        {
            let transfers = self.tables.transfers.read();
            for pending in &batch {
                if transfers.contains_key(&pending.id) {
                    return Err(StoreError::DuplicateTransfer(pending.id.clone()));
                }
            }
        }
        for pending in &batch {
            for leg in [&pending.debit, &pending.credit] {
                if !uow.holds(&leg.account_id) {
                    return Err(StoreError::RowNotLocked(leg.account_id.clone()));
                }
            }
        }

        let mut committed = Vec::with_capacity(batch.len());
        for pending in batch {
            let event_at = pending.event_at.unwrap_or(now);

            for leg in [&pending.debit, &pending.credit] {
                let entry_id = self.tables.ids.entry_id();
                let slot = uow.slot_mut(&leg.account_id)?;
                let version = slot.account.apply_leg(&leg.leg, now);
                slot.entries.append(Entry {
                    id: entry_id,
                    account_id: leg.account_id.clone(),
                    transfer_id: pending.id.clone(),
                    amount: leg.leg.amount,
                    account_previous_balance: leg.leg.previous_balance,
                    account_current_balance: leg.leg.current_balance,
                    account_version: version,
                    created_at: now,
                    event_at,
                    metadata: pending.metadata.clone(),
                });
            }

            committed.push(Transfer {
                id: pending.id,
                from_account_id: pending.debit.account_id,
                to_account_id: pending.credit.account_id,
                amount: pending.amount,
                created_at: now,
                event_at,
                metadata: pending.metadata,
            });
        }

        let mut transfers = self.tables.transfers.write();
        for transfer in &committed {
            transfers.insert(transfer.id.clone(), transfer.clone());
        }

        Ok(committed)
    }
}
