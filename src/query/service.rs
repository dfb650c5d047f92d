//! Query Service
//!
//! Every read of account state goes through the account's row lock, so a
//! reader either waits for an in-flight commit or sees none of it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::aggregate::{Account, Transfer};
use crate::domain::{AccountId, TransferId};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::Entry;
use crate::store::LedgerStore;

/// Query Service for reading committed state
#[derive(Debug, Clone)]
pub struct QueryService {
    store: LedgerStore,
}

impl QueryService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub async fn get_account(&self, id: &AccountId) -> LedgerResult<Account> {
        self.store
            .account(id)
            .await
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    pub async fn get_transfer(&self, id: &TransferId) -> LedgerResult<Transfer> {
        self.store
            .transfer(id)
            .ok_or_else(|| LedgerError::transfer_not_found(id))
    }

    /// Entries of one account, id ascending (commit order)
    pub async fn list_entries(&self, account_id: &AccountId) -> LedgerResult<Vec<Entry>> {
        self.store
            .entries(account_id)
            .await
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Balance of an account as it stood at `timestamp` (commit time)
    pub async fn balance_at(
        &self,
        account_id: &AccountId,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<Decimal> {
        self.store
            .balance_at(account_id, timestamp)
            .await
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Transfers debiting or crediting an account, id ascending
    pub async fn list_transfers(&self, account_id: &AccountId) -> LedgerResult<Vec<Transfer>> {
        if self.store.account_row(account_id).await.is_none() {
            return Err(LedgerError::account_not_found(account_id));
        }
        Ok(self.store.transfers_for(account_id))
    }
}
