//! Ledger facade
//!
//! The engine API: one handle bundling the store, the write handlers and the
//! query service. Cloning is cheap and clones share state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::aggregate::{Account, Transfer};
use crate::config::Config;
use crate::domain::{AccountId, OperationContext, TransferId};
use crate::error::{LedgerError, LedgerResult};
use crate::handlers::{CreateAccountCommand, CreateAccountHandler, TransferHandler, TransferRequest};
use crate::journal::Entry;
use crate::query::QueryService;
use crate::store::{LedgerStore, StoreError};

#[derive(Debug, Clone)]
pub struct Ledger {
    accounts: CreateAccountHandler,
    transfers: TransferHandler,
    query: QueryService,
}

impl Ledger {
    pub fn new(config: &Config) -> Self {
        let store = LedgerStore::new();
        Self {
            accounts: CreateAccountHandler::new(store.clone()),
            transfers: TransferHandler::new(store.clone())
                .with_default_timeout(config.transfer_timeout),
            query: QueryService::new(store),
        }
    }

    /// Build an engine configured from the environment (and `.env`)
    pub fn from_env() -> LedgerResult<Self> {
        dotenvy::dotenv().ok();
        let config = Config::from_env()?;
        Ok(Self::new(&config))
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Open an account that may hold any sign of balance
    pub async fn create_account(&self, name: &str, currency: &str) -> LedgerResult<Account> {
        self.accounts
            .execute(CreateAccountCommand::new(name, currency))
            .await
    }

    pub async fn create_account_with(&self, command: CreateAccountCommand) -> LedgerResult<Account> {
        self.accounts.execute(command).await
    }

    pub async fn get_account(&self, id: &AccountId) -> LedgerResult<Account> {
        self.query.get_account(id).await
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    pub async fn create_transfer(&self, request: TransferRequest) -> LedgerResult<Transfer> {
        self.create_transfer_with_context(request, OperationContext::new())
            .await
    }

    pub async fn create_transfer_with_context(
        &self,
        request: TransferRequest,
        context: OperationContext,
    ) -> LedgerResult<Transfer> {
        let mut committed = self.transfers.execute(None, vec![request], context).await?;
        committed
            .pop()
            .ok_or(LedgerError::Storage(StoreError::MissingCommit))
    }

    /// Atomic batch: every request commits or none does
    pub async fn create_transfers(
        &self,
        event_at: Option<DateTime<Utc>>,
        requests: Vec<TransferRequest>,
    ) -> LedgerResult<Vec<Transfer>> {
        self.create_transfers_with_context(event_at, requests, OperationContext::new())
            .await
    }

    pub async fn create_transfers_with_context(
        &self,
        event_at: Option<DateTime<Utc>>,
        requests: Vec<TransferRequest>,
        context: OperationContext,
    ) -> LedgerResult<Vec<Transfer>> {
        self.transfers.execute(event_at, requests, context).await
    }

    pub async fn get_transfer(&self, id: &TransferId) -> LedgerResult<Transfer> {
        self.query.get_transfer(id).await
    }

    pub async fn list_transfers(&self, account_id: &AccountId) -> LedgerResult<Vec<Transfer>> {
        self.query.list_transfers(account_id).await
    }

    // =========================================================================
    // Entries
    // =========================================================================

    pub async fn list_entries(&self, account_id: &AccountId) -> LedgerResult<Vec<Entry>> {
        self.query.list_entries(account_id).await
    }

    pub async fn balance_at(
        &self,
        account_id: &AccountId,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<Decimal> {
        self.query.balance_at(account_id, timestamp).await
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
