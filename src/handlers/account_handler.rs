//! Account Handler
//!
//! Opens accounts. There is no update or delete: balances change only
//! through the transfer handler.

use chrono::Utc;

use crate::aggregate::Account;
use crate::error::LedgerResult;
use crate::store::LedgerStore;

use super::CreateAccountCommand;

/// Handler for account creation
#[derive(Debug, Clone)]
pub struct CreateAccountHandler {
    store: LedgerStore,
}

impl CreateAccountHandler {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Open an account with balance 0 and version 0
    pub async fn execute(&self, command: CreateAccountCommand) -> LedgerResult<Account> {
        let account = Account::open(
            self.store.ids().account_id(),
            command.name,
            command.currency,
            command.policy,
            Utc::now(),
        );

        self.store.insert_account(account.clone()).await?;

        tracing::debug!(
            account_id = %account.id(),
            currency = account.currency(),
            policy = ?account.policy(),
            "Account created"
        );

        Ok(account)
    }
}
