//! Common test utilities

#![allow(dead_code)]

use ledger_engine::{Account, AccountId, CreateAccountCommand, Ledger, LedgerResult, Transfer, TransferRequest};

/// Fresh engine with default configuration
pub fn setup_ledger() -> Ledger {
    Ledger::default()
}

pub async fn create_account(ledger: &Ledger, name: &str) -> Account {
    ledger
        .create_account(name, "USD")
        .await
        .expect("Failed to create account")
}

pub async fn create_account_with_flags(
    ledger: &Ledger,
    name: &str,
    allow_negative_balance: bool,
    allow_positive_balance: bool,
) -> Account {
    ledger
        .create_account_with(
            CreateAccountCommand::new(name, "USD")
                .with_flags(allow_negative_balance, allow_positive_balance),
        )
        .await
        .expect("Failed to create account")
}

pub async fn try_transfer(
    ledger: &Ledger,
    from: &AccountId,
    to: &AccountId,
    amount: &str,
) -> LedgerResult<Transfer> {
    ledger
        .create_transfer(TransferRequest::new(from.clone(), to.clone(), amount))
        .await
}

pub async fn transfer(ledger: &Ledger, from: &AccountId, to: &AccountId, amount: &str) -> Transfer {
    try_transfer(ledger, from, to, amount)
        .await
        .expect("Failed to create transfer")
}

pub async fn balance(ledger: &Ledger, id: &AccountId) -> String {
    ledger.get_account(id).await.unwrap().balance().to_string()
}
