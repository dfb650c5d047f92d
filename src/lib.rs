//! ledger_engine Library
//!
//! Double-entry ledger engine: accounts, atomic single and batched transfers,
//! an append-only entry journal, and point-in-time balances.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod handlers;
pub mod id_generator;
pub mod journal;
pub mod query;
pub mod store;

mod error;
mod ledger;

pub use aggregate::{Account, BalancePolicy, Transfer};
pub use config::{Config, ConfigError, LogFormat};
pub use domain::{AccountId, Amount, EntryId, OperationContext, TransferId, ValidationError};
pub use error::{LedgerError, LedgerResult};
pub use handlers::{CreateAccountCommand, TransferRequest};
pub use journal::Entry;
pub use ledger::Ledger;
