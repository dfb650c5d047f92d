//! Command Handlers module
//!
//! Handlers that change ledger state. Each handler holds a store handle and
//! owns one kind of write.

mod account_handler;
mod commands;
mod transfer_handler;


pub use account_handler::CreateAccountHandler;
pub use commands::*;
pub use transfer_handler::TransferHandler;
