//! Aggregate module
//!
//! Account and transfer records, plus the per-account validation rules.

pub mod account;
pub mod transfer;

pub use account::{Account, BalancePolicy, PlannedLeg};
pub use transfer::Transfer;
