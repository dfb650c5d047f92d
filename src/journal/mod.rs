//! Entry Ledger
//!
//! Append-only journal of per-account balance legs. Each account row owns
//! its own [`EntryLog`], so the journal for an account is read and written
//! under the same row lock as the balance it explains.

mod entry;

pub use entry::{Entry, EntryLog};
