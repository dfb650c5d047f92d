//! Store module
//!
//! In-process persistence: account rows behind per-row async mutexes, the
//! transfer table, and the identifier allocators.

mod error;
mod repository;
mod unit_of_work;

pub use error::StoreError;
pub use repository::{AccountRow, AccountSlot, LedgerStore};
pub use unit_of_work::{PendingLeg, PendingTransfer, UnitOfWork};
