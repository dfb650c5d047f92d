//! Store Errors
//!
//! Failures of the in-process persistence layer. None of them can leave a
//! partially applied commit behind.

use crate::domain::{AccountId, TransferId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate key: account {0} already exists")]
    DuplicateAccount(AccountId),

    #[error("Duplicate key: transfer {0} already exists")]
    DuplicateTransfer(TransferId),

    /// A commit referenced an account row the unit of work does not hold
    #[error("Account row {0} is not locked by this unit of work")]
    RowNotLocked(AccountId),

    #[error("Commit returned no transfer")]
    MissingCommit,
}
