//! Error handling module
//!
//! Engine-wide error type and its classification.

use crate::config::ConfigError;
use crate::domain::{AccountId, ValidationError};
use crate::store::StoreError;

/// Engine-wide Result type
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Engine error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// Business rule violation; rejects the whole request or batch
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A transfer named an account that does not exist
    #[error("Referential integrity violation: account (id={account_id}) does not exist")]
    ReferentialIntegrity { account_id: AccountId },

    /// Lookup of a missing account or transfer
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// Deadline exceeded or request cancelled before commit; nothing was
    /// written and the request may be retried as is
    #[error("Operation aborted: {reason}")]
    Aborted { reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LedgerError {
    pub fn account_not_found(id: &AccountId) -> Self {
        Self::NotFound {
            entity: "Account",
            id: id.to_string(),
        }
    }

    pub fn transfer_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Transfer",
            id: id.to_string(),
        }
    }

    /// Check if this is a client error (the caller's input is at fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::ReferentialIntegrity { .. } | Self::NotFound { .. }
        )
    }

    /// Check if retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_terminal() {
        let err: LedgerError = ValidationError::non_positive("0").into();
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Amount (0) must be positive");
    }

    #[test]
    fn test_abort_is_retryable() {
        let err = LedgerError::Aborted {
            reason: "deadline exceeded".to_string(),
        };
        assert!(err.is_retryable());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_referential_integrity_cites_id() {
        let id = AccountId::from_sequence(0x3e7);
        let err = LedgerError::ReferentialIntegrity {
            account_id: id.clone(),
        };
        assert!(err.to_string().contains(id.as_str()));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_storage_error_is_neither() {
        let err: LedgerError = StoreError::DuplicateAccount(AccountId::from_sequence(1)).into();
        assert!(!err.is_client_error());
        assert!(!err.is_retryable());
    }
}
