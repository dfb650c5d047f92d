//! Validation Error Types
//!
//! Business rule violations detected before any balance is touched.

use rust_decimal::Decimal;
use thiserror::Error;

use super::ids::{AccountId, Namespace};

/// Rejections of a transfer request or an identifier.
///
/// These are terminal for the request (and its whole batch): retrying the
/// same input gives the same answer unless balances changed in between.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Zero or negative amount; `amount` keeps the caller's text
    #[error("Amount ({amount}) must be positive")]
    NonPositiveAmount { amount: String },

    /// Amount text that is not a decimal number
    #[error("Invalid amount ({input}): {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Cannot transfer to the same account (id={id})")]
    SameAccount { id: AccountId },

    #[error("Cannot transfer between different currencies ({from} and {to})")]
    CurrencyMismatch { from: String, to: String },

    #[error("Account (id={id}, name={name}) does not allow negative balance")]
    NegativeBalanceNotAllowed { id: AccountId, name: String },

    #[error("Account (id={id}, name={name}) does not allow positive balance")]
    PositiveBalanceNotAllowed { id: AccountId, name: String },

    /// Balance arithmetic left the representable decimal range
    #[error("Account (id={id}) balance overflow when applying {amount}")]
    BalanceOverflow { id: AccountId, amount: Decimal },

    #[error("Invalid {namespace} id ({raw})")]
    InvalidId { namespace: Namespace, raw: String },
}

impl ValidationError {
    pub fn non_positive(amount: impl ToString) -> Self {
        Self::NonPositiveAmount {
            amount: amount.to_string(),
        }
    }

    pub fn invalid_id(namespace: Namespace, raw: &str) -> Self {
        Self::InvalidId {
            namespace,
            raw: raw.to_string(),
        }
    }

    /// True for failures caused by an account's sign policy.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::NegativeBalanceNotAllowed { .. } | Self::PositiveBalanceNotAllowed { .. }
        )
    }
}
