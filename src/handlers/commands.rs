//! Command definitions
//!
//! Commands represent intentions to change the ledger state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::BalancePolicy;
use crate::domain::AccountId;

// =========================================================================
// CreateAccountCommand
// =========================================================================

/// Command to open a new account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountCommand {
    pub name: String,
    /// Currency code, compared verbatim between accounts
    pub currency: String,
    #[serde(default)]
    pub policy: BalancePolicy,
}

impl CreateAccountCommand {
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency: currency.into(),
            policy: BalancePolicy::Unrestricted,
        }
    }

    pub fn with_policy(mut self, policy: BalancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the sign policy from the two allow flags.
    pub fn with_flags(self, allow_negative_balance: bool, allow_positive_balance: bool) -> Self {
        self.with_policy(BalancePolicy::from_flags(
            allow_negative_balance,
            allow_positive_balance,
        ))
    }
}

// =========================================================================
// TransferRequest
// =========================================================================

/// One transfer in a `create_transfers` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    /// Amount to transfer (as string for precise decimal)
    pub amount: String,
    /// Business time of this transfer; overrides the batch event time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_at: Option<DateTime<Utc>>,
    /// Opaque, stored verbatim on the transfer and its entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TransferRequest {
    pub fn new(from_account_id: AccountId, to_account_id: AccountId, amount: impl ToString) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount: amount.to_string(),
            event_at: None,
            metadata: None,
        }
    }

    pub fn with_event_at(mut self, event_at: DateTime<Utc>) -> Self {
        self.event_at = Some(event_at);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
