//! Account Aggregate
//!
//! Account holds a balance under a sign policy. It is created once and
//! mutated only through [`Account::apply_leg`], which the transfer handler
//! calls while it holds the account's row lock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, ValidationError};

/// Which signs an account balance may take.
///
/// Replaces the pair of `allow_negative_balance` / `allow_positive_balance`
/// flags; [`BalancePolicy::from_flags`] and the two accessors keep the flag
/// view available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancePolicy {
    /// Any sign
    #[default]
    Unrestricted,
    /// Balance must stay >= 0
    NonNegative,
    /// Balance must stay <= 0
    NonPositive,
    /// Balance must stay exactly 0
    Pinned,
}

impl BalancePolicy {
    pub fn from_flags(allow_negative_balance: bool, allow_positive_balance: bool) -> Self {
        match (allow_negative_balance, allow_positive_balance) {
            (true, true) => Self::Unrestricted,
            (false, true) => Self::NonNegative,
            (true, false) => Self::NonPositive,
            (false, false) => Self::Pinned,
        }
    }

    pub fn allows_negative(self) -> bool {
        matches!(self, Self::Unrestricted | Self::NonPositive)
    }

    pub fn allows_positive(self) -> bool {
        matches!(self, Self::Unrestricted | Self::NonNegative)
    }
}

/// One balance leg computed against an account, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLeg {
    /// Signed amount: negative on the debit side
    pub amount: Decimal,
    pub previous_balance: Decimal,
    pub current_balance: Decimal,
}

/// Account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    name: String,
    currency: String,
    balance: Decimal,
    version: i64,
    policy: BalancePolicy,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance at version 0.
    pub fn open(
        id: AccountId,
        name: impl Into<String>,
        currency: impl Into<String>,
        policy: BalancePolicy,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            currency: currency.into(),
            balance: Decimal::ZERO,
            version: 0,
            policy,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn policy(&self) -> BalancePolicy {
        self.policy
    }

    pub fn allow_negative_balance(&self) -> bool {
        self.policy.allows_negative()
    }

    pub fn allow_positive_balance(&self) -> bool {
        self.policy.allows_positive()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Leg planning (pure, no mutation)
    // =========================================================================

    /// Plan the source leg of a transfer.
    pub fn plan_debit(&self, amount: &Amount) -> Result<PlannedLeg, ValidationError> {
        let current = self
            .balance
            .checked_sub(amount.value())
            .ok_or_else(|| self.overflow(amount))?;

        if !self.policy.allows_negative() && current < Decimal::ZERO {
            return Err(ValidationError::NegativeBalanceNotAllowed {
                id: self.id.clone(),
                name: self.name.clone(),
            });
        }

        Ok(PlannedLeg {
            amount: amount.negated(),
            previous_balance: self.balance,
            current_balance: current,
        })
    }

    /// Plan the destination leg of a transfer.
    pub fn plan_credit(&self, amount: &Amount) -> Result<PlannedLeg, ValidationError> {
        let current = self
            .balance
            .checked_add(amount.value())
            .ok_or_else(|| self.overflow(amount))?;

        if !self.policy.allows_positive() && current > Decimal::ZERO {
            return Err(ValidationError::PositiveBalanceNotAllowed {
                id: self.id.clone(),
                name: self.name.clone(),
            });
        }

        Ok(PlannedLeg {
            amount: amount.value(),
            previous_balance: self.balance,
            current_balance: current,
        })
    }

    /// Apply a planned leg. Returns the version after the change.
    pub fn apply_leg(&mut self, leg: &PlannedLeg, now: DateTime<Utc>) -> i64 {
        debug_assert_eq!(leg.previous_balance, self.balance);
        self.balance = leg.current_balance;
        self.version += 1;
        // updated_at never goes behind created_at, even on a clock step back
        self.updated_at = now.max(self.created_at);
        self.version
    }

    fn overflow(&self, amount: &Amount) -> ValidationError {
        ValidationError::BalanceOverflow {
            id: self.id.clone(),
            amount: amount.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(policy: BalancePolicy) -> Account {
        Account::open(AccountId::from_sequence(1), "test", "USD", policy, Utc::now())
    }

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_open_account() {
        let acc = account(BalancePolicy::Unrestricted);
        assert_eq!(acc.balance(), Decimal::ZERO);
        assert_eq!(acc.version(), 0);
        assert_eq!(acc.created_at(), acc.updated_at());
        assert!(acc.allow_negative_balance());
        assert!(acc.allow_positive_balance());
    }

    #[test]
    fn test_policy_flags_round_trip() {
        for (neg, pos) in [(true, true), (false, true), (true, false), (false, false)] {
            let policy = BalancePolicy::from_flags(neg, pos);
            assert_eq!(policy.allows_negative(), neg);
            assert_eq!(policy.allows_positive(), pos);
        }
    }

    #[test]
    fn test_unrestricted_debit_goes_negative() {
        let acc = account(BalancePolicy::Unrestricted);
        let leg = acc.plan_debit(&amount("12.34")).unwrap();
        assert_eq!(leg.amount.to_string(), "-12.34");
        assert_eq!(leg.previous_balance, Decimal::ZERO);
        assert_eq!(leg.current_balance.to_string(), "-12.34");
    }

    #[test]
    fn test_non_negative_rejects_overdraft() {
        let acc = account(BalancePolicy::NonNegative);
        let err = acc.plan_debit(&amount("12.34")).unwrap_err();
        assert!(err.to_string().contains("does not allow negative balance"));

        // credits are fine
        assert!(acc.plan_credit(&amount("12.34")).is_ok());
    }

    #[test]
    fn test_non_positive_rejects_credit() {
        let acc = account(BalancePolicy::NonPositive);
        let err = acc.plan_credit(&amount("1")).unwrap_err();
        assert!(err.to_string().contains("does not allow positive balance"));
        assert!(acc.plan_debit(&amount("1")).is_ok());
    }

    #[test]
    fn test_pinned_rejects_both_directions() {
        let acc = account(BalancePolicy::Pinned);
        assert!(acc.plan_debit(&amount("0.01")).is_err());
        assert!(acc.plan_credit(&amount("0.01")).is_err());
    }

    #[test]
    fn test_apply_leg_bumps_version() {
        let mut acc = account(BalancePolicy::Unrestricted);
        let leg = acc.plan_credit(&amount("5")).unwrap();
        let later = acc.created_at() + chrono::Duration::milliseconds(5);

        let version = acc.apply_leg(&leg, later);
        assert_eq!(version, 1);
        assert_eq!(acc.balance(), Decimal::new(5, 0));
        assert_eq!(acc.updated_at(), later);

        let leg = acc.plan_debit(&amount("2")).unwrap();
        assert_eq!(leg.previous_balance, Decimal::new(5, 0));
        assert_eq!(acc.apply_leg(&leg, later), 2);
        assert_eq!(acc.balance(), Decimal::new(3, 0));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut acc = account(BalancePolicy::Unrestricted);
        let max = Amount::new(Decimal::MAX).unwrap();
        let leg = acc.plan_credit(&max).unwrap();
        acc.apply_leg(&leg, Utc::now());

        let err = acc.plan_credit(&amount("1")).unwrap_err();
        assert!(matches!(err, ValidationError::BalanceOverflow { .. }));
    }
}
