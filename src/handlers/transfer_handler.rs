//! Transfer Handler
//!
//! Validates and executes single or batched transfers. A batch is locked,
//! validated in full against its own working state, and then committed in
//! one step; the first failing check rejects the whole batch with nothing
//! written.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::aggregate::{Account, Transfer};
use crate::domain::{AccountId, Amount, OperationContext, ValidationError};
use crate::error::{LedgerError, LedgerResult};
use crate::store::{LedgerStore, PendingLeg, PendingTransfer, UnitOfWork};

use super::TransferRequest;

/// Handler for transfers
#[derive(Debug, Clone)]
pub struct TransferHandler {
    store: LedgerStore,
    default_timeout: Option<Duration>,
}

impl TransferHandler {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            default_timeout: None,
        }
    }

    /// Deadline applied to requests whose context does not set one
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Execute a batch of transfers atomically.
    ///
    /// `event_at` is the business time shared by requests that do not carry
    /// their own; when both are absent the commit time is used.
    pub async fn execute(
        &self,
        event_at: Option<DateTime<Utc>>,
        requests: Vec<TransferRequest>,
        context: OperationContext,
    ) -> LedgerResult<Vec<Transfer>> {
        let mut context = context.or_timeout(self.default_timeout);
        let correlation_id = context.ensure_correlation_id();
        let work = self.execute_batch(event_at, requests, correlation_id);

        let Some(limit) = context.timeout else {
            return work.await;
        };
        if limit.is_zero() {
            return Err(Self::aborted(limit, correlation_id));
        }

        // Dropping `work` releases every row lock it holds; it never yields
        // between the first and the last write of a commit.
        match tokio::time::timeout(limit, work).await {
            Ok(result) => result,
            Err(_) => Err(Self::aborted(limit, correlation_id)),
        }
    }

    fn aborted(limit: Duration, correlation_id: Uuid) -> LedgerError {
        tracing::warn!(
            %correlation_id,
            timeout_ms = limit.as_millis() as u64,
            "Transfer request aborted before commit"
        );
        LedgerError::Aborted {
            reason: format!("deadline of {}ms exceeded", limit.as_millis()),
        }
    }

    async fn execute_batch(
        &self,
        event_at: Option<DateTime<Utc>>,
        requests: Vec<TransferRequest>,
        correlation_id: Uuid,
    ) -> LedgerResult<Vec<Transfer>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let touched: BTreeSet<&AccountId> = requests
            .iter()
            .flat_map(|r| [&r.from_account_id, &r.to_account_id])
            .collect();
        let rows = self.store.account_rows(touched).await;
        let mut uow = UnitOfWork::lock(rows).await;

        let pending = match self.plan(&uow, event_at, &requests) {
            Ok(pending) => pending,
            Err((index, err)) => {
                tracing::warn!(
                    %correlation_id,
                    request_index = index,
                    batch_size = requests.len(),
                    error = %err,
                    "Transfer batch rejected"
                );
                return Err(err);
            }
        };

        let committed = self.store.commit(&mut uow, pending, Utc::now())?;
        drop(uow);

        for transfer in &committed {
            tracing::debug!(
                %correlation_id,
                transfer_id = %transfer.id,
                from = %transfer.from_account_id,
                to = %transfer.to_account_id,
                amount = %transfer.amount,
                "Transfer committed"
            );
        }

        Ok(committed)
    }

    /// Validate every request, in order, against the state left by the
    /// requests before it. Pure: the locked rows are only read.
    fn plan(
        &self,
        uow: &UnitOfWork,
        batch_event_at: Option<DateTime<Utc>>,
        requests: &[TransferRequest],
    ) -> Result<Vec<PendingTransfer>, (usize, LedgerError)> {
        let mut working: HashMap<AccountId, Account> = HashMap::new();
        let mut pending = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            let planned = Self::plan_one(uow, &mut working, request).map_err(|e| (index, e))?;
            let (amount, debit, credit) = planned;

            pending.push(PendingTransfer {
                id: self.store.ids().transfer_id(),
                amount: amount.value(),
                event_at: request.event_at.or(batch_event_at),
                metadata: request.metadata.clone(),
                debit,
                credit,
            });
        }

        Ok(pending)
    }

    fn plan_one(
        uow: &UnitOfWork,
        working: &mut HashMap<AccountId, Account>,
        request: &TransferRequest,
    ) -> LedgerResult<(Amount, PendingLeg, PendingLeg)> {
        let from_id = &request.from_account_id;
        let to_id = &request.to_account_id;

        // 1. amount > 0
        let amount: Amount = request.amount.parse()?;

        // 2. distinct accounts
        if from_id == to_id {
            return Err(ValidationError::SameAccount { id: from_id.clone() }.into());
        }

        // 3. both accounts exist
        for id in [from_id, to_id] {
            if !working.contains_key(id) {
                let account = uow
                    .account(id)
                    .ok_or_else(|| LedgerError::ReferentialIntegrity {
                        account_id: id.clone(),
                    })?;
                working.insert(id.clone(), account.clone());
            }
        }
        let from = &working[from_id];
        let to = &working[to_id];

        // 4. same currency
        if from.currency() != to.currency() {
            return Err(ValidationError::CurrencyMismatch {
                from: from.currency().to_string(),
                to: to.currency().to_string(),
            }
            .into());
        }

        // 5. and 6. sign policies
        let debit = from.plan_debit(&amount)?;
        let credit = to.plan_credit(&amount)?;

        // Later requests of the batch see this one applied
        let now = Utc::now();
        if let Some(account) = working.get_mut(from_id) {
            account.apply_leg(&debit, now);
        }
        if let Some(account) = working.get_mut(to_id) {
            account.apply_leg(&credit, now);
        }

        Ok((
            amount,
            PendingLeg {
                account_id: from_id.clone(),
                leg: debit,
            },
            PendingLeg {
                account_id: to_id.clone(),
                leg: credit,
            },
        ))
    }
}
