//! Concurrency tests
//!
//! Run on a multi-threaded runtime so workers really race for row locks.

use std::collections::HashSet;
use std::time::Duration;

use rust_decimal::Decimal;

use ledger_engine::{AccountId, OperationContext, TransferRequest};

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_round_trips_end_at_zero() {
    let ledger = common::setup_ledger();
    let a = common::create_account(&ledger, "account 1").await;
    let b = common::create_account(&ledger, "account 2").await;

    let mut handles = Vec::new();
    for (from, to) in [(a.id().clone(), b.id().clone()), (b.id().clone(), a.id().clone())] {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..500 {
                common::transfer(&ledger, &from, &to, "100").await;
                common::transfer(&ledger, &to, &from, "100").await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for id in [a.id(), b.id()] {
        let account = ledger.get_account(id).await.unwrap();
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.version(), 2000);

        // versions increase by exactly one per entry
        let entries = ledger.list_entries(id).await.unwrap();
        assert_eq!(entries.len(), 2000);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.account_version, i as i64 + 1);
        }
        for pair in entries.windows(2) {
            assert_eq!(pair[0].account_current_balance, pair[1].account_previous_balance);
            assert!(pair[0].id < pair[1].id);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_closed_system_sums_to_zero() {
    let ledger = common::setup_ledger();
    let mut ids: Vec<AccountId> = Vec::new();
    for i in 0..5 {
        ids.push(common::create_account(&ledger, &format!("account {i}")).await.id().clone());
    }

    let mut handles = Vec::new();
    for worker in 0..8usize {
        let ledger = ledger.clone();
        let ids = ids.clone();
        handles.push(tokio::spawn(async move {
            for step in 0..100usize {
                let from = &ids[(worker + step) % ids.len()];
                let to = &ids[(worker + step * 3 + 1) % ids.len()];
                if from == to {
                    continue;
                }
                let amount = format!("{}.{:02}", step + 1, worker);
                common::transfer(&ledger, from, to, &amount).await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut total = Decimal::ZERO;
    for id in &ids {
        total += ledger.get_account(id).await.unwrap().balance();
    }
    assert_eq!(total, Decimal::ZERO);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_batches_do_not_deadlock() {
    let ledger = common::setup_ledger();
    let a = common::create_account(&ledger, "a").await;
    let b = common::create_account(&ledger, "b").await;
    let c = common::create_account(&ledger, "c").await;

    // each batch names the accounts in a different order
    let orders = [
        [a.id().clone(), b.id().clone(), c.id().clone()],
        [c.id().clone(), b.id().clone(), a.id().clone()],
        [b.id().clone(), a.id().clone(), c.id().clone()],
    ];

    let mut handles = Vec::new();
    for [x, y, z] in orders {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..50 {
                ledger
                    .create_transfers(
                        None,
                        vec![
                            TransferRequest::new(x.clone(), y.clone(), "1"),
                            TransferRequest::new(y.clone(), z.clone(), "1"),
                            TransferRequest::new(z.clone(), x.clone(), "1"),
                        ],
                    )
                    .await
                    .unwrap();
            }
        }));
    }

    tokio::time::timeout(Duration::from_secs(30), async {
        for handle in handles {
            handle.await.unwrap();
        }
    })
    .await
    .expect("batches deadlocked");

    for id in [a.id(), b.id(), c.id()] {
        let account = ledger.get_account(id).await.unwrap();
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.version(), 300);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ids_are_unique_and_ordered() {
    let ledger = common::setup_ledger();
    let a = common::create_account(&ledger, "a").await;
    let b = common::create_account(&ledger, "b").await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let ledger = ledger.clone();
        let (a, b) = (a.id().clone(), b.id().clone());
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for _ in 0..100 {
                ids.push(common::transfer(&ledger, &a, &b, "1").await.id);
            }
            ids
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let ids = handle.await.unwrap();
        // ids issued to one worker follow its own commit order
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        for id in ids {
            assert!(seen.insert(id));
        }
    }
    assert_eq!(seen.len(), 400);

    let listed = ledger.list_transfers(a.id()).await.unwrap();
    assert_eq!(listed.len(), 400);
    assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_expired_deadline_leaves_no_trace() {
    let ledger = common::setup_ledger();
    let a = common::create_account(&ledger, "a").await;
    let b = common::create_account(&ledger, "b").await;

    let err = ledger
        .create_transfer_with_context(
            TransferRequest::new(a.id().clone(), b.id().clone(), "1"),
            OperationContext::new().with_timeout(Duration::ZERO),
        )
        .await
        .unwrap_err();
    assert!(err.is_retryable());

    for id in [a.id(), b.id()] {
        let account = ledger.get_account(id).await.unwrap();
        assert_eq!(account.version(), 0);
        assert!(ledger.list_entries(id).await.unwrap().is_empty());
    }
}
