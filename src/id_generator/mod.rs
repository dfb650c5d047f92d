//! ID Generator
//!
//! Hybrid monotonic allocator: the high bits hold wall-clock milliseconds,
//! the low bits a tie-breaker. Each allocation is a single atomic
//! read-modify-write taking `max(last + 1, now << COUNTER_BITS)`, so values
//! are strictly increasing in real-time order and a duplicate would need the
//! same atomic to return the same value twice.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::domain::{AccountId, EntryId, Namespace, TransferId};

/// Low bits reserved for the per-millisecond tie-breaker.
const COUNTER_BITS: u32 = 20;

/// Allocator for one namespace.
#[derive(Debug)]
pub struct IdGenerator {
    namespace: Namespace,
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            last: AtomicU64::new(0),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Next raw sequence value.
    ///
    /// If more than 2^20 ids are requested within one millisecond the
    /// counter borrows from the next millisecond; order is still kept.
    pub fn next_sequence(&self) -> u64 {
        let floor = now_floor();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(next_after(last, floor))
            })
            .unwrap_or_else(|last| last);
        next_after(previous, floor)
    }

    /// Next id rendered in this generator's namespace.
    pub fn generate(&self) -> String {
        self.namespace.format(self.next_sequence())
    }
}

fn now_floor() -> u64 {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    millis << COUNTER_BITS
}

fn next_after(last: u64, floor: u64) -> u64 {
    floor.max(last.saturating_add(1))
}

/// One allocator per namespace, owned by the ledger store.
#[derive(Debug)]
pub struct IdGenerators {
    accounts: IdGenerator,
    transfers: IdGenerator,
    entries: IdGenerator,
}

impl IdGenerators {
    pub fn new() -> Self {
        Self {
            accounts: IdGenerator::new(Namespace::Account),
            transfers: IdGenerator::new(Namespace::Transfer),
            entries: IdGenerator::new(Namespace::Entry),
        }
    }

    pub fn account_id(&self) -> AccountId {
        AccountId::from_sequence(self.accounts.next_sequence())
    }

    pub fn transfer_id(&self) -> TransferId {
        TransferId::from_sequence(self.transfers.next_sequence())
    }

    pub fn entry_id(&self) -> EntryId {
        EntryId::from_sequence(self.entries.next_sequence())
    }
}

impl Default for IdGenerators {
    fn default() -> Self {
        Self::new()
    }
}
