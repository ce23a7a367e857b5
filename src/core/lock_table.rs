//! Per-account lock table
//!
//! Accounts loaded from the store are transient values, so the mutex that
//! serializes mutations of an account cannot live inside the value itself.
//! `AccountLocks` keeps one mutex per account id for the lifetime of the
//! engine instead.
//!
//! # Lock ordering
//!
//! Operations that need two accounts acquire them through [`AccountLocks::pair`],
//! which always locks the lexicographically smaller id first. Two transfers
//! touching the same pair therefore request the locks in the same global order,
//! whichever direction the money moves, and cannot wait on each other in a
//! cycle.

use crate::types::AccountId;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mutex guarding one account id
#[derive(Debug, Clone, Default)]
pub struct AccountLock(Arc<Mutex<()>>);

impl AccountLock {
    /// Block until the account is free
    ///
    /// A poisoned lock is taken over: it guards no data of its own, and a
    /// thread that panicked mid-operation never reached `save`.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Two account locks in canonical order
#[derive(Debug)]
pub struct LockPair {
    first: AccountLock,
    second: AccountLock,
}

/// Guards held for the duration of a two-account critical section
///
/// Fields drop in declaration order, so `second` is released before `first`.
pub struct PairGuard<'a> {
    _second: MutexGuard<'a, ()>,
    _first: MutexGuard<'a, ()>,
}

impl LockPair {
    /// Acquire the first lock, then the second
    pub fn lock(&self) -> PairGuard<'_> {
        let first = self.first.lock();
        let second = self.second.lock();
        PairGuard {
            _second: second,
            _first: first,
        }
    }
}

/// Lock table keyed by account id
///
/// Entries are never removed. The engine only asks for a lock after the
/// account is known to exist (or, when opening, after its customer is known),
/// so the table holds at most one entry per account the engine has opened or
/// tried to open, and repeated use of an id reuses its entry.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: DashMap<AccountId, AccountLock>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock for `account`, creating it on first use
    ///
    /// The returned handle is a clone, so no map shard stays locked while the
    /// caller blocks on the account mutex.
    pub fn handle(&self, account: &str) -> AccountLock {
        if let Some(existing) = self.locks.get(account) {
            return existing.value().clone();
        }

        self.locks
            .entry(account.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Get the locks for two distinct accounts in canonical order
    pub fn pair(&self, a: &str, b: &str) -> LockPair {
        let (first, second) = canonical_order(a, b);
        LockPair {
            first: self.handle(first),
            second: self.handle(second),
        }
    }

    /// Number of account ids that have been locked at least once
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Order two account ids lexicographically, smaller first
pub fn canonical_order<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
