// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Per-key async locks for serializing ledger mutations within an instance.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// Map of lazily created mutexes, keyed by user, item, swap or email.
///
/// Shared across all services of one process via `Arc`. An entry lives only
/// while some task holds or waits for its mutex.
#[derive(Default)]
pub struct KeyedLocks {
    locks: Arc<LockMap>,
}

/// Held lock for one key. Dropping it releases the mutex and removes the
/// map entry if nobody else is waiting on it.
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: String,
    locks: Arc<LockMap>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Release first so the guard's own reference is gone.
        drop(self.guard.take());
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

/// Shared handle type stored in the services.
pub type LedgerLocks = Arc<KeyedLocks>;

pub fn user_key(user_id: &str) -> String {
    format!("user:{}", user_id)
}

pub fn item_key(item_id: &str) -> String {
    format!("item:{}", item_id)
}

pub fn swap_key(swap_id: &str) -> String {
    format!("swap:{}", swap_id)
}

pub fn email_key(email: &str) -> String {
    format!("email:{}", email)
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquire the lock for a single key.
    pub async fn lock(&self, key: &str) -> KeyGuard {
        let guard = self.mutex_for(key).lock_owned().await;
        KeyGuard {
            guard: Some(guard),
            key: key.to_string(),
            locks: self.locks.clone(),
        }
    }

    /// Number of keys currently locked or awaited.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Acquire the locks for several keys.
    ///
    /// Keys are de-duplicated and taken in sorted order so two callers
    /// locking the same pair can never deadlock.
    pub async fn lock_all<S: AsRef<str>>(&self, keys: &[S]) -> Vec<KeyGuard> {
        let mut keys: Vec<&str> = keys.iter().map(|k| k.as_ref()).collect();
        keys.sort_unstable();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.lock(key).await);
        }
        guards
    }
}
