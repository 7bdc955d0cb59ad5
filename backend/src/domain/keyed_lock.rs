//! Per-key async mutual exclusion.
//!
//! The check-in engine serialises every read-modify-write sequence touching a
//! single user's check-ins. Different users proceed in parallel.
//!
//! Locks are process-local: replicas sharing one database do not see each
//! other's guards.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard held while a key is locked. Dropping it releases the key.
pub struct KeyedGuard {
    _guard: OwnedMutexGuard<()>,
}

/// Registry of async mutexes keyed by `K`.
///
/// # Examples
/// ```
/// use backend::domain::KeyedLocks;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let locks = KeyedLocks::<u32>::default();
/// let guard = locks.lock(7).await;
/// assert_eq!(locks.tracked_keys(), 1);
/// drop(guard);
/// # });
/// ```
pub struct KeyedLocks<K> {
    entries: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Wait until `key` is free and lock it.
    pub async fn lock(&self, key: K) -> KeyedGuard {
        let mutex = self.entry(key);
        KeyedGuard {
            _guard: mutex.lock_owned().await,
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn entry(&self, key: K) -> Arc<AsyncMutex<()>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Entries referenced only by the map have no holder or waiter.
        entries.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        Arc::clone(entries.entry(key).or_default())
    }
}
