//! Keyed, cancellable deferred tasks driven by an explicit clock.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Pending one-shot tasks keyed by `K`, each due at a fixed instant.
///
/// Scheduling an already pending key keeps the original deadline; the only
/// way to move it is to cancel and schedule again.
#[derive(Debug, Clone)]
pub struct DeferredTasks<K> {
    pending: BTreeMap<K, Instant>,
}

impl<K> Default for DeferredTasks<K> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> DeferredTasks<K> {
    /// Returns `false` when `key` was already pending.
    pub fn schedule(&mut self, key: K, now: Instant, delay: Duration) -> bool {
        if self.pending.contains_key(&key) {
            return false;
        }
        self.pending.insert(key, now + delay);
        true
    }

    /// Returns `true` when a pending task was removed.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Removes and returns every key whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &due {
            self.pending.remove(key);
        }
        due
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
