//! Per-user mutual exclusion
//!
//! Clock-in and clock-out for one user must observe a linearized view of that
//! user's open/closed state. Each user id maps to its own async mutex so that
//! different users never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::constants::USER_LOCK_PRUNE_THRESHOLD;

/// Lock table keyed by user id
#[derive(Debug, Default)]
pub struct UserLocks {
    table: Mutex<LockTable>,
}

#[derive(Debug)]
struct LockTable {
    locks: HashMap<Uuid, Arc<AsyncMutex<()>>>,
    /// Size at which the next prune runs; doubles past what a prune leaves behind
    prune_at: usize,
}

impl Default for LockTable {
    fn default() -> Self {
        Self {
            locks: HashMap::new(),
            prune_at: USER_LOCK_PRUNE_THRESHOLD,
        }
    }
}

impl LockTable {
    fn prune_if_due(&mut self) {
        if self.locks.len() < self.prune_at {
            return;
        }

        // Only the table references an idle lock; anyone holding or
        // waiting on it keeps a clone.
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        self.prune_at = (self.locks.len() * 2).max(USER_LOCK_PRUNE_THRESHOLD);
        debug!(
            pruned = before - self.locks.len(),
            next_prune_at = self.prune_at,
            "Pruned idle user locks"
        );
    }
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s timesheet state.
    ///
    /// The returned guard releases the lock when dropped.
    pub async fn lock(&self, user_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            table.prune_if_due();
            table.locks.entry(user_id).or_default().clone()
        };

        lock.lock_owned().await
    }

    /// Number of users currently tracked in the table
    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
