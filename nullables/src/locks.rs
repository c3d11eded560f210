//! Nullable lock registry: per-account grants held in memory.

use govpower_types::{Address, ExternalError, LockGrant, LockRegistry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An in-memory lock registry for testing.
pub struct NullLockRegistry {
    locks: Mutex<HashMap<Address, Vec<LockGrant>>>,
    unavailable: AtomicBool,
}

impl NullLockRegistry {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Register a new active grant for `account`.
    pub fn add_lock(&self, account: &Address, grant: LockGrant) {
        self.locks
            .lock()
            .unwrap()
            .entry(account.clone())
            .or_default()
            .push(grant);
    }

    /// Replace all of `account`'s grants with a single one.
    pub fn replace_locks(&self, account: &Address, grant: LockGrant) {
        self.locks
            .lock()
            .unwrap()
            .insert(account.clone(), vec![grant]);
    }

    pub fn clear(&self, account: &Address) {
        self.locks.lock().unwrap().remove(account);
    }

    /// While set, every read fails as if the registry were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Default for NullLockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LockRegistry for NullLockRegistry {
    fn active_locks_of(&self, account: &Address) -> Result<Vec<LockGrant>, ExternalError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ExternalError::Unavailable("lock registry offline".into()));
        }
        Ok(self
            .locks
            .lock()
            .unwrap()
            .get(account)
            .cloned()
            .unwrap_or_default())
    }
}
