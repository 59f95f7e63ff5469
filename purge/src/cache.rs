//! Ephemeral cache collaborator.
//!
//! The coordinator only needs one operation from the live-session
//! cache: drop the entry for a key. The backend is injected behind
//! [`SessionCache`] so deployments can plug in their store of choice
//! and tests can substitute failing doubles; [`MemoryCache`] is the
//! in-process implementation.

use std::collections::HashMap;
use std::future::{Future, ready};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache backend could not be reached or refused the operation.
    #[error("cache backend failure: {0}")]
    Backend(String),
}

/// Drop-only view of the session cache.
pub trait SessionCache: Send + Sync {
    /// Remove the entry for `key`. A key that was never present is
    /// success: the entry is just as gone either way.
    fn drop_entry(&self, key: &str) -> impl Future<Output = Result<(), CacheError>> + Send;
}

/// In-process session cache backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.into(), value.into());
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionCache for MemoryCache {
    fn drop_entry(&self, key: &str) -> impl Future<Output = Result<(), CacheError>> + Send {
        let outcome = match self.entries.lock() {
            Ok(mut entries) => {
                entries.remove(key);
                Ok(())
            }
            Err(_) => Err(CacheError::Backend("cache mutex poisoned".to_string())),
        };
        ready(outcome)
    }
}
