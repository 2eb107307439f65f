//! # Memory Store
//!
//! Process-local [`KeyValueStore`] backed by a `HashMap`.
//!
//! Used by tests and demos. Writes can be made to fail on demand so
//! callers can exercise their persistence-failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::kv::KeyValueStore;

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set`/`remove` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set`/`remove` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> DbResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("memory store is read-only".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> DbResult<()> {
        self.check_writable()?;
        debug!(key = %key, bytes = value.len(), "memory store set");
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.check_writable()?;
        debug!(key = %key, "memory store remove");
        self.entries.write().await.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
