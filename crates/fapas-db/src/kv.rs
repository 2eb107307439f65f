//! # Key-Value Store
//!
//! The durable capability the cart is persisted through:
//! `get(key) -> bytes | absent`, `set(key, bytes)`, `remove(key)`.
//!
//! ## Implementations
//! - [`crate::Database`] - SQLite file (production)
//! - [`crate::MemoryStore`] - process-local map (tests, demos)
//!
//! Timeouts are the store's concern; callers just await the result.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::DbResult;

/// Durable byte storage keyed by string.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Reads the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> DbResult<Option<Vec<u8>>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &[u8]) -> DbResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;
}

