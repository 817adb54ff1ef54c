//! Durable key-value storage.
//!
//! The storefront persists exactly two aggregates, each under its own key:
//! the serialized product catalog and the serialized cart snapshot. The two
//! keys never need a joint atomic update, so the interface is a plain
//! key-value `get`/`set`/`remove` with no transactions.
//!
//! [`SqliteStore`] is the production implementation; [`MemoryStore`] backs
//! tests and ephemeral sessions.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database operation failed.
    #[error("storage error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A persistent string key-value store surviving across sessions.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the entry under `key`, if any.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
