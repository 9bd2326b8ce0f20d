//! Key-value store contract.
//!
//! Every record family lives in one flat namespace of string keys mapped to
//! JSON values. Higher layers simulate relations through key prefixes, so the
//! only query a backend must support beyond point access is a prefix scan.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single `(key, value)` pair returned by [`KvStore::scan_prefix`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub value: Value,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    async fn delete_many(&self, keys: &[String]) -> StoreResult<()>;

    /// All entries whose key starts with `prefix`. Order is unspecified.
    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<Entry>>;

    /// Cheap liveness probe.
    async fn health(&self) -> StoreResult<()> {
        Ok(())
    }
}
