use std::collections::BTreeMap;

use async_trait::async_trait;

use super::Result;

/// Free-form diagnostics reported by a store.
///
/// Keys mirror the fields of Redis `INFO` where the backend has them.
pub type StoreStats = BTreeMap<String, serde_json::Value>;

/// String key-value store behind the day cache.
///
/// Implementations must be safe to share between requests. No method applies
/// a TTL: entries live until deleted.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets a value by key.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Sets a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes a key, returning how many keys were removed (0 or 1).
    async fn delete(&self, key: &str) -> Result<u64>;

    /// Checks whether a key exists.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Lists keys matching a glob pattern (e.g. `"forex:events:*"`).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Backend statistics.
    async fn info(&self) -> Result<StoreStats>;
}
