//! Redis key-value store.

use async_trait::async_trait;
use futures_util::StreamExt;
use redis::AsyncCommands;

use fxcal_core::cache::{CacheError, KeyValueStore, Result, StoreStats};

use super::error::map_redis_error;

/// `INFO` fields passed through to the diagnostics endpoint.
const INFO_FIELDS: [&str; 8] = [
    "redis_version",
    "connected_clients",
    "used_memory_human",
    "total_commands_processed",
    "keyspace_hits",
    "keyspace_misses",
    "uptime_in_seconds",
    "total_connections_received",
];

/// Redis store backend using a connection manager for reconnects.
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(map_redis_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        conn.del(key).await.map_err(map_redis_error)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.exists(key).await.map_err(map_redis_error)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        // SCAN instead of KEYS so a large keyspace does not block the server.
        let mut conn = self.conn.clone();
        let iter = conn
            .scan_match::<_, String>(pattern)
            .await
            .map_err(map_redis_error)?;
        let mut keys: Vec<String> = iter.collect().await;
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn info(&self) -> Result<StoreStats> {
        let mut conn = self.conn.clone();
        let raw: String = redis::cmd("INFO")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        let stats = parse_info(&raw);
        if stats.is_empty() {
            return Err(CacheError::OperationFailed(
                "INFO returned no known fields".to_string(),
            ));
        }
        Ok(stats)
    }
}

/// Extracts [`INFO_FIELDS`] from a Redis `INFO` reply.
///
/// Numeric values are reported as numbers, everything else as strings.
fn parse_info(raw: &str) -> StoreStats {
    let mut stats = StoreStats::new();

    for line in raw.lines() {
        let Some((name, value)) = line.trim().split_once(':') else {
            continue;
        };
        if !INFO_FIELDS.contains(&name) {
            continue;
        }

        let value = match value.parse::<u64>() {
            Ok(number) => number.into(),
            Err(_) => value.to_string().into(),
        };
        stats.insert(name.to_string(), value);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Helper to get Redis URL from environment.
    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_store() -> Option<RedisStore> {
        let store = RedisStore::new(&redis_url()).await.ok()?;
        store.ping().await.ok()?;
        Some(store)
    }

    /// Generate a unique test key to avoid conflicts.
    fn test_key(suffix: &str) -> String {
        format!("test:redis_store:{}:{}", Uuid::new_v4(), suffix)
    }

    #[test]
    fn test_parse_info_keeps_known_fields() {
        let raw = "# Server\r\nredis_version:7.2.4\r\nos:Linux\r\n# Clients\r\nconnected_clients:3\r\nused_memory_human:1.05M\r\n";

        let stats = parse_info(raw);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats["redis_version"], "7.2.4");
        assert_eq!(stats["connected_clients"], 3);
        assert_eq!(stats["used_memory_human"], "1.05M");
    }

    #[tokio::test]
    async fn test_redis_set_get_delete() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("set_get");
        store.set(&key, "[]").await.unwrap();

        assert_eq!(store.get(&key).await.unwrap(), Some("[]".to_string()));
        assert!(store.exists(&key).await.unwrap());
        assert_eq!(store.delete(&key).await.unwrap(), 1);
        assert_eq!(store.delete(&key).await.unwrap(), 0);
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_keys_by_pattern() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let prefix = format!("test:redis_store:{}", Uuid::new_v4());
        let first = format!("{}:a", prefix);
        let second = format!("{}:b", prefix);
        store.set(&first, "1").await.unwrap();
        store.set(&second, "2").await.unwrap();

        let keys = store.keys(&format!("{}:*", prefix)).await.unwrap();

        assert_eq!(keys, vec![first.clone(), second.clone()]);

        store.delete(&first).await.unwrap();
        store.delete(&second).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_info() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let info = store.info().await.unwrap();

        assert!(info.contains_key("redis_version"));
    }
}
