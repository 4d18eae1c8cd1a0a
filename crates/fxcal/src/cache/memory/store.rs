//! In-memory key-value store with LRU eviction.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use fxcal_core::cache::{pattern_matches, KeyValueStore, Result, StoreStats};

/// In-memory store bounded by entry count.
///
/// Thread-safe via `Arc<RwLock<LruCache>>`. When `max_entries` is reached the
/// least recently used key is evicted, so a day may need scraping again after
/// a long uptime. Entries never expire otherwise.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    store: Arc<RwLock<LruCache<String, String>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    commands: Arc<AtomicU64>,
    started_at: Instant,
}

impl MemoryStore {
    /// Creates a store holding at most `max_entries` keys (at least one).
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            commands: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    fn count_command(&self) {
        self.commands.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.count_command();
        // `LruCache::get` promotes the key, so it needs the write lock.
        let mut store = self.store.write().await;
        let value = store.get(key).cloned();

        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.count_command();
        let mut store = self.store.write().await;
        store.put(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.count_command();
        let mut store = self.store.write().await;
        Ok(u64::from(store.pop(key).is_some()))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.count_command();
        let store = self.store.read().await;
        Ok(store.contains(key))
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.count_command();
        let store = self.store.read().await;
        let mut keys: Vec<String> = store
            .iter()
            .filter(|(key, _)| pattern_matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn info(&self) -> Result<StoreStats> {
        let store = self.store.read().await;
        let mut stats = StoreStats::new();

        stats.insert("backend".to_string(), "memory".into());
        stats.insert("keys".to_string(), store.len().into());
        stats.insert("capacity".to_string(), store.cap().get().into());
        stats.insert(
            "keyspace_hits".to_string(),
            self.hits.load(Ordering::Relaxed).into(),
        );
        stats.insert(
            "keyspace_misses".to_string(),
            self.misses.load(Ordering::Relaxed).into(),
        );
        stats.insert(
            "total_commands_processed".to_string(),
            self.commands.load(Ordering::Relaxed).into(),
        );
        stats.insert(
            "uptime_in_seconds".to_string(),
            self.started_at.elapsed().as_secs().into(),
        );

        Ok(stats)
    }
}
