//! Shared application state.
//!
//! Handlers receive a clone of [`AppState`]. The store backend is chosen at
//! compile time; the rest of the wiring is identical for every backend.

use std::sync::Arc;

use fxcal_core::cache::KeyValueStore;
use fxcal_core::derive::Transformer;
use fxcal_core::events::RangeLimits;
use fxcal_core::scrape::Scraper;

use crate::acquisition::Orchestrator;
use crate::config::Config;
use crate::scraper::{ExtractionPipeline, WebDriverLauncher};
use crate::storage::DayCache;

#[derive(Clone)]
pub struct AppState {
    /// Per-day view of the store, used directly by the maintenance endpoints.
    pub day_cache: DayCache,
    /// Cache-aside acquisition for the events endpoints.
    pub orchestrator: Arc<Orchestrator>,
    /// Limits applied to read requests.
    pub limits: RangeLimits,
}

impl AppState {
    /// Wires the state around an already constructed store and scraper.
    pub fn build(
        store: Arc<dyn KeyValueStore>,
        scraper: Arc<dyn Scraper>,
        limits: RangeLimits,
    ) -> Self {
        let day_cache = DayCache::new(store);
        let orchestrator = Orchestrator::new(
            day_cache.clone(),
            scraper,
            Arc::new(Transformer::default()),
        );

        Self {
            day_cache,
            orchestrator: Arc::new(orchestrator),
            limits,
        }
    }
}

/// Browser-backed scraper for the configured WebDriver endpoint.
///
/// No session is opened until the first scrape.
fn webdriver_scraper(config: &Config) -> Result<Arc<dyn Scraper>, anyhow::Error> {
    let launcher = WebDriverLauncher::new(config.webdriver_options())?;
    Ok(Arc::new(ExtractionPipeline::new(
        launcher,
        config.pipeline_settings(),
    )))
}

// ============================================================================
// Backend-specific factory methods
// ============================================================================

#[cfg(feature = "memory")]
mod memory_backend {
    use super::*;
    use crate::cache::MemoryStore;

    impl AppState {
        /// Creates AppState with the in-memory store.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(MemoryStore::new(config.cache_max_entries));
            tracing::info!(capacity = config.cache_max_entries, "Using in-memory store");

            Ok(Self::build(
                store,
                webdriver_scraper(config)?,
                config.range_limits(),
            ))
        }
    }
}

#[cfg(feature = "redis")]
mod redis_backend {
    use super::*;
    use crate::cache::RedisStore;

    impl AppState {
        /// Creates AppState with the Redis store.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(RedisStore::new(&config.redis_url).await?);
            tracing::info!(url = %config.redis_url, "Connected to Redis store");

            Ok(Self::build(
                store,
                webdriver_scraper(config)?,
                config.range_limits(),
            ))
        }
    }
}
