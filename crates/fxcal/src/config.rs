use std::{env, str::FromStr};

use fxcal_core::events::RangeLimits;
use fxcal_core::scrape::{BackoffPolicy, Pacing, RowSelectors, DEFAULT_BASE_URL};

use crate::scraper::{PipelineSettings, WebDriverOptions};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Maximum number of cached days in the memory store (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Calendar site root (default: "https://www.forexfactory.com")
    pub calendar_base_url: String,
    /// WebDriver server (default: "http://localhost:9515")
    pub webdriver_url: String,
    /// Run the browser headless (default: true)
    pub browser_headless: bool,
    /// Overrides the browser's user agent
    pub browser_user_agent: Option<String>,
    /// Attempts per date before giving up (default: 3)
    pub scrape_max_attempts: u32,
    /// Multiplier applied to every scrape delay (default: 1.0)
    pub scrape_pacing_scale: f64,
    /// Longest accepted read range, in days (default: 30)
    pub max_range_days: i64,
    /// Furthest distance from today a read may reach, in days (default: 365)
    pub max_age_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `CACHE_MAX_ENTRIES` - Memory store capacity (default: 10,000)
    /// - `CALENDAR_BASE_URL` - Calendar site root
    /// - `WEBDRIVER_URL` - chromedriver endpoint (default: "http://localhost:9515")
    /// - `BROWSER_HEADLESS` - "false" or "0" shows the browser window
    /// - `BROWSER_USER_AGENT` - User agent override
    /// - `SCRAPE_MAX_ATTEMPTS` - Attempts per date (default: 3)
    /// - `SCRAPE_PACING_SCALE` - Delay multiplier (default: 1.0)
    /// - `MAX_RANGE_DAYS` - Longest read range (default: 30)
    /// - `MAX_AGE_DAYS` - Read window around today (default: 365)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES").unwrap_or(10_000),
            calendar_base_url: lookup("CALENDAR_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            webdriver_url: lookup("WEBDRIVER_URL")
                .unwrap_or_else(|| "http://localhost:9515".to_string()),
            browser_headless: lookup("BROWSER_HEADLESS")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
            browser_user_agent: lookup("BROWSER_USER_AGENT").filter(|v| !v.trim().is_empty()),
            scrape_max_attempts: parse_var(&lookup, "SCRAPE_MAX_ATTEMPTS")
                .filter(|n: &u32| *n > 0)
                .unwrap_or(3),
            scrape_pacing_scale: parse_var(&lookup, "SCRAPE_PACING_SCALE").unwrap_or(1.0),
            max_range_days: parse_var(&lookup, "MAX_RANGE_DAYS").unwrap_or(30),
            max_age_days: parse_var(&lookup, "MAX_AGE_DAYS").unwrap_or(365),
        }
    }

    pub fn range_limits(&self) -> RangeLimits {
        RangeLimits {
            max_range_days: self.max_range_days,
            max_age_days: self.max_age_days,
        }
    }

    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: self.scrape_max_attempts,
            ..BackoffPolicy::default()
        }
        .scaled(self.scrape_pacing_scale)
    }

    pub fn pacing(&self) -> Pacing {
        Pacing::default().scaled(self.scrape_pacing_scale)
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            base_url: self.calendar_base_url.clone(),
            selectors: RowSelectors::standard(),
            backoff: self.backoff(),
            pacing: self.pacing(),
        }
    }

    pub fn webdriver_options(&self) -> WebDriverOptions {
        let defaults = WebDriverOptions::default();
        WebDriverOptions {
            endpoint: self.webdriver_url.clone(),
            headless: self.browser_headless,
            user_agent: self
                .browser_user_agent
                .clone()
                .unwrap_or(defaults.user_agent.clone()),
            ..defaults
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
