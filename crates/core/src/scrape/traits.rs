use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::events::EventRecord;

use super::{BrowserError, ScrapeError};

/// Result type for browser operations.
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// Opaque reference to an element on the current page.
///
/// Handles are only meaningful to the browser that produced them and go stale
/// once the page navigates away.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// One live browser session.
///
/// Selectors are CSS selectors. Finders return empty results (not errors)
/// when nothing matches.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    async fn current_url(&self) -> BrowserResult<String>;

    /// Visible text of the page body.
    async fn body_text(&self) -> BrowserResult<String>;

    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<ElementHandle>>;

    /// First descendant of `parent` matching `selector`.
    async fn find_in(
        &self,
        parent: &ElementHandle,
        selector: &str,
    ) -> BrowserResult<Option<ElementHandle>>;

    async fn find_all_in(
        &self,
        parent: &ElementHandle,
        selector: &str,
    ) -> BrowserResult<Vec<ElementHandle>>;

    async fn text(&self, element: &ElementHandle) -> BrowserResult<String>;

    async fn attribute(&self, element: &ElementHandle, name: &str)
        -> BrowserResult<Option<String>>;

    async fn click(&self, element: &ElementHandle) -> BrowserResult<()>;

    /// Waits until `selector` matches at least one element.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;
}

/// Starts and stops browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Browser: Browser;

    async fn launch(&self) -> BrowserResult<Self::Browser>;

    async fn close(&self, browser: Self::Browser) -> BrowserResult<()>;
}

/// Produces raw events for a list of dates.
///
/// Implementations return events in row order per date, dates in the given
/// order. Per-date problems yield an empty contribution for that date; only a
/// failure that prevents any extraction is an error.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, dates: &[NaiveDate]) -> Result<Vec<EventRecord>, ScrapeError>;
}
