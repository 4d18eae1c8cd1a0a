//! Scripted browser and scraper doubles for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use fxcal_core::events::EventRecord;
use fxcal_core::scrape::{
    calendar_url, Browser, BrowserError, BrowserLauncher, BrowserResult, ElementHandle,
    ScrapeError, ScrapeStage, Scraper, DETAIL_LINK_SELECTOR, DETAIL_PANE_SELECTOR,
    ROW_ID_ATTRIBUTE, ROW_SELECTOR, SPECS_CELL_SELECTOR, SPECS_ROW_SELECTOR, SPECS_TABLE_SELECTOR,
};

pub const FAKE_BASE_URL: &str = "https://calendar.test";

#[derive(Debug, Clone, Default)]
pub struct FakeCell {
    pub text: String,
    pub class: String,
}

/// A calendar row. Cells are keyed by the exact selector that finds them.
#[derive(Debug, Clone)]
pub struct FakeRow {
    pub id: String,
    pub has_link: bool,
    pub cells: HashMap<String, FakeCell>,
    pub specs: Vec<(String, String)>,
    /// Reading spec rows from this position on fails.
    pub failing_spec: Option<usize>,
}

impl FakeRow {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            has_link: true,
            cells: HashMap::new(),
            specs: Vec::new(),
            failing_spec: None,
        }
    }

    pub fn cell(mut self, selector: &str, text: &str) -> Self {
        self.cells.insert(
            selector.to_string(),
            FakeCell {
                text: text.to_string(),
                class: String::new(),
            },
        );
        self
    }

    pub fn impact(mut self, selector: &str, class: &str) -> Self {
        self.cells.insert(
            selector.to_string(),
            FakeCell {
                text: String::new(),
                class: class.to_string(),
            },
        );
        self
    }

    pub fn spec(mut self, label: &str, value: &str) -> Self {
        self.specs.push((label.to_string(), value.to_string()));
        self
    }

    pub fn failing_spec(mut self, index: usize) -> Self {
        self.failing_spec = Some(index);
        self
    }

    pub fn without_link(mut self) -> Self {
        self.has_link = false;
        self
    }
}

/// One date's page. The first loads can be made to fail, show the bot
/// challenge, or render without rows, in that order.
#[derive(Debug, Clone, Default)]
pub struct FakeDay {
    pub rows: Vec<FakeRow>,
    pub failing_loads: usize,
    pub blocked_loads: usize,
    pub empty_loads: usize,
}

impl FakeDay {
    pub fn new(rows: Vec<FakeRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn failing_loads(mut self, count: usize) -> Self {
        self.failing_loads = count;
        self
    }

    pub fn blocked_loads(mut self, count: usize) -> Self {
        self.blocked_loads = count;
        self
    }

    pub fn empty_loads(mut self, count: usize) -> Self {
        self.empty_loads = count;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    days: HashMap<String, FakeDay>,
    click_fails: bool,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(mut self, date: NaiveDate, day: FakeDay) -> Self {
        self.days.insert(calendar_url(FAKE_BASE_URL, date), day);
        self
    }

    /// Every click on a detail link fails.
    pub fn failing_clicks(mut self) -> Self {
        self.click_fails = true;
        self
    }
}

/// Interactions recorded across every session of a launcher.
#[derive(Debug, Default)]
struct FakeLog {
    clicks: Arc<AtomicUsize>,
    navigations: Mutex<Vec<String>>,
    loads: Mutex<HashMap<String, usize>>,
    open_sessions: AtomicUsize,
    max_open_sessions: AtomicUsize,
}

pub struct FakeLauncher {
    site: Arc<FakeSite>,
    log: Arc<FakeLog>,
    fail_launch: bool,
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub clicks: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> Self {
        let log = Arc::new(FakeLog::default());
        Self {
            site: Arc::new(site),
            clicks: log.clicks.clone(),
            log,
            fail_launch: false,
            launches: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn failing(site: FakeSite) -> Self {
        Self {
            fail_launch: true,
            ..Self::new(site)
        }
    }

    /// Loads of `url` without a fragment.
    pub fn page_loads(&self, url: &str) -> usize {
        self.log
            .loads
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.log.navigations.lock().unwrap().clone()
    }

    pub fn max_open_sessions(&self) -> usize {
        self.log.max_open_sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    type Browser = FakeBrowser;

    async fn launch(&self) -> BrowserResult<FakeBrowser> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(BrowserError::SessionStart(
                "chromedriver not reachable".to_string(),
            ));
        }

        let open = self.log.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_open_sessions.fetch_max(open, Ordering::SeqCst);

        Ok(FakeBrowser {
            site: self.site.clone(),
            log: self.log.clone(),
            state: Mutex::new(PageState::default()),
        })
    }

    async fn close(&self, _browser: FakeBrowser) -> BrowserResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.log.open_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Load {
    #[default]
    Normal,
    Blocked,
    Empty,
}

#[derive(Debug, Default)]
struct PageState {
    url: String,
    load: Load,
    open_row: Option<usize>,
}

pub struct FakeBrowser {
    site: Arc<FakeSite>,
    log: Arc<FakeLog>,
    state: Mutex<PageState>,
}

impl FakeBrowser {
    fn day(&self) -> Option<&FakeDay> {
        let state = self.state.lock().unwrap();
        let page = state.url.split('#').next().unwrap_or_default().to_string();
        drop(state);
        self.site.days.get(&page)
    }

    fn rows(&self) -> Vec<FakeRow> {
        let load = self.state.lock().unwrap().load;
        match (self.day(), load) {
            (Some(day), Load::Normal) => day.rows.clone(),
            _ => Vec::new(),
        }
    }

    fn row(&self, index: &str) -> BrowserResult<FakeRow> {
        index
            .parse::<usize>()
            .ok()
            .and_then(|index| self.rows().get(index).cloned())
            .ok_or_else(|| BrowserError::StaleElement(format!("row {index}")))
    }

    fn spec(&self, row: &str, spec: &str) -> BrowserResult<(String, String)> {
        let row = self.row(row)?;
        let index = spec
            .parse::<usize>()
            .map_err(|_| BrowserError::StaleElement(format!("spec {spec}")))?;
        if row.failing_spec.is_some_and(|failing| index >= failing) {
            return Err(BrowserError::Protocol(format!(
                "javascript error reading spec {index}"
            )));
        }
        row.specs
            .get(index)
            .cloned()
            .ok_or_else(|| BrowserError::StaleElement(format!("spec {spec}")))
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        tokio::task::yield_now().await;
        self.log.navigations.lock().unwrap().push(url.to_string());

        let (page, fragment) = match url.split_once('#') {
            Some((page, fragment)) => (page, Some(fragment)),
            None => (url, None),
        };
        let day = self.site.days.get(page);

        let mut state = self.state.lock().unwrap();
        match fragment {
            None => {
                let count = {
                    let mut loads = self.log.loads.lock().unwrap();
                    let count = loads.entry(page.to_string()).or_insert(0);
                    *count += 1;
                    *count
                };
                let day = day.cloned().unwrap_or_default();
                if count <= day.failing_loads {
                    return Err(BrowserError::Navigation(format!("net::ERR_TIMED_OUT {url}")));
                }
                state.load = if count <= day.failing_loads + day.blocked_loads {
                    Load::Blocked
                } else if count <= day.failing_loads + day.blocked_loads + day.empty_loads {
                    Load::Empty
                } else {
                    Load::Normal
                };
                state.open_row = None;
            }
            Some(fragment) => {
                let id = fragment.strip_prefix("detail=").unwrap_or_default();
                state.open_row = day.and_then(|day| day.rows.iter().position(|row| row.id == id));
            }
        }
        state.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn body_text(&self) -> BrowserResult<String> {
        match self.state.lock().unwrap().load {
            Load::Blocked => Ok("Just a moment...".to_string()),
            _ => Ok("Economic Calendar".to_string()),
        }
    }

    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<ElementHandle>> {
        let open_row = self.state.lock().unwrap().open_row;
        let handles = match selector {
            ROW_SELECTOR => (0..self.rows().len())
                .map(|index| ElementHandle::new(format!("row:{index}")))
                .collect(),
            SPECS_TABLE_SELECTOR => open_row
                .filter(|index| {
                    self.rows()
                        .get(*index)
                        .is_some_and(|row| !row.specs.is_empty())
                })
                .map(|index| vec![ElementHandle::new(format!("table:{index}"))])
                .unwrap_or_default(),
            DETAIL_PANE_SELECTOR => open_row
                .map(|_| vec![ElementHandle::new("pane")])
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        Ok(handles)
    }

    async fn find_in(
        &self,
        parent: &ElementHandle,
        selector: &str,
    ) -> BrowserResult<Option<ElementHandle>> {
        let Some(("row", index)) = parent.id().split_once(':') else {
            return Ok(None);
        };
        let row = self.row(index)?;

        if selector == DETAIL_LINK_SELECTOR {
            return Ok(row
                .has_link
                .then(|| ElementHandle::new(format!("link:{index}"))));
        }

        Ok(row
            .cells
            .contains_key(selector)
            .then(|| ElementHandle::new(format!("cell:{index}:{selector}"))))
    }

    async fn find_all_in(
        &self,
        parent: &ElementHandle,
        selector: &str,
    ) -> BrowserResult<Vec<ElementHandle>> {
        let parts: Vec<&str> = parent.id().split(':').collect();
        match (parts.as_slice(), selector) {
            (["table", row], SPECS_ROW_SELECTOR) => {
                let count = self.row(row)?.specs.len();
                Ok((0..count)
                    .map(|spec| ElementHandle::new(format!("spec:{row}:{spec}")))
                    .collect())
            }
            (["spec", row, spec], SPECS_CELL_SELECTOR) => Ok(vec![
                ElementHandle::new(format!("label:{row}:{spec}")),
                ElementHandle::new(format!("value:{row}:{spec}")),
            ]),
            _ => Ok(Vec::new()),
        }
    }

    async fn text(&self, element: &ElementHandle) -> BrowserResult<String> {
        let parts: Vec<&str> = element.id().splitn(3, ':').collect();
        match parts.as_slice() {
            ["cell", row, selector] => Ok(self
                .row(row)?
                .cells
                .get(*selector)
                .map(|cell| cell.text.clone())
                .unwrap_or_default()),
            ["label", row, spec] => Ok(self.spec(row, spec)?.0),
            ["value", row, spec] => Ok(self.spec(row, spec)?.1),
            _ => Ok(String::new()),
        }
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> BrowserResult<Option<String>> {
        let parts: Vec<&str> = element.id().splitn(3, ':').collect();
        match (parts.as_slice(), name) {
            (["row", row], ROW_ID_ATTRIBUTE) => Ok(Some(self.row(row)?.id)),
            (["cell", row, selector], "class") => Ok(self
                .row(row)?
                .cells
                .get(*selector)
                .map(|cell| cell.class.clone())),
            _ => Ok(None),
        }
    }

    async fn click(&self, element: &ElementHandle) -> BrowserResult<()> {
        let Some(("link", index)) = element.id().split_once(':') else {
            return Ok(());
        };
        if self.site.click_fails {
            return Err(BrowserError::Protocol(
                "element click intercepted".to_string(),
            ));
        }

        let index: usize = index
            .parse()
            .map_err(|_| BrowserError::StaleElement(element.id().to_string()))?;
        self.log.clicks.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        state.open_row = if state.open_row == Some(index) {
            None
        } else {
            Some(index)
        };
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> BrowserResult<()> {
        if self.find_all(selector).await?.is_empty() {
            return Err(BrowserError::Timeout(selector.to_string()));
        }
        Ok(())
    }
}

/// Scraper returning scripted events and counting its invocations.
pub struct StubScraper {
    events: Vec<EventRecord>,
    fail: bool,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<Vec<NaiveDate>>>,
}

impl StubScraper {
    pub fn returning(events: Vec<EventRecord>) -> Self {
        Self {
            events,
            fail: false,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scraper for StubScraper {
    async fn scrape(&self, dates: &[NaiveDate]) -> Result<Vec<EventRecord>, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(dates.to_vec());

        if self.fail {
            return Err(ScrapeError::unavailable(
                ScrapeStage::LaunchBrowser,
                "chromedriver not reachable",
            ));
        }

        Ok(self.events.clone())
    }
}
