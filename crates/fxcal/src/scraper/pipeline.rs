//! Per-date extraction state machine.
//!
//! Each date walks `navigate -> detect block -> locate rows -> extract rows`
//! inside a bounded retry loop. A date that never yields rows contributes no
//! events; only a browser that cannot be launched fails the whole call.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use fxcal_core::events::{EventDetail, EventRecord};
use fxcal_core::scrape::{
    calendar_url, is_bot_challenge, BackoffPolicy, Browser, BrowserLauncher, BrowserResult,
    ElementHandle, Pacing, RowSelectors, ScrapeError, ScrapeStage, Scraper, DEFAULT_BASE_URL,
    ROW_SELECTOR,
};

use super::detail::DetailPane;
use super::{pause, row, sample};

/// Tunables for [`ExtractionPipeline`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub base_url: String,
    pub selectors: RowSelectors,
    pub backoff: BackoffPolicy,
    pub pacing: Pacing,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            selectors: RowSelectors::standard(),
            backoff: BackoffPolicy::default(),
            pacing: Pacing::default(),
        }
    }
}

/// Outcome of a single attempt at a date page.
enum Attempt {
    Rows(Vec<ElementHandle>),
    Blocked,
    NoRows,
}

/// [`Scraper`] that drives one browser session per call.
///
/// Calls are serialized: a second caller waits until the first has closed its
/// browser.
pub struct ExtractionPipeline<L> {
    launcher: L,
    settings: PipelineSettings,
    lock: Mutex<()>,
}

impl<L: BrowserLauncher> ExtractionPipeline<L> {
    pub fn new(launcher: L, settings: PipelineSettings) -> Self {
        Self {
            launcher,
            settings,
            lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn launcher(&self) -> &L {
        &self.launcher
    }

    async fn scrape_date<B: Browser>(&self, browser: &B, date: NaiveDate) -> Vec<EventRecord> {
        let url = calendar_url(&self.settings.base_url, date);
        let backoff = &self.settings.backoff;

        for attempt in 0..backoff.max_attempts {
            let retry_left = backoff.has_retry_after(attempt);
            tracing::debug!(%date, %url, attempt, "Loading calendar page");

            match self.attempt_date(browser, &url).await {
                Ok(Attempt::Rows(rows)) => {
                    tracing::info!(%date, rows = rows.len(), "Found calendar rows");
                    return self.extract_rows(browser, date, &url, rows).await;
                }
                Ok(Attempt::Blocked) if retry_left => {
                    let delay = backoff.block_delay(attempt);
                    tracing::warn!(%date, attempt, ?delay, "Bot challenge detected, backing off");
                    pause(delay).await;
                }
                Ok(Attempt::Blocked) => {
                    tracing::warn!(%date, attempts = backoff.max_attempts, "ScrapeBlocked: giving up on date");
                    return Vec::new();
                }
                Ok(Attempt::NoRows) if retry_left => {
                    tracing::warn!(%date, attempt, "No calendar rows found, retrying");
                    pause(backoff.empty_rows_delay).await;
                }
                Ok(Attempt::NoRows) => {
                    tracing::warn!(%date, "No calendar rows found after all attempts");
                    return Vec::new();
                }
                Err(err) => {
                    tracing::warn!(%date, attempt, error = %err, "Calendar page failed to load");
                    if retry_left {
                        pause(backoff.error_delay(attempt)).await;
                    }
                }
            }
        }

        tracing::error!(%date, "Giving up on date after all attempts");
        Vec::new()
    }

    async fn attempt_date<B: Browser>(&self, browser: &B, url: &str) -> BrowserResult<Attempt> {
        browser.navigate(url).await?;
        pause(sample(self.settings.pacing.settle)).await;

        let body = browser.body_text().await.unwrap_or_default();
        if is_bot_challenge(&body) {
            return Ok(Attempt::Blocked);
        }

        match browser.find_all(ROW_SELECTOR).await {
            Ok(rows) if !rows.is_empty() => Ok(Attempt::Rows(rows)),
            Ok(_) => Ok(Attempt::NoRows),
            Err(err) => {
                tracing::debug!(error = %err, "Row query failed");
                Ok(Attempt::NoRows)
            }
        }
    }

    async fn extract_rows<B: Browser>(
        &self,
        browser: &B,
        date: NaiveDate,
        url: &str,
        mut rows: Vec<ElementHandle>,
    ) -> Vec<EventRecord> {
        let mut events = Vec::new();
        let mut index = 0;

        // Closing a pane may reload the page, so `rows` is refreshed and the
        // remaining rows are addressed by position.
        while index < rows.len() {
            let handle = rows[index].clone();
            index += 1;

            let mut event =
                row::extract_basic(browser, &handle, &self.settings.selectors, date).await;
            if event.is_noise() {
                tracing::trace!(%date, index, "Skipping row without title or currency");
                continue;
            }

            if self.extract_detail(browser, &handle, url, &mut event.details).await {
                match browser.find_all(ROW_SELECTOR).await {
                    Ok(fresh) => rows = fresh,
                    Err(err) => {
                        tracing::warn!(%date, error = %err, "Failed to relocate rows after reload")
                    }
                }
            }

            tracing::debug!(%date, event = %event.event, currency = %event.currency, "Extracted event");
            events.push(event);
        }

        tracing::info!(%date, events = events.len(), "Finished date");
        events
    }

    /// Fills `details` from the row's detail pane. Returns whether the page
    /// was reloaded while doing so.
    async fn extract_detail<B: Browser>(
        &self,
        browser: &B,
        row: &ElementHandle,
        date_url: &str,
        details: &mut EventDetail,
    ) -> bool {
        let pacing = &self.settings.pacing;
        let pane = DetailPane::open(browser, row, pacing).await;

        if let Err(err) = pane.read(browser, details, pacing).await {
            tracing::debug!(error = %err, populated = details.populated_count(), "RowExtractionPartial: detail read failed");
        }

        pane.close(browser, date_url, pacing).await
    }
}

#[async_trait]
impl<L> Scraper for ExtractionPipeline<L>
where
    L: BrowserLauncher + 'static,
{
    async fn scrape(&self, dates: &[NaiveDate]) -> Result<Vec<EventRecord>, ScrapeError> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let _guard = self.lock.lock().await;
        tracing::info!(dates = dates.len(), "Starting extraction");

        let browser = self
            .launcher
            .launch()
            .await
            .map_err(|err| ScrapeError::unavailable(ScrapeStage::LaunchBrowser, err))?;

        let mut events = Vec::new();
        for (position, date) in dates.iter().enumerate() {
            if position > 0 {
                pause(sample(self.settings.pacing.between_dates)).await;
            }
            events.extend(self.scrape_date(&browser, *date).await);
        }

        if let Err(err) = self.launcher.close(browser).await {
            tracing::warn!(error = %err, "Failed to close browser session");
        }

        tracing::info!(dates = dates.len(), events = events.len(), "Extraction finished");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use fxcal_core::events::Impact;

    use super::*;
    use crate::scraper::testing::{FakeDay, FakeLauncher, FakeRow, FakeSite, FAKE_BASE_URL};

    fn make_date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    fn settings() -> PipelineSettings {
        PipelineSettings {
            base_url: FAKE_BASE_URL.to_string(),
            selectors: RowSelectors::standard(),
            backoff: BackoffPolicy::immediate(3),
            pacing: Pacing::zero(),
        }
    }

    fn nfp_row() -> FakeRow {
        FakeRow::new("101")
            .cell(".calendar__time", "8:30am")
            .cell(".calendar__currency", "USD")
            .impact(".calendar__impact span", "icon icon--ff-impact-red")
            .cell(".calendar__event", "Non-Farm Employment Change")
            .cell(".calendar__actual", "142K")
            .cell(".calendar__forecast", "160K")
            .cell(".calendar__previous", "89K")
            .spec("Source", "Bureau of Labor Statistics")
            .spec("Frequency", "Released monthly")
    }

    fn cpi_row() -> FakeRow {
        FakeRow::new("102")
            .cell(".calendar__time", "All Day")
            .cell(".calendar__currency", "EUR")
            .impact(".calendar__impact span", "icon icon--ff-impact-ora")
            .cell(".calendar__event", "German CPI m/m")
    }

    fn pipeline(site: FakeSite) -> ExtractionPipeline<FakeLauncher> {
        ExtractionPipeline::new(FakeLauncher::new(site), settings())
    }

    #[tokio::test]
    async fn test_extracts_rows_in_page_order() {
        let date = make_date(16);
        let site = FakeSite::new().day(
            date,
            FakeDay::new(vec![nfp_row(), FakeRow::new("103"), cpi_row()]),
        );
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[date]).await.unwrap();

        assert_eq!(events.len(), 2);
        let nfp = &events[0];
        assert_eq!(nfp.date, date);
        assert_eq!(nfp.time, "8:30am");
        assert_eq!(nfp.currency, "USD");
        assert_eq!(nfp.impact, Impact::High);
        assert_eq!(nfp.event, "Non-Farm Employment Change");
        assert_eq!(nfp.actual, "142K");
        assert_eq!(nfp.forecast, "160K");
        assert_eq!(nfp.previous, "89K");
        assert_eq!(nfp.details.source, "Bureau of Labor Statistics");
        assert_eq!(nfp.details.frequency, "Released monthly");

        let cpi = &events[1];
        assert_eq!(cpi.time, "", "all-day rows carry no time");
        assert_eq!(cpi.impact, Impact::Medium);
        assert!(cpi.details.source.is_empty());
    }

    #[tokio::test]
    async fn test_session_is_launched_and_closed_once() {
        let first = make_date(16);
        let second = make_date(17);
        let site = FakeSite::new()
            .day(first, FakeDay::new(vec![nfp_row()]))
            .day(second, FakeDay::new(vec![cpi_row()]));
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[first, second]).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].date, first);
        assert_eq!(events[1].date, second);
        assert_eq!(pipeline.launcher().launches.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.launcher().closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_dates_do_not_launch_browser() {
        let pipeline = pipeline(FakeSite::new());

        let events = pipeline.scrape(&[]).await.unwrap();

        assert!(events.is_empty());
        assert_eq!(pipeline.launcher().launches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_launch_failure_is_unavailable() {
        let pipeline = ExtractionPipeline::new(FakeLauncher::failing(FakeSite::new()), settings());

        let err = pipeline.scrape(&[make_date(16)]).await.unwrap_err();

        assert!(matches!(
            err,
            ScrapeError::Unavailable {
                stage: ScrapeStage::LaunchBrowser,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_retries_after_bot_challenge() {
        let date = make_date(16);
        let site = FakeSite::new().day(date, FakeDay::new(vec![nfp_row()]).blocked_loads(2));
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[date]).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(pipeline.launcher().page_loads(&calendar_url(FAKE_BASE_URL, date)), 3);
    }

    #[tokio::test]
    async fn test_blocked_on_every_attempt_yields_empty_date() {
        let blocked = make_date(16);
        let open = make_date(17);
        let site = FakeSite::new()
            .day(blocked, FakeDay::new(vec![nfp_row()]).blocked_loads(3))
            .day(open, FakeDay::new(vec![cpi_row()]));
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[blocked, open]).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, open);
        assert_eq!(pipeline.launcher().page_loads(&calendar_url(FAKE_BASE_URL, blocked)), 3);
    }

    #[tokio::test]
    async fn test_empty_page_is_retried_then_abandoned() {
        let date = make_date(16);
        let site = FakeSite::new().day(date, FakeDay::new(vec![nfp_row()]).empty_loads(5));
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[date]).await.unwrap();

        assert!(events.is_empty());
        assert_eq!(pipeline.launcher().page_loads(&calendar_url(FAKE_BASE_URL, date)), 3);
    }

    #[tokio::test]
    async fn test_navigation_errors_are_retried() {
        let date = make_date(16);
        let site = FakeSite::new().day(date, FakeDay::new(vec![nfp_row()]).failing_loads(2));
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[date]).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "Non-Farm Employment Change");
    }

    #[tokio::test]
    async fn test_clicked_pane_is_toggled_closed() {
        let date = make_date(16);
        let site = FakeSite::new().day(date, FakeDay::new(vec![nfp_row(), cpi_row()]));
        let pipeline = pipeline(site);

        pipeline.scrape(&[date]).await.unwrap();

        // One click to open and one to close, for each row with a link.
        assert_eq!(pipeline.launcher().clicks.load(Ordering::SeqCst), 4);
        assert_eq!(pipeline.launcher().page_loads(&calendar_url(FAKE_BASE_URL, date)), 1);
    }

    #[tokio::test]
    async fn test_detail_read_failure_keeps_fields_read_so_far() {
        let date = make_date(16);
        let partial = nfp_row()
            .spec("Measures", "Change in the number of employed people")
            .failing_spec(1);
        let site = FakeSite::new().day(date, FakeDay::new(vec![partial, cpi_row()]));
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[date]).await.unwrap();

        assert_eq!(events.len(), 2);
        let nfp = &events[0];
        assert_eq!(nfp.event, "Non-Farm Employment Change");
        assert_eq!(nfp.currency, "USD");
        assert_eq!(nfp.actual, "142K");
        assert_eq!(nfp.details.source, "Bureau of Labor Statistics");
        assert!(nfp.details.frequency.is_empty());
        assert!(nfp.details.measures.is_empty());
        assert_eq!(events[1].event, "German CPI m/m");

        // The failed pane was still toggled shut before the next row.
        assert_eq!(pipeline.launcher().clicks.load(Ordering::SeqCst), 4);
        assert_eq!(pipeline.launcher().page_loads(&calendar_url(FAKE_BASE_URL, date)), 1);
    }

    #[tokio::test]
    async fn test_failed_click_falls_back_to_fragment() {
        let date = make_date(16);
        let site = FakeSite::new()
            .day(date, FakeDay::new(vec![nfp_row(), cpi_row()]))
            .failing_clicks();
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[date]).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].details.source, "Bureau of Labor Statistics");
        assert_eq!(events[1].event, "German CPI m/m");

        let url = calendar_url(FAKE_BASE_URL, date);
        let navigations = pipeline.launcher().navigations();
        assert!(navigations.contains(&format!("{url}#detail=101")));
        assert!(navigations.contains(&format!("{url}#detail=102")));
        assert_eq!(navigations.last(), Some(&url));
    }

    #[tokio::test]
    async fn test_row_without_link_is_read_in_place() {
        let date = make_date(16);
        let site = FakeSite::new().day(date, FakeDay::new(vec![nfp_row().without_link()]));
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[date]).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].details.populated_count(), 0);
        assert_eq!(pipeline.launcher().clicks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_traders_care_is_appended_to_notes() {
        let date = make_date(16);
        let row = nfp_row()
            .spec("FF Notes", "Watch revisions")
            .spec("Why Traders Care", "Leading indicator of consumer spending");
        let site = FakeSite::new().day(date, FakeDay::new(vec![row]));
        let pipeline = pipeline(site);

        let events = pipeline.scrape(&[date]).await.unwrap();

        assert_eq!(
            events[0].details.ff_notes,
            "Watch revisions | Leading indicator of consumer spending"
        );
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_session_at_a_time() {
        let date = make_date(16);
        let site = FakeSite::new().day(date, FakeDay::new(vec![nfp_row(), cpi_row()]));
        let pipeline = Arc::new(pipeline(site));
        let dates = [date];

        let (first, second) = tokio::join!(pipeline.scrape(&dates), pipeline.scrape(&dates));

        assert_eq!(first.unwrap().len(), 2);
        assert_eq!(second.unwrap().len(), 2);
        assert_eq!(pipeline.launcher().launches.load(Ordering::SeqCst), 2);
        assert_eq!(pipeline.launcher().max_open_sessions(), 1);
    }
}
