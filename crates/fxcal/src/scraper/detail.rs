//! Opening, reading and closing an event's detail pane.

use fxcal_core::events::EventDetail;
use fxcal_core::scrape::{
    apply_spec_rows, detail_fragment_url, Browser, BrowserResult, ElementHandle, Pacing,
    DETAIL_LINK_SELECTOR, DETAIL_PANE_SELECTOR, ROW_ID_ATTRIBUTE, SPECS_CELL_SELECTOR,
    SPECS_ROW_SELECTOR, SPECS_TABLE_SELECTOR,
};

use super::pause;

/// How the pane was opened, which decides how it is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PaneMode {
    /// Toggled open by clicking the row's detail link.
    Clicked { trigger: ElementHandle },
    /// Opened by navigating to the fragment address.
    Fragment { return_to: String },
    /// Read from whatever is on the page; nothing to close.
    InPlace,
}

/// An open detail pane.
///
/// [`DetailPane::close`] must be called on every path once the pane has been
/// opened; it consumes the pane.
#[derive(Debug)]
#[must_use = "an opened detail pane must be closed"]
pub(crate) struct DetailPane {
    mode: PaneMode,
}

impl DetailPane {
    /// Opens the pane for `row`.
    ///
    /// Clicks the row's detail link when it has both a link and an id,
    /// falling back to the fragment address if the click fails. Rows without
    /// a link or id are read in place.
    pub(crate) async fn open<B: Browser>(browser: &B, row: &ElementHandle, pacing: &Pacing) -> Self {
        let trigger = browser
            .find_in(row, DETAIL_LINK_SELECTOR)
            .await
            .ok()
            .flatten();
        let event_id = browser
            .attribute(row, ROW_ID_ATTRIBUTE)
            .await
            .ok()
            .flatten()
            .filter(|id| !id.is_empty());

        let (Some(trigger), Some(event_id)) = (trigger, event_id) else {
            tracing::debug!("No detail link or event id, reading pane in place");
            return Self {
                mode: PaneMode::InPlace,
            };
        };

        match browser.click(&trigger).await {
            Ok(()) => {
                pause(pacing.pane_open).await;
                Self {
                    mode: PaneMode::Clicked { trigger },
                }
            }
            Err(err) => {
                tracing::debug!(%event_id, error = %err, "Detail link click failed, using fragment");
                Self::open_fragment(browser, &event_id, pacing).await
            }
        }
    }

    async fn open_fragment<B: Browser>(browser: &B, event_id: &str, pacing: &Pacing) -> Self {
        let return_to = match browser.current_url().await {
            Ok(url) => url,
            Err(err) => {
                tracing::debug!(%event_id, error = %err, "Cannot read current address, reading pane in place");
                return Self {
                    mode: PaneMode::InPlace,
                };
            }
        };

        let detail_url = detail_fragment_url(&return_to, event_id);
        if let Err(err) = browser.navigate(&detail_url).await {
            tracing::debug!(%detail_url, error = %err, "Fragment navigation failed");
        }
        pause(pacing.fragment_load).await;

        if let Err(err) = browser
            .wait_for(DETAIL_PANE_SELECTOR, pacing.pane_wait_timeout)
            .await
        {
            tracing::debug!(error = %err, "Detail pane did not appear");
        }

        Self {
            mode: PaneMode::Fragment { return_to },
        }
    }

    /// Reads every spec table on the page into `details`.
    ///
    /// Rows read before a failure are kept.
    pub(crate) async fn read<B: Browser>(
        &self,
        browser: &B,
        details: &mut EventDetail,
        pacing: &Pacing,
    ) -> BrowserResult<()> {
        pause(pacing.detail_read).await;

        let tables = browser.find_all(SPECS_TABLE_SELECTOR).await?;
        if tables.is_empty() {
            tracing::debug!("No spec tables found");
        }

        for table in &tables {
            for spec_row in browser.find_all_in(table, SPECS_ROW_SELECTOR).await? {
                let cells = browser.find_all_in(&spec_row, SPECS_CELL_SELECTOR).await?;
                if cells.len() < 2 {
                    continue;
                }

                let label = browser.text(&cells[0]).await?;
                let value = browser.text(&cells[1]).await?;
                apply_spec_rows(details, [(label.as_str(), value.as_str())]);
            }
        }

        Ok(())
    }

    /// Closes the pane, returning whether the page was reloaded.
    ///
    /// `date_url` is where to go when a clicked pane cannot be toggled shut.
    pub(crate) async fn close<B: Browser>(self, browser: &B, date_url: &str, pacing: &Pacing) -> bool {
        let navigated = match self.mode {
            PaneMode::InPlace => return false,
            PaneMode::Clicked { trigger } => match browser.click(&trigger).await {
                Ok(()) => false,
                Err(err) => {
                    tracing::debug!(error = %err, "Closing click failed, reloading date page");
                    reload(browser, date_url).await;
                    true
                }
            },
            PaneMode::Fragment { return_to } => {
                reload(browser, &return_to).await;
                true
            }
        };

        pause(pacing.pane_close).await;
        navigated
    }
}

async fn reload<B: Browser>(browser: &B, url: &str) {
    if let Err(err) = browser.navigate(url).await {
        tracing::warn!(%url, error = %err, "Failed to navigate back after detail pane");
    }
}

