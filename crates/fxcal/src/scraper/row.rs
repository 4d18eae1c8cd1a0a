//! Basic field extraction from one calendar row.

use chrono::NaiveDate;

use fxcal_core::events::{EventRecord, Impact};
use fxcal_core::scrape::{impact_from_class, Browser, ElementHandle, RowSelectors, SelectorChain};

/// Reads the summary fields of `row`. Fields no candidate satisfies stay empty.
pub(crate) async fn extract_basic<B: Browser>(
    browser: &B,
    row: &ElementHandle,
    selectors: &RowSelectors,
    date: NaiveDate,
) -> EventRecord {
    let mut event = EventRecord::new(date);

    event.time = first_accepted(browser, row, &selectors.time)
        .await
        .unwrap_or_default();
    event.currency = first_accepted(browser, row, &selectors.currency)
        .await
        .unwrap_or_default();
    event.impact = read_impact(browser, row, &selectors.impact).await;
    event.event = first_accepted(browser, row, &selectors.event)
        .await
        .unwrap_or_default();
    event.actual = first_accepted(browser, row, &selectors.actual)
        .await
        .unwrap_or_default();
    event.forecast = first_accepted(browser, row, &selectors.forecast)
        .await
        .unwrap_or_default();
    event.previous = first_accepted(browser, row, &selectors.previous)
        .await
        .unwrap_or_default();

    event
}

/// Text of the first candidate the chain accepts.
///
/// A failing candidate counts as no match.
async fn first_accepted<B: Browser>(
    browser: &B,
    row: &ElementHandle,
    chain: &SelectorChain,
) -> Option<String> {
    for candidate in &chain.candidates {
        let element = match browser.find_in(row, candidate).await {
            Ok(Some(element)) => element,
            Ok(None) => continue,
            Err(err) => {
                tracing::trace!(selector = %candidate, error = %err, "Selector failed");
                continue;
            }
        };

        let Ok(text) = browser.text(&element).await else {
            continue;
        };

        if let Some(text) = chain.accepted(&text) {
            return Some(text);
        }
    }

    None
}

/// The first candidate that matches an element decides, by its `class`.
async fn read_impact<B: Browser>(browser: &B, row: &ElementHandle, candidates: &[String]) -> Impact {
    for candidate in candidates {
        if let Ok(Some(element)) = browser.find_in(row, candidate).await {
            let class = browser
                .attribute(&element, "class")
                .await
                .ok()
                .flatten()
                .unwrap_or_default();
            return impact_from_class(&class);
        }
    }

    Impact::Low
}
