//! Cache-aside acquisition of calendar events for a date range.
//!
//! Cached days are served from the store; only the missing days are scraped,
//! and every scraped day (including days without events) is written back in
//! both variants so it is never scraped again.

use std::sync::Arc;

use chrono::NaiveDate;

use fxcal_core::derive::Transformer;
use fxcal_core::events::{
    group_events_by_date, sort_events, AcquisitionError, DateRange, EventRecord, Provenance,
    Variant,
};
use fxcal_core::scrape::Scraper;

use crate::storage::DayCache;

/// Events for a range, with where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquired {
    pub events: Vec<EventRecord>,
    pub provenance: Provenance,
    /// Dates handed to the scraper, chronological.
    pub scraped_dates: Vec<NaiveDate>,
    /// Dates served from the store, chronological.
    pub cached_dates: Vec<NaiveDate>,
}

pub struct Orchestrator {
    cache: DayCache,
    scraper: Arc<dyn Scraper>,
    transformer: Arc<Transformer>,
}

impl Orchestrator {
    pub fn new(cache: DayCache, scraper: Arc<dyn Scraper>, transformer: Arc<Transformer>) -> Self {
        Self {
            cache,
            scraper,
            transformer,
        }
    }

    /// Returns every event of `range`, scraping only the days not yet cached.
    ///
    /// Fails only when scraping fails and no cached event exists to return.
    /// When scraping fails but cached events exist, those are returned as
    /// [`Provenance::Database`].
    pub async fn get_events(
        &self,
        range: DateRange,
        want_raw: bool,
    ) -> Result<Acquired, AcquisitionError> {
        let variant = Variant::from_want_raw(want_raw);
        let lookup = self.cache.get_date_range(&range, variant).await;

        let cached_dates: Vec<NaiveDate> = lookup.hits.keys().copied().collect();
        let missing = lookup.missing_dates;
        let mut events: Vec<EventRecord> = lookup.hits.into_values().flatten().collect();

        tracing::info!(
            start = %range.start,
            end = %range.end,
            %variant,
            cached = cached_dates.len(),
            missing = missing.len(),
            "Resolved cached days"
        );

        let mut scraped_dates = Vec::new();
        let mut provenance = Provenance::classify(cached_dates.len(), missing.len());
        if !missing.is_empty() {
            match self.scraper.scrape(&missing).await {
                Ok(scraped) => {
                    events.extend(self.store_scraped(&missing, scraped, variant).await);
                    scraped_dates = missing.clone();
                }
                Err(err) if events.is_empty() => {
                    tracing::error!(error = %err, "Scraping failed and no cached events exist");
                    return Err(err.into());
                }
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        cached_events = events.len(),
                        "Scraping failed, returning cached events only"
                    );
                    provenance = Provenance::Database;
                }
            }
        }

        sort_events(&mut events);

        tracing::info!(events = events.len(), %provenance, "Acquired events");
        Ok(Acquired {
            events,
            provenance,
            scraped_dates,
            cached_dates,
        })
    }

    /// Persists scraped events per missing day and returns them in `variant`.
    async fn store_scraped(
        &self,
        missing: &[NaiveDate],
        scraped: Vec<EventRecord>,
        variant: Variant,
    ) -> Vec<EventRecord> {
        let scraped: Vec<EventRecord> = scraped.into_iter().filter(|e| !e.is_noise()).collect();
        let (by_date, stray) = group_events_by_date(missing, scraped);
        if !stray.is_empty() {
            tracing::warn!(count = stray.len(), "Discarding scraped events outside requested dates");
        }

        let mut result = Vec::new();
        for (date, day_events) in by_date {
            let outcome = self.cache.put_day(date, &day_events, &self.transformer).await;
            if !outcome.is_complete() {
                tracing::warn!(%date, ?outcome, "Day only partially cached");
            }

            match variant {
                Variant::Raw => result.extend(day_events),
                Variant::Derived => result.extend(self.transformer.derive_all(&day_events)),
            }
        }

        result
    }
}
