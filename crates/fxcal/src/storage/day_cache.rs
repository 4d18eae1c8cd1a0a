//! Per-date cache adapter.
//!
//! Every calendar date is cached under two independent keys, one per
//! [`Variant`]. On the read path any store or decoding failure degrades to a
//! miss so a flaky store costs a re-scrape, never a failed request.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use fxcal_core::cache::{
    day_key, deserialize_events, events_pattern, serialize_events, KeyValueStore, Result,
    StoreStats,
};
use fxcal_core::derive::Transformer;
use fxcal_core::events::{DateRange, EventRecord, Variant};

/// Result of looking up every date of a range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeLookup {
    /// Cached events per date. An empty list is a cached "no events" day.
    pub hits: BTreeMap<NaiveDate, Vec<EventRecord>>,
    /// Dates with nothing usable cached, in chronological order.
    pub missing_dates: Vec<NaiveDate>,
}

/// Which variants of a day were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutOutcome {
    pub raw_written: bool,
    pub derived_written: bool,
}

impl PutOutcome {
    pub fn is_complete(&self) -> bool {
        self.raw_written && self.derived_written
    }
}

/// Cache-aside adapter keyed by `(date, variant)`.
#[derive(Clone)]
pub struct DayCache {
    store: Arc<dyn KeyValueStore>,
}

impl DayCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn key_for(&self, date: NaiveDate, variant: Variant) -> String {
        day_key(date, variant)
    }

    /// Reads one date, returning `None` on a miss, a store error or an
    /// undecodable value.
    async fn lookup(&self, date: NaiveDate, variant: Variant) -> Option<Vec<EventRecord>> {
        let key = self.key_for(date, variant);

        let value = match self.store.get(&key).await {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(%date, %variant, error = %err, "Store read failed, treating as miss");
                return None;
            }
        };

        match deserialize_events(&value) {
            Ok(events) => Some(events),
            Err(err) => {
                tracing::warn!(%date, %variant, error = %err, "Cached day is undecodable, treating as miss");
                None
            }
        }
    }

    /// Partitions `range` into cached and missing dates.
    pub async fn get_date_range(&self, range: &DateRange, variant: Variant) -> DateRangeLookup {
        let mut lookup = DateRangeLookup::default();

        for date in range.days() {
            match self.lookup(date, variant).await {
                Some(events) => {
                    tracing::debug!(%date, %variant, count = events.len(), "Cache hit");
                    lookup.hits.insert(date, events);
                }
                None => {
                    tracing::debug!(%date, %variant, "Cache miss");
                    lookup.missing_dates.push(date);
                }
            }
        }

        lookup
    }

    /// Events cached for one date, empty on a miss.
    pub async fn get_one(&self, date: NaiveDate, variant: Variant) -> Vec<EventRecord> {
        self.lookup(date, variant).await.unwrap_or_default()
    }

    /// Writes a day's raw events and their derived counterparts.
    ///
    /// The two writes are independent; a failure of one does not undo the
    /// other.
    pub async fn put_day(
        &self,
        date: NaiveDate,
        raw_events: &[EventRecord],
        transformer: &Transformer,
    ) -> PutOutcome {
        let derived_events = transformer.derive_all(raw_events);

        let raw_written = self.write(date, Variant::Raw, raw_events).await;
        let derived_written = self.write(date, Variant::Derived, &derived_events).await;

        if raw_written && derived_written {
            tracing::info!(%date, count = raw_events.len(), "Saved day (raw + derived)");
        }

        PutOutcome {
            raw_written,
            derived_written,
        }
    }

    async fn write(&self, date: NaiveDate, variant: Variant, events: &[EventRecord]) -> bool {
        let value = match serialize_events(events) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(%date, %variant, error = %err, "Failed to encode day");
                return false;
            }
        };

        match self.store.set(&self.key_for(date, variant), &value).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(%date, %variant, error = %err, "Failed to cache day");
                false
            }
        }
    }

    /// Deletes both variants of every date in `range`.
    ///
    /// Returns the number of keys actually removed. Failures are logged and
    /// the remaining dates are still processed.
    pub async fn delete_range(&self, range: &DateRange) -> u64 {
        let mut deleted = 0;

        for date in range.days() {
            for variant in [Variant::Raw, Variant::Derived] {
                match self.store.delete(&self.key_for(date, variant)).await {
                    Ok(count) => deleted += count,
                    Err(err) => {
                        tracing::error!(%date, %variant, error = %err, "Failed to delete cached day");
                    }
                }
            }
        }

        if deleted > 0 {
            tracing::info!(start = %range.start, end = %range.end, deleted, "Deleted cached days");
        } else {
            tracing::info!(start = %range.start, end = %range.end, "No cached days to delete");
        }

        deleted
    }

    /// True only if every date of `range` has `variant` cached.
    pub async fn exists_range(&self, range: &DateRange, variant: Variant) -> bool {
        for date in range.days() {
            match self.store.exists(&self.key_for(date, variant)).await {
                Ok(true) => continue,
                Ok(false) => return false,
                Err(err) => {
                    tracing::warn!(%date, %variant, error = %err, "Store exists check failed");
                    return false;
                }
            }
        }
        true
    }

    /// Store statistics plus the number of cached event keys.
    ///
    /// Failures are logged and leave the affected fields out.
    pub async fn stats(&self) -> StoreStats {
        let mut stats = match self.store.info().await {
            Ok(stats) => stats,
            Err(err) => {
                tracing::error!(error = %err, "Failed to read store statistics");
                StoreStats::new()
            }
        };

        match self.store.keys(&events_pattern()).await {
            Ok(keys) => {
                stats.insert("total_keys".to_string(), keys.len().into());
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to list cached days");
            }
        }

        stats
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}
