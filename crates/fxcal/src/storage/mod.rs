//! Date-partitioned view over the key-value store.

mod day_cache;

pub use day_cache::{DateRangeLookup, DayCache, PutOutcome};
