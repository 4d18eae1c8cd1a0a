//! JSON encoding of a day's events for the key-value store.
//!
//! Values are stored as UTF-8 JSON text so they stay readable from
//! `redis-cli` and non-ASCII titles survive unchanged.

use crate::events::EventRecord;

use super::{CacheError, Result};

/// Encodes a day's events as a JSON array.
pub fn serialize_events(events: &[EventRecord]) -> Result<String> {
    serde_json::to_string(events).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Decodes a JSON array of events.
pub fn deserialize_events(value: &str) -> Result<Vec<EventRecord>> {
    serde_json::from_str(value).map_err(|e| CacheError::Serialization(e.to_string()))
}
