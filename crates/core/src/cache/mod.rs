mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{day_key, events_pattern, parse_day_key, EVENTS_KEY_PREFIX};
pub use patterns::pattern_matches;
pub use serialization::{deserialize_events, serialize_events};
pub use traits::{KeyValueStore, StoreStats};
