//! Serde helper functions for cached event payloads.
//!
//! Older cache entries and hand-edited fixtures sometimes carry `null` where
//! a string or list is expected. These helpers fold those into the empty value
//! so absence, `null` and `""` all mean the same thing.

use serde::{Deserialize, Deserializer};

/// Deserialize a string, treating `null` as the empty string.
pub fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.unwrap_or_default())
}

/// Deserialize a list of strings, treating `null` as an empty list.
pub fn deserialize_nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(v.unwrap_or_default())
}
