use chrono::NaiveDate;

use crate::events::Variant;

/// Prefix shared by every event cache key.
pub const EVENTS_KEY_PREFIX: &str = "forex:events:";

/// Returns the cache key holding one date's events in the given variant.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fxcal_core::cache::day_key;
/// use fxcal_core::events::Variant;
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 16).unwrap();
/// assert_eq!(day_key(date, Variant::Raw), "forex:events:2025-08-16:original");
/// assert_eq!(day_key(date, Variant::Derived), "forex:events:2025-08-16:paraphrased");
/// ```
pub fn day_key(date: NaiveDate, variant: Variant) -> String {
    format!(
        "{}{}:{}",
        EVENTS_KEY_PREFIX,
        date.format("%Y-%m-%d"),
        variant.key_suffix()
    )
}

/// Returns the pattern matching every event cache key.
pub fn events_pattern() -> String {
    format!("{}*", EVENTS_KEY_PREFIX)
}

/// Parses a key produced by [`day_key`] back into its date and variant.
///
/// Returns `None` for keys outside the event namespace or with an unknown
/// suffix.
pub fn parse_day_key(key: &str) -> Option<(NaiveDate, Variant)> {
    let rest = key.strip_prefix(EVENTS_KEY_PREFIX)?;
    let (date, suffix) = rest.split_once(':')?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let variant = Variant::from_key_suffix(suffix)?;
    Some((date, variant))
}
