//! Glob matching for store keys.
//!
//! Only `*` is special: it matches any run of characters, including none.
//! This is the subset of Redis `KEYS` syntax the service relies on.

/// Checks whether `key` matches the glob `pattern`.
///
/// # Examples
///
/// ```
/// use fxcal_core::cache::pattern_matches;
///
/// assert!(pattern_matches("forex:events:*", "forex:events:2025-08-16:original"));
/// assert!(pattern_matches("forex:events:*:original", "forex:events:2025-08-16:original"));
/// assert!(!pattern_matches("forex:events:*:original", "forex:events:2025-08-16:paraphrased"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let mut parts = pattern.split('*');

    // `split` always yields at least one item.
    let head = parts.next().unwrap_or_default();
    let Some(mut remaining) = key.strip_prefix(head) else {
        return false;
    };

    let rest: Vec<&str> = parts.collect();
    let Some((tail, middle)) = rest.split_last() else {
        // No wildcard at all: the prefix must have consumed the whole key.
        return remaining.is_empty();
    };

    for part in middle.iter().filter(|part| !part.is_empty()) {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    remaining.ends_with(tail)
}
