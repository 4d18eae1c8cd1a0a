//! Pure validation of requested date ranges.

use chrono::NaiveDate;

use super::{DateRange, ValidationError};

/// Limits applied to read requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeLimits {
    /// Maximum distance between start and end, in days.
    pub max_range_days: i64,
    /// Maximum distance of either end from today, in days.
    pub max_age_days: i64,
}

impl Default for RangeLimits {
    fn default() -> Self {
        Self {
            max_range_days: 30,
            max_age_days: 365,
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidFormat(value.to_string()))
}

/// Parses both ends of a range and checks that start <= end.
///
/// This is all the delete operation requires.
pub fn parse_range(start: &str, end: &str) -> Result<DateRange, ValidationError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    Ok(DateRange::new(start, end)?)
}

/// Validates a read request against `limits`, relative to `today`.
pub fn validate_range(
    start: &str,
    end: &str,
    today: NaiveDate,
    limits: RangeLimits,
) -> Result<DateRange, ValidationError> {
    let range = parse_range(start, end)?;

    if (range.end - range.start).num_days() > limits.max_range_days {
        return Err(ValidationError::RangeTooLong {
            max_days: limits.max_range_days,
        });
    }

    // A window reaching past chrono's date range leaves that side unbounded.
    let window = chrono::Duration::try_days(limits.max_age_days);
    let earliest = window.and_then(|w| today.checked_sub_signed(w));
    let latest = window.and_then(|w| today.checked_add_signed(w));
    if earliest.is_some_and(|earliest| range.start < earliest)
        || latest.is_some_and(|latest| range.end > latest)
    {
        return Err(ValidationError::OutOfWindow {
            max_days: limits.max_age_days,
        });
    }

    Ok(range)
}
