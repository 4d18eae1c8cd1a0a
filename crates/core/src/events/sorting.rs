use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::types::EventRecord;

/// Orders two events by `(date, time)`.
///
/// Dates compare chronologically, which for four-digit years is identical to
/// comparing their `YYYY-MM-DD` strings. Times compare as plain strings, so an
/// all-day event (`""`) sorts first and `"10:00am"` sorts before `"1:30pm"`.
pub fn compare_events(a: &EventRecord, b: &EventRecord) -> Ordering {
    a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time))
}

/// Stable sort of events ascending by `(date, time)`.
pub fn sort_events(events: &mut [EventRecord]) {
    events.sort_by(compare_events);
}

/// Groups events by date, keeping encounter order within each date.
///
/// Every date in `dates` is present in the result, mapped to an empty list when
/// no event carries it. Events for dates outside `dates` are returned
/// separately so callers can decide what to do with them.
pub fn group_events_by_date(
    dates: &[NaiveDate],
    events: Vec<EventRecord>,
) -> (BTreeMap<NaiveDate, Vec<EventRecord>>, Vec<EventRecord>) {
    let mut grouped: BTreeMap<NaiveDate, Vec<EventRecord>> =
        dates.iter().map(|date| (*date, Vec::new())).collect();
    let mut stray = Vec::new();

    for event in events {
        match grouped.get_mut(&event.date) {
            Some(bucket) => bucket.push(event),
            None => stray.push(event),
        }
    }

    (grouped, stray)
}
