//! Addresses and fixed markup hooks of the calendar site.

use chrono::{Datelike, NaiveDate};

/// Default site root.
pub const DEFAULT_BASE_URL: &str = "https://www.forexfactory.com";

/// One table row per calendar event.
pub const ROW_SELECTOR: &str = "tr[data-event-id]";
/// Row attribute carrying the site's event id.
pub const ROW_ID_ATTRIBUTE: &str = "data-event-id";
/// Link inside a row that toggles its detail pane.
pub const DETAIL_LINK_SELECTOR: &str = "a.calendar__detail-link";
/// Container rendered once a detail pane has loaded.
pub const DETAIL_PANE_SELECTOR: &str = "div.half.details";

pub const SPECS_TABLE_SELECTOR: &str = "table.calendarspecs";
pub const SPECS_ROW_SELECTOR: &str = "tr";
pub const SPECS_CELL_SELECTOR: &str = "td";

/// Page text shown by the site's bot challenge.
pub const BOT_MARKERS: [&str; 2] = ["Just a moment", "Checking your browser"];

/// Address of the calendar page for one day, e.g. `.../calendar?day=aug16.2025`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fxcal_core::scrape::calendar_url;
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 6).unwrap();
/// assert_eq!(
///     calendar_url("https://www.forexfactory.com", date),
///     "https://www.forexfactory.com/calendar?day=aug6.2025"
/// );
/// ```
pub fn calendar_url(base_url: &str, date: NaiveDate) -> String {
    format!(
        "{}/calendar?day={}{}.{}",
        base_url.trim_end_matches('/'),
        date.format("%b").to_string().to_lowercase(),
        date.day(),
        date.year()
    )
}

/// Address that opens an event's detail pane through the URL fragment.
pub fn detail_fragment_url(current_url: &str, event_id: &str) -> String {
    format!("{}#detail={}", current_url, event_id)
}

/// True when the page text belongs to the bot challenge rather than the calendar.
pub fn is_bot_challenge(body_text: &str) -> bool {
    BOT_MARKERS.iter().any(|marker| body_text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_url_uses_lowercase_month_and_unpadded_day() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 16).unwrap();
        assert_eq!(
            calendar_url(DEFAULT_BASE_URL, date),
            "https://www.forexfactory.com/calendar?day=aug16.2025"
        );

        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(
            calendar_url("http://localhost:8080/", date),
            "http://localhost:8080/calendar?day=dec1.2024"
        );
    }

    #[test]
    fn test_detail_fragment_url() {
        assert_eq!(
            detail_fragment_url("https://www.forexfactory.com/calendar?day=aug16.2025", "142857"),
            "https://www.forexfactory.com/calendar?day=aug16.2025#detail=142857"
        );
    }

    #[test]
    fn test_bot_challenge_detection() {
        assert!(is_bot_challenge("Just a moment..."));
        assert!(is_bot_challenge("Please wait. Checking your browser before accessing"));
        assert!(!is_bot_challenge("Sat Aug 16 USD CPI m/m"));
        assert!(!is_bot_challenge(""));
    }
}
