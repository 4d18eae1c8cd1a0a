//! Ordered selector candidates for each field of a calendar row.

use crate::events::Impact;

/// Rule a candidate's trimmed text must satisfy to be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// Any non-empty text.
    NonEmpty,
    /// Non-empty text other than the literal `"All Day"`.
    NotAllDay,
    /// Non-empty text of at most this many characters.
    AtMostChars(usize),
    /// Text longer than this many characters.
    MoreThanChars(usize),
}

impl Accept {
    pub fn accepts(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        match self {
            Accept::NonEmpty => true,
            Accept::NotAllDay => text != "All Day",
            Accept::AtMostChars(max) => text.chars().count() <= *max,
            Accept::MoreThanChars(min) => text.chars().count() > *min,
        }
    }
}

/// Selectors tried in order; the first whose text is accepted wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorChain {
    pub candidates: Vec<String>,
    pub accept: Accept,
}

impl SelectorChain {
    pub fn new(candidates: &[&str], accept: Accept) -> Self {
        Self {
            candidates: candidates.iter().map(|c| (*c).to_string()).collect(),
            accept,
        }
    }

    /// Returns the trimmed text if `accept` takes it.
    pub fn accepted(&self, text: &str) -> Option<String> {
        let text = text.trim();
        self.accept.accepts(text).then(|| text.to_string())
    }

    fn reading(field: &str) -> Self {
        let span = format!(".calendar__{} span", field);
        let cell = format!(".calendar__{}", field);
        let fuzzy = format!("[class*='{}']", field);
        Self::new(&[span.as_str(), cell.as_str(), fuzzy.as_str()], Accept::NonEmpty)
    }
}

/// Selector chains for every field extracted from a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelectors {
    pub time: SelectorChain,
    pub currency: SelectorChain,
    /// The first candidate that matches an element decides the impact.
    pub impact: Vec<String>,
    pub event: SelectorChain,
    pub actual: SelectorChain,
    pub forecast: SelectorChain,
    pub previous: SelectorChain,
}

impl Default for RowSelectors {
    fn default() -> Self {
        Self::standard()
    }
}

impl RowSelectors {
    pub fn standard() -> Self {
        Self {
            time: SelectorChain::new(
                &[
                    ".calendar__time span",
                    ".calendar__time",
                    "[class*='time']",
                    "td:nth-child(2)",
                    "td:first-child",
                ],
                Accept::NotAllDay,
            ),
            currency: SelectorChain::new(
                &[
                    ".calendar__currency span",
                    ".calendar__currency",
                    "[class*='currency']",
                    "td:nth-child(3)",
                    "td:nth-child(2)",
                ],
                Accept::AtMostChars(3),
            ),
            impact: [
                ".calendar__impact span",
                ".calendar__impact",
                "[class*='impact']",
                "td:nth-child(4)",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            event: SelectorChain::new(
                &[
                    ".calendar__event .calendar__event-title",
                    ".calendar__event",
                    "[class*='event']",
                    "td:nth-child(5)",
                    "td:nth-child(4)",
                ],
                Accept::MoreThanChars(2),
            ),
            actual: SelectorChain::reading("actual"),
            forecast: SelectorChain::reading("forecast"),
            previous: SelectorChain::reading("previous"),
        }
    }
}

/// Maps the `class` attribute of an impact icon to an [`Impact`].
pub fn impact_from_class(class: &str) -> Impact {
    let class = class.to_lowercase();
    if class.contains("ff-impact-red") {
        Impact::High
    } else if class.contains("ff-impact-ora") {
        Impact::Medium
    } else {
        Impact::Low
    }
}
