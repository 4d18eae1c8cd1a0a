use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_nullable_list, deserialize_nullable_string};

/// Expected market impact of a calendar event.
///
/// Deserialization is lenient: any value other than `High` or `Medium`
/// becomes `Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Impact {
    High,
    Medium,
    #[default]
    Low,
}

impl Impact {
    /// Parses an impact label, coercing anything unrecognized to `Low`.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "High" => Impact::High,
            "Medium" => Impact::Medium,
            _ => Impact::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

impl From<Option<String>> for Impact {
    fn from(value: Option<String>) -> Self {
        value
            .as_deref()
            .map(Impact::parse_lenient)
            .unwrap_or_default()
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extended descriptive fields harvested from an event's detail pane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDetail {
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub source: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub measures: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub usual_effect: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub frequency: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub next_release: String,
    /// Site notes. "Why Traders Care" text is appended here as well.
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub ff_notes: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub derived_via: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub acro_expand: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub also_called: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub speaker: String,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub description: String,
    #[serde(deserialize_with = "deserialize_nullable_list")]
    pub related_stories: Vec<String>,
    #[serde(deserialize_with = "deserialize_nullable_list")]
    pub history: Vec<String>,
}

impl EventDetail {
    /// Mutable references to the eleven free-text fields, in declaration order.
    pub fn text_fields_mut(&mut self) -> [&mut String; 11] {
        [
            &mut self.source,
            &mut self.measures,
            &mut self.usual_effect,
            &mut self.frequency,
            &mut self.next_release,
            &mut self.ff_notes,
            &mut self.derived_via,
            &mut self.acro_expand,
            &mut self.also_called,
            &mut self.speaker,
            &mut self.description,
        ]
    }

    /// Number of populated fields (text fields plus non-empty lists).
    pub fn populated_count(&self) -> usize {
        let text = [
            &self.source,
            &self.measures,
            &self.usual_effect,
            &self.frequency,
            &self.next_release,
            &self.ff_notes,
            &self.derived_via,
            &self.acro_expand,
            &self.also_called,
            &self.speaker,
            &self.description,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .count();

        text + usize::from(!self.related_stories.is_empty()) + usize::from(!self.history.is_empty())
    }
}

/// One row of the economic calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub date: NaiveDate,
    /// Clock string as shown on the site. Empty means all day.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub time: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub currency: String,
    #[serde(default)]
    pub impact: Impact,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub event: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub actual: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub forecast: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub previous: String,
    #[serde(default)]
    pub details: EventDetail,
}

impl EventRecord {
    /// Creates an empty record for the given date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            time: String::new(),
            currency: String::new(),
            impact: Impact::Low,
            event: String::new(),
            actual: String::new(),
            forecast: String::new(),
            previous: String::new(),
            details: EventDetail::default(),
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    pub fn with_readings(
        mut self,
        actual: impl Into<String>,
        forecast: impl Into<String>,
        previous: impl Into<String>,
    ) -> Self {
        self.actual = actual.into();
        self.forecast = forecast.into();
        self.previous = previous.into();
        self
    }

    pub fn with_details(mut self, details: EventDetail) -> Self {
        self.details = details;
        self
    }

    /// True when the row carries neither a title nor a currency.
    ///
    /// Such rows come from malformed markup and are never persisted.
    pub fn is_noise(&self) -> bool {
        self.event.is_empty() && self.currency.is_empty()
    }
}

/// The two independently cached renderings of a scraped day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Events exactly as extracted from the site.
    Raw,
    /// Events after the text derivation transformer.
    Derived,
}

impl Variant {
    pub fn from_want_raw(want_raw: bool) -> Self {
        if want_raw {
            Variant::Raw
        } else {
            Variant::Derived
        }
    }

    /// Key suffix used in the cache key scheme.
    pub fn key_suffix(&self) -> &'static str {
        match self {
            Variant::Raw => "original",
            Variant::Derived => "paraphrased",
        }
    }

    pub fn from_key_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "original" => Some(Variant::Raw),
            "paraphrased" => Some(Variant::Derived),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Raw => "raw",
            Variant::Derived => "derived",
        })
    }
}

/// Where the events in a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Every requested date was already cached.
    Database,
    /// No requested date was cached.
    Scrape,
    /// Some dates were cached and the rest were scraped.
    Hybrid,
}

impl Provenance {
    /// Classifies a response from the number of cached and missing dates.
    pub fn classify(cached_dates: usize, missing_dates: usize) -> Self {
        if missing_dates == 0 {
            Provenance::Database
        } else if cached_dates == 0 {
            Provenance::Scrape
        } else {
            Provenance::Hybrid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Database => "database",
            Provenance::Scrape => "scrape",
            Provenance::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
