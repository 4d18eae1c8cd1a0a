use crate::events::EventRecord;

use super::RewriteTable;

/// Deterministic text rewriting that produces the derived variant of an event.
#[derive(Debug, Clone)]
pub struct Transformer {
    table: RewriteTable,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(RewriteTable::standard())
    }
}

impl Transformer {
    pub fn new(table: RewriteTable) -> Self {
        Self { table }
    }

    /// Rewrites one piece of text.
    ///
    /// Blank text and a bare `"0"` become empty. Otherwise abbreviations are
    /// expanded, then descriptive terms are lengthened, and text left untouched
    /// by both passes gets a contextual prefix when one applies.
    pub fn derive_text(&self, text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "0" {
            return String::new();
        }

        let mut derived = text.to_string();

        for rewrite in &self.table.abbreviations {
            derived = derived.replace(rewrite.from.as_str(), &rewrite.to);
        }

        for rewrite in &self.table.descriptive {
            if derived.contains(rewrite.from.as_str()) && !derived.contains(rewrite.to.as_str()) {
                derived = derived.replace(rewrite.from.as_str(), &rewrite.to);
            }
        }

        if derived == text {
            if let Some(template) = self.table.templates.iter().find(|t| t.matches(text)) {
                derived = format!("{} - {}", template.label, text);
            }
        }

        derived
    }

    /// Returns the derived copy of an event.
    ///
    /// Date, time, currency, impact and the list fields are copied as is.
    pub fn derive(&self, event: &EventRecord) -> EventRecord {
        let mut derived = event.clone();

        for field in [
            &mut derived.event,
            &mut derived.actual,
            &mut derived.forecast,
            &mut derived.previous,
        ] {
            *field = self.derive_text(field);
        }

        for field in derived.details.text_fields_mut() {
            *field = self.derive_text(field);
        }

        derived
    }

    pub fn derive_all(&self, events: &[EventRecord]) -> Vec<EventRecord> {
        events.iter().map(|event| self.derive(event)).collect()
    }
}
