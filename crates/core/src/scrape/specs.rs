//! Mapping of detail-pane spec table labels onto [`EventDetail`] fields.

use crate::events::EventDetail;

/// Separator used when several notes are folded into `ff_notes`.
pub const NOTES_SEPARATOR: &str = " | ";

/// Detail field a spec table label maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecField {
    Source,
    Measures,
    UsualEffect,
    Frequency,
    NextRelease,
    FfNotes,
    /// "Why Traders Care" text, appended to the notes.
    TradersCare,
    DerivedVia,
    AcroExpand,
    AlsoCalled,
    Speaker,
    Description,
}

impl SpecField {
    /// Classifies a label by substring. The first matching rule wins.
    pub fn classify(label: &str) -> Option<Self> {
        let rules: [(&[&str], SpecField); 12] = [
            (&["Source"], SpecField::Source),
            (&["Measures"], SpecField::Measures),
            (&["Usual Effect"], SpecField::UsualEffect),
            (&["Frequency"], SpecField::Frequency),
            (&["Next Release"], SpecField::NextRelease),
            (&["FF Notes"], SpecField::FfNotes),
            (&["Why Traders", "Care"], SpecField::TradersCare),
            (&["Derived Via"], SpecField::DerivedVia),
            (&["Acro Expand"], SpecField::AcroExpand),
            (&["Also Called"], SpecField::AlsoCalled),
            (&["Speaker"], SpecField::Speaker),
            (&["Description"], SpecField::Description),
        ];

        rules
            .iter()
            .find(|(needles, _)| needles.iter().any(|needle| label.contains(needle)))
            .map(|(_, field)| *field)
    }

    /// Writes `value` into the matching field of `details`.
    ///
    /// Every field is overwritten except [`SpecField::TradersCare`], which
    /// appends to existing notes.
    pub fn apply(self, details: &mut EventDetail, value: &str) {
        let value = value.to_string();
        match self {
            SpecField::Source => details.source = value,
            SpecField::Measures => details.measures = value,
            SpecField::UsualEffect => details.usual_effect = value,
            SpecField::Frequency => details.frequency = value,
            SpecField::NextRelease => details.next_release = value,
            SpecField::FfNotes => details.ff_notes = value,
            SpecField::TradersCare => {
                if details.ff_notes.is_empty() {
                    details.ff_notes = value;
                } else {
                    details.ff_notes.push_str(NOTES_SEPARATOR);
                    details.ff_notes.push_str(&value);
                }
            }
            SpecField::DerivedVia => details.derived_via = value,
            SpecField::AcroExpand => details.acro_expand = value,
            SpecField::AlsoCalled => details.also_called = value,
            SpecField::Speaker => details.speaker = value,
            SpecField::Description => details.description = value,
        }
    }
}

/// Applies `(label, value)` pairs read from spec tables, in order.
///
/// Labels and values are trimmed; unknown labels are ignored.
pub fn apply_spec_rows<'a, I>(details: &mut EventDetail, rows: I)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (label, value) in rows {
        if let Some(field) = SpecField::classify(label.trim()) {
            field.apply(details, value.trim());
        }
    }
}
