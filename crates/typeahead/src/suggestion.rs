//! Suggestion payloads and their render-safe form.

use typeahead_text::{Locale, escape_html, format_result};

/// One candidate completion as produced by a lookup: raw display name and
/// raw commit value, both unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestion {
    /// Display text shown in the list.
    pub name: String,
    /// Value handed to the selection callback on commit.
    pub value: String,
}

impl Suggestion {
    /// Create a suggestion from raw name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A suggestion prepared for one render cycle.
///
/// `text` is the raw display name: it is what gets written back into the
/// input on arrow-key preview, Tab copy, and commit. `html` is the escaped
/// (and optionally match-highlighted) list markup. `value` is the escaped
/// commit value carried in the row's `data-value` attribute; the selection
/// callback receives this escaped form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    /// Raw display text, written into the input verbatim.
    pub text: String,
    /// Escaped list markup for this row.
    pub html: String,
    /// Escaped commit value.
    pub value: String,
}

impl RenderedItem {
    /// Build the render-safe form of `suggestion` for the given query.
    #[must_use]
    pub fn new(suggestion: &Suggestion, query: &str, highlight: bool, locale: Locale) -> Self {
        let html = if highlight {
            format_result(&suggestion.name, query, locale)
        } else {
            escape_html(&suggestion.name).into_owned()
        };
        Self {
            text: suggestion.name.clone(),
            html,
            value: escape_html(&suggestion.value).into_owned(),
        }
    }
}

/// Stable element id for the row at `index` (`cb-opt-{index}`), used for
/// `aria-activedescendant` wiring.
#[must_use]
pub fn element_id(index: usize) -> String {
    format!("cb-opt-{index}")
}
