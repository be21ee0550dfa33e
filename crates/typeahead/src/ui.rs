//! Shared view state, constructed explicitly by the page and handed to
//! each widget instance. Nothing here is a global.

use typeahead_text::Locale;

/// Default placeholder shown when a query yields nothing.
pub const DEFAULT_NO_RESULTS: &str = "-- no corresponding results --";

/// Page-level view state a widget needs: the casing locale and the
/// translated no-results message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Locale used for query normalization and match search.
    pub locale: Locale,
    /// Message rendered on empty (non-silent) result sets.
    pub no_results_message: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            no_results_message: DEFAULT_NO_RESULTS.to_string(),
        }
    }
}

impl UiState {
    /// State for a given locale with the default message.
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Override the no-results message (builder).
    #[must_use]
    pub fn with_no_results_message(mut self, message: impl Into<String>) -> Self {
        self.no_results_message = message.into();
        self
    }
}
