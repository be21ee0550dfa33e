//! Suggestion list markup: escaped names with the matched query wrapped in
//! `<mark>`.
//!
//! Escaping is applied to the raw segments around and inside the match, so
//! the emphasis tags themselves are never escaped and no raw markup from the
//! suggestion can survive. The match range is computed on the raw name; only
//! the first case-insensitive occurrence is wrapped.

use crate::escape::escape_html;
use crate::fold::{Locale, find_fold};

/// Opening emphasis tag for the matched substring.
pub const MARK_OPEN: &str = "<mark>";
/// Closing emphasis tag for the matched substring.
pub const MARK_CLOSE: &str = "</mark>";

/// Render a suggestion name for the list: escape it, wrapping the first
/// case-insensitive occurrence of `query` in [`MARK_OPEN`]/[`MARK_CLOSE`].
///
/// With an empty query, or no occurrence, returns the escaped name as-is.
#[must_use]
pub fn format_result(name: &str, query: &str, locale: Locale) -> String {
    let Some(range) = find_fold(name, query, locale) else {
        return escape_html(name).into_owned();
    };

    let mut out = String::with_capacity(name.len() + MARK_OPEN.len() + MARK_CLOSE.len());
    out.push_str(&escape_html(&name[..range.start]));
    out.push_str(MARK_OPEN);
    out.push_str(&escape_html(&name[range.start..range.end]));
    out.push_str(MARK_CLOSE);
    out.push_str(&escape_html(&name[range.end..]));
    out
}
