//! HTML entity escaping for suggestion text.
//!
//! Suggestion names and values come straight from user-generated content
//! (topic titles, usernames) and are interpolated into list markup, so both
//! fields must be escaped before rendering.

use std::borrow::Cow;

/// Replacement entity for a single escapable character, if any.
fn entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape the five HTML-significant characters (`& < > " '`).
///
/// Returns the input unchanged (borrowed) when nothing needs escaping,
/// which is the common case for suggestion text.
#[must_use]
pub fn escape_html(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(|c| entity(c).is_some()) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 8);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}
