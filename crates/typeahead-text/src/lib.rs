#![forbid(unsafe_code)]

//! Text safety and matching primitives for typeahead suggestion lists.
//!
//! This crate provides the pieces the widget engine needs before anything
//! reaches a document:
//! - [`escape_html`] - entity-escape untrusted suggestion text
//! - [`Locale`] - locale-aware lowercasing (Turkish dotted/dotless *i*)
//! - [`normalize_query`] - canonical form of what the user typed
//! - [`find_fold`] - first case-insensitive occurrence of a query in a name
//! - [`format_result`] - escaped list markup with the match wrapped in `<mark>`
//!
//! # Example
//! ```
//! use typeahead_text::{Locale, escape_html, format_result, normalize_query};
//!
//! let query = normalize_query("  Bana ", Locale::En);
//! assert_eq!(query, "bana");
//!
//! // Escaping happens segment by segment; the mark tags stay intact.
//! assert_eq!(
//!     format_result("Banana", &query, Locale::En),
//!     "<mark>Bana</mark>na",
//! );
//!
//! // Hostile names render as inert text.
//! assert_eq!(escape_html("<script>"), "&lt;script&gt;");
//! ```

pub mod escape;
pub mod fold;
pub mod markup;

pub use escape::escape_html;
pub use fold::{Locale, find_fold, normalize_query};
pub use markup::{MARK_CLOSE, MARK_OPEN, format_result};
