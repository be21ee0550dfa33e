#![forbid(unsafe_code)]

//! Host-agnostic autocomplete widget engine.
//!
//! One [`AutoComplete`] instance binds to one input-like control. The engine
//! owns the suggestion state machine: query normalization, the per-instance
//! [`QueryCache`] with its known-empty prefix shortcut, stale-response
//! sequencing, keyboard navigation with wrap-around, hover-vs-keyboard
//! highlight tracking, and the blur-delay teardown. Everything observable
//! goes through the [`Host`] trait; suggestion fetching goes through
//! [`Lookup`].
//!
//! # Wiring
//!
//! ```ignore
//! use typeahead::{AutoComplete, Options, UiState};
//!
//! let mut widget = AutoComplete::new(
//!     "header_search",
//!     Options::new().highlight().cache(),
//!     UiState::default(),
//!     my_dom_host,
//!     my_graphql_lookup,
//! )
//! .with_on_select(|value| navigate_to_topic(value));
//!
//! // Driver loop: forward input, key, focus, timer, and lookup events.
//! widget.input_changed("bana");
//! // ... when the lookup settles:
//! widget.lookup_resolved(seq, Ok(suggestions));
//! ```
//!
//! The widget performs escaping itself: lookups hand back raw
//! [`Suggestion`] text, and every rendered row carries escaped markup plus
//! an escaped commit value.

pub mod cache;
pub mod event;
pub mod harness;
pub mod host;
pub mod suggestion;
pub mod ui;
pub mod widget;

pub use cache::{Cached, QueryCache};
pub use event::{Key, KeyDisposition, Modifiers, Row};
pub use host::{Host, Lookup, LookupError, LookupSeq, Placement, PopupHandle, TimerToken};
pub use suggestion::{RenderedItem, Suggestion, element_id};
pub use ui::{DEFAULT_NO_RESULTS, UiState};
pub use widget::{AutoComplete, BLUR_DELAY, Options};
