//! Collaborator seams: the document host, popup positioning, timers, and
//! the asynchronous lookup.
//!
//! The widget engine never touches a document directly. Every observable
//! effect goes through [`Host`]; the host owns the input element, the
//! listbox element, the floating-position machinery, and the timer source.
//! Lookups are fire-and-forget through [`Lookup`]: the driver performs the
//! request and feeds the outcome back via
//! [`AutoComplete::lookup_resolved`](crate::AutoComplete::lookup_resolved).

use std::fmt;
use std::time::Duration;

use crate::suggestion::RenderedItem;

/// Popup placement relative to the input. Only bottom-start is used today;
/// the parameter exists so positioners keep a general signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Below the input, aligned to its leading edge.
    #[default]
    BottomStart,
}

/// Handle to an active floating-position binding.
///
/// Dropping position updates must happen synchronously within the event
/// that closes the popup, so teardown is an explicit consuming call rather
/// than a `Drop` side effect.
pub trait PopupHandle {
    /// Tear down the position binding.
    fn destroy(self);
}

/// Sequence number stamped on each dispatched lookup. Strictly increasing
/// per widget; the widget renders a resolution only if its sequence is the
/// newest one dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupSeq(u64);

impl LookupSeq {
    pub(crate) const fn new(n: u64) -> Self {
        Self(n)
    }

    /// Raw sequence value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Opaque identifier for a scheduled timer, issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Wrap a host-assigned timer id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw timer id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A failed lookup: network error, non-OK response, or malformed payload.
/// The widget fails open on these (renders nothing, caches nothing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    message: String,
}

impl LookupError {
    /// Create an error with a human-readable cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup failed: {}", self.message)
    }
}

impl std::error::Error for LookupError {}

/// Caller-supplied suggestion source.
///
/// `dispatch` must not block: it starts whatever request backs the query
/// and returns. When the request settles the driver calls
/// [`AutoComplete::lookup_resolved`](crate::AutoComplete::lookup_resolved)
/// with the same sequence number. Resolutions may arrive in any order.
pub trait Lookup {
    /// Start resolving `query`. `seq` identifies this request.
    fn dispatch(&mut self, seq: LookupSeq, query: &str);
}

/// Effect surface the widget drives.
///
/// Methods mirror the document operations of the original widget one to
/// one, so a DOM-backed host is a thin adapter. Hosts must stop click
/// events on the listbox from propagating to outer document handlers, and
/// must keep the listbox adjacent to the input so focus-stealing clicks
/// land before the blur timer fires.
pub trait Host {
    /// Floating-position binding type returned by [`Host::create_popup`].
    type Popup: PopupHandle;

    /// Create the (hidden, empty) listbox element with the given id,
    /// inserted next to the input.
    fn create_listbox(&mut self, id: &str);

    /// Wire the input as a combobox owning `listbox_id`: native
    /// autocompletion off, `role=combobox`, `aria-owns`,
    /// `aria-autocomplete=list`, `aria-expanded=false`.
    fn configure_combobox(&mut self, listbox_id: &str);

    /// Update `aria-expanded` on the input.
    fn set_expanded(&mut self, expanded: bool);

    /// Update `aria-activedescendant` on the input.
    fn set_active_descendant(&mut self, id: Option<&str>);

    /// Write `text` into the input.
    fn set_input_value(&mut self, text: &str);

    /// Replace the listbox content with one row per item. Row `i` carries
    /// id [`element_id(i)`](crate::element_id) and `data-value` set to the
    /// item's escaped value.
    fn show_items(&mut self, items: &[RenderedItem]);

    /// Replace the listbox content with the single non-selectable
    /// no-results row (assertive live region).
    fn show_no_results(&mut self, message: &str);

    /// Remove all listbox content.
    fn clear_listbox(&mut self);

    /// Make the listbox visible.
    fn show_popup(&mut self);

    /// Hide the listbox.
    fn hide_popup(&mut self);

    /// Mark exactly the row at `index` visually selected, or clear every
    /// selection mark.
    fn set_highlight(&mut self, index: Option<usize>);

    /// Bind the floating-position machinery between input and listbox.
    fn create_popup(&mut self, placement: Placement) -> Self::Popup;

    /// Schedule a one-shot timer; the driver reports expiry through
    /// [`AutoComplete::timer_elapsed`](crate::AutoComplete::timer_elapsed).
    fn schedule_timer(&mut self, delay: Duration) -> TimerToken;

    /// Cancel a scheduled timer. Cancelling an already-fired timer is a
    /// no-op.
    fn cancel_timer(&mut self, token: TimerToken);
}
