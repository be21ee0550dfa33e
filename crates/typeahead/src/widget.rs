//! The autocomplete widget state machine.
//!
//! One instance binds to one input-like control through a [`Host`]. Typed
//! input is normalized and resolved against a caller-supplied [`Lookup`]
//! (short-circuited by the optional [`QueryCache`]); results render into a
//! positioned popup with keyboard navigation, mouse selection, and an
//! explicit commit-vs-preview distinction.
//!
//! # Invariants
//!
//! 1. A highlighted `Row::Item(i)` always satisfies `i < items.len()`.
//! 2. While open, the listbox holds either the rendered items or exactly
//!    one no-results placeholder; never both, never neither.
//! 3. Every dispatched lookup carries a strictly increasing [`LookupSeq`];
//!    only the newest sequence may render its resolution.
//! 4. Popup teardown runs synchronously inside the event that closes the
//!    popup, and runs at most once per popup.

use std::collections::HashMap;
use std::time::Duration;

use typeahead_text::normalize_query;

use crate::cache::{Cached, QueryCache};
use crate::event::{Key, KeyDisposition, Modifiers, Row};
use crate::host::{Host, Lookup, LookupError, LookupSeq, Placement, PopupHandle, TimerToken};
use crate::suggestion::{RenderedItem, Suggestion, element_id};
use crate::ui::UiState;

/// Delay between focus leaving the input and the popup being torn down,
/// long enough for a click on the list to land first.
pub const BLUR_DELAY: Duration = Duration::from_millis(200);

/// Per-instance behavior flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Suppress the no-results row; empty result sets close the popup.
    pub silent: bool,
    /// Wrap the matched query substring in emphasis markup.
    pub highlight: bool,
    /// Cache result sets per normalized query.
    pub cache: bool,
}

impl Options {
    /// Default options: not silent, no highlighting, no cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the no-results row (builder).
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// Enable match highlighting (builder).
    #[must_use]
    pub fn highlight(mut self) -> Self {
        self.highlight = true;
        self
    }

    /// Enable the query cache (builder).
    #[must_use]
    pub fn cache(mut self) -> Self {
        self.cache = true;
        self
    }
}

/// Selection callback, invoked with the committed item's escaped value.
pub type OnSelect = Box<dyn FnMut(&str)>;

/// Autocomplete widget bound to a single input.
pub struct AutoComplete<H: Host, L: Lookup> {
    host: H,
    lookup: L,
    on_select: Option<OnSelect>,
    options: Options,
    ui: UiState,
    listbox_id: String,

    cache: Option<QueryCache>,
    items: Vec<RenderedItem>,
    placeholder_shown: bool,
    open: bool,
    popup: Option<H::Popup>,
    highlighted: Option<Row>,
    via_hover: bool,

    next_seq: u64,
    latest: Option<LookupSeq>,
    pending: HashMap<LookupSeq, String>,
    blur_timer: Option<TimerToken>,
}

impl<H: Host, L: Lookup> AutoComplete<H, L> {
    /// Bind a widget to the input identified by `input_id`.
    ///
    /// Creates the hidden, empty listbox (id `id_{input_id}`) next to the
    /// input and wires the combobox ARIA attributes. No lookup is
    /// dispatched here.
    #[must_use]
    pub fn new(input_id: &str, options: Options, ui: UiState, mut host: H, lookup: L) -> Self {
        let listbox_id = format!("id_{input_id}");
        host.create_listbox(&listbox_id);
        host.configure_combobox(&listbox_id);

        Self {
            host,
            lookup,
            on_select: None,
            options,
            ui,
            listbox_id,
            cache: options.cache.then(QueryCache::new),
            items: Vec::new(),
            placeholder_shown: false,
            open: false,
            popup: None,
            highlighted: None,
            via_hover: false,
            next_seq: 0,
            latest: None,
            pending: HashMap::new(),
            blur_timer: None,
        }
    }

    /// Set the selection callback (builder).
    #[must_use]
    pub fn with_on_select(mut self, on_select: impl FnMut(&str) + 'static) -> Self {
        self.on_select = Some(Box::new(on_select));
        self
    }

    // --- Accessors ---

    /// Whether the popup is currently shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Currently highlighted row, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<Row> {
        self.highlighted
    }

    /// Generated listbox element id.
    #[must_use]
    pub fn listbox_id(&self) -> &str {
        &self.listbox_id
    }

    /// The bound host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The bound lookup source.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// The query cache, when enabled.
    #[must_use]
    pub fn query_cache(&self) -> Option<&QueryCache> {
        self.cache.as_ref()
    }

    // --- Input events ---

    /// The input's text changed. `text` is the raw current value.
    pub fn input_changed(&mut self, text: &str) {
        self.highlighted = None;
        self.via_hover = false;

        let query = normalize_query(text, self.ui.locale);
        if query.is_empty() {
            if self.open {
                self.destroy();
            }
            return;
        }
        self.suggest(&query);
    }

    /// Focus left the input: schedule teardown after [`BLUR_DELAY`] so a
    /// click on the list can complete first. A pending blur timer is
    /// replaced, not stacked.
    pub fn focus_out(&mut self) {
        if let Some(previous) = self.blur_timer.take() {
            self.host.cancel_timer(previous);
        }
        self.blur_timer = Some(self.host.schedule_timer(BLUR_DELAY));
    }

    /// A host timer fired. Stale tokens (already cancelled or superseded)
    /// are ignored.
    pub fn timer_elapsed(&mut self, token: TimerToken) {
        if self.blur_timer == Some(token) {
            self.blur_timer = None;
            self.destroy();
        }
    }

    // --- Suggestion pipeline ---

    /// Resolve a normalized, non-empty query: cache short-circuit or
    /// lookup dispatch.
    fn suggest(&mut self, query: &str) {
        let cached = self.cache.as_ref().and_then(|cache| match cache.probe(query) {
            Cached::Empty => {
                #[cfg(feature = "tracing")]
                tracing::trace!(query, "known-empty prefix, rendering nothing");
                Some(Vec::new())
            }
            Cached::Hit(items) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(query, "cache hit");
                Some(items.to_vec())
            }
            Cached::Miss => None,
        });
        if let Some(items) = cached {
            self.render(items);
            return;
        }

        self.next_seq += 1;
        let seq = LookupSeq::new(self.next_seq);
        self.latest = Some(seq);
        self.pending.insert(seq, query.to_string());
        #[cfg(feature = "tracing")]
        tracing::trace!(query, seq = seq.get(), "dispatching lookup");
        self.lookup.dispatch(seq, query);
    }

    /// A dispatched lookup settled. Successful result sets are rendered
    /// with the query that produced them and recorded in the cache; a
    /// failure fails open (renders nothing, caches nothing). Resolutions
    /// whose sequence is not the newest dispatched are cached but never
    /// rendered.
    pub fn lookup_resolved(&mut self, seq: LookupSeq, outcome: Result<Vec<Suggestion>, LookupError>) {
        let Some(query) = self.pending.remove(&seq) else {
            return;
        };

        let items = match outcome {
            Ok(suggestions) => {
                let items: Vec<RenderedItem> = suggestions
                    .iter()
                    .map(|s| RenderedItem::new(s, &query, self.options.highlight, self.ui.locale))
                    .collect();
                if let Some(cache) = &mut self.cache {
                    cache.record(&query, &items);
                }
                items
            }
            Err(_error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(query = %query, seq = seq.get(), error = %_error, "lookup failed, failing open");
                Vec::new()
            }
        };

        if self.latest == Some(seq) {
            self.render(items);
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(query = %query, seq = seq.get(), "dropping stale resolution");
        }
    }

    /// Show `items` in the popup, creating the position binding on first
    /// use. An empty set either closes the popup (silent) or shows the
    /// no-results placeholder, exactly once across consecutive empty
    /// renders.
    fn render(&mut self, items: Vec<RenderedItem>) {
        if self.popup.is_none() {
            self.popup = Some(self.host.create_popup(Placement::BottomStart));
        }

        // Content replacement invalidates any row highlight.
        self.highlighted = None;
        self.via_hover = false;

        if items.is_empty() {
            if self.options.silent {
                self.destroy();
                return;
            }
            if !self.placeholder_shown {
                self.host.show_no_results(&self.ui.no_results_message);
                self.placeholder_shown = true;
            }
            self.items.clear();
        } else {
            self.host.show_items(&items);
            self.items = items;
            self.placeholder_shown = false;
        }

        self.open = true;
        self.host.show_popup();
        self.host.set_expanded(true);
    }

    /// Tear the popup down. Idempotent; cancels a pending blur timer on
    /// any path.
    pub fn destroy(&mut self) {
        if let Some(token) = self.blur_timer.take() {
            self.host.cancel_timer(token);
        }
        let Some(popup) = self.popup.take() else {
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(listbox = %self.listbox_id, "destroying popup");
        self.host.set_expanded(false);
        self.host.hide_popup();
        self.host.clear_listbox();
        self.items.clear();
        self.placeholder_shown = false;
        self.highlighted = None;
        self.via_hover = false;
        self.open = false;
        popup.destroy();
    }

    // --- Keyboard ---

    /// Handle a key press on the input. Returns whether the host must
    /// suppress the key's default action. Inactive while the popup is
    /// closed or empty.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> KeyDisposition {
        if !self.open || self.row_count() == 0 {
            return KeyDisposition::PassThrough;
        }

        match key {
            Key::ArrowUp => {
                let next = match self.highlighted {
                    Some(row) => self.previous_row(row),
                    None => self.last_row(),
                };
                let disposition = if next == Row::NoResults {
                    // Let the cursor jump to the start of the input.
                    KeyDisposition::PassThrough
                } else {
                    KeyDisposition::Handled
                };
                self.move_highlight(next);
                disposition
            }

            Key::ArrowDown => {
                let next = match self.highlighted {
                    Some(row) => self.next_row(row),
                    None => self.first_row(),
                };
                self.move_highlight(next);
                KeyDisposition::PassThrough
            }

            Key::Enter => {
                // A highlight reached by mouse hover does not commit on
                // Enter; the form submits as usual.
                if let Some(row) = self.highlighted
                    && !self.via_hover
                {
                    self.commit(row);
                    return KeyDisposition::Handled;
                }
                KeyDisposition::PassThrough
            }

            Key::Tab => {
                if let Some(Row::Item(index)) = self.highlighted
                    && !modifiers.contains(Modifiers::SHIFT)
                {
                    let text = self.items[index].text.clone();
                    self.host.set_input_value(&text);
                }
                KeyDisposition::PassThrough
            }

            Key::Escape => {
                self.destroy();
                KeyDisposition::PassThrough
            }
        }
    }

    /// Arrow-key highlight move: mark the row, preview its text into the
    /// input, and point `aria-activedescendant` at it. The placeholder is
    /// traversed but never previewed.
    fn move_highlight(&mut self, row: Row) {
        self.via_hover = false;
        self.highlighted = Some(row);
        match row {
            Row::Item(index) => {
                self.host.set_highlight(Some(index));
                let text = self.items[index].text.clone();
                self.host.set_input_value(&text);
                self.host.set_active_descendant(Some(&element_id(index)));
            }
            Row::NoResults => {
                self.host.set_highlight(None);
            }
        }
    }

    // --- Mouse ---

    /// Pointer entered the row at `index`. Marks it highlighted and
    /// remembers the hover origin; ignored for the placeholder.
    pub fn hover(&mut self, index: usize) {
        if !self.open || self.placeholder_shown || index >= self.items.len() {
            return;
        }
        self.highlighted = Some(Row::Item(index));
        self.via_hover = true;
        self.host.set_highlight(Some(index));
    }

    /// A row was clicked. The host must have stopped propagation so the
    /// click is not misread as a click-away.
    pub fn click(&mut self, row: Row) {
        self.commit(row);
    }

    // --- Commit ---

    /// Finalize a selection: close the popup, write the item's raw display
    /// text into the input, and invoke the callback with the escaped value
    /// when one is present and the value is non-empty. Placeholder rows
    /// no-op.
    fn commit(&mut self, row: Row) {
        let Row::Item(index) = row else {
            return;
        };
        let Some(item) = self.items.get(index).cloned() else {
            return;
        };

        self.destroy();
        self.host.set_input_value(&item.text);
        if !item.value.is_empty()
            && let Some(on_select) = self.on_select.as_mut()
        {
            on_select(&item.value);
        }
    }

    // --- Row geometry ---

    fn row_count(&self) -> usize {
        if self.placeholder_shown { 1 } else { self.items.len() }
    }

    fn first_row(&self) -> Row {
        if self.placeholder_shown {
            Row::NoResults
        } else {
            Row::Item(0)
        }
    }

    fn last_row(&self) -> Row {
        if self.placeholder_shown {
            Row::NoResults
        } else {
            Row::Item(self.items.len() - 1)
        }
    }

    fn next_row(&self, current: Row) -> Row {
        match current {
            Row::NoResults => Row::NoResults,
            Row::Item(i) if i + 1 >= self.items.len() => self.first_row(),
            Row::Item(i) => Row::Item(i + 1),
        }
    }

    fn previous_row(&self, current: Row) -> Row {
        match current {
            Row::NoResults => Row::NoResults,
            Row::Item(0) => self.last_row(),
            Row::Item(i) => Row::Item(i - 1),
        }
    }
}

impl<H: Host + std::fmt::Debug, L: Lookup + std::fmt::Debug> std::fmt::Debug for AutoComplete<H, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoComplete")
            .field("host", &self.host)
            .field("lookup", &self.lookup)
            .field("options", &self.options)
            .field("listbox_id", &self.listbox_id)
            .field("open", &self.open)
            .field("items", &self.items.len())
            .field("placeholder_shown", &self.placeholder_shown)
            .field("highlighted", &self.highlighted)
            .field("via_hover", &self.via_hover)
            .field("latest", &self.latest)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod widget_tests {
    use super::*;
    use crate::harness::{Effect, RecordingHost, RecordingLookup};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn widget(options: Options) -> AutoComplete<RecordingHost, RecordingLookup> {
        AutoComplete::new(
            "q",
            options,
            UiState::default(),
            RecordingHost::new(),
            RecordingLookup::new(),
        )
    }

    fn suggestions(pairs: &[(&str, &str)]) -> Vec<Suggestion> {
        pairs.iter().map(|(n, v)| Suggestion::new(*n, *v)).collect()
    }

    /// Resolve the most recent dispatch with the given pairs.
    fn resolve_last(w: &mut AutoComplete<RecordingHost, RecordingLookup>, pairs: &[(&str, &str)]) {
        let seq = w.lookup().last_seq().expect("a lookup was dispatched");
        w.lookup_resolved(seq, Ok(suggestions(pairs)));
    }

    #[test]
    fn construction_wires_combobox_without_dispatching() {
        let w = widget(Options::new());
        assert_eq!(w.listbox_id(), "id_q");
        assert!(!w.is_open());
        assert!(w.lookup().dispatched.is_empty());
        assert_eq!(
            w.host().effects(),
            vec![
                Effect::CreateListbox("id_q".into()),
                Effect::ConfigureCombobox("id_q".into()),
            ]
        );
    }

    #[test]
    fn typing_dispatches_normalized_query() {
        let mut w = widget(Options::new());
        w.input_changed("  BaNa ");
        assert_eq!(w.lookup().dispatched.len(), 1);
        assert_eq!(w.lookup().dispatched[0].1, "bana");
    }

    #[test]
    fn empty_input_closes_open_popup() {
        let mut w = widget(Options::new());
        w.input_changed("ba");
        resolve_last(&mut w, &[("Banana", "banana")]);
        assert!(w.is_open());

        w.input_changed("   ");
        assert!(!w.is_open());
        assert_eq!(w.host().popups_destroyed(), 1);
    }

    #[test]
    fn empty_input_while_closed_is_a_noop() {
        let mut w = widget(Options::new());
        w.input_changed("");
        assert!(w.lookup().dispatched.is_empty());
        assert_eq!(w.host().popups_destroyed(), 0);
    }

    #[test]
    fn resolution_renders_and_opens() {
        let mut w = widget(Options::new());
        w.input_changed("ba");
        resolve_last(&mut w, &[("Banana", "banana"), ("Bandana", "bandana")]);

        assert!(w.is_open());
        let host = w.host();
        assert!(host.visible);
        assert!(host.expanded);
        assert_eq!(host.items.len(), 2);
        assert_eq!(host.items[0].text, "Banana");
    }

    #[test]
    fn highlight_markup_in_rendered_items() {
        let mut w = widget(Options::new().highlight());
        w.input_changed("an");
        resolve_last(&mut w, &[("Banana", "banana"), ("<script>", "x")]);

        let host = w.host();
        assert_eq!(host.items[0].html, "B<mark>an</mark>ana");
        assert_eq!(host.items[1].html, "&lt;script&gt;");
    }

    // --- Cache ---

    #[test]
    fn known_empty_prefix_skips_lookup() {
        let mut w = widget(Options::new().cache());
        w.input_changed("zz");
        resolve_last(&mut w, &[]);
        assert_eq!(w.lookup().dispatched.len(), 1);

        // Any extension of the empty query renders nothing without a
        // dispatch.
        w.input_changed("zzz");
        w.input_changed("zz top");
        assert_eq!(w.lookup().dispatched.len(), 1);
        assert!(w.is_open());
        assert_eq!(w.host().placeholder.as_deref(), Some(crate::ui::DEFAULT_NO_RESULTS));
    }

    #[test]
    fn exact_cache_hit_renders_without_dispatch() {
        let mut w = widget(Options::new().cache());
        w.input_changed("ba");
        resolve_last(&mut w, &[("Banana", "banana")]);
        assert_eq!(w.lookup().dispatched.len(), 1);

        w.input_changed("ban");
        resolve_last(&mut w, &[("Banana", "banana")]);
        assert_eq!(w.lookup().dispatched.len(), 2);

        // Back to the first query: served from cache.
        w.input_changed("ba");
        assert_eq!(w.lookup().dispatched.len(), 2);
        assert_eq!(w.host().items.len(), 1);
    }

    #[test]
    fn mention_sigil_is_always_dispatched() {
        let mut w = widget(Options::new().cache());
        w.input_changed("@");
        resolve_last(&mut w, &[("@someone", "@someone")]);
        w.input_changed("@");
        assert_eq!(w.lookup().dispatched.len(), 2);
    }

    #[test]
    fn without_cache_every_query_dispatches() {
        let mut w = widget(Options::new());
        w.input_changed("zz");
        resolve_last(&mut w, &[]);
        w.input_changed("zzz");
        assert_eq!(w.lookup().dispatched.len(), 2);
    }

    // --- Stale responses ---

    #[test]
    fn stale_resolution_is_dropped_but_cached() {
        let mut w = widget(Options::new().cache());
        w.input_changed("ba");
        let first = w.lookup().last_seq().unwrap();
        w.input_changed("ban");
        let second = w.lookup().last_seq().unwrap();

        // The older lookup settles last; it must not win the render.
        w.lookup_resolved(second, Ok(suggestions(&[("Bandana", "bandana")])));
        w.lookup_resolved(first, Ok(suggestions(&[("Banana", "banana")])));

        assert_eq!(w.host().items.len(), 1);
        assert_eq!(w.host().items[0].text, "Bandana");

        // But its answer is still a valid cache entry for "ba".
        w.input_changed("ba");
        assert_eq!(w.lookup().dispatched.len(), 2);
        assert_eq!(w.host().items[0].text, "Banana");
    }

    #[test]
    fn unknown_sequence_is_ignored() {
        let mut w = widget(Options::new());
        w.lookup_resolved(LookupSeq::new(99), Ok(suggestions(&[("x", "x")])));
        assert!(!w.is_open());
    }

    #[test]
    fn lookup_error_fails_open_and_is_not_cached() {
        let mut w = widget(Options::new().cache());
        w.input_changed("ba");
        let seq = w.lookup().last_seq().unwrap();
        w.lookup_resolved(seq, Err(LookupError::new("boom")));

        // Fails open: no-results placeholder, no commitment in the cache.
        assert!(w.is_open());
        assert!(w.host().placeholder.is_some());
        let cache = w.query_cache().unwrap();
        assert_eq!(cache.populated_len(), 0);
        assert_eq!(cache.known_empty_len(), 0);

        // Retyping the same query dispatches again.
        w.input_changed("ba");
        assert_eq!(w.lookup().dispatched.len(), 2);
    }

    // --- Empty result rendering ---

    #[test]
    fn silent_mode_destroys_on_empty() {
        let mut w = widget(Options::new().silent());
        w.input_changed("zz");
        resolve_last(&mut w, &[]);
        assert!(!w.is_open());
        assert_eq!(w.host().popups_destroyed(), 1);
    }

    #[test]
    fn placeholder_rendered_once_across_empty_results() {
        let mut w = widget(Options::new());
        w.input_changed("zz");
        resolve_last(&mut w, &[]);
        w.input_changed("zzz");
        resolve_last(&mut w, &[]);

        assert_eq!(
            w.host().count(|e| matches!(e, Effect::ShowNoResults(_))),
            1
        );
    }

    // --- Keyboard ---

    fn open_with_three(w: &mut AutoComplete<RecordingHost, RecordingLookup>) {
        w.input_changed("ba");
        resolve_last(
            w,
            &[("Banana", "banana"), ("Bandana", "bandana"), ("Bank", "bank")],
        );
    }

    #[test]
    fn arrow_up_from_nothing_highlights_last() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);

        let d = w.key_down(Key::ArrowUp, Modifiers::NONE);
        assert_eq!(d, KeyDisposition::Handled);
        assert_eq!(w.highlighted(), Some(Row::Item(2)));
        assert_eq!(w.host().input_value, "Bank");
        assert_eq!(w.host().active_descendant.as_deref(), Some("cb-opt-2"));
    }

    #[test]
    fn arrow_down_wraps_past_the_end() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);

        w.key_down(Key::ArrowDown, Modifiers::NONE);
        w.key_down(Key::ArrowDown, Modifiers::NONE);
        w.key_down(Key::ArrowDown, Modifiers::NONE);
        assert_eq!(w.highlighted(), Some(Row::Item(2)));
        let _ = w.key_down(Key::ArrowDown, Modifiers::NONE);
        assert_eq!(w.highlighted(), Some(Row::Item(0)));
        assert_eq!(w.host().input_value, "Banana");
    }

    #[test]
    fn arrow_up_onto_placeholder_passes_through() {
        let mut w = widget(Options::new());
        w.input_changed("zz");
        resolve_last(&mut w, &[]);
        assert!(w.is_open());

        let d = w.key_down(Key::ArrowUp, Modifiers::NONE);
        assert_eq!(d, KeyDisposition::PassThrough);
        assert_eq!(w.highlighted(), Some(Row::NoResults));
        // No preview: the input keeps whatever the user typed.
        assert_eq!(w.host().input_value, "");
    }

    #[test]
    fn keys_pass_through_while_closed() {
        let mut w = widget(Options::new());
        assert_eq!(
            w.key_down(Key::ArrowDown, Modifiers::NONE),
            KeyDisposition::PassThrough
        );
        assert_eq!(
            w.key_down(Key::Enter, Modifiers::NONE),
            KeyDisposition::PassThrough
        );
    }

    #[test]
    fn enter_commits_keyboard_highlight_once() {
        let selected: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&selected);
        let mut w = AutoComplete::new(
            "q",
            Options::new(),
            UiState::default(),
            RecordingHost::new(),
            RecordingLookup::new(),
        )
        .with_on_select(move |value| sink.borrow_mut().push(value.to_string()));

        open_with_three(&mut w);
        w.key_down(Key::ArrowDown, Modifiers::NONE);
        let d = w.key_down(Key::Enter, Modifiers::NONE);

        assert_eq!(d, KeyDisposition::Handled);
        assert_eq!(selected.borrow().as_slice(), ["banana"]);
        assert!(!w.is_open());
        assert_eq!(w.host().input_value, "Banana");
    }

    #[test]
    fn enter_on_hover_highlight_does_not_commit() {
        let selected: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&selected);
        let mut w = AutoComplete::new(
            "q",
            Options::new(),
            UiState::default(),
            RecordingHost::new(),
            RecordingLookup::new(),
        )
        .with_on_select(move |value| sink.borrow_mut().push(value.to_string()));

        open_with_three(&mut w);
        w.hover(1);
        let d = w.key_down(Key::Enter, Modifiers::NONE);

        assert_eq!(d, KeyDisposition::PassThrough);
        assert!(selected.borrow().is_empty());
        assert!(w.is_open());
    }

    #[test]
    fn arrow_preview_then_blur_never_commits() {
        let selected: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&selected);
        let mut w = AutoComplete::new(
            "q",
            Options::new(),
            UiState::default(),
            RecordingHost::new(),
            RecordingLookup::new(),
        )
        .with_on_select(move |value| sink.borrow_mut().push(value.to_string()));

        open_with_three(&mut w);
        w.key_down(Key::ArrowDown, Modifiers::NONE);
        w.focus_out();
        let (token, delay) = w.host().pending_timers[0];
        assert_eq!(delay, BLUR_DELAY);
        w.timer_elapsed(token);

        assert!(selected.borrow().is_empty());
        assert!(!w.is_open());
        // The previewed text stays in the input after teardown.
        assert_eq!(w.host().input_value, "Banana");
    }

    #[test]
    fn tab_copies_text_without_committing() {
        let selected: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&selected);
        let mut w = AutoComplete::new(
            "q",
            Options::new(),
            UiState::default(),
            RecordingHost::new(),
            RecordingLookup::new(),
        )
        .with_on_select(move |value| sink.borrow_mut().push(value.to_string()));

        open_with_three(&mut w);
        w.key_down(Key::ArrowDown, Modifiers::NONE);
        let d = w.key_down(Key::Tab, Modifiers::NONE);

        assert_eq!(d, KeyDisposition::PassThrough);
        assert_eq!(w.host().input_value, "Banana");
        assert!(selected.borrow().is_empty());
        assert!(w.is_open());

        // Shift+Tab does not copy.
        w.key_down(Key::ArrowDown, Modifiers::NONE);
        let _ = w.key_down(Key::Tab, Modifiers::SHIFT);
        assert_eq!(w.host().input_value, "Bandana"); // from the arrow preview
    }

    #[test]
    fn escape_destroys_unconditionally() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);
        let _ = w.key_down(Key::Escape, Modifiers::NONE);
        assert!(!w.is_open());
        assert!(!w.host().expanded);
        assert!(!w.host().visible);
    }

    // --- Mouse ---

    #[test]
    fn hover_highlights_without_preview() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);
        w.hover(2);
        assert_eq!(w.highlighted(), Some(Row::Item(2)));
        assert_eq!(w.host().highlight, Some(2));
        // Hover does not write into the input.
        assert_eq!(w.host().input_value, "");
    }

    #[test]
    fn click_commits_item() {
        let selected: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&selected);
        let mut w = AutoComplete::new(
            "q",
            Options::new(),
            UiState::default(),
            RecordingHost::new(),
            RecordingLookup::new(),
        )
        .with_on_select(move |value| sink.borrow_mut().push(value.to_string()));

        open_with_three(&mut w);
        w.click(Row::Item(1));

        assert_eq!(selected.borrow().as_slice(), ["bandana"]);
        assert_eq!(w.host().input_value, "Bandana");
        assert!(!w.is_open());
    }

    #[test]
    fn click_on_placeholder_is_a_noop() {
        let mut w = widget(Options::new());
        w.input_changed("zz");
        resolve_last(&mut w, &[]);
        w.click(Row::NoResults);
        assert!(w.is_open());
        assert_eq!(w.host().popups_destroyed(), 0);
    }

    #[test]
    fn commit_without_callback_still_writes_input() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);
        w.click(Row::Item(0));
        assert_eq!(w.host().input_value, "Banana");
        assert!(!w.is_open());
    }

    // --- Destroy / blur ---

    #[test]
    fn destroy_is_idempotent() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);
        w.destroy();
        w.destroy();
        assert_eq!(w.host().popups_destroyed(), 1);
        assert_eq!(w.host().count(|e| matches!(e, Effect::HidePopup)), 1);
    }

    #[test]
    fn escape_cancels_pending_blur_timer() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);
        w.focus_out();
        let (token, _) = w.host().pending_timers[0];

        let _ = w.key_down(Key::Escape, Modifiers::NONE);
        assert!(w.host().pending_timers.is_empty());
        assert_eq!(w.host().popups_destroyed(), 1);

        // The stale token firing later does nothing.
        w.timer_elapsed(token);
        assert_eq!(w.host().popups_destroyed(), 1);
    }

    #[test]
    fn refocus_blur_replaces_pending_timer() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);
        w.focus_out();
        w.focus_out();
        assert_eq!(w.host().pending_timers.len(), 1);
        assert_eq!(w.host().count(|e| matches!(e, Effect::CancelTimer(_))), 1);
    }

    #[test]
    fn typing_after_destroy_restarts_the_cycle() {
        let mut w = widget(Options::new());
        open_with_three(&mut w);
        let _ = w.key_down(Key::Escape, Modifiers::NONE);

        w.input_changed("ban");
        resolve_last(&mut w, &[("Bandana", "bandana")]);
        assert!(w.is_open());
        assert_eq!(w.host().count(|e| matches!(e, Effect::CreatePopup(_))), 2);
    }
}
