//! In-memory host and lookup doubles for tests, examples, and downstream
//! driver development.
//!
//! [`RecordingHost`] models the document surface the widget drives: it keeps
//! the current input value, listbox content, visibility, and ARIA state, and
//! appends every effect to an ordered log so tests can assert on exact
//! sequences. [`RecordingLookup`] records dispatched queries; the test plays
//! the driver and feeds outcomes back through
//! [`AutoComplete::lookup_resolved`](crate::AutoComplete::lookup_resolved).

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::host::{Host, Lookup, LookupSeq, Placement, PopupHandle, TimerToken};
use crate::suggestion::RenderedItem;

/// One observable effect applied to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateListbox(String),
    ConfigureCombobox(String),
    SetExpanded(bool),
    SetActiveDescendant(Option<String>),
    SetInputValue(String),
    ShowItems(Vec<RenderedItem>),
    ShowNoResults(String),
    ClearListbox,
    ShowPopup,
    HidePopup,
    SetHighlight(Option<usize>),
    CreatePopup(Placement),
    ScheduleTimer(TimerToken, Duration),
    CancelTimer(TimerToken),
    DestroyPopup,
}

/// Popup handle that counts its own teardown in the shared log.
#[derive(Debug)]
pub struct RecordingPopup {
    log: Rc<RefCell<Vec<Effect>>>,
    destroyed: Rc<Cell<u32>>,
}

impl PopupHandle for RecordingPopup {
    fn destroy(self) {
        self.destroyed.set(self.destroyed.get() + 1);
        self.log.borrow_mut().push(Effect::DestroyPopup);
    }
}

/// Modeled document surface.
#[derive(Debug, Default)]
pub struct RecordingHost {
    log: Rc<RefCell<Vec<Effect>>>,
    destroyed_popups: Rc<Cell<u32>>,
    next_timer: u64,

    /// Current input value.
    pub input_value: String,
    /// Current `aria-expanded` state.
    pub expanded: bool,
    /// Whether the listbox is visible.
    pub visible: bool,
    /// Rows currently in the listbox, when items are shown.
    pub items: Vec<RenderedItem>,
    /// No-results message currently shown, if any.
    pub placeholder: Option<String>,
    /// Index of the visually selected row.
    pub highlight: Option<usize>,
    /// Current `aria-activedescendant` value.
    pub active_descendant: Option<String>,
    /// Timers scheduled and not yet cancelled or fired.
    pub pending_timers: Vec<(TimerToken, Duration)>,
}

impl RecordingHost {
    /// Fresh host with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the effect log.
    #[must_use]
    pub fn effects(&self) -> Vec<Effect> {
        self.log.borrow().clone()
    }

    /// How many times any popup handle was torn down.
    #[must_use]
    pub fn popups_destroyed(&self) -> u32 {
        self.destroyed_popups.get()
    }

    /// How many times `f` appears in the log.
    #[must_use]
    pub fn count(&self, f: impl Fn(&Effect) -> bool) -> usize {
        self.log.borrow().iter().filter(|&e| f(e)).count()
    }

    fn push(&self, effect: Effect) {
        self.log.borrow_mut().push(effect);
    }
}

impl Host for RecordingHost {
    type Popup = RecordingPopup;

    fn create_listbox(&mut self, id: &str) {
        self.push(Effect::CreateListbox(id.to_string()));
    }

    fn configure_combobox(&mut self, listbox_id: &str) {
        self.expanded = false;
        self.push(Effect::ConfigureCombobox(listbox_id.to_string()));
    }

    fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
        self.push(Effect::SetExpanded(expanded));
    }

    fn set_active_descendant(&mut self, id: Option<&str>) {
        self.active_descendant = id.map(str::to_string);
        self.push(Effect::SetActiveDescendant(self.active_descendant.clone()));
    }

    fn set_input_value(&mut self, text: &str) {
        self.input_value = text.to_string();
        self.push(Effect::SetInputValue(text.to_string()));
    }

    fn show_items(&mut self, items: &[RenderedItem]) {
        self.items = items.to_vec();
        self.placeholder = None;
        self.highlight = None;
        self.push(Effect::ShowItems(items.to_vec()));
    }

    fn show_no_results(&mut self, message: &str) {
        self.items.clear();
        self.placeholder = Some(message.to_string());
        self.highlight = None;
        self.push(Effect::ShowNoResults(message.to_string()));
    }

    fn clear_listbox(&mut self) {
        self.items.clear();
        self.placeholder = None;
        self.highlight = None;
        self.push(Effect::ClearListbox);
    }

    fn show_popup(&mut self) {
        self.visible = true;
        self.push(Effect::ShowPopup);
    }

    fn hide_popup(&mut self) {
        self.visible = false;
        self.push(Effect::HidePopup);
    }

    fn set_highlight(&mut self, index: Option<usize>) {
        self.highlight = index;
        self.push(Effect::SetHighlight(index));
    }

    fn create_popup(&mut self, placement: Placement) -> Self::Popup {
        self.push(Effect::CreatePopup(placement));
        RecordingPopup {
            log: Rc::clone(&self.log),
            destroyed: Rc::clone(&self.destroyed_popups),
        }
    }

    fn schedule_timer(&mut self, delay: Duration) -> TimerToken {
        self.next_timer += 1;
        let token = TimerToken::new(self.next_timer);
        self.pending_timers.push((token, delay));
        self.push(Effect::ScheduleTimer(token, delay));
        token
    }

    fn cancel_timer(&mut self, token: TimerToken) {
        self.pending_timers.retain(|(t, _)| *t != token);
        self.push(Effect::CancelTimer(token));
    }
}

/// Lookup double that records every dispatch.
#[derive(Debug, Default)]
pub struct RecordingLookup {
    /// Dispatches in order.
    pub dispatched: Vec<(LookupSeq, String)>,
}

impl RecordingLookup {
    /// Fresh recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number of the most recent dispatch.
    #[must_use]
    pub fn last_seq(&self) -> Option<LookupSeq> {
        self.dispatched.last().map(|(seq, _)| *seq)
    }
}

impl Lookup for RecordingLookup {
    fn dispatch(&mut self, seq: LookupSeq, query: &str) {
        self.dispatched.push((seq, query.to_string()));
    }
}
