//! Input events the widget understands.
//!
//! The host maps its own key events onto [`Key`] and [`Modifiers`] and
//! forwards only the keys listed here; everything else stays with the host.

use bitflags::bitflags;

/// Keys the suggestion list reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move the highlight up, wrapping to the last row.
    ArrowUp,
    /// Move the highlight down, wrapping to the first row.
    ArrowDown,
    /// Commit the keyboard-highlighted row.
    Enter,
    /// Close the popup unconditionally.
    Escape,
    /// Copy the highlighted row's text without committing.
    Tab,
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Control key.
        const CTRL  = 0b0010;
        /// Alt/Option key.
        const ALT   = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers::NONE
    }
}

/// A row in the suggestion list. The list holds either the rendered items
/// or a single non-selectable no-results placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// Selectable item at this index.
    Item(usize),
    /// The no-results placeholder.
    NoResults,
}

/// What the host should do with the key event after the widget has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The widget consumed the key; suppress the default action
    /// (cursor movement, form submission).
    Handled,
    /// Let the default action proceed.
    PassThrough,
}
