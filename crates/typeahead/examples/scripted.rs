//! Scripted session against the recording harness: shows the wiring a real
//! driver needs (input, lookup resolution, keys, blur timer) and prints the
//! effect log.
//!
//! Run with: cargo run -p typeahead --example scripted

use typeahead::harness::{RecordingHost, RecordingLookup};
use typeahead::{AutoComplete, Key, Modifiers, Options, Suggestion, UiState};

fn main() {
    let mut widget = AutoComplete::new(
        "header_search",
        Options::new().highlight().cache(),
        UiState::default(),
        RecordingHost::new(),
        RecordingLookup::new(),
    )
    .with_on_select(|value| println!("-> on_select({value:?})"));

    // The user types; the widget dispatches a lookup.
    widget.input_changed("bana");
    let (seq, query) = widget.lookup().dispatched.last().cloned().unwrap();
    println!("dispatched lookup #{} for {query:?}", seq.get());

    // The driver resolves it (a real host would hit its search endpoint).
    widget.lookup_resolved(
        seq,
        Ok(vec![
            Suggestion::new("Banana", "banana"),
            Suggestion::new("Bandana", "bandana"),
        ]),
    );

    // Keyboard: highlight the second row, commit it.
    widget.key_down(Key::ArrowDown, Modifiers::NONE);
    widget.key_down(Key::ArrowDown, Modifiers::NONE);
    widget.key_down(Key::Enter, Modifiers::NONE);

    println!("input value: {:?}", widget.host().input_value);
    println!("effect log:");
    for effect in widget.host().effects() {
        println!("  {effect:?}");
    }
}
