//! Entry state machine
//!
//! [`step`] is a pure update: it takes the current [`EntryState`] and one
//! host event, and returns the next state together with the effects the host
//! must carry out (focus the capture surface, redraw slots, scroll, deliver
//! the completed PIN). [`PinEntry`] wraps it for hosts that prefer a mutable
//! component with a completion callback.

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::EntryConfig;
use crate::error::Result;
use crate::gesture::{GesturePhase, Position, TapDecision, TapPolicy};
use crate::notifier::{CompletionLatch, CompletionNotifier, PinFinishedListener};
use crate::sequence::{PinSequence, SlotState};

/// Rectangle of one slot, as laid out by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SlotGeometry {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal centre
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Events the host feeds into the entry component
#[derive(Debug, Clone, PartialEq)]
pub enum EntryEvent {
    PointerDown(Position),
    PointerMove(Position),
    PointerUp(Position),
    /// Full text of the capture surface after a change
    TextChanged(String),
    /// Delete the last digit
    Backspace,
    /// Capture surface gained or lost focus
    FocusChanged(bool),
    /// Slot rectangles after a layout pass
    LayoutChanged(Vec<SlotGeometry>),
    /// External clear request
    Clear,
}

/// Requests the host must carry out
#[derive(Clone, PartialEq)]
pub enum Effect {
    /// Focus the capture surface
    RequestFocus,
    ShowKeyboard,
    HideKeyboard,
    /// Replace the capture surface text with the accepted digits
    ReplaceText(Zeroizing<String>),
    /// Put the capture surface caret at the given offset
    MoveCaretToEnd(usize),
    /// Redraw every slot
    SlotsChanged(Vec<SlotState>),
    /// Scroll the newly active slot into view
    BringIntoView {
        index: usize,
        geometry: Option<SlotGeometry>,
    },
    /// All slots filled
    Completed(Zeroizing<String>),
}

/// Digit payload for an effect, wiped when the effect is dropped
fn digit_text(text: &str) -> Zeroizing<String> {
    Zeroizing::new(text.to_string())
}

// Digits carried by text effects stay out of debug output
impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::RequestFocus => f.write_str("RequestFocus"),
            Effect::ShowKeyboard => f.write_str("ShowKeyboard"),
            Effect::HideKeyboard => f.write_str("HideKeyboard"),
            Effect::ReplaceText(text) => write!(f, "ReplaceText(<{} digits>)", text.len()),
            Effect::MoveCaretToEnd(offset) => write!(f, "MoveCaretToEnd({})", offset),
            Effect::SlotsChanged(slots) => f.debug_tuple("SlotsChanged").field(slots).finish(),
            Effect::BringIntoView { index, geometry } => f
                .debug_struct("BringIntoView")
                .field("index", index)
                .field("geometry", geometry)
                .finish(),
            Effect::Completed(pin) => write!(f, "Completed(<{} digits>)", pin.len()),
        }
    }
}

/// Complete state of one entry component
#[derive(Debug, Clone, PartialEq)]
pub struct EntryState {
    config: EntryConfig,
    sequence: PinSequence,
    has_focus: bool,
    tap: TapPolicy,
    latch: CompletionLatch,
    layout: Vec<SlotGeometry>,
}

impl EntryState {
    /// Fresh state for a freshly mounted component
    pub fn new(config: EntryConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            sequence: PinSequence::new(config.max_length)?,
            has_focus: false,
            tap: TapPolicy::for_container(config.container, config.drag_threshold),
            latch: CompletionLatch::default(),
            layout: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    pub fn sequence(&self) -> &PinSequence {
        &self.sequence
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Current state of every slot
    pub fn slots(&self) -> Vec<SlotState> {
        self.sequence.slots(self.has_focus)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.sequence.active_index(self.has_focus)
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.tap.phase()
    }

    /// Last reported rectangle of `index`
    pub fn slot_geometry(&self, index: usize) -> Option<SlotGeometry> {
        self.layout.get(index).copied()
    }

    /// Masked text for the filled slots
    pub fn masked(&self) -> String {
        self.sequence.masked(self.config.mask)
    }

    fn apply_sequence(&mut self, sequence: PinSequence, effects: &mut Vec<Effect>) {
        let previous_active = self.active_index();
        self.sequence = sequence;

        effects.push(Effect::SlotsChanged(self.slots()));
        self.bring_active_into_view(previous_active, effects);

        if self.latch.observe(self.sequence.is_complete()) {
            debug!("All {} slots filled", self.sequence.max_length());
            effects.push(Effect::Completed(digit_text(self.sequence.digits())));
            if self.config.hide_keyboard_on_complete {
                effects.push(Effect::HideKeyboard);
            }
        }
    }

    fn bring_active_into_view(&self, previous_active: Option<usize>, effects: &mut Vec<Effect>) {
        if !self.config.container.is_scrollable() {
            return;
        }

        if let Some(index) = self.active_index() {
            if previous_active != Some(index) {
                effects.push(Effect::BringIntoView {
                    index,
                    geometry: self.slot_geometry(index),
                });
            }
        }
    }
}

/// Next state plus the effects produced on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: EntryState,
    pub effects: Vec<Effect>,
}

/// Apply one host event to `state`
pub fn step(state: &EntryState, event: EntryEvent) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        EntryEvent::PointerDown(pos) => next.tap.on_pointer_down(pos),
        EntryEvent::PointerMove(pos) => next.tap.on_pointer_move(pos),
        EntryEvent::PointerUp(pos) => {
            if next.tap.on_pointer_up(pos).open_input {
                effects.push(Effect::RequestFocus);
                effects.push(Effect::ShowKeyboard);
            }
        }
        EntryEvent::TextChanged(raw) => {
            let sequence = next.sequence.accept(&raw);
            if sequence.digits() != raw {
                effects.push(Effect::ReplaceText(digit_text(sequence.digits())));
                effects.push(Effect::MoveCaretToEnd(sequence.cursor()));
            }
            next.apply_sequence(sequence, &mut effects);
        }
        EntryEvent::Backspace => {
            let sequence = next.sequence.backspace();
            effects.push(Effect::ReplaceText(digit_text(sequence.digits())));
            effects.push(Effect::MoveCaretToEnd(sequence.cursor()));
            next.apply_sequence(sequence, &mut effects);
        }
        EntryEvent::Clear => {
            let sequence = next.sequence.cleared();
            effects.push(Effect::ReplaceText(digit_text("")));
            effects.push(Effect::MoveCaretToEnd(0));
            next.apply_sequence(sequence, &mut effects);
        }
        EntryEvent::FocusChanged(has_focus) => {
            let previous_active = next.active_index();
            next.has_focus = has_focus;
            effects.push(Effect::SlotsChanged(next.slots()));
            next.bring_active_into_view(previous_active, &mut effects);
            effects.push(Effect::MoveCaretToEnd(next.sequence.cursor()));
        }
        EntryEvent::LayoutChanged(layout) => next.layout = layout,
    }

    Transition {
        state: next,
        effects,
    }
}

/// What a text change did to the sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceResult {
    /// Digits entered after the change
    pub length: usize,
    /// Every slot after the change
    pub slots: Vec<SlotState>,
    /// This change filled the last slot
    pub completed: bool,
    /// Everything the host must do
    pub effects: Vec<Effect>,
}

/// Mutable entry component with a completion callback
#[derive(Debug)]
pub struct PinEntry {
    state: EntryState,
    notifier: CompletionNotifier,
}

impl PinEntry {
    pub fn new(config: EntryConfig) -> Result<Self> {
        Ok(Self {
            state: EntryState::new(config)?,
            notifier: CompletionNotifier::new(),
        })
    }

    /// Install the listener called once per completed PIN
    pub fn set_on_pin_finished<L>(&mut self, listener: L)
    where
        L: PinFinishedListener + 'static,
    {
        self.notifier.set_listener(listener);
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    pub fn sequence(&self) -> &PinSequence {
        self.state.sequence()
    }

    pub fn slots(&self) -> Vec<SlotState> {
        self.state.slots()
    }

    /// Apply an event, deliver any completion, return the effects
    pub fn handle(&mut self, event: EntryEvent) -> Vec<Effect> {
        let Transition { state, effects } = step(&self.state, event);
        self.state = state;

        for effect in &effects {
            if let Effect::Completed(pin) = effect {
                self.notifier.notify(pin);
            }
        }

        effects
    }

    /// Feed the full capture-surface text
    pub fn accept(&mut self, raw: &str) -> SequenceResult {
        let effects = self.handle(EntryEvent::TextChanged(raw.to_string()));
        self.result(effects)
    }

    /// Delete the last digit
    pub fn backspace(&mut self) -> SequenceResult {
        let effects = self.handle(EntryEvent::Backspace);
        self.result(effects)
    }

    pub fn clear(&mut self) -> SequenceResult {
        let effects = self.handle(EntryEvent::Clear);
        self.result(effects)
    }

    pub fn focus_changed(&mut self, has_focus: bool) -> Vec<Effect> {
        self.handle(EntryEvent::FocusChanged(has_focus))
    }

    pub fn layout_changed(&mut self, layout: Vec<SlotGeometry>) {
        self.handle(EntryEvent::LayoutChanged(layout));
    }

    pub fn pointer_down(&mut self, pos: Position) {
        self.handle(EntryEvent::PointerDown(pos));
    }

    pub fn pointer_move(&mut self, pos: Position) {
        self.handle(EntryEvent::PointerMove(pos));
    }

    /// Release the pointer; the decision says whether input should open
    pub fn pointer_up(&mut self, pos: Position) -> TapDecision {
        let effects = self.handle(EntryEvent::PointerUp(pos));
        TapDecision {
            open_input: effects.contains(&Effect::RequestFocus),
        }
    }

    fn result(&self, effects: Vec<Effect>) -> SequenceResult {
        SequenceResult {
            length: self.state.sequence().len(),
            slots: self.state.slots(),
            completed: effects.iter().any(|e| matches!(e, Effect::Completed(_))),
            effects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn entry(max_length: usize) -> PinEntry {
        PinEntry::new(EntryConfig::with_max_length(max_length)).unwrap()
    }

    fn recording_entry(max_length: usize) -> (PinEntry, Rc<RefCell<Vec<String>>>) {
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let mut entry = entry(max_length);
        entry.set_on_pin_finished(move |pin: &str| sink.borrow_mut().push(pin.to_string()));
        (entry, received)
    }

    fn row(count: usize) -> Vec<SlotGeometry> {
        (0..count)
            .map(|i| SlotGeometry::new(i as f64 * 70.0, 0.0, 50.0, 50.0))
            .collect()
    }

    #[test]
    fn test_invalid_config() {
        assert!(PinEntry::new(EntryConfig::with_max_length(0)).is_err());
    }

    #[test]
    fn test_completion_fires_once() {
        let (mut entry, received) = recording_entry(4);

        assert!(!entry.accept("1").completed);
        assert!(!entry.accept("12").completed);
        assert!(!entry.accept("123").completed);
        assert!(entry.accept("1234").completed);
        assert!(!entry.accept("1234").completed);
        entry.focus_changed(true);
        entry.focus_changed(false);

        assert_eq!(*received.borrow(), vec!["1234".to_string()]);
    }

    #[test]
    fn test_completion_refires_after_edit() {
        let (mut entry, received) = recording_entry(4);

        entry.accept("1234");
        let result = entry.backspace();
        assert_eq!(result.length, 3);
        assert!(!result.completed);
        assert!(entry.accept("1235").completed);

        assert_eq!(
            *received.borrow(),
            vec!["1234".to_string(), "1235".to_string()]
        );
    }

    #[test]
    fn test_overlong_paste_completes_truncated() {
        let (mut entry, received) = recording_entry(4);

        let result = entry.accept("48210");
        assert!(result.completed);
        assert_eq!(result.length, 4);
        assert!(result
            .effects
            .contains(&Effect::ReplaceText(digit_text("4821"))));
        assert_eq!(*received.borrow(), vec!["4821".to_string()]);
    }

    #[test]
    fn test_non_digits_resync_capture_surface() {
        let mut entry = entry(4);
        let result = entry.accept("1a");
        assert_eq!(result.length, 1);
        assert_eq!(
            &result.effects[..2],
            &[Effect::ReplaceText(digit_text("1")), Effect::MoveCaretToEnd(1)]
        );

        // Clean text needs no resync
        let result = entry.accept("12");
        assert!(!result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::ReplaceText(_))));
    }

    #[test]
    fn test_focus_recomputes_active_slot() {
        let mut entry = entry(4);
        entry.accept("12");
        assert!(entry.slots().iter().all(|s| !s.active));

        let effects = entry.focus_changed(true);
        assert!(entry.slots()[2].active);
        assert_eq!(entry.sequence().digits(), "12");
        assert!(effects.contains(&Effect::MoveCaretToEnd(2)));

        entry.focus_changed(false);
        assert!(entry.slots().iter().all(|s| !s.active));
    }

    #[test]
    fn test_bring_into_view_on_newly_active_slot() {
        let mut entry = entry(4);
        entry.layout_changed(row(4));

        let effects = entry.focus_changed(true);
        assert!(effects.contains(&Effect::BringIntoView {
            index: 0,
            geometry: Some(SlotGeometry::new(0.0, 0.0, 50.0, 50.0)),
        }));

        let result = entry.accept("1");
        assert!(result.effects.contains(&Effect::BringIntoView {
            index: 1,
            geometry: Some(SlotGeometry::new(70.0, 0.0, 50.0, 50.0)),
        }));

        // Same active slot, nothing to scroll
        let result = entry.accept("1x");
        assert!(!result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::BringIntoView { .. })));
    }

    #[test]
    fn test_fixed_container_never_scrolls() {
        let config = EntryConfig::with_max_length(4).container(ContainerKind::Fixed);
        let mut entry = PinEntry::new(config).unwrap();
        entry.layout_changed(row(4));

        let mut effects = entry.focus_changed(true);
        effects.extend(entry.accept("12").effects);
        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::BringIntoView { .. })));
    }

    #[test]
    fn test_tap_opens_input() {
        let mut entry = entry(4);
        entry.pointer_down(Position::new(0.0, 0.0));
        assert_eq!(entry.state().gesture_phase(), GesturePhase::ArmedByTap);
        assert!(entry.pointer_up(Position::new(10.0, 10.0)).open_input);
        assert_eq!(entry.state().gesture_phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_drag_does_not_open_input() {
        let mut entry = entry(4);
        entry.pointer_down(Position::new(0.0, 0.0));
        entry.pointer_move(Position::new(50.0, 50.0));
        assert_eq!(entry.state().gesture_phase(), GesturePhase::DraggedOut);
        assert!(!entry.pointer_up(Position::new(5.0, 5.0)).open_input);
    }

    #[test]
    fn test_clear_rearms_completion() {
        let (mut entry, received) = recording_entry(2);
        entry.accept("12");
        let result = entry.clear();
        assert_eq!(result.length, 0);
        assert!(result.effects.contains(&Effect::ReplaceText(digit_text(""))));
        entry.accept("12");
        assert_eq!(received.borrow().len(), 2);
    }

    #[test]
    fn test_hide_keyboard_on_complete() {
        let mut config = EntryConfig::with_max_length(1);
        config.hide_keyboard_on_complete = true;
        let mut entry = PinEntry::new(config).unwrap();

        let result = entry.accept("7");
        assert!(result.effects.contains(&Effect::HideKeyboard));
    }

    #[test]
    fn test_step_is_pure() {
        let state = EntryState::new(EntryConfig::default()).unwrap();
        let transition = step(&state, EntryEvent::TextChanged("12".to_string()));

        assert!(state.sequence().is_empty());
        assert_eq!(transition.state.sequence().digits(), "12");
        assert_eq!(transition.state.masked(), "••");
    }

    #[test]
    fn test_digit_payloads_are_zeroizing() {
        let (mut entry, _) = recording_entry(2);
        let result = entry.accept("1x2");

        let mut payloads = 0;
        for effect in &result.effects {
            match effect {
                Effect::ReplaceText(text) | Effect::Completed(text) => {
                    let text: &Zeroizing<String> = text;
                    assert_eq!(text.as_str(), "12");
                    payloads += 1;
                }
                _ => {}
            }
        }
        assert_eq!(payloads, 2);
    }

    #[test]
    fn test_effect_debug_hides_digits() {
        let rendered = format!("{:?}", Effect::Completed(digit_text("4821")));
        assert!(!rendered.contains("4821"));
    }
}
