#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pinpad_core::{step, Effect, EntryConfig, EntryEvent, EntryState, Position};

#[derive(Debug, Arbitrary)]
enum Op {
    Down(u16, u16),
    Move(u16, u16),
    Up(u16, u16),
    Text(String),
    Backspace,
    Focus(bool),
    Clear,
}

impl From<Op> for EntryEvent {
    fn from(op: Op) -> Self {
        match op {
            Op::Down(x, y) => EntryEvent::PointerDown(Position::new(x as f64, y as f64)),
            Op::Move(x, y) => EntryEvent::PointerMove(Position::new(x as f64, y as f64)),
            Op::Up(x, y) => EntryEvent::PointerUp(Position::new(x as f64, y as f64)),
            Op::Text(text) => EntryEvent::TextChanged(text),
            Op::Backspace => EntryEvent::Backspace,
            Op::Focus(has_focus) => EntryEvent::FocusChanged(has_focus),
            Op::Clear => EntryEvent::Clear,
        }
    }
}

fuzz_target!(|input: (u8, Vec<Op>)| {
    let (max_length, ops) = input;
    let max_length = (max_length % 12) as usize + 1;
    let mut state = EntryState::new(EntryConfig::with_max_length(max_length)).unwrap();

    for op in ops {
        let was_complete = state.sequence().is_complete();
        let transition = step(&state, op.into());
        state = transition.state;

        let completions = transition
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Completed(_)))
            .count();

        // Completion only on the transition into a full sequence
        assert!(completions <= 1);
        if completions == 1 {
            assert!(!was_complete);
            assert!(state.sequence().is_complete());
        }

        assert!(state.sequence().len() <= max_length);
        assert!(state.slots().iter().filter(|s| s.active).count() <= 1);
    }
});
