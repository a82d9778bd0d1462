//! Pinpad Core - digit entry for segmented PIN input
//!
//! This crate owns the stateful part of a segmented PIN field: one hidden
//! capture surface feeding N visual slots. It decides which slot is active,
//! when the PIN is complete, and whether a pointer gesture was a tap that
//! should open the keyboard or a drag that scrolled the slot row.
//!
//! Drawing, layout and keyboard plumbing belong to the host. The host feeds
//! [`EntryEvent`]s in and carries out the [`Effect`]s that come back.

pub mod config;
pub mod entry;
pub mod error;
pub mod gesture;
pub mod notifier;
pub mod sequence;

pub use config::{ContainerKind, EntryConfig, DEFAULT_MASK, DEFAULT_MAX_LENGTH};
pub use entry::{
    step, Effect, EntryEvent, EntryState, PinEntry, SequenceResult, SlotGeometry, Transition,
};
pub use error::{Error, Result};
pub use gesture::{
    GestureClassifier, GesturePhase, GestureSample, Position, TapDecision, TapPolicy,
    DEFAULT_DRAG_THRESHOLD,
};
pub use notifier::{CompletionLatch, CompletionNotifier, PinFinishedListener};
pub use sequence::{PinSequence, SlotState};
