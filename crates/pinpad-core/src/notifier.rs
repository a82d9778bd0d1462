//! Single-shot completion notification
//!
//! Completion is edge-triggered: it fires on the transition from "not full"
//! to "full" and stays quiet until the sequence has been shortened again.

use tracing::debug;

/// Receives the PIN once all slots are filled
pub trait PinFinishedListener {
    fn pin_entered(&mut self, pin: &str);
}

impl<F> PinFinishedListener for F
where
    F: FnMut(&str),
{
    fn pin_entered(&mut self, pin: &str) {
        self(pin)
    }
}

/// Rising-edge detector for "sequence is full"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionLatch {
    full: bool,
}

impl CompletionLatch {
    /// Record the latest fullness; true only on a not-full to full transition
    pub fn observe(&mut self, is_full: bool) -> bool {
        let fired = is_full && !self.full;
        self.full = is_full;
        fired
    }

    /// Completion has fired and the sequence has not been shortened since
    pub fn is_latched(&self) -> bool {
        self.full
    }
}

/// Holds the optional completion listener
#[derive(Default)]
pub struct CompletionNotifier {
    listener: Option<Box<dyn PinFinishedListener>>,
}

impl std::fmt::Debug for CompletionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionNotifier")
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl CompletionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the listener, replacing any previous one
    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: PinFinishedListener + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Hand `pin` to the listener; false when none is installed
    pub fn notify(&mut self, pin: &str) -> bool {
        match self.listener.as_mut() {
            Some(listener) => {
                debug!("PIN entry complete, notifying listener");
                listener.pin_entered(pin);
                true
            }
            None => false,
        }
    }
}
