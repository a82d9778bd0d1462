//! Tap versus drag classification for pointer sequences
//!
//! A scrollable slot row sees the same down/move/up stream for a tap that
//! should open the keyboard and for a swipe that scrolls the row. The
//! classifier arms on pointer-down and disarms for the rest of the cycle once
//! the pointer has travelled past the drag threshold. A fixed container has
//! nothing to scroll, so every release counts as a tap.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ContainerKind;

/// Default drag threshold in device-independent units
pub const DEFAULT_DRAG_THRESHOLD: f64 = 30.0;

/// Pointer position in the host's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Sentinel stored once a gesture has been dragged out
    pub const INVALID: Position = Position { x: -1.0, y: -1.0 };

    /// Create a position
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Non-negative, finite coordinates
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x >= 0.0 && self.y >= 0.0
    }

    /// Euclidean distance to `other`
    ///
    /// Invalid positions are infinitely far from everything, so the sentinel
    /// can never be mistaken for a short tap.
    pub fn displacement(&self, other: &Position) -> f64 {
        if !self.is_valid() || !other.is_valid() {
            return f64::INFINITY;
        }

        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Where a pointer cycle currently stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GesturePhase {
    /// No pointer is down
    #[default]
    Idle,
    /// Pointer is down and has stayed within the threshold
    ArmedByTap,
    /// Pointer travelled past the threshold; this cycle cannot become a tap
    DraggedOut,
}

/// One down-to-up pointer cycle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureSample {
    pub down: Option<Position>,
    pub phase: GesturePhase,
}

/// Outcome of a pointer release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapDecision {
    /// Focus the capture surface and show the keyboard
    pub open_input: bool,
}

/// Displacement-based tap classifier for scrolling containers
#[derive(Debug, Clone, PartialEq)]
pub struct GestureClassifier {
    threshold: f64,
    sample: GestureSample,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl GestureClassifier {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            sample: GestureSample::default(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Current cycle
    pub fn sample(&self) -> GestureSample {
        self.sample
    }

    pub fn on_pointer_down(&mut self, pos: Position) {
        self.sample = GestureSample {
            down: Some(pos),
            phase: GesturePhase::ArmedByTap,
        };
    }

    pub fn on_pointer_move(&mut self, pos: Position) {
        if self.sample.phase != GesturePhase::ArmedByTap {
            return;
        }

        if self.distance_from_down(&pos) > self.threshold {
            debug!("Pointer dragged past {} units, tap cancelled", self.threshold);
            self.sample = GestureSample {
                down: Some(Position::INVALID),
                phase: GesturePhase::DraggedOut,
            };
        }
    }

    pub fn on_pointer_up(&mut self, pos: Position) -> TapDecision {
        let open_input = self.sample.phase == GesturePhase::ArmedByTap
            && self.distance_from_down(&pos) < self.threshold;

        self.sample = GestureSample::default();

        TapDecision { open_input }
    }

    fn distance_from_down(&self, pos: &Position) -> f64 {
        match &self.sample.down {
            Some(down) => down.displacement(pos),
            None => f64::INFINITY,
        }
    }
}

/// How a container decides that a release opens input
#[derive(Debug, Clone, PartialEq)]
pub enum TapPolicy {
    /// Scrolling container: classify by displacement
    Displacement(GestureClassifier),
    /// Fixed container: every release opens input
    Always,
}

impl TapPolicy {
    /// Policy for the given container shape
    pub fn for_container(container: ContainerKind, threshold: f64) -> Self {
        if container.is_scrollable() {
            TapPolicy::Displacement(GestureClassifier::new(threshold))
        } else {
            TapPolicy::Always
        }
    }

    pub fn on_pointer_down(&mut self, pos: Position) {
        if let TapPolicy::Displacement(classifier) = self {
            classifier.on_pointer_down(pos);
        }
    }

    pub fn on_pointer_move(&mut self, pos: Position) {
        if let TapPolicy::Displacement(classifier) = self {
            classifier.on_pointer_move(pos);
        }
    }

    pub fn on_pointer_up(&mut self, pos: Position) -> TapDecision {
        match self {
            TapPolicy::Displacement(classifier) => classifier.on_pointer_up(pos),
            TapPolicy::Always => TapDecision { open_input: true },
        }
    }

    /// Phase of the in-flight cycle; always idle for fixed containers
    pub fn phase(&self) -> GesturePhase {
        match self {
            TapPolicy::Displacement(classifier) => classifier.sample().phase,
            TapPolicy::Always => GesturePhase::Idle,
        }
    }
}
