//! Static configuration handed to an entry component when it mounts

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gesture::DEFAULT_DRAG_THRESHOLD;

/// Default number of digit slots
pub const DEFAULT_MAX_LENGTH: usize = 4;

/// Default glyph drawn in a filled slot
pub const DEFAULT_MASK: char = '•';

/// Shape of the container the slots are laid out in
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Horizontally scrolling row; taps must be told apart from swipes
    #[default]
    Scrollable,
    /// Fixed grid; every tap opens input
    Fixed,
}

impl ContainerKind {
    /// Whether the container scrolls its slots
    pub fn is_scrollable(self) -> bool {
        matches!(self, ContainerKind::Scrollable)
    }
}

/// Entry component configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Number of digits in a complete PIN
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Pointer travel beyond which a press becomes a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,

    /// Container shape, selects the tap policy
    #[serde(default)]
    pub container: ContainerKind,

    /// Glyph shown in filled slots
    #[serde(default = "default_mask")]
    pub mask: char,

    /// Ask the host to dismiss the keyboard once the PIN is complete
    #[serde(default)]
    pub hide_keyboard_on_complete: bool,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_drag_threshold() -> f64 {
    DEFAULT_DRAG_THRESHOLD
}

fn default_mask() -> char {
    DEFAULT_MASK
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            container: ContainerKind::default(),
            mask: DEFAULT_MASK,
            hide_keyboard_on_complete: false,
        }
    }
}

impl EntryConfig {
    /// Config with `max_length` digits and defaults elsewhere
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            ..Default::default()
        }
    }

    /// Replace the container kind
    pub fn container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }

    /// Replace the drag threshold
    pub fn drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Check the values an entry component cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(Error::InvalidMaxLength(self.max_length));
        }

        if !self.drag_threshold.is_finite() || self.drag_threshold <= 0.0 {
            return Err(Error::InvalidDragThreshold(self.drag_threshold));
        }

        Ok(())
    }
}
