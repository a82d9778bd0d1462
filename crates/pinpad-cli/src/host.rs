//! Line-oriented terminal host for a `PinEntry`
//!
//! Stands in for the UI toolkit: it owns the capture-surface text and the
//! focus flag, turns keystrokes into text changes, and carries out the
//! effects the entry component hands back.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use anyhow::{Context, Result};
use pinpad_core::{Effect, EntryConfig, EntryEvent, PinEntry, Position, SlotState};
use zeroize::{Zeroize, Zeroizing};

/// Keystroke that deletes the last digit
pub const BACKSPACE_KEY: char = '-';

/// Glyph for an empty, inactive slot
const EMPTY_GLYPH: char = '·';

/// Glyph for the active slot
const CURSOR_GLYPH: char = '_';

/// Render slots as `[ • • _ · ]`
pub fn render_slots(slots: &[SlotState], mask: char) -> String {
    let glyphs: Vec<String> = slots
        .iter()
        .map(|slot| match slot.glyph(mask) {
            Some(glyph) => glyph.to_string(),
            None if slot.active => CURSOR_GLYPH.to_string(),
            None => EMPTY_GLYPH.to_string(),
        })
        .collect();

    format!("[ {} ]", glyphs.join(" "))
}

/// Terminal stand-in for the widget around a `PinEntry`
pub struct TerminalHost<W: Write> {
    entry: PinEntry,
    mask: char,
    capture: Zeroizing<String>,
    has_focus: bool,
    finished: Rc<RefCell<Option<Zeroizing<String>>>>,
    out: W,
}

impl<W: Write> TerminalHost<W> {
    pub fn new(config: EntryConfig, out: W) -> Result<Self> {
        let mask = config.mask;
        let mut entry = PinEntry::new(config).context("Invalid entry configuration")?;

        let finished = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&finished);
        entry.set_on_pin_finished(move |pin: &str| {
            *sink.borrow_mut() = Some(Zeroizing::new(pin.to_string()));
        });

        Ok(Self {
            entry,
            mask,
            capture: Zeroizing::new(String::new()),
            has_focus: false,
            finished,
            out,
        })
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Current capture-surface text
    pub fn capture(&self) -> &str {
        &self.capture
    }

    /// Simulate a tap on the slot row
    pub fn tap(&mut self) -> Result<()> {
        self.press(Position::new(0.0, 0.0), &[], Position::new(0.0, 0.0))
    }

    /// Feed one pointer cycle and carry out whatever the entry asks for
    pub fn press(&mut self, down: Position, moves: &[Position], up: Position) -> Result<()> {
        let mut effects = self.entry.handle(EntryEvent::PointerDown(down));
        for &pos in moves {
            effects.extend(self.entry.handle(EntryEvent::PointerMove(pos)));
        }
        effects.extend(self.entry.handle(EntryEvent::PointerUp(up)));

        self.apply(effects)
    }

    /// Process one keystroke; returns the PIN once entry completes
    pub fn key(&mut self, key: char) -> Result<Option<Zeroizing<String>>> {
        let effects = if key == BACKSPACE_KEY {
            self.entry.backspace().effects
        } else {
            self.capture.push(key);
            self.entry.accept(&self.capture).effects
        };

        self.apply(effects)?;
        Ok(self.finished.borrow_mut().take())
    }

    /// Feed keystrokes from `input` until a PIN is complete or input ends
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<Option<Zeroizing<String>>> {
        self.tap()?;

        for line in input.lines() {
            let line = Zeroizing::new(line.context("Failed to read keystrokes")?);
            for key in line.chars() {
                if let Some(pin) = self.key(key)? {
                    return Ok(Some(pin));
                }
            }
        }

        Ok(None)
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::RequestFocus => {
                    if !self.has_focus {
                        self.has_focus = true;
                        let follow_up = self.entry.focus_changed(true);
                        self.apply(follow_up)?;
                    }
                }
                Effect::ShowKeyboard => {
                    writeln!(self.out, "Type digits, '{}' to delete:", BACKSPACE_KEY)?;
                }
                Effect::HideKeyboard => {
                    tracing::debug!("Keyboard dismissed");
                }
                Effect::ReplaceText(text) => {
                    self.capture.zeroize();
                    self.capture.push_str(&text);
                }
                Effect::MoveCaretToEnd(_) => {}
                Effect::SlotsChanged(slots) => {
                    writeln!(self.out, "{}", render_slots(&slots, self.mask))?;
                }
                Effect::BringIntoView { index, .. } => {
                    tracing::debug!("Slot {} active", index);
                }
                Effect::Completed(_) => {
                    tracing::debug!("Entry complete");
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }
}
