//! Digit sequence model and per-slot state
//!
//! The capture surface reports its whole text on every change. The model
//! keeps only ASCII digits, caps the count at the configured length and
//! derives each slot's state from the result. Edits happen at the end only,
//! so the cursor is always the digit count.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Entered digits, bounded by the PIN length
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PinSequence {
    digits: String,
    #[zeroize(skip)]
    max_length: usize,
}

// Digits stay out of debug output
impl std::fmt::Debug for PinSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinSequence")
            .field("len", &self.digits.len())
            .field("max_length", &self.max_length)
            .finish()
    }
}

impl PinSequence {
    /// Empty sequence with `max_length` slots
    pub fn new(max_length: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(Error::InvalidMaxLength(max_length));
        }

        Ok(Self {
            digits: String::with_capacity(max_length),
            max_length,
        })
    }

    /// Number of slots
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Number of digits entered
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Insertion point; always equal to `len()`
    pub fn cursor(&self) -> usize {
        self.digits.len()
    }

    /// All slots filled
    pub fn is_complete(&self) -> bool {
        self.digits.len() == self.max_length
    }

    /// Entered digits
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Sequence for the full text of the capture surface
    ///
    /// Non-digit characters are dropped and anything past `max_length`
    /// digits is cut off.
    pub fn accept(&self, raw: &str) -> PinSequence {
        let digits = raw
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.max_length)
            .collect();

        PinSequence {
            digits,
            max_length: self.max_length,
        }
    }

    /// Sequence with `digit` appended; unchanged when full or not a digit
    pub fn push(&self, digit: char) -> PinSequence {
        let mut next = self.clone();
        if digit.is_ascii_digit() && !self.is_complete() {
            next.digits.push(digit);
        }
        next
    }

    /// Sequence with the last digit removed
    pub fn backspace(&self) -> PinSequence {
        let mut next = self.clone();
        next.digits.pop();
        next
    }

    /// Empty sequence of the same length
    pub fn cleared(&self) -> PinSequence {
        PinSequence {
            digits: String::with_capacity(self.max_length),
            max_length: self.max_length,
        }
    }

    /// Slot awaiting the next digit, if the capture surface has focus
    pub fn active_index(&self, has_focus: bool) -> Option<usize> {
        (has_focus && !self.is_complete()).then(|| self.digits.len())
    }

    /// State of every slot
    pub fn slots(&self, has_focus: bool) -> Vec<SlotState> {
        let len = self.digits.len();
        (0..self.max_length)
            .map(|index| SlotState {
                filled: index < len,
                active: has_focus && index == len,
            })
            .collect()
    }

    /// Text to display, one `mask` per entered digit
    pub fn masked(&self, mask: char) -> String {
        std::iter::repeat(mask).take(self.digits.len()).collect()
    }
}

/// Derived display state of one slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotState {
    /// A digit has been entered here
    pub filled: bool,
    /// Next digit goes here
    pub active: bool,
}

impl SlotState {
    /// Glyph drawn in the slot
    pub fn glyph(&self, mask: char) -> Option<char> {
        self.filled.then_some(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(max_length: usize, raw: &str) -> PinSequence {
        PinSequence::new(max_length).unwrap().accept(raw)
    }

    #[test]
    fn test_zero_length_rejected() {
        assert_eq!(PinSequence::new(0), Err(Error::InvalidMaxLength(0)));
    }

    #[test]
    fn test_accept_truncates() {
        let s = seq(4, "123456");
        assert_eq!(s.digits(), "1234");
        assert!(s.is_complete());
        assert_eq!(s.cursor(), 4);
    }

    #[test]
    fn test_accept_drops_non_digits() {
        let s = seq(4, "1a-2 ３3");
        assert_eq!(s.digits(), "123");
        assert_eq!(s.cursor(), s.len());
    }

    #[test]
    fn test_accept_replaces_whole_text() {
        let s = seq(4, "12").accept("9");
        assert_eq!(s.digits(), "9");
    }

    #[test]
    fn test_push_and_backspace() {
        let s = PinSequence::new(2).unwrap();
        let s = s.push('4').push('x').push('2').push('7');
        assert_eq!(s.digits(), "42");

        let s = s.backspace();
        assert_eq!(s.digits(), "4");
        let s = s.backspace().backspace();
        assert!(s.is_empty());
    }

    #[test]
    fn test_cleared_keeps_length() {
        let s = seq(6, "123").cleared();
        assert!(s.is_empty());
        assert_eq!(s.max_length(), 6);
    }

    #[test]
    fn test_slots_without_focus() {
        let slots = seq(4, "12").slots(false);
        assert_eq!(
            slots,
            vec![
                SlotState { filled: true, active: false },
                SlotState { filled: true, active: false },
                SlotState { filled: false, active: false },
                SlotState { filled: false, active: false },
            ]
        );
    }

    #[test]
    fn test_slots_with_focus() {
        let slots = seq(4, "12").slots(true);
        assert!(slots[2].active);
        assert_eq!(slots.iter().filter(|s| s.active).count(), 1);
        assert_eq!(seq(4, "12").active_index(true), Some(2));
        assert_eq!(seq(4, "12").active_index(false), None);
    }

    #[test]
    fn test_complete_sequence_has_no_active_slot() {
        let s = seq(4, "1234");
        assert!(s.slots(true).iter().all(|slot| slot.filled && !slot.active));
        assert_eq!(s.active_index(true), None);
    }

    #[test]
    fn test_masked() {
        assert_eq!(seq(4, "123").masked('•'), "•••");
        assert_eq!(seq(4, "").masked('*'), "");

        let slots = seq(2, "1").slots(false);
        assert_eq!(slots[0].glyph('•'), Some('•'));
        assert_eq!(slots[1].glyph('•'), None);
    }

    #[test]
    fn test_debug_hides_digits() {
        let rendered = format!("{:?}", seq(4, "4821"));
        assert!(!rendered.contains("4821"));
        assert!(rendered.contains("len: 4"));
    }
}
