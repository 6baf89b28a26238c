//! Fixed-capacity message buffer with an edit cursor

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Default message capacity (one SMS segment)
pub const DEFAULT_CAPACITY: usize = 160;

/// Message text stored as fixed slots
///
/// Unused slots hold `None`, which no typed character can produce. The
/// message length is the number of slots before the first empty one, so
/// the occupied slots are always contiguous from index 0.
///
/// The cursor is the slot the next typed character is written to. It is
/// kept in `0..=len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    slots: Vec<Option<char>>,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    /// Creates a buffer holding `text` (truncated to capacity), cursor at the end
    pub fn from_text(capacity: usize, text: &str) -> Self {
        let mut buffer = Self::with_capacity(capacity);
        for (slot, ch) in buffer.slots.iter_mut().zip(text.chars()) {
            *slot = Some(ch);
        }
        buffer.cursor = buffer.len();
        buffer
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor; rejected if `index > len()`
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index > self.len() {
            return false;
        }
        self.cursor = index;
        true
    }

    /// Moves the cursor one slot right, up to `len()`
    pub fn advance_cursor(&mut self) -> bool {
        self.set_cursor(self.cursor + 1)
    }

    /// Moves the cursor one slot left, down to 0
    pub fn retreat_cursor(&mut self) -> bool {
        match self.cursor.checked_sub(1) {
            Some(index) => self.set_cursor(index),
            None => false,
        }
    }

    /// Character at `index`, or `None` for empty and out-of-range slots
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Character under the cursor
    pub fn char_at_cursor(&self) -> Option<char> {
        self.char_at(self.cursor)
    }

    /// Writes `ch` into the slot at the cursor without moving it
    ///
    /// Overwrites an existing character; never shifts or grows. A cursor at
    /// capacity makes this a no-op.
    pub fn set_at_cursor(&mut self, ch: char) -> bool {
        match self.slots.get_mut(self.cursor) {
            Some(slot) => {
                *slot = Some(ch);
                true
            }
            None => false,
        }
    }

    /// Empties the slot at the cursor and every slot after it
    ///
    /// At the tail this is the O(1) delete: the last character becomes the
    /// terminator and `len()` drops to the cursor.
    pub fn truncate_at_cursor(&mut self) {
        let end = self.len();
        for slot in self.slots.iter_mut().take(end).skip(self.cursor) {
            *slot = None;
        }
    }

    /// Removes the character at `index`, shifting the rest left
    ///
    /// No-op on an empty buffer or when `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> bool {
        let len = self.len();
        if len == 0 || index >= len {
            return false;
        }

        for idx in index..len - 1 {
            self.slots[idx] = self.slots[idx + 1];
        }
        self.slots[len - 1] = None;

        if self.cursor > len - 1 {
            self.cursor = len - 1;
        }
        true
    }

    /// Number of characters before the first empty slot
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Slots still available for new characters
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Empties every occupied slot and returns the cursor to 0
    pub fn clear(&mut self) {
        let len = self.len();
        for slot in self.slots.iter_mut().take(len) {
            *slot = None;
        }
        self.cursor = 0;
    }

    /// Iterates over the message characters
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.slots.iter().map_while(|slot| *slot)
    }

    pub fn as_string(&self) -> String {
        self.chars().collect()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(buffer: &TextBuffer) {
        assert!(buffer.len() <= buffer.capacity());
        assert!(buffer.cursor() <= buffer.len());
        // Nothing hides behind the first empty slot
        assert!((buffer.len()..buffer.capacity()).all(|i| buffer.char_at(i).is_none()));
    }

    fn type_str(buffer: &mut TextBuffer, text: &str) {
        for ch in text.chars() {
            buffer.set_at_cursor(ch);
            buffer.advance_cursor();
        }
    }

    #[test]
    fn test_new_buffer() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.capacity(), DEFAULT_CAPACITY);
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.cursor(), 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.remaining(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_typing_appends() {
        let mut buffer = TextBuffer::with_capacity(8);
        type_str(&mut buffer, "hey");
        assert_eq!(buffer.as_string(), "hey");
        assert_eq!(buffer.cursor(), 3);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_typing_mid_message_overwrites() {
        let mut buffer = TextBuffer::from_text(8, "hello");
        buffer.set_cursor(1);
        type_str(&mut buffer, "a");
        assert_eq!(buffer.as_string(), "hallo");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_char_at_out_of_range() {
        let buffer = TextBuffer::from_text(4, "ab");
        assert_eq!(buffer.char_at(1), Some('b'));
        assert_eq!(buffer.char_at(2), None);
        assert_eq!(buffer.char_at(4), None);
        assert_eq!(buffer.char_at(usize::MAX), None);
    }

    #[test]
    fn test_set_at_cursor_rejected_at_capacity() {
        let mut buffer = TextBuffer::from_text(3, "abc");
        assert!(buffer.is_full());
        assert_eq!(buffer.cursor(), 3);
        assert!(!buffer.set_at_cursor('d'));
        assert!(!buffer.advance_cursor());
        assert_eq!(buffer.as_string(), "abc");
        assert_invariants(&buffer);
    }

    #[test]
    fn test_from_text_truncates() {
        let buffer = TextBuffer::from_text(3, "abcdef");
        assert_eq!(buffer.as_string(), "abc");
        assert!(buffer.is_full());
    }

    #[test]
    fn test_set_cursor_bounds() {
        let mut buffer = TextBuffer::from_text(10, "abc");
        assert!(buffer.set_cursor(0));
        assert!(buffer.set_cursor(3));
        assert!(!buffer.set_cursor(4));
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn test_retreat_at_zero() {
        let mut buffer = TextBuffer::from_text(10, "a");
        assert!(buffer.retreat_cursor());
        assert!(!buffer.retreat_cursor());
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_remove_at_shifts_left() {
        let mut buffer = TextBuffer::from_text(10, "abcdef");
        let before: Vec<Option<char>> = (0..10).map(|i| buffer.char_at(i)).collect();

        assert!(buffer.remove_at(2));
        assert_eq!(buffer.as_string(), "abdef");
        assert_eq!(buffer.len(), 5);
        for i in 0..2 {
            assert_eq!(buffer.char_at(i), before[i]);
        }
        for i in 2..5 {
            assert_eq!(buffer.char_at(i), before[i + 1]);
        }
        assert_eq!(buffer.char_at(5), None);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_remove_at_noop_cases() {
        let mut empty = TextBuffer::with_capacity(4);
        assert!(!empty.remove_at(0));

        let mut buffer = TextBuffer::from_text(4, "ab");
        assert!(!buffer.remove_at(2));
        assert!(!buffer.remove_at(3));
        assert_eq!(buffer.as_string(), "ab");
    }

    #[test]
    fn test_remove_last_clamps_cursor() {
        let mut buffer = TextBuffer::from_text(4, "ab");
        assert_eq!(buffer.cursor(), 2);
        assert!(buffer.remove_at(1));
        assert_eq!(buffer.cursor(), 1);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_truncate_at_tail() {
        let mut buffer = TextBuffer::from_text(6, "abc");
        buffer.retreat_cursor();
        buffer.truncate_at_cursor();
        assert_eq!(buffer.as_string(), "ab");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.cursor(), 2);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_truncate_mid_message_drops_tail() {
        let mut buffer = TextBuffer::from_text(6, "abcde");
        buffer.set_cursor(2);
        buffer.truncate_at_cursor();
        assert_eq!(buffer.as_string(), "ab");
        assert_invariants(&buffer);
    }

    #[test]
    fn test_clear() {
        let mut buffer = TextBuffer::from_text(6, "abc");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(buffer.char_at(0), None);
        assert_invariants(&buffer);
    }

    #[test]
    fn test_invariants_hold_over_mixed_edits() {
        let mut buffer = TextBuffer::with_capacity(5);
        let ops: [(u8, usize); 12] = [
            (0, 0),
            (0, 0),
            (0, 0),
            (1, 1),
            (0, 0),
            (0, 0),
            (0, 0),
            (0, 0),
            (1, 0),
            (2, 0),
            (1, 4),
            (0, 0),
        ];
        for (op, arg) in ops {
            match op {
                0 => {
                    if !buffer.is_full() {
                        buffer.set_at_cursor('x');
                        buffer.advance_cursor();
                    }
                }
                1 => {
                    buffer.remove_at(arg);
                }
                _ => {
                    buffer.set_cursor(arg);
                }
            }
            assert_invariants(&buffer);
        }
    }
}
