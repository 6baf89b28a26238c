//! Multi-tap key decoding
//!
//! Each numeric key owns an ordered list of candidate symbols. Tapping the
//! same key again inside the multi-tap window replaces the character just
//! entered with the next candidate; any other tap starts a new character.

use input_types::KeypadKey;

use crate::buffer::TextBuffer;
use crate::mode::CaseMode;

/// Candidate symbols, indexed by digit
pub const KEY_SYMBOLS: [&str; 10] = [
    " 0",    // 0
    ".,?!1", // 1
    "abc2",  // 2
    "def3",  // 3
    "ghi4",  // 4
    "jkl5",  // 5
    "mno6",  // 6
    "pqrs7", // 7
    "tuv8",  // 8
    "wxyz9", // 9
];

/// Candidate symbols of a key, `None` for non-numeric keys
pub fn symbols_for(key: KeypadKey) -> Option<&'static str> {
    key.digit().map(|d| KEY_SYMBOLS[d as usize])
}

/// Returns the key and tap count that produce `ch` (case-insensitive)
pub fn taps_for(ch: char) -> Option<(KeypadKey, usize)> {
    let lower = ch.to_ascii_lowercase();
    KEY_SYMBOLS.iter().enumerate().find_map(|(digit, symbols)| {
        symbols
            .chars()
            .position(|candidate| candidate == lower)
            .and_then(|pos| KeypadKey::from_digit(digit as u8).map(|key| (key, pos + 1)))
    })
}

/// Result of decoding one tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Character to show, with case applied
    pub ch: char,
    /// True if `ch` replaces the previously entered character
    pub is_cycle: bool,
}

/// Multi-tap state of the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyCycleState {
    pub last_key: Option<KeypadKey>,
    pub symbol_index: usize,
    pub last_press_ms: u64,
}

/// Turns numeric key taps into characters
#[derive(Debug, Clone)]
pub struct InputDecoder {
    state: KeyCycleState,
    multitap_ms: u64,
}

impl InputDecoder {
    pub fn new(multitap_ms: u64) -> Self {
        Self {
            state: KeyCycleState::default(),
            multitap_ms,
        }
    }

    pub fn state(&self) -> KeyCycleState {
        self.state
    }

    pub fn multitap_ms(&self) -> u64 {
        self.multitap_ms
    }

    /// True if a tap of `key` at `now` would cycle the last character
    pub fn is_cycle(&self, key: KeypadKey, now: u64) -> bool {
        self.state.last_key == Some(key) && self.within_window(now)
    }

    /// True while the last entered character can still be cycled
    pub fn is_pending(&self, now: u64) -> bool {
        self.state.last_key.is_some() && self.within_window(now)
    }

    fn within_window(&self, now: u64) -> bool {
        now.saturating_sub(self.state.last_press_ms) < self.multitap_ms
    }

    /// Decodes a tap
    ///
    /// Case is decided for the slot the character lands in: the cursor for a
    /// new character, the slot before it for a cycle. Non-numeric keys
    /// decode to `None` and leave the state untouched.
    pub fn decode(
        &mut self,
        key: KeypadKey,
        now: u64,
        mode: CaseMode,
        buffer: &TextBuffer,
    ) -> Option<Decoded> {
        let symbols = symbols_for(key)?;
        let count = symbols.chars().count();

        let is_cycle = self.is_cycle(key, now);
        if is_cycle {
            self.state.symbol_index = (self.state.symbol_index + 1) % count;
        } else {
            self.state.symbol_index = 0;
            self.state.last_key = Some(key);
        }
        self.state.last_press_ms = now;

        let raw = symbols.chars().nth(self.state.symbol_index)?;
        let index = if is_cycle {
            buffer.cursor().saturating_sub(1)
        } else {
            buffer.cursor()
        };

        Some(Decoded {
            ch: apply_case(raw, mode, buffer, index),
            is_cycle,
        })
    }

    /// Forgets the last key so the next tap starts a new character
    pub fn reset(&mut self) {
        self.state.last_key = None;
        self.state.symbol_index = 0;
    }
}

/// Applies a case mode to a character about to be written at `index`
pub fn apply_case(ch: char, mode: CaseMode, buffer: &TextBuffer, index: usize) -> char {
    match mode {
        CaseMode::Lower => ch,
        CaseMode::Upper => ch.to_ascii_uppercase(),
        CaseMode::Smart => {
            if ch.is_ascii_digit() {
                ch
            } else if starts_sentence(buffer, index) {
                ch.to_ascii_uppercase()
            } else {
                ch.to_ascii_lowercase()
            }
        }
    }
}

fn starts_sentence(buffer: &TextBuffer, index: usize) -> bool {
    if index == 0 {
        return true;
    }
    if index < 2 {
        return false;
    }
    buffer.char_at(index - 1) == Some(' ')
        && matches!(buffer.char_at(index - 2), Some('.' | '!' | '?'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    const WINDOW: u64 = 500;

    /// Types `text` by tapping keys, waiting out the window between characters
    fn type_text(mode: CaseMode, text: &str) -> String {
        let mut decoder = InputDecoder::new(WINDOW);
        let mut buffer = TextBuffer::with_capacity(64);
        let mut now = 1_000;

        for ch in text.chars() {
            let (key, taps) = taps_for(ch).unwrap();
            now += WINDOW * 2;
            for tap in 0..taps {
                let decoded = decoder.decode(key, now, mode, &buffer).unwrap();
                assert_eq!(decoded.is_cycle, tap > 0);
                if decoded.is_cycle {
                    buffer.retreat_cursor();
                }
                buffer.set_at_cursor(decoded.ch);
                buffer.advance_cursor();
                now += 100;
            }
        }
        buffer.as_string()
    }

    #[test]
    fn test_symbols_for_keys() {
        assert_eq!(symbols_for(KeypadKey::Num2), Some("abc2"));
        assert_eq!(symbols_for(KeypadKey::Num0), Some(" 0"));
        assert_eq!(symbols_for(KeypadKey::Star), None);
        assert_eq!(symbols_for(KeypadKey::Hash), None);
    }

    #[test]
    fn test_taps_for() {
        assert_eq!(taps_for('a'), Some((KeypadKey::Num2, 1)));
        assert_eq!(taps_for('C'), Some((KeypadKey::Num2, 3)));
        assert_eq!(taps_for('s'), Some((KeypadKey::Num7, 4)));
        assert_eq!(taps_for(' '), Some((KeypadKey::Num0, 1)));
        assert_eq!(taps_for('!'), Some((KeypadKey::Num1, 4)));
        assert_eq!(taps_for('9'), Some((KeypadKey::Num9, 5)));
        assert_eq!(taps_for('@'), None);
    }

    #[test]
    fn test_cycling_through_candidates() {
        let mut decoder = InputDecoder::new(WINDOW);
        let buffer = TextBuffer::from_text(8, "a");
        let mut seen = String::new();

        let first = decoder
            .decode(KeypadKey::Num2, 0, CaseMode::Lower, &TextBuffer::with_capacity(8))
            .unwrap();
        assert!(!first.is_cycle);
        seen.push(first.ch);

        for now in [100, 200, 300, 400] {
            let decoded = decoder
                .decode(KeypadKey::Num2, now, CaseMode::Lower, &buffer)
                .unwrap();
            assert!(decoded.is_cycle);
            seen.push(decoded.ch);
        }
        assert_eq!(seen, "abc2a");
    }

    #[test]
    fn test_window_expiry_starts_fresh() {
        let mut decoder = InputDecoder::new(WINDOW);
        let buffer = TextBuffer::with_capacity(8);

        decoder.decode(KeypadKey::Num2, 0, CaseMode::Lower, &buffer);
        let decoded = decoder
            .decode(KeypadKey::Num2, WINDOW, CaseMode::Lower, &buffer)
            .unwrap();
        assert!(!decoded.is_cycle);
        assert_eq!(decoded.ch, 'a');
    }

    #[test]
    fn test_window_measured_from_last_tap() {
        let mut decoder = InputDecoder::new(WINDOW);
        let buffer = TextBuffer::from_text(8, "a");

        decoder.decode(KeypadKey::Num2, 0, CaseMode::Lower, &buffer);
        decoder.decode(KeypadKey::Num2, 400, CaseMode::Lower, &buffer);
        let third = decoder
            .decode(KeypadKey::Num2, 800, CaseMode::Lower, &buffer)
            .unwrap();
        assert!(third.is_cycle);
        assert_eq!(third.ch, 'c');
    }

    #[test]
    fn test_different_key_resets_index() {
        let mut decoder = InputDecoder::new(WINDOW);
        let buffer = TextBuffer::with_capacity(8);

        decoder.decode(KeypadKey::Num2, 0, CaseMode::Lower, &buffer);
        decoder.decode(KeypadKey::Num2, 100, CaseMode::Lower, &buffer);
        let decoded = decoder
            .decode(KeypadKey::Num3, 200, CaseMode::Lower, &buffer)
            .unwrap();
        assert!(!decoded.is_cycle);
        assert_eq!(decoded.ch, 'd');
        assert_eq!(decoder.state().symbol_index, 0);
        assert_eq!(decoder.state().last_key, Some(KeypadKey::Num3));
    }

    #[test]
    fn test_reset_breaks_cycle() {
        let mut decoder = InputDecoder::new(WINDOW);
        let buffer = TextBuffer::with_capacity(8);

        decoder.decode(KeypadKey::Num2, 0, CaseMode::Lower, &buffer);
        decoder.reset();
        assert!(!decoder.is_cycle(KeypadKey::Num2, 100));
        assert!(!decoder.is_pending(100));
    }

    #[test]
    fn test_non_numeric_keys_do_not_decode() {
        let mut decoder = InputDecoder::new(WINDOW);
        let buffer = TextBuffer::with_capacity(8);

        decoder.decode(KeypadKey::Num2, 0, CaseMode::Lower, &buffer);
        assert_eq!(
            decoder.decode(KeypadKey::Star, 10, CaseMode::Lower, &buffer),
            None
        );
        assert_eq!(
            decoder.decode(KeypadKey::Hash, 20, CaseMode::Lower, &buffer),
            None
        );
        assert_eq!(decoder.state().last_key, Some(KeypadKey::Num2));
    }

    #[test]
    fn test_upper_mode_leaves_digits_and_punctuation() {
        assert_eq!(type_text(CaseMode::Upper, "ab1.?"), "AB1.?");
    }

    #[test]
    fn test_lower_mode() {
        assert_eq!(type_text(CaseMode::Lower, "hello"), "hello");
    }

    #[test]
    fn test_smart_capitalizes_first_letter() {
        assert_eq!(type_text(CaseMode::Smart, "hello"), "Hello");
    }

    #[test]
    fn test_smart_capitalizes_after_terminator() {
        assert_eq!(type_text(CaseMode::Smart, "hi. there"), "Hi. There");
        assert_eq!(type_text(CaseMode::Smart, "ok! go? yes"), "Ok! Go? Yes");
    }

    #[test]
    fn test_smart_needs_space_after_terminator() {
        assert_eq!(type_text(CaseMode::Smart, "a.b, c"), "A.b, c");
    }

    #[test]
    fn test_smart_passes_digits() {
        assert_eq!(type_text(CaseMode::Smart, "2 go"), "2 go");
    }

    #[test]
    fn test_smart_case_on_cycle_uses_replaced_slot() {
        let mut decoder = InputDecoder::new(WINDOW);
        let mut buffer = TextBuffer::with_capacity(8);

        let first = decoder
            .decode(KeypadKey::Num2, 0, CaseMode::Smart, &buffer)
            .unwrap();
        assert_eq!(first.ch, 'A');
        buffer.set_at_cursor(first.ch);
        buffer.advance_cursor();

        let second = decoder
            .decode(KeypadKey::Num2, 100, CaseMode::Smart, &buffer)
            .unwrap();
        assert!(second.is_cycle);
        assert_eq!(second.ch, 'B');
    }
}
