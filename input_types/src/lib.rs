#![no_std]

//! # Input Types
//!
//! Key identifiers and key events for the 12-key message keypad.
//!
//! ## Philosophy
//!
//! - **Events, not pins**: Input is structured events, not GPIO levels
//! - **Short vs held is explicit**: The hold distinction is decided once, below the engine
//! - **Testable**: Events are serializable and can be injected for testing
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Matrix scanning or debouncing (that is the HAL)
//! - A character decoder (multi-tap lives in the composition engine)

#[cfg(test)]
extern crate alloc;

use core::fmt;
use serde::{Deserialize, Serialize};

/// A physical key on the 4x3 keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeypadKey {
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    /// Bottom-left `*` key (case mode switch)
    Star,
    /// Bottom-right `#` key (help, delete when held)
    Hash,
}

impl KeypadKey {
    /// All twelve keys in keypad reading order
    pub const ALL: [KeypadKey; 12] = [
        KeypadKey::Num1,
        KeypadKey::Num2,
        KeypadKey::Num3,
        KeypadKey::Num4,
        KeypadKey::Num5,
        KeypadKey::Num6,
        KeypadKey::Num7,
        KeypadKey::Num8,
        KeypadKey::Num9,
        KeypadKey::Star,
        KeypadKey::Num0,
        KeypadKey::Hash,
    ];

    /// Creates a numeric key from a digit value
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(KeypadKey::Num0),
            1 => Some(KeypadKey::Num1),
            2 => Some(KeypadKey::Num2),
            3 => Some(KeypadKey::Num3),
            4 => Some(KeypadKey::Num4),
            5 => Some(KeypadKey::Num5),
            6 => Some(KeypadKey::Num6),
            7 => Some(KeypadKey::Num7),
            8 => Some(KeypadKey::Num8),
            9 => Some(KeypadKey::Num9),
            _ => None,
        }
    }

    /// Returns the digit value for numeric keys
    pub fn digit(&self) -> Option<u8> {
        match self {
            KeypadKey::Num0 => Some(0),
            KeypadKey::Num1 => Some(1),
            KeypadKey::Num2 => Some(2),
            KeypadKey::Num3 => Some(3),
            KeypadKey::Num4 => Some(4),
            KeypadKey::Num5 => Some(5),
            KeypadKey::Num6 => Some(6),
            KeypadKey::Num7 => Some(7),
            KeypadKey::Num8 => Some(8),
            KeypadKey::Num9 => Some(9),
            KeypadKey::Star | KeypadKey::Hash => None,
        }
    }

    /// Returns true for the ten numeric keys
    pub fn is_digit(&self) -> bool {
        self.digit().is_some()
    }

    /// Parses the key legend (`0`-`9`, `*`, `#`)
    pub fn from_legend(ch: char) -> Option<Self> {
        match ch {
            '*' => Some(KeypadKey::Star),
            '#' => Some(KeypadKey::Hash),
            _ => ch
                .to_digit(10)
                .and_then(|d| KeypadKey::from_digit(d as u8)),
        }
    }

    /// Returns the legend printed on the key
    pub fn legend(&self) -> char {
        match self {
            KeypadKey::Star => '*',
            KeypadKey::Hash => '#',
            other => match other.digit() {
                Some(d) => (b'0' + d) as char,
                None => '?',
            },
        }
    }
}

impl fmt::Display for KeypadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.legend())
    }
}

/// Keypad event delivered to the composition engine
///
/// A short press is reported once, on release. A held key is reported
/// repeatedly for as long as it stays down past the long-press threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that produced the event
    pub key: KeypadKey,
    /// Whether the key is being held past the long-press threshold
    pub held: bool,
}

impl KeyEvent {
    /// Creates a short press event
    pub fn short(key: KeypadKey) -> Self {
        Self { key, held: false }
    }

    /// Creates a held (long-press) event
    pub fn held(key: KeypadKey) -> Self {
        Self { key, held: true }
    }

    /// Returns true if this is a short press
    pub fn is_short(&self) -> bool {
        !self.held
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.held {
            write!(f, "hold {}", self.key)
        } else {
            write!(f, "tap {}", self.key)
        }
    }
}
