//! Simulated keypad and clock
//!
//! The runtime closes and opens switches on [`SimKeypad`] and advances
//! [`SimClock`] by whole poll steps, so a script runs without real delays.

use hal::{key_to_matrix, KeypadDevice, MatrixPosition, TimerDevice};
use input_types::KeypadKey;

/// Keypad whose switches are set by the host
#[derive(Debug, Default)]
pub struct SimKeypad {
    down: Option<KeypadKey>,
}

impl SimKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the switch of `key`, opening any other
    pub fn press(&mut self, key: KeypadKey) {
        self.down = Some(key);
    }

    /// Opens every switch
    pub fn release(&mut self) {
        self.down = None;
    }

    pub fn pressed(&self) -> Option<KeypadKey> {
        self.down
    }
}

impl KeypadDevice for SimKeypad {
    fn scan(&mut self) -> Option<MatrixPosition> {
        self.down.map(key_to_matrix)
    }
}

/// Millisecond clock that only moves when told to
#[derive(Debug, Default)]
pub struct SimClock {
    now: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Moves time forward and returns the new reading
    pub fn advance(&mut self, millis: u64) -> u64 {
        self.now += millis;
        self.now
    }
}

impl TimerDevice for SimClock {
    fn now_ms(&mut self) -> u64 {
        self.now
    }
}
