//! Short press / long press classification
//!
//! The keypad is sampled rather than interrupt driven: every poll reports
//! which key (if any) is down. The tracker turns that level signal into
//! [`KeyEvent`]s.
//!
//! - A key released without exceeding `long_press_ms` yields one short event.
//! - A key still down past `long_press_ms` yields a held event on every
//!   poll until release; no short event follows.

use input_types::{KeyEvent, KeypadKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActivePress {
    key: KeypadKey,
    pressed_at: u64,
    long_fired: bool,
}

/// Per-key press timing
#[derive(Debug, Clone)]
pub struct HoldTracker {
    long_press_ms: u64,
    active: Option<ActivePress>,
}

impl HoldTracker {
    pub fn new(long_press_ms: u64) -> Self {
        Self {
            long_press_ms,
            active: None,
        }
    }

    pub fn long_press_ms(&self) -> u64 {
        self.long_press_ms
    }

    /// Key currently down, if any
    pub fn active_key(&self) -> Option<KeypadKey> {
        self.active.map(|press| press.key)
    }

    /// Feeds one keypad sample
    pub fn sample(&mut self, down: Option<KeypadKey>, now: u64) -> Option<KeyEvent> {
        match (self.active, down) {
            (None, None) => None,
            (None, Some(key)) => {
                self.start(key, now);
                None
            }
            (Some(press), None) => {
                self.active = None;
                Self::release_event(press)
            }
            (Some(press), Some(key)) if press.key == key => {
                if now.saturating_sub(press.pressed_at) > self.long_press_ms {
                    self.active = Some(ActivePress {
                        long_fired: true,
                        ..press
                    });
                    Some(KeyEvent::held(key))
                } else {
                    None
                }
            }
            // Rollover without a release sample: finish the old press first
            (Some(press), Some(key)) => {
                self.start(key, now);
                Self::release_event(press)
            }
        }
    }

    /// Drops any press in progress without reporting it
    pub fn reset(&mut self) {
        self.active = None;
    }

    fn start(&mut self, key: KeypadKey, now: u64) {
        self.active = Some(ActivePress {
            key,
            pressed_at: now,
            long_fired: false,
        });
    }

    fn release_event(press: ActivePress) -> Option<KeyEvent> {
        if press.long_fired {
            None
        } else {
            Some(KeyEvent::short(press.key))
        }
    }
}
