//! # Keypad Script Parser
//!
//! Provides a simple scripted keypad format for deterministic testing and demos.
//!
//! ## Format
//!
//! Scripts are line-based, with each line representing one action:
//! - Taps: `tap 2` or `tap 2 2 2` (keys `0`-`9`, `*`, `#`)
//! - Holds: `hold # 1s` (key down for the given duration)
//! - Delays: `wait 600ms` (no key down)
//! - Text: `type "hello"` (expanded to the multi-tap sequence of each character)
//! - Comments: `# This is a comment`
//!
//! ## Example
//!
//! ```text
//! # Type a greeting and send it from the help menu
//! type "hi there"
//! wait 1s
//! tap #
//! tap 5
//! ```

use std::collections::VecDeque;

use compose_core::taps_for;
use input_types::KeypadKey;
use thiserror::Error;

/// Keypad script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyScriptError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("No key sequence produces {0:?}")]
    UnsupportedChar(char),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,

    #[error("Invalid delay format: {0}")]
    InvalidDelay(String),
}

/// A single scripted keypad action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedInput {
    /// A short press
    Tap(KeypadKey),
    /// Key held down for a duration (in milliseconds)
    Hold(KeypadKey, u64),
    /// No key down for a duration (in milliseconds)
    Wait(u64),
}

/// Keypad script
#[derive(Debug, Clone, Default)]
pub struct KeyScript {
    inputs: VecDeque<ScriptedInput>,
}

impl KeyScript {
    /// Creates a new empty script
    pub fn new() -> Self {
        Self {
            inputs: VecDeque::new(),
        }
    }

    /// Parses a script from text
    ///
    /// `multitap_ms` is the composer's multi-tap window. `type` waits that
    /// long between two characters on the same key so the second one starts
    /// a new character instead of cycling the first.
    pub fn from_text(text: &str, multitap_ms: u64) -> Result<Self, KeyScriptError> {
        let mut inputs = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parsed = Self::parse_line(line, line_num + 1, multitap_ms)?;
            inputs.extend(parsed);
        }

        if inputs.is_empty() {
            return Err(KeyScriptError::EmptyScript);
        }

        Ok(Self { inputs })
    }

    /// Parses a single line of script
    fn parse_line(
        line: &str,
        line_num: usize,
        multitap_ms: u64,
    ) -> Result<Vec<ScriptedInput>, KeyScriptError> {
        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };
        let at_line = |message: String| KeyScriptError::ParseError {
            line: line_num,
            message,
        };

        match command {
            "tap" => {
                if args.is_empty() {
                    return Err(at_line("tap needs at least one key".to_string()));
                }
                args.split_whitespace()
                    .map(|name| Self::parse_key(name).map(ScriptedInput::Tap))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| at_line(e.to_string()))
            }
            "hold" => {
                let mut parts = args.split_whitespace();
                let (Some(key), Some(duration), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err(at_line("expected: hold <key> <duration>".to_string()));
                };
                let key = Self::parse_key(key).map_err(|e| at_line(e.to_string()))?;
                let millis = Self::parse_duration(duration).map_err(|e| at_line(e.to_string()))?;
                Ok(vec![ScriptedInput::Hold(key, millis)])
            }
            "wait" => {
                let millis = Self::parse_duration(args).map_err(|e| at_line(e.to_string()))?;
                Ok(vec![ScriptedInput::Wait(millis)])
            }
            "type" => {
                let text = args
                    .strip_prefix('"')
                    .and_then(|rest| rest.strip_suffix('"'))
                    .ok_or_else(|| at_line("expected: type \"<text>\"".to_string()))?;
                Self::expand_text(text, multitap_ms).map_err(|e| at_line(e.to_string()))
            }
            other => Err(at_line(format!("Unknown command: {}", other))),
        }
    }

    /// Parses a key legend (`0`-`9`, `*`, `#`)
    fn parse_key(name: &str) -> Result<KeypadKey, KeyScriptError> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(legend), None) => KeypadKey::from_legend(legend)
                .ok_or_else(|| KeyScriptError::InvalidKey(name.to_string())),
            _ => Err(KeyScriptError::InvalidKey(name.to_string())),
        }
    }

    /// Expands text into the taps that enter it
    fn expand_text(text: &str, multitap_ms: u64) -> Result<Vec<ScriptedInput>, KeyScriptError> {
        let mut inputs = Vec::new();
        let mut previous = None;

        for ch in text.chars() {
            let (key, taps) = taps_for(ch).ok_or(KeyScriptError::UnsupportedChar(ch))?;
            if previous == Some(key) {
                inputs.push(ScriptedInput::Wait(multitap_ms));
            }
            inputs.extend(std::iter::repeat(ScriptedInput::Tap(key)).take(taps));
            previous = Some(key);
        }

        Ok(inputs)
    }

    /// Parses a duration string (e.g., "100ms", "1s")
    fn parse_duration(s: &str) -> Result<u64, KeyScriptError> {
        let s = s.trim().to_lowercase();

        if let Some(ms_str) = s.strip_suffix("ms") {
            ms_str
                .trim()
                .parse::<u64>()
                .map_err(|_| KeyScriptError::InvalidDelay(s.to_string()))
        } else if let Some(s_str) = s.strip_suffix('s') {
            s_str
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(|secs| secs.checked_mul(1000))
                .ok_or_else(|| KeyScriptError::InvalidDelay(s.to_string()))
        } else {
            Err(KeyScriptError::InvalidDelay(s.to_string()))
        }
    }

    /// Returns the next action, if any
    pub fn next_input(&mut self) -> Option<ScriptedInput> {
        self.inputs.pop_front()
    }

    /// Returns true if the script has more actions
    pub fn has_more(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// Returns the number of remaining actions
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}
