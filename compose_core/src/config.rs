//! Composer configuration
//!
//! Display geometry and every timing rule are plain data so hosts can load
//! them from a file and tests can shrink them.

use core::fmt;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::buffer::DEFAULT_CAPACITY;

/// Text area size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde_support", serde(default))]
pub struct Geometry {
    pub chars_per_line: usize,
    pub visible_lines: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            chars_per_line: 10,
            visible_lines: 3,
        }
    }
}

/// Timing rules, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde_support", serde(default))]
pub struct Timing {
    /// Window in which a repeated tap cycles the last character
    pub multitap_ms: u64,
    /// Hold time after which a press counts as held
    pub long_press_ms: u64,
    /// Minimum delay between repeated navigation moves
    pub move_repeat_ms: u64,
    /// Minimum delay between repeated deletes
    pub delete_repeat_ms: u64,
    /// Cursor blink half-period
    pub blink_ms: u64,
    /// How long a send notice stays on screen
    pub notice_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            multitap_ms: 500,
            long_press_ms: 500,
            move_repeat_ms: 150,
            delete_repeat_ms: 150,
            blink_ms: 500,
            notice_ms: 2000,
        }
    }
}

/// Full composer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde_support", serde(default))]
pub struct ComposerConfig {
    /// Maximum message length in characters
    pub capacity: usize,
    pub geometry: Geometry,
    pub timing: Timing,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            geometry: Geometry::default(),
            timing: Timing::default(),
        }
    }
}

impl ComposerConfig {
    /// Checks values the composer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.geometry.chars_per_line == 0 || self.geometry.visible_lines == 0 {
            return Err(ConfigError::EmptyGeometry {
                chars_per_line: self.geometry.chars_per_line,
                visible_lines: self.geometry.visible_lines,
            });
        }
        if self.timing.multitap_ms == 0 {
            return Err(ConfigError::ZeroMultitapWindow);
        }
        Ok(())
    }
}

/// Configuration rejected by [`ComposerConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroCapacity,
    EmptyGeometry {
        chars_per_line: usize,
        visible_lines: usize,
    },
    ZeroMultitapWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "message capacity must be at least 1"),
            ConfigError::EmptyGeometry {
                chars_per_line,
                visible_lines,
            } => write!(
                f,
                "text area must be non-empty (got {} chars per line, {} visible lines)",
                chars_per_line, visible_lines
            ),
            ConfigError::ZeroMultitapWindow => write!(f, "multi-tap window must be non-zero"),
        }
    }
}
