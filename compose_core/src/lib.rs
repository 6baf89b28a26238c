#![cfg_attr(not(test), no_std)]

//! # Compose Core
//!
//! Text composition engine of the keypad message device.
//!
//! ## Philosophy
//!
//! - **No_std compatible**: Uses alloc but not std
//! - **Deterministic**: Same key trace and clock => same composer state
//! - **Time is injected**: Every timing rule compares against a caller-supplied `now`
//! - **No ambient authority**: Sending is requested from the host, never performed
//!
//! ## Design
//!
//! The core provides:
//! - TextBuffer: Fixed-capacity slots with an edit cursor
//! - InputDecoder: Multi-tap decoding with case modes
//! - ViewportModel: Index to cell mapping with page-granular scrolling
//! - HoldTracker: Short/held classification of sampled keys
//! - Composer: The state machine driving a `hal::GridDisplay`
//! - ComposerSnapshot: Deterministic state for parity testing

extern crate alloc;

pub mod buffer;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod hold;
pub mod mode;
pub mod snapshot;
pub mod viewport;

pub use buffer::{TextBuffer, DEFAULT_CAPACITY};
pub use config::{ComposerConfig, ConfigError, Geometry, Timing};
pub use controller::{
    Composer, ComposerOutcome, ComposerState, OutgoingMessage, Screen, SendReport, HELP_LINES,
};
pub use decoder::{symbols_for, taps_for, Decoded, InputDecoder, KeyCycleState, KEY_SYMBOLS};
pub use hold::HoldTracker;
pub use mode::CaseMode;
pub use snapshot::ComposerSnapshot;
pub use viewport::{Direction, PageFlip, ViewportModel};
