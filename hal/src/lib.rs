//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the hardware abstraction traits of the message device.
//!
//! ## Philosophy
//!
//! **The board must be fully abstracted and swappable.**
//!
//! The composition engine never touches GPIO, SPI or timers directly.
//! The HAL provides traits that board-specific crates implement.
//!
//! ## Design Principles
//!
//! 1. **No board-specific assumptions**: Pin numbers and panel drivers stay below this line
//! 2. **Trait-based**: Keypad, display and clock all go through traits
//! 3. **Testable**: Every device can be mocked for testing

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod display;
pub mod keypad;
pub mod keypad_translation;
pub mod timer;

pub use display::{CellPos, CellRegion, CursorShape, GridDisplay, Ink};
pub use keypad::{KeypadDevice, MatrixPosition, KEYPAD_COLS, KEYPAD_ROWS};
pub use keypad_translation::{key_to_matrix, matrix_to_key, KeypadTranslator};
pub use timer::TimerDevice;
