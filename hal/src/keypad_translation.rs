//! Matrix position to key translation
//!
//! This module translates keypad matrix positions (from the HAL) to logical
//! keys (from input_types).
//!
//! ## Layout
//!
//! ```text
//!        C0  C1  C2
//!   R0 [ 1 ][ 2 ][ 3 ]
//!   R1 [ 4 ][ 5 ][ 6 ]
//!   R2 [ 7 ][ 8 ][ 9 ]
//!   R3 [ * ][ 0 ][ # ]
//! ```

use crate::keypad::{KeypadDevice, MatrixPosition, KEYPAD_COLS, KEYPAD_ROWS};
use input_types::KeypadKey;

/// Key legends, indexed `[row][col]`
const LAYOUT: [[KeypadKey; KEYPAD_COLS as usize]; KEYPAD_ROWS as usize] = [
    [KeypadKey::Num1, KeypadKey::Num2, KeypadKey::Num3],
    [KeypadKey::Num4, KeypadKey::Num5, KeypadKey::Num6],
    [KeypadKey::Num7, KeypadKey::Num8, KeypadKey::Num9],
    [KeypadKey::Star, KeypadKey::Num0, KeypadKey::Hash],
];

/// Translates a matrix position to the key printed at that position
///
/// Returns `None` for positions outside the 4x3 matrix.
pub fn matrix_to_key(position: MatrixPosition) -> Option<KeypadKey> {
    if !position.is_valid() {
        return None;
    }
    Some(LAYOUT[position.row as usize][position.col as usize])
}

/// Returns the matrix position of a key
///
/// Used by simulated keypads to close the right switch.
pub fn key_to_matrix(key: KeypadKey) -> MatrixPosition {
    for (row, keys) in LAYOUT.iter().enumerate() {
        for (col, candidate) in keys.iter().enumerate() {
            if *candidate == key {
                return MatrixPosition::new(row as u8, col as u8);
            }
        }
    }
    // Every KeypadKey appears in LAYOUT
    unreachable!("key {key:?} missing from keypad layout")
}

/// Keypad scanner that yields logical keys instead of matrix positions
pub struct KeypadTranslator<K: KeypadDevice> {
    device: K,
}

impl<K: KeypadDevice> KeypadTranslator<K> {
    /// Wraps a keypad device
    pub fn new(device: K) -> Self {
        Self { device }
    }

    /// Scans the device and returns the key currently held down
    ///
    /// Unmapped positions are reported as no key.
    pub fn key_down(&mut self) -> Option<KeypadKey> {
        self.device.scan().and_then(matrix_to_key)
    }

    /// Returns the underlying device
    pub fn device(&self) -> &K {
        &self.device
    }

    /// Returns the underlying device mutably
    pub fn device_mut(&mut self) -> &mut K {
        &mut self.device
    }
}
