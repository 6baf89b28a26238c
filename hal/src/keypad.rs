//! Keypad device abstraction
//!
//! This module provides a hardware abstraction for the 4x3 matrix keypad.
//!
//! ## Philosophy
//!
//! - **Hardware is just a source**: The keypad reports which matrix position is down
//! - **Level, not edge**: A scan reports the current state; press/hold/release
//!   detection happens above this layer
//! - **Testable**: Can mock hardware via fake implementations
//!
//! ## Design
//!
//! The keypad interface is minimal:
//! - Poll-based (the caller drives scanning from its main loop)
//! - Returns the first closed switch found, or nothing
//! - Debouncing and GPIO setup belong to the implementation

/// Number of keypad rows
pub const KEYPAD_ROWS: u8 = 4;

/// Number of keypad columns
pub const KEYPAD_COLS: u8 = 3;

/// Position of a switch in the keypad matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixPosition {
    /// Row line (0 = top)
    pub row: u8,
    /// Column line (0 = left)
    pub col: u8,
}

impl MatrixPosition {
    /// Creates a matrix position
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Returns true if the position exists on the 4x3 matrix
    pub const fn is_valid(&self) -> bool {
        self.row < KEYPAD_ROWS && self.col < KEYPAD_COLS
    }
}

/// Keypad device trait
///
/// Architecture-specific implementations scan the switch matrix via this trait.
///
/// ## Implementation Notes
///
/// - **Poll-based**: Call `scan()` once per main loop iteration
/// - **Non-blocking**: Must return immediately, never wait for release
/// - **Stateless**: Device does not track hold duration or repeats
pub trait KeypadDevice {
    /// Scans the matrix
    ///
    /// Returns `Some(position)` while a key is held down, or `None` if
    /// every switch is open.
    fn scan(&mut self) -> Option<MatrixPosition>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_matrix_position_validity() {
        assert!(MatrixPosition::new(0, 0).is_valid());
        assert!(MatrixPosition::new(3, 2).is_valid());
        assert!(!MatrixPosition::new(4, 0).is_valid());
        assert!(!MatrixPosition::new(0, 3).is_valid());
    }

    /// Fake keypad that replays a fixed series of scan results
    struct FakeKeypad {
        scans: Vec<Option<MatrixPosition>>,
        index: usize,
    }

    impl FakeKeypad {
        fn new(scans: Vec<Option<MatrixPosition>>) -> Self {
            Self { scans, index: 0 }
        }
    }

    impl KeypadDevice for FakeKeypad {
        fn scan(&mut self) -> Option<MatrixPosition> {
            let result = self.scans.get(self.index).copied().flatten();
            self.index += 1;
            result
        }
    }

    #[test]
    fn test_fake_keypad_device() {
        let down = MatrixPosition::new(1, 1);
        let mut keypad = FakeKeypad::new(vec![Some(down), Some(down), None]);

        assert_eq!(keypad.scan(), Some(down));
        assert_eq!(keypad.scan(), Some(down));
        assert_eq!(keypad.scan(), None);
        assert_eq!(keypad.scan(), None);
    }

    #[test]
    fn test_keypad_device_trait() {
        let mut keypad: Box<dyn KeypadDevice> =
            Box::new(FakeKeypad::new(vec![Some(MatrixPosition::new(3, 2))]));

        assert!(keypad.scan().is_some());
        assert!(keypad.scan().is_none());
    }
}
