//! Composer snapshot for deterministic parity testing

use crate::controller::ComposerState;
use crate::mode::CaseMode;
use alloc::string::String;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Complete composer state snapshot for parity testing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct ComposerSnapshot {
    pub text: String,
    pub cursor: usize,
    pub length: usize,
    pub scroll_offset_lines: usize,
    pub case_mode: CaseMode,
    pub state: ComposerState,
    pub help_visible: bool,
    pub cursor_visible: bool,
    pub cursor_enabled: bool,
}

impl ComposerSnapshot {
    /// Compute a deterministic hash of the snapshot state
    /// This is used for fast comparison in parity tests
    #[cfg(test)]
    pub fn hash(&self) -> u64 {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();

        hasher.update(self.text.as_bytes());
        hasher.update(b"\0");

        hasher.update(self.cursor.to_le_bytes());
        hasher.update(self.length.to_le_bytes());
        hasher.update(self.scroll_offset_lines.to_le_bytes());

        hasher.update([self.case_mode as u8, self.state as u8]);
        hasher.update([
            self.help_visible as u8,
            self.cursor_visible as u8,
            self.cursor_enabled as u8,
        ]);

        let result = hasher.finalize();
        let bytes: [u8; 8] = result[..8].try_into().unwrap();
        u64::from_le_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(text: &str, cursor: usize) -> ComposerSnapshot {
        ComposerSnapshot {
            text: text.into(),
            cursor,
            length: text.len(),
            scroll_offset_lines: 0,
            case_mode: CaseMode::Lower,
            state: ComposerState::Idle,
            help_visible: false,
            cursor_visible: true,
            cursor_enabled: true,
        }
    }

    #[test]
    fn test_snapshot_hash_deterministic() {
        let snapshot = snapshot("hello", 5);
        assert_eq!(snapshot.hash(), snapshot.hash(), "Hash should be deterministic");
    }

    #[test]
    fn test_snapshot_hash_different_for_different_state() {
        let snapshot1 = snapshot("hello", 5);
        let snapshot2 = snapshot("hello", 4);
        let mut snapshot3 = snapshot("hello", 5);
        snapshot3.case_mode = CaseMode::Smart;

        assert_ne!(snapshot1.hash(), snapshot2.hash(), "Different states should have different hashes");
        assert_ne!(snapshot1.hash(), snapshot3.hash());
    }
}
