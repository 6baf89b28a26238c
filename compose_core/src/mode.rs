//! Letter case modes

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// How decoded letters are cased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum CaseMode {
    /// Letters as stored in the symbol table
    #[default]
    Lower,
    /// Every letter upper-cased
    Upper,
    /// Sentence case: capitalize the message start and after ". ", "! ", "? "
    Smart,
}

impl CaseMode {
    /// The mode the switch key rotates to
    pub fn next(self) -> Self {
        match self {
            CaseMode::Lower => CaseMode::Upper,
            CaseMode::Upper => CaseMode::Smart,
            CaseMode::Smart => CaseMode::Lower,
        }
    }

    /// Header indicator
    pub fn label(&self) -> &'static str {
        match self {
            CaseMode::Lower => "abc",
            CaseMode::Upper => "ABC",
            CaseMode::Smart => "Abc",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseMode::Lower => "LOWER",
            CaseMode::Upper => "UPPER",
            CaseMode::Smart => "SMART",
        }
    }
}
