//! # Character Grid Console
//!
//! An in-memory implementation of `hal::GridDisplay`.
//!
//! ## Philosophy
//!
//! This is NOT a panel driver. No fonts, no pixels, no SPI.
//! It's a deterministic cell store: same draw calls → same frame text.
//!
//! ## Design Principles
//!
//! 1. **Minimal and deterministic**: One `char` per cell, one header line
//! 2. **Testable**: `render()` turns the screen into plain text for assertions
//! 3. **Clamps, doesn't scroll**: Cells outside the grid are ignored
//! 4. **Explicit cursor**: The draw cursor moves only through `set_cursor`

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use hal::{CellPos, CellRegion, CursorShape, GridDisplay, Ink};

/// Glyph used for a cell filled with `Ink::On`
pub const FILL_GLYPH: char = '#';

/// Cursor marker for a cell holding a character
pub const OUTLINE_MARKER: char = '^';

/// Cursor marker for an empty cell
pub const BLOCK_MARKER: char = '_';

/// Header line fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub left: String,
    pub center: String,
    pub right: String,
}

/// In-memory character grid
pub struct GridConsole {
    cols: usize,
    rows: usize,
    cells: Vec<Vec<Option<char>>>,
    cursor: CellPos,
    cursor_glyph: Option<(CellPos, CursorShape)>,
    status: StatusLine,
    overlay: Vec<String>,
    flushes: usize,
}

impl GridConsole {
    /// Create a blank console of `rows` x `cols` text cells
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![vec![None; cols]; rows],
            cursor: CellPos::origin(),
            cursor_glyph: None,
            status: StatusLine::default(),
            overlay: Vec::new(),
            flushes: 0,
        }
    }

    /// Returns the number of text columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of text rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Character in a cell, `None` for blank or out-of-range cells
    pub fn cell(&self, cell: CellPos) -> Option<char> {
        self.cells.get(cell.row)?.get(cell.col).copied().flatten()
    }

    /// Text of one row with blanks as spaces
    pub fn row_text(&self, row: usize) -> String {
        match self.cells.get(row) {
            Some(cells) => cells.iter().map(|c| c.unwrap_or(' ')).collect(),
            None => String::new(),
        }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn overlay(&self) -> &[String] {
        &self.overlay
    }

    /// Visible cursor glyph, if any
    pub fn cursor_glyph(&self) -> Option<(CellPos, CursorShape)> {
        self.cursor_glyph
    }

    /// Number of `flush` calls so far
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Renders the screen as text
    ///
    /// The header comes first, then a separator, then the text rows framed
    /// by `|`. A visible cursor adds a marker line under its row. While an
    /// overlay is shown it replaces the text rows.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&self.render_status());
        out.push('\n');
        out.push('+');
        out.push_str(&"-".repeat(self.cols));
        out.push_str("+\n");

        if !self.overlay.is_empty() {
            for line in &self.overlay {
                out.push_str(line);
                out.push('\n');
            }
            return out;
        }

        for row in 0..self.rows {
            out.push('|');
            out.push_str(&self.row_text(row));
            out.push_str("|\n");

            if let Some((cell, shape)) = self.cursor_glyph {
                if cell.row == row && cell.col < self.cols {
                    let marker = match shape {
                        CursorShape::Outline => OUTLINE_MARKER,
                        CursorShape::Block => BLOCK_MARKER,
                    };
                    out.push(' ');
                    out.push_str(&" ".repeat(cell.col));
                    out.push(marker);
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Lays out the three header fields over the grid width
    fn render_status(&self) -> String {
        let StatusLine {
            left,
            center,
            right,
        } = &self.status;
        let (l, c, r) = (
            left.chars().count(),
            center.chars().count(),
            right.chars().count(),
        );
        let width = (self.cols + 2).max(l + c + r + 2);

        let center_at = ((width - c) / 2).max(l + 1);
        let right_at = (width - r).max(center_at + c + 1);

        let mut line = left.clone();
        line.push_str(&" ".repeat(center_at - l));
        line.push_str(center);
        line.push_str(&" ".repeat(right_at - center_at - c));
        line.push_str(right);
        line
    }
}

impl GridDisplay for GridConsole {
    fn draw_char(&mut self, cell: CellPos, ch: char) {
        if let Some(slot) = self
            .cells
            .get_mut(cell.row)
            .and_then(|row| row.get_mut(cell.col))
        {
            *slot = Some(ch);
        }
    }

    fn fill_region(&mut self, region: CellRegion, ink: Ink) {
        let fill = match ink {
            Ink::On => Some(FILL_GLYPH),
            Ink::Off => None,
        };
        for (row_idx, row) in self.cells.iter_mut().enumerate() {
            for (col_idx, slot) in row.iter_mut().enumerate() {
                if region.contains(CellPos::new(row_idx, col_idx)) {
                    *slot = fill;
                }
            }
        }
        if let Some((cell, _)) = self.cursor_glyph {
            if region.contains(cell) {
                self.cursor_glyph = None;
            }
        }
        self.overlay.clear();
    }

    fn draw_cursor(&mut self, cell: CellPos, shape: CursorShape, ink: Ink) {
        self.cursor_glyph = match ink {
            Ink::On => Some((cell, shape)),
            Ink::Off => None,
        };
    }

    fn set_cursor(&mut self, cell: CellPos) {
        self.cursor = cell;
    }

    fn cursor(&self) -> CellPos {
        self.cursor
    }

    fn draw_status(&mut self, left: &str, center: &str, right: &str) {
        self.status = StatusLine {
            left: left.to_string(),
            center: center.to_string(),
            right: right.to_string(),
        };
    }

    fn draw_overlay(&mut self, lines: &[&str]) {
        self.overlay = lines.iter().map(|line| line.to_string()).collect();
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
