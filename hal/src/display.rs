//! # Grid Display HAL
//!
//! Hardware abstraction for small character-grid displays.
//!
//! ## Philosophy
//!
//! The display is an output sink. Callers address character cells, never
//! pixels; the implementation owns fonts, colors and the frame buffer.
//!
//! ## Design Principles
//!
//! 1. **Cells, not pixels**: All coordinates are (row, col) within the text area
//! 2. **Explicit flush**: Drawing is buffered until `flush()`
//! 3. **Testable**: Can be mocked with a recording or in-memory grid
//! 4. **Write-mostly**: The only read-back is the draw cursor position

/// A character cell in the text area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellPos {
    /// Row within the visible text area (0 = top)
    pub row: usize,
    /// Column (0 = left)
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// A rectangular block of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRegion {
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

impl CellRegion {
    pub const fn new(top: usize, left: usize, rows: usize, cols: usize) -> Self {
        Self {
            top,
            left,
            rows,
            cols,
        }
    }

    /// Returns true if the cell lies inside the region
    pub const fn contains(&self, cell: CellPos) -> bool {
        cell.row >= self.top
            && cell.row < self.top + self.rows
            && cell.col >= self.left
            && cell.col < self.left + self.cols
    }
}

/// Drawing color on a monochrome panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    /// Pixel lit
    On,
    /// Pixel dark (erase)
    Off,
}

/// Cursor glyph shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    /// Cell border only, used when a character sits under the cursor
    Outline,
    /// Solid cell, used on empty slots
    Block,
}

/// Character grid display trait
///
/// Implementations translate cell operations into their own rendering
/// (glyph blits over SPI, an in-memory grid, a recording fake).
pub trait GridDisplay {
    /// Draws a glyph into a cell, replacing whatever was there
    fn draw_char(&mut self, cell: CellPos, ch: char);

    /// Fills a region with the given ink (`Ink::Off` clears it)
    fn fill_region(&mut self, region: CellRegion, ink: Ink);

    /// Draws or erases the cursor glyph at a cell
    fn draw_cursor(&mut self, cell: CellPos, shape: CursorShape, ink: Ink);

    /// Moves the draw cursor
    fn set_cursor(&mut self, cell: CellPos);

    /// Returns the draw cursor
    fn cursor(&self) -> CellPos;

    /// Redraws the status header (left, centered and right aligned fields)
    fn draw_status(&mut self, left: &str, center: &str, right: &str);

    /// Draws an overlay table over the text area, one entry per line
    fn draw_overlay(&mut self, lines: &[&str]);

    /// Pushes pending drawing to the panel
    fn flush(&mut self);
}
