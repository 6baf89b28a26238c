//! Buffer index to screen cell mapping
//!
//! The message is laid out as fixed-width lines of `chars_per_line`
//! characters with no word wrap. The screen shows `visible_lines` of them
//! at a time and scrolls by whole pages: the first visible line is always a
//! multiple of `visible_lines`.

use core::ops::Range;

use hal::{CellPos, CellRegion};

use crate::config::Geometry;

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

/// Scroll change produced by bringing the cursor into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFlip {
    /// Cursor was already on the visible page
    Stay,
    /// Scrolled toward the end of the message
    Forward,
    /// Scrolled toward the start of the message
    Backward,
}

/// Page-granular viewport over the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportModel {
    chars_per_line: usize,
    visible_lines: usize,
    scroll_offset_lines: usize,
}

impl ViewportModel {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            chars_per_line: geometry.chars_per_line.max(1),
            visible_lines: geometry.visible_lines.max(1),
            scroll_offset_lines: 0,
        }
    }

    pub fn chars_per_line(&self) -> usize {
        self.chars_per_line
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    /// First buffer line shown at the top of the text area
    pub fn scroll_offset_lines(&self) -> usize {
        self.scroll_offset_lines
    }

    /// 1-based page number
    pub fn page(&self) -> usize {
        self.scroll_offset_lines / self.visible_lines + 1
    }

    pub fn row_of(&self, index: usize) -> usize {
        index / self.chars_per_line
    }

    pub fn col_of(&self, index: usize) -> usize {
        index % self.chars_per_line
    }

    pub fn is_row_visible(&self, row: usize) -> bool {
        row >= self.scroll_offset_lines && row < self.scroll_offset_lines + self.visible_lines
    }

    /// Screen cell of a buffer index, `None` when it is off the current page
    pub fn cell_of(&self, index: usize) -> Option<CellPos> {
        let row = self.row_of(index);
        if !self.is_row_visible(row) {
            return None;
        }
        Some(CellPos::new(row - self.scroll_offset_lines, self.col_of(index)))
    }

    /// Buffer indices shown on the current page, clipped to `len`
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.scroll_offset_lines * self.chars_per_line;
        let end = start + self.visible_lines * self.chars_per_line;
        start.min(len)..end.min(len)
    }

    /// The whole text area in cells
    pub fn text_region(&self) -> CellRegion {
        CellRegion::new(0, 0, self.visible_lines, self.chars_per_line)
    }

    /// Cursor index after a move, `None` when the move would leave the message
    ///
    /// Left and right step one character and so wrap between lines. Up and
    /// down step a whole line; down needs a full line of text below.
    pub fn nav_target(&self, direction: Direction, cursor: usize, len: usize) -> Option<usize> {
        match direction {
            Direction::Left => cursor.checked_sub(1),
            Direction::Right => (cursor < len).then_some(cursor + 1),
            Direction::Up => cursor.checked_sub(self.chars_per_line),
            Direction::Down => {
                let target = cursor + self.chars_per_line;
                (target <= len).then_some(target)
            }
        }
    }

    /// Destination cell of a one-step move on the screen grid
    ///
    /// Left from column 0 wraps to the last column of the row above; right
    /// from the last column wraps to column 0 of the row below. Moving above
    /// the first row pins to the top-left cell and moving below the last row
    /// pins to the bottom-right cell.
    pub fn target_cell(&self, from: CellPos, direction: Direction) -> CellPos {
        let last_col = self.chars_per_line - 1;
        let (row, col) = (from.row as isize, from.col);

        let (row, col) = match direction {
            Direction::Up => (row - 1, col),
            Direction::Down => (row + 1, col),
            Direction::Left if col == 0 => (row - 1, last_col),
            Direction::Left => (row, col - 1),
            Direction::Right if col >= last_col => (row + 1, 0),
            Direction::Right => (row, col + 1),
        };

        if row < 0 {
            CellPos::origin()
        } else if row as usize >= self.visible_lines {
            CellPos::new(self.visible_lines - 1, last_col)
        } else {
            CellPos::new(row as usize, col)
        }
    }

    /// Scrolls by whole pages until the cursor's line is visible
    pub fn follow(&mut self, cursor: usize) -> PageFlip {
        let row = self.row_of(cursor);
        let page_start = (row / self.visible_lines) * self.visible_lines;

        if row >= self.scroll_offset_lines + self.visible_lines {
            self.scroll_offset_lines = page_start;
            PageFlip::Forward
        } else if row < self.scroll_offset_lines {
            self.scroll_offset_lines = page_start;
            PageFlip::Backward
        } else {
            PageFlip::Stay
        }
    }

    /// Returns to the first page
    pub fn reset(&mut self) {
        self.scroll_offset_lines = 0;
    }
}
