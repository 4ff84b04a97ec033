//! Board module - manages the grid of settled cells
//!
//! The board is a 10x20 grid of [`Cell`]s stored as a flat row-major array.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! The falling piece is never stored here until it lands; callers check the
//! piece against the board with [`Board::is_within_board_and_free`] and then
//! [`Board::merge`] it exactly once.

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::types::{Cell, Rgb, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_WIDTH * BOARD_HEIGHT;

/// Row indices, at most one entry per board row
pub type RowSet = ArrayVec<usize, BOARD_HEIGHT>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::empty(); BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= BOARD_HEIGHT as i32 {
            return None;
        }
        Some((y as usize) * BOARD_WIDTH + (x as usize))
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Remove and return the cell at (x, y), leaving it empty
    pub fn take(&mut self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|idx| std::mem::take(&mut self.cells[idx]))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(cell) if cell.occupied)
    }

    /// Check whether every occupied cell of `piece` lies inside the board on a free cell.
    ///
    /// Cells above the ceiling (y < 0) are still emerging and count as free;
    /// they only need to be within the side walls.
    pub fn is_within_board_and_free(&self, piece: &Piece) -> bool {
        piece.occupied_cells().all(|(x, y, _)| {
            if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
                return false;
            }
            y < 0 || !self.is_occupied(x, y)
        })
    }

    /// Copy every occupied cell of `piece` onto the board.
    ///
    /// Not idempotent: a landed piece must be merged exactly once. Cells that
    /// fall outside the grid are skipped.
    pub fn merge(&mut self, piece: &Piece) {
        for (x, y, cell) in piece.occupied_cells() {
            let placed = self.set(x, y, cell);
            debug_assert!(placed || y < 0, "merged cell ({}, {}) outside board", x, y);
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT {
            return false;
        }
        let start = y * BOARD_WIDTH;
        self.cells[start..start + BOARD_WIDTH]
            .iter()
            .all(|cell| cell.occupied)
    }

    /// Indices of all complete rows, top to bottom
    pub fn full_rows(&self) -> RowSet {
        (0..BOARD_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Empty a row in place (rows above are not shifted)
    pub fn clear_row(&mut self, y: usize) {
        if y >= BOARD_HEIGHT {
            return;
        }
        let start = y * BOARD_WIDTH;
        self.cells[start..start + BOARD_WIDTH].fill(Cell::empty());
    }

    /// Fill a row completely with one color
    pub fn fill_row(&mut self, y: usize, color: Rgb) {
        if y >= BOARD_HEIGHT {
            return;
        }
        let start = y * BOARD_WIDTH;
        self.cells[start..start + BOARD_WIDTH].fill(Cell::filled(color));
    }

    /// Number of occupied cells on the whole board
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(Cell::empty());
    }

    /// Build a board from ASCII rows aligned to the bottom edge.
    ///
    /// `#` marks an occupied cell; the last string is row 19. Mostly useful
    /// for tests and benchmarks.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_cascade_core::Board;
    /// use tui_cascade_core::types::Rgb;
    ///
    /// let board = Board::from_bottom_rows(&["#.........", "##########"], Rgb::new(9, 9, 9));
    /// assert!(board.is_occupied(0, 18));
    /// assert!(board.is_row_full(19));
    /// assert_eq!(board.occupied_count(), 11);
    /// ```
    pub fn from_bottom_rows(rows: &[&str], color: Rgb) -> Self {
        let mut board = Self::new();
        let top = BOARD_HEIGHT.saturating_sub(rows.len());
        for (i, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().take(BOARD_WIDTH).enumerate() {
                if ch == '#' {
                    board.set(x as i32, (top + i) as i32, Cell::filled(color));
                }
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
