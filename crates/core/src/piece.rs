//! Piece module - a square local grid placed on the board by its top-left origin
//!
//! The same type carries the falling piece and the fragments produced by a row
//! collapse. The grid is an owned `Vec`, so every `clone()` is a deep copy and
//! two pieces never share storage.

use crate::types::Cell;

/// A square grid of cells with a board-relative origin.
///
/// Occupied cells are the piece's blocks; the rest is padding that keeps the
/// bounding box square so rotation is a plain matrix operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    size: usize,
    cells: Vec<Cell>,
    pub origin_x: i32,
    pub origin_y: i32,
}

/// A settled remnant lifted off the board by a row collapse.
pub type Fragment = Piece;

impl Piece {
    /// Build a piece from a row-major grid of `size * size` cells.
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != size * size`.
    pub fn new(size: usize, cells: Vec<Cell>, origin_x: i32, origin_y: i32) -> Self {
        assert_eq!(cells.len(), size * size, "piece grid must be square");
        Self {
            size,
            cells,
            origin_x,
            origin_y,
        }
    }

    /// Build a piece from ASCII rows, `#` marking an occupied cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_cascade_core::Piece;
    /// use tui_cascade_core::types::Rgb;
    ///
    /// let piece = Piece::from_rows(&["##", "#."], Rgb::new(255, 0, 0), 4, 7);
    /// assert_eq!(piece.size(), 2);
    /// assert_eq!(piece.occupied_count(), 3);
    /// ```
    pub fn from_rows(rows: &[&str], color: crate::types::Rgb, origin_x: i32, origin_y: i32) -> Self {
        let size = rows.len();
        let mut cells = vec![Cell::empty(); size * size];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().take(size).enumerate() {
                if ch == '#' {
                    cells[y * size + x] = Cell::filled(color);
                }
            }
        }
        Self::new(size, cells, origin_x, origin_y)
    }

    /// Side length of the local grid
    pub fn size(&self) -> usize {
        self.size
    }

    /// Local cell at (dx, dy), `None` outside the grid
    pub fn cell(&self, dx: usize, dy: usize) -> Option<Cell> {
        if dx >= self.size || dy >= self.size {
            return None;
        }
        Some(self.cells[dy * self.size + dx])
    }

    /// Row-major local cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate occupied cells as `(board_x, board_y, cell)`
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.occupied)
            .map(move |(i, cell)| {
                let dx = (i % size) as i32;
                let dy = (i / size) as i32;
                (self.origin_x + dx, self.origin_y + dy, *cell)
            })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    /// Board row of the lowest occupied cell, `None` for an empty grid
    pub fn lowest_row(&self) -> Option<i32> {
        self.occupied_cells().map(|(_, y, _)| y).max()
    }

    /// Same grid, origin moved by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            size: self.size,
            cells: self.cells.clone(),
            origin_x: self.origin_x + dx,
            origin_y: self.origin_y + dy,
        }
    }

    /// Grid rotated 90° clockwise, origin unchanged.
    ///
    /// Row reversal followed by a transpose: `new[y][x] = old[n-1-x][y]`.
    pub fn rotated(&self) -> Self {
        let n = self.size;
        let mut cells = vec![Cell::empty(); n * n];
        for y in 0..n {
            for x in 0..n {
                cells[y * n + x] = self.cells[(n - 1 - x) * n + y];
            }
        }
        Self {
            size: n,
            cells,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
        }
    }
}
