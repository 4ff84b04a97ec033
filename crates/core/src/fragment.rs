//! Fragment splitter - lifts disconnected groups of cells off the board
//!
//! After complete rows are cleared, everything above them is traced into
//! maximal 4-connected groups. Each group is removed from the board and
//! returned as a [`Fragment`] that can fall on its own.
//!
//! Scan order is fixed so fragment identity is deterministic: starting at the
//! row directly above the bottom-most cleared row and moving up, left to right
//! within a row, the first occupied cell found seeds the next search.

use std::collections::VecDeque;

use crate::board::Board;
use crate::piece::{Fragment, Piece};
use crate::types::{Cell, BOARD_WIDTH};

/// Orthogonal neighbours: up, down, left, right
const NEIGHBORS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Split every occupied cell above the bottom-most cleared row into fragments.
///
/// The traced cells are taken off `board`, so on return the band above the
/// cleared rows is empty and no cell belongs to two fragments.
pub fn split_fragments(board: &mut Board, cleared: &[usize]) -> Vec<Fragment> {
    let Some(&lowest) = cleared.iter().max() else {
        return Vec::new();
    };

    let mut fragments = Vec::new();
    for y in (0..lowest as i32).rev() {
        for x in 0..BOARD_WIDTH as i32 {
            if board.is_occupied(x, y) {
                fragments.push(trace_fragment(board, x, y));
            }
        }
    }
    fragments
}

/// Breadth-first search from (x, y) over occupied cells, consuming them.
fn trace_fragment(board: &mut Board, x: i32, y: i32) -> Fragment {
    let mut traced: Vec<(i32, i32, Cell)> = Vec::new();
    let mut queue = VecDeque::new();

    if let Some(cell) = board.take(x, y).filter(|c| c.occupied) {
        traced.push((x, y, cell));
        queue.push_back((x, y));
    }

    while let Some((cx, cy)) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = (cx + dx, cy + dy);
            if !board.is_occupied(nx, ny) {
                continue;
            }
            if let Some(cell) = board.take(nx, ny) {
                traced.push((nx, ny, cell));
                queue.push_back((nx, ny));
            }
        }
    }

    build_fragment(&traced)
}

/// Pack traced cells into the smallest square grid that contains them.
fn build_fragment(traced: &[(i32, i32, Cell)]) -> Fragment {
    debug_assert!(!traced.is_empty(), "fragment traced from an empty cell");

    let min_x = traced.iter().map(|&(x, _, _)| x).min().unwrap_or(0);
    let max_x = traced.iter().map(|&(x, _, _)| x).max().unwrap_or(0);
    let min_y = traced.iter().map(|&(_, y, _)| y).min().unwrap_or(0);
    let max_y = traced.iter().map(|&(_, y, _)| y).max().unwrap_or(0);

    let size = ((max_x - min_x + 1).max(max_y - min_y + 1)) as usize;
    let mut cells = vec![Cell::empty(); size * size];
    for &(x, y, cell) in traced {
        let dx = (x - min_x) as usize;
        let dy = (y - min_y) as usize;
        cells[dy * size + dx] = cell;
    }

    Piece::new(size, cells, min_x, min_y)
}
