//! Render sink contract.
//!
//! The engine never reads pixels back; it only tells a sink which board cells
//! to paint or erase and when a batch of changes is complete. Fragment tasks
//! call the sink concurrently (always on disjoint cells), so implementations
//! take `&self` and handle their own interior mutability.

use std::sync::Mutex;

use crate::core::Piece;
use crate::types::{Rgb, BOARD_HEIGHT, BOARD_WIDTH};

pub trait RenderSink: Send + Sync {
    /// Paint board cell (x, y) with `color`
    fn draw_cell(&self, x: usize, y: usize, color: Rgb);

    /// Paint board cell (x, y) with the background color
    fn erase_cell(&self, x: usize, y: usize);

    /// Flush everything painted since the last refresh
    fn refresh(&self);
}

/// Board coordinates of a piece cell, if it is on the visible board
fn visible(x: i32, y: i32) -> Option<(usize, usize)> {
    if x < 0 || y < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
        return None;
    }
    Some((x as usize, y as usize))
}

/// Paint every visible occupied cell of `piece`
pub fn draw_piece(sink: &dyn RenderSink, piece: &Piece) {
    for (x, y, cell) in piece.occupied_cells() {
        if let Some((x, y)) = visible(x, y) {
            sink.draw_cell(x, y, cell.color);
        }
    }
}

/// Erase every visible occupied cell of `piece`
pub fn erase_piece(sink: &dyn RenderSink, piece: &Piece) {
    for (x, y, _) in piece.occupied_cells() {
        if let Some((x, y)) = visible(x, y) {
            sink.erase_cell(x, y);
        }
    }
}

/// One call received by a [`RecordingSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOp {
    Draw { x: usize, y: usize, color: Rgb },
    Erase { x: usize, y: usize },
    Refresh,
}

/// Sink that records every call; used by headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    ops: Mutex<Vec<RenderOp>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every operation recorded so far
    pub fn ops(&self) -> Vec<RenderOp> {
        self.ops.lock().map(|ops| ops.clone()).unwrap_or_default()
    }

    /// Drain the recorded operations
    pub fn take(&self) -> Vec<RenderOp> {
        self.ops
            .lock()
            .map(|mut ops| std::mem::take(&mut *ops))
            .unwrap_or_default()
    }

    pub fn refresh_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, RenderOp::Refresh))
            .count()
    }

    fn push(&self, op: RenderOp) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.push(op);
        }
    }
}

impl RenderSink for RecordingSink {
    fn draw_cell(&self, x: usize, y: usize, color: Rgb) {
        self.push(RenderOp::Draw { x, y, color });
    }

    fn erase_cell(&self, x: usize, y: usize) {
        self.push(RenderOp::Erase { x, y });
    }

    fn refresh(&self) {
        self.push(RenderOp::Refresh);
    }
}

/// Sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw_cell(&self, _x: usize, _y: usize, _color: Rgb) {}
    fn erase_cell(&self, _x: usize, _y: usize) {}
    fn refresh(&self) {}
}
