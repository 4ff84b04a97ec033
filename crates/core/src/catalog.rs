//! Catalog module - the seven spawnable shapes
//!
//! Templates are immutable statics. Spawning builds a fresh grid from the
//! template's mask, so a generated piece can never alias a template or another
//! generated piece.

use crate::piece::Piece;
use crate::rng::SimpleRng;
use crate::types::{Rgb, ShapeKind, BOARD_WIDTH, SPAWN_Y};

/// Immutable description of a catalog shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeTemplate {
    pub kind: ShapeKind,
    /// Square mask, one string per row, `#` marks a block
    pub rows: &'static [&'static str],
    pub color: Rgb,
    /// Spawn column of the bounding box, chosen to center the piece
    pub spawn_x: i32,
}

impl ShapeTemplate {
    /// Fresh piece at the spawn position
    pub fn spawn(&self) -> Piece {
        Piece::from_rows(self.rows, self.color, self.spawn_x, SPAWN_Y)
    }
}

const HALF_WIDTH: i32 = (BOARD_WIDTH / 2) as i32;

/// Read-only shape registry, indexed in `ShapeKind::ALL` order
pub static CATALOG: [ShapeTemplate; 7] = [
    ShapeTemplate {
        kind: ShapeKind::O,
        rows: &["##", "##"],
        color: Rgb::new(255, 255, 0),
        spawn_x: HALF_WIDTH - 1,
    },
    ShapeTemplate {
        kind: ShapeKind::I,
        rows: &[".#..", ".#..", ".#..", ".#.."],
        color: Rgb::new(107, 202, 226),
        spawn_x: HALF_WIDTH,
    },
    ShapeTemplate {
        kind: ShapeKind::S,
        rows: &["...", ".##", "##."],
        color: Rgb::new(255, 0, 0),
        spawn_x: HALF_WIDTH - 1,
    },
    ShapeTemplate {
        kind: ShapeKind::Z,
        rows: &["...", "##.", ".##"],
        color: Rgb::new(0, 128, 0),
        spawn_x: HALF_WIDTH - 1,
    },
    ShapeTemplate {
        kind: ShapeKind::L,
        rows: &["#..", "#..", "##."],
        color: Rgb::new(255, 165, 0),
        spawn_x: HALF_WIDTH - 1,
    },
    ShapeTemplate {
        kind: ShapeKind::J,
        rows: &["..#", "..#", ".##"],
        color: Rgb::new(255, 105, 180),
        spawn_x: HALF_WIDTH - 1,
    },
    ShapeTemplate {
        kind: ShapeKind::T,
        rows: &["...", "###", ".#."],
        color: Rgb::new(128, 0, 128),
        spawn_x: HALF_WIDTH - 1,
    },
];

/// Look up the template for a shape kind
pub fn template(kind: ShapeKind) -> &'static ShapeTemplate {
    match kind {
        ShapeKind::O => &CATALOG[0],
        ShapeKind::I => &CATALOG[1],
        ShapeKind::S => &CATALOG[2],
        ShapeKind::Z => &CATALOG[3],
        ShapeKind::L => &CATALOG[4],
        ShapeKind::J => &CATALOG[5],
        ShapeKind::T => &CATALOG[6],
    }
}

/// Spawn a specific shape
pub fn spawn(kind: ShapeKind) -> Piece {
    template(kind).spawn()
}

/// Pick one of the seven shapes uniformly and spawn it
pub fn generate(rng: &mut SimpleRng) -> (ShapeKind, Piece) {
    let idx = rng.next_range(CATALOG.len() as u32) as usize;
    let template = &CATALOG[idx];
    (template.kind, template.spawn())
}
