//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the pure core, the async engine and the terminal front-end alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn row**: pieces spawn with their bounding box at y = -1
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FALL_INTERVAL_MS` | 250 | Gravity clock for the active piece |
//! | `FRAGMENT_STEP_MS` | 10 | Animation step for a settling fragment |
//! | `COMMAND_QUEUE_CAPACITY` | 10 | Bound of the command queue |
//!
//! # Examples
//!
//! ```
//! use tui_cascade_types::{Command, InputCommand, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(ShapeKind::T.as_str(), "t");
//! assert_eq!(Command::from(InputCommand::MoveLeft), Command::MoveLeft);
//! assert!(Command::Rotate.is_external());
//! assert!(!Command::Generate.is_external());
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Row of the top edge of a freshly spawned piece's bounding box.
///
/// The piece may overlap the ceiling by one row so it enters from above.
pub const SPAWN_Y: i32 = -1;

/// Gravity interval for the active piece (one row per 250ms)
pub const FALL_INTERVAL_MS: u64 = 250;

/// Pause between two animation steps of a settling fragment
pub const FRAGMENT_STEP_MS: u64 = 10;

/// Capacity of the bounded command queue
pub const COMMAND_QUEUE_CAPACITY: usize = 10;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color of an empty cell; erasing a cell paints it with this color.
pub const BACKGROUND: Rgb = Rgb::new(0, 0, 0);

/// A single cell, either on the board or inside a piece's local grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub occupied: bool,
    pub color: Rgb,
}

impl Cell {
    /// An occupied cell of the given color
    pub const fn filled(color: Rgb) -> Self {
        Self {
            occupied: true,
            color,
        }
    }

    /// An unoccupied cell
    pub const fn empty() -> Self {
        Self {
            occupied: false,
            color: BACKGROUND,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

/// The seven catalog shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    O,
    I,
    S,
    Z,
    L,
    J,
    T,
}

impl ShapeKind {
    /// All kinds, in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::O,
        ShapeKind::I,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::T,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::O => "o",
            ShapeKind::I => "i",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::L => "l",
            ShapeKind::J => "j",
            ShapeKind::T => "t",
        }
    }
}

/// Commands consumed by the command processor.
///
/// None of them carries a payload: the piece a command operates on is always
/// the current falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Rotate the falling piece 90° clockwise
    Rotate,
    /// Move the falling piece one column left
    MoveLeft,
    /// Move the falling piece one column right
    MoveRight,
    /// Gravity step; reschedules itself while the piece keeps falling
    MoveDown,
    /// Repaint the falling piece at its committed position
    Place,
    /// Draw a new piece from the catalog
    Generate,
    /// Clear complete rows and settle the remaining fragments
    RowCollapse,
}

impl Command {
    /// Whether the command may come from an input source
    pub fn is_external(&self) -> bool {
        matches!(self, Command::Rotate | Command::MoveLeft | Command::MoveRight)
    }

    /// Convert to camelCase string (used in log fields)
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Rotate => "rotate",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::MoveDown => "moveDown",
            Command::Place => "place",
            Command::Generate => "generate",
            Command::RowCollapse => "rowCollapse",
        }
    }
}

/// The three commands an input source is allowed to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCommand {
    Rotate,
    MoveLeft,
    MoveRight,
}

impl From<InputCommand> for Command {
    fn from(input: InputCommand) -> Self {
        match input {
            InputCommand::Rotate => Command::Rotate,
            InputCommand::MoveLeft => Command::MoveLeft,
            InputCommand::MoveRight => Command::MoveRight,
        }
    }
}
