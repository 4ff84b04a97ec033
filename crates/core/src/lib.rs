//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the board, the piece catalog and the row-collapse
//! algorithms. It has **no dependencies** on rendering, input, timers or async
//! runtimes; the engine crate drives it.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of settled cells with collision and merge rules
//! - [`piece`]: square-grid pieces (and fragments) with rotation and shifting
//! - [`catalog`]: the seven immutable shape templates
//! - [`rng`]: seeded LCG used for uniform shape selection
//! - [`fragment`]: flood-fill splitter run after complete rows are cleared
//! - [`fall`]: lockstep planner deciding where each fragment comes to rest
//!
//! # Example
//!
//! ```
//! use tui_cascade_core::{catalog, Board};
//! use tui_cascade_core::types::ShapeKind;
//!
//! let mut board = Board::new();
//! let mut piece = catalog::spawn(ShapeKind::O);
//!
//! // Drop the piece until it would leave the board
//! while board.is_within_board_and_free(&piece.shifted(0, 1)) {
//!     piece = piece.shifted(0, 1);
//! }
//! board.merge(&piece);
//!
//! assert_eq!(piece.origin_y, 18);
//! assert_eq!(board.occupied_count(), 4);
//! ```

pub mod board;
pub mod catalog;
pub mod fall;
pub mod fragment;
pub mod piece;
pub mod rng;

pub use tui_cascade_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, RowSet};
pub use catalog::{ShapeTemplate, CATALOG};
pub use fall::{landed, plan_falls};
pub use fragment::split_fragments;
pub use piece::{Fragment, Piece};
pub use rng::SimpleRng;
