//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::InputCommand`]. Only the
//! three player commands exist; gravity is the engine's business, so there is
//! no soft drop key.

pub mod map;

pub use tui_cascade_types as types;

pub use map::{is_press, map_key, should_quit};
