//! Terminal front-end for the engine's render sink.
//!
//! Paint calls land in an in-memory framebuffer; `refresh` flushes the changed
//! glyphs to the terminal with `crossterm`. Each board cell is drawn two glyphs
//! wide so blocks come out roughly square.

pub mod fb;
pub mod renderer;
pub mod sink;

pub use tui_cascade_engine as engine;
pub use tui_cascade_types as types;

pub use fb::{CellStyle, FrameBuffer, Glyph};
pub use renderer::TerminalRenderer;
pub use sink::{cell_origin, TerminalSink, CELL_COLUMNS, FRAME_HEIGHT, FRAME_WIDTH};
