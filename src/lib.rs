//! TUI Cascade (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_cascade::{core,engine,input,term,types}`
//! while the implementation lives in dedicated crates under `crates/`.

pub use tui_cascade_core as core;
pub use tui_cascade_engine as engine;
pub use tui_cascade_input as input;
pub use tui_cascade_term as term;
pub use tui_cascade_types as types;
