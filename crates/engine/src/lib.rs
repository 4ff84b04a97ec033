//! Game engine - command queue, phase machine and row collapse
//!
//! The engine owns one [`Session`] per game and drives it from a single
//! consumer task. Everything that wants the game to change (player input,
//! gravity timers, the engine's own follow-ups) goes through the same bounded
//! command queue.
//!
//! # Module Structure
//!
//! - [`fsm`]: phases and which commands each one accepts
//! - [`session`]: synchronous command handlers over board and falling piece
//! - [`gravity`]: async row collapse with one task per falling fragment
//! - [`processor`]: the queue consumer, input producers and status channel
//! - [`handle`]: [`launch`] and the [`GameHandle`] returned by it
//! - [`sink`]: the render contract and two headless sinks
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tui_cascade_engine::{launch, EngineConfig, NullSink};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let game = launch(EngineConfig::instant(), Arc::new(NullSink));
//! let summary = game.join().await.unwrap();
//! assert!(summary.game_over);
//! assert!(summary.pieces > 0);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fsm;
pub mod gravity;
pub mod handle;
pub mod processor;
pub mod session;
pub mod sink;

pub use tui_cascade_core as core;
pub use tui_cascade_types as types;

pub use config::EngineConfig;
pub use error::EngineError;
pub use fsm::{Event, Phase};
pub use gravity::CollapseReport;
pub use handle::{launch, GameHandle};
pub use processor::{CommandProcessor, InputSource, Status};
pub use session::{FollowUp, GameSummary, Session, Step};
pub use sink::{draw_piece, erase_piece, NullSink, RecordingSink, RenderOp, RenderSink};
