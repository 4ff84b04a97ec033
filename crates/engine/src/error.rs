//! Engine errors.
//!
//! Rejected moves and a blocked spawn are not errors; they are ordinary
//! outcomes of the state machine. What remains is plumbing failure.

use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The command processor has stopped and no longer reads its queue
    #[error("command queue closed")]
    Closed,
    /// A fragment fall task panicked or was cancelled before it landed
    #[error("fragment fall task failed: {0}")]
    FragmentTask(#[from] JoinError),
    /// The command processor task itself panicked or was cancelled
    #[error("command processor task failed: {0}")]
    Processor(#[source] JoinError),
}
