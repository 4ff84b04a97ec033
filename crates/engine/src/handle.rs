//! Running game handle.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fsm::Phase;
use crate::processor::{CommandProcessor, InputSource, Status};
use crate::session::GameSummary;
use crate::sink::RenderSink;

/// Start a game on the current tokio runtime.
///
/// The processor runs on its own task until the game is over or the handle
/// and every input source cloned from it have been dropped.
pub fn launch(config: EngineConfig, sink: Arc<dyn RenderSink>) -> GameHandle {
    let (processor, input, status) = CommandProcessor::new(&config, sink);
    let task = tokio::spawn(processor.run());
    GameHandle {
        input,
        status,
        task,
    }
}

pub struct GameHandle {
    input: InputSource,
    status: watch::Receiver<Status>,
    task: JoinHandle<Result<GameSummary, EngineError>>,
}

impl GameHandle {
    /// A new producer for player input
    pub fn input(&self) -> InputSource {
        self.input.clone()
    }

    /// Latest published status
    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    pub fn points(&self) -> u32 {
        self.status.borrow().score
    }

    pub fn is_over(&self) -> bool {
        self.status.borrow().is_over()
    }

    pub fn phase(&self) -> Phase {
        self.status.borrow().phase
    }

    /// Receiver notified whenever the status changes
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.clone()
    }

    /// Wait until the game is over.
    ///
    /// Returns `false` if the processor stopped first.
    pub async fn wait_over(&mut self) -> bool {
        self.status.wait_for(Status::is_over).await.is_ok()
    }

    /// Wait for the processor to stop and return the final counters.
    ///
    /// The handle's own input source stays alive until then, so a game
    /// nobody sends input to still runs to its end.
    pub async fn join(self) -> Result<GameSummary, EngineError> {
        let GameHandle { input, task, .. } = self;
        let result = task.await.map_err(EngineError::Processor);
        drop(input);
        result?
    }

    /// Stop the processor without waiting; returns the last published status.
    pub fn stop(self) -> Status {
        self.task.abort();
        *self.status.borrow()
    }
}
