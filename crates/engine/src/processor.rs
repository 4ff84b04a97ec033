//! Command processor - the single consumer of the command queue
//!
//! All state changes happen on the task running [`CommandProcessor::run`].
//! Producers (the input source and gravity timers) only enqueue commands.
//!
//! Follow-ups a command schedules for "now" go to a local backlog that is
//! drained before the queue is read again, so a landing's `RowCollapse` and
//! `Generate` run before any input that arrived meanwhile. Delayed follow-ups
//! are sent through the bounded queue by a timer task holding a weak sender;
//! once every [`InputSource`] is gone the timers stop feeding the queue and
//! the processor exits.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fsm::Phase;
use crate::gravity;
use crate::session::{FollowUp, GameSummary, Session};
use crate::sink::RenderSink;
use crate::types::{Command, InputCommand};

/// Snapshot published after every processed command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub phase: Phase,
    pub score: u32,
    pub rows_cleared: u32,
    pub pieces: u32,
}

impl Status {
    fn of(session: &Session) -> Self {
        Self {
            phase: session.phase(),
            score: session.score(),
            rows_cleared: session.rows_cleared(),
            pieces: session.pieces(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

/// Producer side of the command queue for player input.
///
/// Sends wait while the queue is full.
#[derive(Debug, Clone)]
pub struct InputSource {
    tx: mpsc::Sender<Command>,
}

impl InputSource {
    pub async fn send(&self, input: InputCommand) -> Result<(), EngineError> {
        self.tx
            .send(input.into())
            .await
            .map_err(|_| EngineError::Closed)
    }

    /// Blocking send for producers outside the runtime, e.g. a key reader thread
    pub fn blocking_send(&self, input: InputCommand) -> Result<(), EngineError> {
        self.tx
            .blocking_send(input.into())
            .map_err(|_| EngineError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct CommandProcessor {
    session: Session,
    sink: Arc<dyn RenderSink>,
    fragment_step: Duration,
    rx: mpsc::Receiver<Command>,
    timer_tx: mpsc::WeakSender<Command>,
    backlog: VecDeque<Command>,
    status: watch::Sender<Status>,
}

impl CommandProcessor {
    /// Processor for a fresh game.
    ///
    /// The first `Generate` (preceded by a `RowCollapse` when rows were
    /// prefilled) is already queued.
    pub fn new(
        config: &EngineConfig,
        sink: Arc<dyn RenderSink>,
    ) -> (Self, InputSource, watch::Receiver<Status>) {
        let session = Session::new(config);
        let mut parts = Self::with_session(config, session, sink);
        if config.prefill_rows > 0 {
            parts.0.backlog.push_back(Command::RowCollapse);
        }
        parts.0.backlog.push_back(Command::Generate);
        parts
    }

    /// Processor around an existing session with an empty backlog
    pub fn with_session(
        config: &EngineConfig,
        session: Session,
        sink: Arc<dyn RenderSink>,
    ) -> (Self, InputSource, watch::Receiver<Status>) {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let (status, status_rx) = watch::channel(Status::of(&session));

        let processor = Self {
            session,
            sink,
            fragment_step: config.fragment_step,
            rx,
            timer_tx: tx.downgrade(),
            backlog: VecDeque::new(),
            status,
        };
        (processor, InputSource { tx }, status_rx)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Commands waiting in the local backlog
    pub fn backlog(&self) -> impl Iterator<Item = &Command> {
        self.backlog.iter()
    }

    /// Append to the local backlog, ahead of anything still in the queue
    pub fn enqueue(&mut self, command: Command) {
        self.backlog.push_back(command);
    }

    /// Process the backlog, including follow-ups it schedules, without
    /// reading the queue
    pub async fn drain(&mut self) -> Result<(), EngineError> {
        while !self.session.game_over() {
            let Some(command) = self.backlog.pop_front() else {
                break;
            };
            self.process(command).await?;
        }
        Ok(())
    }

    /// Process commands until the game is over or every input source is gone
    pub async fn run(mut self) -> Result<GameSummary, EngineError> {
        self.paint_board();
        info!(phase = self.session.phase().as_str(), "command processor started");

        while !self.session.game_over() {
            let Some(command) = self.next_command().await else {
                debug!("all input sources dropped");
                break;
            };
            self.process(command).await?;
        }

        let summary = self.session.summary();
        info!(
            score = summary.score,
            rows = summary.rows_cleared,
            pieces = summary.pieces,
            game_over = summary.game_over,
            "command processor stopped"
        );
        Ok(summary)
    }

    async fn next_command(&mut self) -> Option<Command> {
        match self.backlog.pop_front() {
            Some(command) => Some(command),
            None => self.rx.recv().await,
        }
    }

    /// Handle one command to completion.
    ///
    /// A `RowCollapse` does not return until every fragment has landed.
    pub async fn process(&mut self, command: Command) -> Result<(), EngineError> {
        let phase = self.session.phase();
        if !phase.accepts(command) {
            trace!(command = command.as_str(), phase = phase.as_str(), "dropped");
            return Ok(());
        }
        debug!(command = command.as_str(), phase = phase.as_str(), "dispatch");

        let step = if command == Command::RowCollapse {
            let report =
                gravity::collapse(self.session.board_mut(), &self.sink, self.fragment_step).await?;
            self.session.finish_collapse(report)
        } else {
            self.session.handle(command, self.sink.as_ref())
        };

        if step.committed {
            self.sink.refresh();
        }

        for followup in step.followups {
            match followup {
                FollowUp::Now(next) => self.backlog.push_back(next),
                FollowUp::After(delay, next) => self.schedule(delay, next),
            }
        }

        let status = Status::of(&self.session);
        self.status.send_if_modified(|current| {
            let changed = *current != status;
            *current = status;
            changed
        });
        Ok(())
    }

    fn schedule(&self, delay: Duration, command: Command) {
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                if tx.send(command).await.is_err() {
                    trace!(command = command.as_str(), "queue closed, timer dropped");
                }
            }
        });
    }

    /// Paint every settled cell, e.g. prefilled rows at startup
    fn paint_board(&self) {
        let board = self.session.board();
        let mut painted = 0;
        for y in 0..board.height() {
            for x in 0..board.width() {
                if let Some(cell) = board.get(x as i32, y as i32).filter(|c| c.occupied) {
                    self.sink.draw_cell(x, y, cell.color);
                    painted += 1;
                }
            }
        }
        if painted > 0 {
            self.sink.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;
    use crate::sink::{NullSink, RecordingSink};
    use crate::types::ShapeKind;

    fn instant() -> EngineConfig {
        EngineConfig::instant()
    }

    #[tokio::test]
    async fn fresh_processor_starts_with_generate() {
        let (processor, _input, status) = CommandProcessor::new(&instant(), Arc::new(NullSink));
        assert_eq!(processor.backlog().copied().collect::<Vec<_>>(), vec![Command::Generate]);
        assert_eq!(status.borrow().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn prefill_queues_collapse_first() {
        let config = instant().with_prefill_rows(2);
        let (processor, _input, _status) = CommandProcessor::new(&config, Arc::new(NullSink));
        assert_eq!(
            processor.backlog().copied().collect::<Vec<_>>(),
            vec![Command::RowCollapse, Command::Generate]
        );
        assert_eq!(processor.session().board().occupied_count(), 20);
    }

    #[tokio::test]
    async fn input_is_dropped_while_idle() {
        let session = Session::new(&instant());
        let recorder = Arc::new(RecordingSink::new());
        let (mut processor, _input, _status) =
            CommandProcessor::with_session(&instant(), session, recorder.clone());

        processor.process(Command::MoveLeft).await.unwrap();
        processor.process(Command::Rotate).await.unwrap();

        assert!(recorder.ops().is_empty());
        assert_eq!(processor.session().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn one_refresh_per_committed_command() {
        let mut session = Session::new(&instant());
        session.spawn(ShapeKind::T, catalog::spawn(ShapeKind::T));
        let recorder = Arc::new(RecordingSink::new());
        let (mut processor, _input, _status) =
            CommandProcessor::with_session(&instant(), session, recorder.clone());

        processor.process(Command::MoveDown).await.unwrap();
        processor.process(Command::Place).await.unwrap();
        assert_eq!(recorder.refresh_count(), 2);

        // Generate is dropped while a piece falls.
        processor.process(Command::Generate).await.unwrap();
        assert_eq!(recorder.refresh_count(), 2);
    }

    #[tokio::test]
    async fn landing_queues_collapse_then_generate() {
        let mut session = Session::new(&instant());
        session.spawn(ShapeKind::O, catalog::spawn(ShapeKind::O));
        let (mut processor, _input, status) =
            CommandProcessor::with_session(&instant(), session, Arc::new(NullSink));

        for _ in 0..19 {
            processor.process(Command::MoveDown).await.unwrap();
        }
        processor.process(Command::MoveDown).await.unwrap();

        let queued: Vec<Command> = processor.backlog().copied().collect();
        assert!(queued.ends_with(&[Command::RowCollapse, Command::Generate]));
        assert_eq!(status.borrow().phase, Phase::Collapsing);
        assert_eq!(processor.session().board().occupied_count(), 4);
    }

    #[tokio::test]
    async fn gravity_timer_after_shutdown_is_dropped() {
        let mut session = Session::new(&instant());
        session.spawn(ShapeKind::O, catalog::spawn(ShapeKind::O));
        let (mut processor, input, _status) =
            CommandProcessor::with_session(&instant(), session, Arc::new(NullSink));

        // Schedules the next MoveDown on a timer, then the receiver goes away.
        processor.process(Command::MoveDown).await.unwrap();
        drop(processor);
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        assert!(input.is_closed());
        assert!(matches!(
            input.send(InputCommand::Rotate).await,
            Err(EngineError::Closed)
        ));
    }
}
