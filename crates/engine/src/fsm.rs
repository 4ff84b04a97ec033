//! Engine phases and their transition table.
//!
//! The command queue delivers work; this table decides what each phase is
//! allowed to do with it. A command the current phase does not accept is
//! dropped, which is how stray input between landing and the next spawn is
//! ignored.

use crate::types::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// No falling piece; waiting for `Generate`
    #[default]
    Idle,
    /// A piece is falling and responds to movement
    Falling,
    /// The last piece landed; complete rows are being collapsed
    Collapsing,
    /// A new piece could not enter the board
    GameOver,
}

/// Things that move the engine between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A new piece became the falling piece
    Spawned,
    /// The falling piece was merged into the board
    Landed,
    /// The freshly spawned piece could not make its first step
    SpawnBlocked,
    /// A row collapse finished with no complete rows left
    Settled,
}

impl Phase {
    /// Whether a command is acted upon in this phase
    pub fn accepts(self, command: Command) -> bool {
        match self {
            Phase::Falling => matches!(
                command,
                Command::Rotate
                    | Command::MoveLeft
                    | Command::MoveRight
                    | Command::MoveDown
                    | Command::Place
            ),
            Phase::Idle => matches!(command, Command::Generate | Command::RowCollapse),
            Phase::Collapsing => matches!(command, Command::RowCollapse),
            Phase::GameOver => false,
        }
    }

    /// Next phase for an event, `None` if the transition is not in the table
    pub fn on(self, event: Event) -> Option<Phase> {
        match (self, event) {
            (Phase::Idle, Event::Spawned) => Some(Phase::Falling),
            (Phase::Falling, Event::Landed) => Some(Phase::Collapsing),
            (Phase::Falling, Event::SpawnBlocked) => Some(Phase::GameOver),
            (Phase::Collapsing, Event::Settled) => Some(Phase::Idle),
            (Phase::Idle, Event::Settled) => Some(Phase::Idle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Falling => "falling",
            Phase::Collapsing => "collapsing",
            Phase::GameOver => "gameOver",
        }
    }
}
