//! Session - the state one command processor owns
//!
//! Board, falling piece, phase and counters live here. Every command except
//! `RowCollapse` is handled synchronously by [`Session::handle`]; the async
//! collapse runs in [`crate::gravity`] against [`Session::board_mut`] and is
//! closed off with [`Session::finish_collapse`].

use std::time::Duration;

use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::{catalog, Board, Piece, SimpleRng};
use crate::fsm::{Event, Phase};
use crate::gravity::CollapseReport;
use crate::sink::{draw_piece, erase_piece, RenderSink};
use crate::types::{Command, Rgb, ShapeKind, BOARD_HEIGHT};

/// Color of rows placed by `prefill_rows`
const PREFILL_COLOR: Rgb = Rgb::new(0, 128, 0);

/// Work a command schedules for later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Append to the queue right away
    Now(Command),
    /// Deliver through the queue after a delay
    After(Duration, Command),
}

/// Result of handling one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    /// The command changed state or painted something
    pub committed: bool,
    pub followups: ArrayVec<FollowUp, 2>,
}

impl Step {
    fn rejected() -> Self {
        Self::default()
    }

    fn committed() -> Self {
        Self {
            committed: true,
            followups: ArrayVec::new(),
        }
    }

    fn then(mut self, followup: FollowUp) -> Self {
        self.followups.push(followup);
        self
    }
}

/// Counters reported when a game ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub rows_cleared: u32,
    pub pieces: u32,
    pub game_over: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    falling: Option<Piece>,
    falling_kind: Option<ShapeKind>,
    /// Where the falling piece was last painted
    painted: Option<Piece>,
    /// The falling piece has made at least one step down since it spawned
    descended: bool,
    phase: Phase,
    rng: SimpleRng,
    fall_interval: Duration,
    score: u32,
    rows_cleared: u32,
    pieces: u32,
}

impl Session {
    /// Fresh session; `prefill_rows` complete rows are placed at the bottom
    pub fn new(config: &EngineConfig) -> Self {
        let mut board = Board::new();
        let rows = config.prefill_rows.min(BOARD_HEIGHT - 1);
        for y in (BOARD_HEIGHT - rows)..BOARD_HEIGHT {
            board.fill_row(y, PREFILL_COLOR);
        }
        Self::with_board(config, board)
    }

    /// Session starting from an arbitrary board
    pub fn with_board(config: &EngineConfig, board: Board) -> Self {
        Self {
            board,
            falling: None,
            falling_kind: None,
            painted: None,
            descended: false,
            phase: Phase::Idle,
            rng: SimpleRng::new(config.seed),
            fall_interval: config.fall_interval,
            score: 0,
            rows_cleared: 0,
            pieces: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn falling(&self) -> Option<&Piece> {
        self.falling.as_ref()
    }

    pub fn falling_kind(&self) -> Option<ShapeKind> {
        self.falling_kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            rows_cleared: self.rows_cleared,
            pieces: self.pieces,
            game_over: self.game_over(),
        }
    }

    fn advance(&mut self, event: Event) {
        match self.phase.on(event) {
            Some(next) => self.phase = next,
            None => {
                warn!(phase = self.phase.as_str(), ?event, "transition not in table");
                debug_assert!(false, "no transition from {:?} on {:?}", self.phase, event);
            }
        }
    }

    /// Handle one command.
    ///
    /// Commands the current phase does not accept are dropped and return a
    /// non-committed step. `RowCollapse` is not handled here.
    pub fn handle(&mut self, command: Command, sink: &dyn RenderSink) -> Step {
        if !self.phase.accepts(command) {
            return Step::rejected();
        }

        match command {
            Command::Rotate => self.try_rotate(sink),
            Command::MoveLeft => self.try_shift(-1, sink),
            Command::MoveRight => self.try_shift(1, sink),
            Command::MoveDown => self.move_down(),
            Command::Place => self.place(sink),
            Command::Generate => {
                let (kind, piece) = catalog::generate(&mut self.rng);
                self.spawn(kind, piece)
            }
            Command::RowCollapse => {
                debug_assert!(false, "RowCollapse is handled by the gravity settler");
                Step::rejected()
            }
        }
    }

    /// Make `piece` the falling piece, as `Generate` would.
    ///
    /// Only valid while idle; returns a rejected step otherwise.
    pub fn spawn(&mut self, kind: ShapeKind, piece: Piece) -> Step {
        if !self.phase.accepts(Command::Generate) {
            return Step::rejected();
        }

        debug!(kind = kind.as_str(), x = piece.origin_x, y = piece.origin_y, "spawn");
        let fits = self.board.is_within_board_and_free(&piece);
        self.falling = Some(piece);
        self.falling_kind = Some(kind);
        self.painted = None;
        self.descended = false;
        self.pieces += 1;
        self.advance(Event::Spawned);

        if !fits {
            self.falling = None;
            return self.spawn_blocked();
        }
        Step::committed().then(FollowUp::Now(Command::MoveDown))
    }

    /// End the game on a piece that could not enter the board; nothing is merged
    fn spawn_blocked(&mut self) -> Step {
        info!(
            kind = self.falling_kind.map(|k| k.as_str()),
            score = self.score,
            "spawn blocked, game over"
        );
        self.falling_kind = None;
        self.advance(Event::SpawnBlocked);
        Step::committed()
    }

    fn try_rotate(&mut self, sink: &dyn RenderSink) -> Step {
        match self.falling.as_ref().map(Piece::rotated) {
            Some(candidate) => self.commit_visible(candidate, sink),
            None => Step::rejected(),
        }
    }

    fn try_shift(&mut self, dx: i32, sink: &dyn RenderSink) -> Step {
        match self.falling.as_ref().map(|p| p.shifted(dx, 0)) {
            Some(candidate) => self.commit_visible(candidate, sink),
            None => Step::rejected(),
        }
    }

    /// Validate, repaint and commit a rotated or shifted candidate
    fn commit_visible(&mut self, candidate: Piece, sink: &dyn RenderSink) -> Step {
        if !self.board.is_within_board_and_free(&candidate) {
            return Step::rejected();
        }

        if let Some(old) = self.painted.take() {
            erase_piece(sink, &old);
        }
        draw_piece(sink, &candidate);
        self.painted = Some(candidate.clone());
        self.falling = Some(candidate);
        Step::committed()
    }

    fn move_down(&mut self) -> Step {
        let Some(piece) = self.falling.take() else {
            return Step::rejected();
        };

        let candidate = piece.shifted(0, 1);
        if self.board.is_within_board_and_free(&candidate) {
            self.falling = Some(candidate);
            self.descended = true;
            return Step::committed()
                .then(FollowUp::Now(Command::Place))
                .then(FollowUp::After(self.fall_interval, Command::MoveDown));
        }

        if !self.descended {
            return self.spawn_blocked();
        }

        info!(x = piece.origin_x, y = piece.origin_y, "landed");
        self.board.merge(&piece);
        self.painted = None;
        self.falling_kind = None;
        self.advance(Event::Landed);

        Step::committed()
            .then(FollowUp::Now(Command::RowCollapse))
            .then(FollowUp::Now(Command::Generate))
    }

    fn place(&mut self, sink: &dyn RenderSink) -> Step {
        let Some(piece) = self.falling.clone() else {
            return Step::rejected();
        };

        if let Some(old) = self.painted.take() {
            erase_piece(sink, &old);
        }
        draw_piece(sink, &piece);
        self.painted = Some(piece);
        Step::committed()
    }

    /// Close a row collapse: count cleared rows and return to idle
    pub fn finish_collapse(&mut self, report: CollapseReport) -> Step {
        let cleared = report.rows_cleared as u32;
        self.rows_cleared += cleared;
        self.score += cleared;
        if cleared > 0 {
            info!(
                passes = report.passes,
                rows = cleared,
                fragments = report.fragments,
                score = self.score,
                "rows collapsed"
            );
        }
        self.advance(Event::Settled);
        Step::committed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{NullSink, RecordingSink, RenderOp};

    fn idle_session() -> Session {
        Session::new(&EngineConfig::instant())
    }

    #[test]
    fn generate_schedules_first_step_down() {
        let mut session = idle_session();
        let step = session.handle(Command::Generate, &NullSink);

        assert!(step.committed);
        assert_eq!(step.followups.as_slice(), &[FollowUp::Now(Command::MoveDown)]);
        assert_eq!(session.phase(), Phase::Falling);
        assert_eq!(session.pieces(), 1);
        assert!(session.falling().is_some());
    }

    #[test]
    fn movement_is_dropped_without_a_piece() {
        let mut session = idle_session();
        let sink = RecordingSink::new();

        for cmd in [Command::Rotate, Command::MoveLeft, Command::MoveDown, Command::Place] {
            assert_eq!(session.handle(cmd, &sink), Step::rejected());
        }
        assert!(sink.ops().is_empty());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn successful_step_down_schedules_place_and_gravity() {
        let mut session = idle_session();
        session.spawn(ShapeKind::O, catalog::spawn(ShapeKind::O));

        let step = session.handle(Command::MoveDown, &NullSink);
        assert_eq!(
            step.followups.as_slice(),
            &[
                FollowUp::Now(Command::Place),
                FollowUp::After(Duration::ZERO, Command::MoveDown)
            ]
        );
        assert_eq!(session.falling().map(|p| p.origin_y), Some(0));
    }

    #[test]
    fn place_erases_previous_paint() {
        let mut session = idle_session();
        session.spawn(ShapeKind::O, catalog::spawn(ShapeKind::O));
        let sink = RecordingSink::new();

        session.handle(Command::MoveDown, &sink);
        session.handle(Command::Place, &sink);
        let first = sink.take();
        assert_eq!(first.len(), 4, "both rows visible at y=0..1");

        session.handle(Command::MoveDown, &sink);
        session.handle(Command::Place, &sink);
        let second = sink.take();
        let erased = second.iter().filter(|op| matches!(op, RenderOp::Erase { .. })).count();
        let drawn = second.iter().filter(|op| matches!(op, RenderOp::Draw { .. })).count();
        assert_eq!((erased, drawn), (4, 4));
    }

    #[test]
    fn blocked_move_is_a_no_op() {
        let mut session = idle_session();
        session.spawn(ShapeKind::O, catalog::spawn(ShapeKind::O));
        let sink = RecordingSink::new();

        // O spawns at x=4; four steps left reach the wall.
        for _ in 0..4 {
            assert!(session.handle(Command::MoveLeft, &sink).committed);
        }
        assert!(!session.handle(Command::MoveLeft, &sink).committed);
        assert_eq!(session.falling().map(|p| p.origin_x), Some(0));
    }

    /// I piece stepped down once and painted, vertical in column 6 rows 0..=3
    fn painted_i(board: Board) -> Session {
        let mut session = Session::with_board(&EngineConfig::instant(), board);
        session.spawn(ShapeKind::I, catalog::spawn(ShapeKind::I));
        session.handle(Command::MoveDown, &NullSink);
        session.handle(Command::Place, &NullSink);
        session
    }

    #[test]
    fn rotation_repaints_in_open_space() {
        let mut session = painted_i(Board::new());
        let sink = RecordingSink::new();

        assert!(session.handle(Command::Rotate, &sink).committed);

        let ops = sink.take();
        let erased: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::Erase { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect();
        let drawn: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::Draw { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(erased, vec![(6, 0), (6, 1), (6, 2), (6, 3)]);
        assert_eq!(drawn, vec![(5, 1), (6, 1), (7, 1), (8, 1)]);
    }

    #[test]
    fn rotation_against_wall_is_a_no_op() {
        let mut session = painted_i(Board::new());
        for _ in 0..3 {
            assert!(session.handle(Command::MoveRight, &NullSink).committed);
        }
        let before = session.falling().cloned();
        let sink = RecordingSink::new();

        // Horizontal would span columns 8..=11.
        assert_eq!(session.handle(Command::Rotate, &sink), Step::rejected());
        assert!(sink.ops().is_empty());
        assert_eq!(session.falling().cloned(), before);
    }

    #[test]
    fn rotation_into_settled_cell_is_a_no_op() {
        let mut board = Board::new();
        board.set(8, 1, crate::types::Cell::filled(Rgb::new(9, 9, 9)));
        let mut session = painted_i(board);
        let before = session.falling().cloned();
        let sink = RecordingSink::new();

        assert!(!session.handle(Command::Rotate, &sink).committed);
        assert!(sink.ops().is_empty());
        assert_eq!(session.falling().cloned(), before);
    }

    #[test]
    fn blocked_spawn_ends_the_game() {
        let mut board = Board::new();
        // Column 4..6 filled up to row 1: an O at y=-1 can never step down.
        for y in 1..BOARD_HEIGHT as i32 {
            for x in 3..7 {
                board.set(x, y, crate::types::Cell::filled(Rgb::new(9, 9, 9)));
            }
        }
        let mut session = Session::with_board(&EngineConfig::instant(), board);
        session.spawn(ShapeKind::O, catalog::spawn(ShapeKind::O));

        let step = session.handle(Command::MoveDown, &NullSink);
        assert!(step.followups.is_empty());
        assert!(session.game_over());
        assert!(!session.phase().accepts(Command::Generate));
    }

    #[test]
    fn finish_collapse_counts_rows() {
        let mut session = idle_session();
        session.finish_collapse(CollapseReport {
            passes: 2,
            rows_cleared: 3,
            fragments: 1,
        });
        assert_eq!(session.score(), 3);
        assert_eq!(session.rows_cleared(), 3);
        assert_eq!(session.phase(), Phase::Idle);
    }
}
