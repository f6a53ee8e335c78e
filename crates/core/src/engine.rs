//! Engine module - the game session state machine
//!
//! Owns the board, the falling piece, the spawner and all scoring state.
//! Hosts drive it with two calls: [`Engine::handle_command`] for player input
//! and [`Engine::update`] once per frame with a monotonic timestamp.
//!
//! Rejected moves are ordinary outcomes (`false`), never errors. The only
//! fallible call is construction, which validates the configuration.

use std::iter;

use crate::board::{Board, ClearedRows};
use crate::config::{ConfigError, EngineConfig};
use crate::piece::Piece;
use crate::scoring::{fall_interval_ms, level_for_lines, line_clear_points};
use crate::snapshot::GameSnapshot;
use crate::spawner::Spawner;
use crate::types::{Command, Phase, WALL_KICK_OFFSETS};

/// Rows mid-blink after a clear. Purely cosmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearEffect {
    pub rows: Vec<usize>,
    pub remaining_ms: u32,
}

impl ClearEffect {
    pub fn is_active(&self) -> bool {
        !self.rows.is_empty() && self.remaining_ms > 0
    }

    /// Run the timer down; the rows are dropped once it expires.
    fn advance(&mut self, elapsed_ms: u64) {
        if self.rows.is_empty() {
            return;
        }
        let elapsed = elapsed_ms.min(u32::MAX as u64) as u32;
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
        if self.remaining_ms == 0 {
            self.rows.clear();
        }
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.remaining_ms = 0;
    }
}

/// What happened at the last lock-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    /// Indices of the rows removed, top to bottom, as they were before removal.
    pub rows_cleared: ClearedRows,
    /// Points awarded for the clear.
    pub points: u32,
    /// Whether the promoted piece could not be placed.
    pub game_over: bool,
}

impl LockEvent {
    pub fn lines_cleared(&self) -> u32 {
        self.rows_cleared.len() as u32
    }
}

/// One game session.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    board: Board,
    current: Piece,
    spawner: Spawner,
    score: u32,
    level: u32,
    lines: u32,
    fall_interval_ms: u32,
    phase: Phase,
    clear_effect: ClearEffect,
    high_score: u32,
    /// Final score of the last game, waiting for the host to persist it.
    high_score_candidate: Option<u32>,
    last_event: Option<LockEvent>,
    /// Timestamp of the previous `update`, `None` until the clock is anchored.
    clock_ms: Option<u64>,
    /// Running time since the last gravity step.
    fall_elapsed_ms: u64,
}

impl Engine {
    /// Start a session. Fails if the configuration is unusable.
    pub fn new(config: EngineConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut spawner = Spawner::new(config.randomizer, seed, config.board_width);
        let current = spawner.promote();

        Ok(Self {
            board: Board::new(config.board_width, config.board_height),
            current,
            spawner,
            score: 0,
            level: 1,
            lines: 0,
            fall_interval_ms: fall_interval_ms(1, &config),
            phase: Phase::Running,
            clear_effect: ClearEffect::default(),
            high_score: 0,
            high_score_candidate: None,
            last_event: None,
            clock_ms: None,
            fall_elapsed_ms: 0,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        self.spawner.peek()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clear_effect(&self) -> &ClearEffect {
        &self.clear_effect
    }

    /// Best score seen this session, including one supplied by the host.
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Seed the high score from storage. Never lowers it.
    pub fn set_high_score(&mut self, stored: u32) {
        self.high_score = self.high_score.max(stored);
    }

    /// Final score of a finished game, handed out once.
    pub fn take_high_score_candidate(&mut self) -> Option<u32> {
        self.high_score_candidate.take()
    }

    /// Take and clear the last lock-in event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Apply one input command. Returns whether any state changed.
    pub fn handle_command(&mut self, command: Command) -> bool {
        if command.affects_piece() && self.phase != Phase::Running {
            return false;
        }
        match command {
            Command::MoveLeft => self.move_by(-1, 0),
            Command::MoveRight => self.move_by(1, 0),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => self.rotate(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Translate the falling piece if the target is free.
    pub fn move_by(&mut self, dx: i16, dy: i16) -> bool {
        self.phase == Phase::Running && self.shift(dx, dy)
    }

    /// Turn the piece clockwise, trying the wall-kick offsets in order if it
    /// does not fit in place.
    pub fn rotate(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        let shape = self.current.rotated();
        let Some(dx) = iter::once(0)
            .chain(WALL_KICK_OFFSETS)
            .find(|&dx| !self.board.collides(&shape, self.current.x + dx, self.current.y))
        else {
            return false;
        };

        self.current.shape = shape;
        self.current.x += dx;
        true
    }

    /// Drop the piece as far as it goes, then lock it in.
    pub fn soft_drop(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        while self.shift(0, 1) {}
        self.lock_in();
        true
    }

    /// Switch between running and paused. Ignored after game over.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::GameOver => return false,
        };
        true
    }

    /// Start a new game in this session. The high score is kept.
    pub fn reset(&mut self) {
        self.board.clear();
        self.spawner.reset();
        self.current = self.spawner.promote();
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.fall_interval_ms = fall_interval_ms(1, &self.config);
        self.phase = Phase::Running;
        self.clear_effect.clear();
        self.high_score_candidate = None;
        self.last_event = None;
        self.clock_ms = None;
        self.fall_elapsed_ms = 0;
    }

    /// Advance timers to `now_ms` and apply gravity when the interval has passed.
    ///
    /// `now_ms` must come from a monotonic clock. The first call only anchors
    /// the clock. Time spent outside `Running` is not counted.
    /// Returns whether a gravity step ran.
    pub fn update(&mut self, now_ms: u64) -> bool {
        let Some(prev_ms) = self.clock_ms.replace(now_ms) else {
            return false;
        };
        if self.phase != Phase::Running {
            return false;
        }

        let elapsed = now_ms.saturating_sub(prev_ms);
        self.clear_effect.advance(elapsed);

        self.fall_elapsed_ms += elapsed;
        if self.fall_elapsed_ms <= self.fall_interval_ms as u64 {
            return false;
        }

        // Restart the interval even when blocked so one stall locks only once.
        self.fall_elapsed_ms = 0;
        if !self.shift(0, 1) {
            self.lock_in();
        }
        true
    }

    /// Read-only view for renderers.
    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill `out` in place, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());
        out.current = self.current;
        out.next = *self.spawner.peek();
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.high_score = self.high_score;
        out.fall_interval_ms = self.fall_interval_ms;
        out.phase = self.phase;
        out.clear_rows.clear();
        if self.clear_effect.is_active() {
            out.clear_rows.extend_from_slice(&self.clear_effect.rows);
            out.clear_remaining_ms = self.clear_effect.remaining_ms;
        } else {
            out.clear_remaining_ms = 0;
        }
    }

    /// Move the piece if legal, regardless of phase.
    fn shift(&mut self, dx: i16, dy: i16) -> bool {
        let candidate = self.current.shifted(dx, dy);
        if self.board.collides_piece(&candidate) {
            return false;
        }
        self.current = candidate;
        true
    }

    /// Merge, clear, score, then bring in the next piece and check for game over.
    fn lock_in(&mut self) {
        self.board.merge(&self.current);
        let rows = self.board.clear_lines();
        let points = self.award(rows.len());

        if !rows.is_empty() && self.config.clear_effect_ms > 0 {
            self.clear_effect = ClearEffect {
                rows: rows.clone(),
                remaining_ms: self.config.clear_effect_ms,
            };
        }

        self.current = self.spawner.promote();
        let game_over = self.board.collides_piece(&self.current);
        if game_over {
            self.phase = Phase::GameOver;
            self.high_score_candidate = Some(self.score);
        }

        self.last_event = Some(LockEvent {
            rows_cleared: rows,
            points,
            game_over,
        });
    }

    /// Score a clear at the current level, then recompute level and speed.
    fn award(&mut self, cleared: usize) -> u32 {
        if cleared == 0 {
            return 0;
        }

        let points = line_clear_points(cleared, self.level);
        self.score = self.score.saturating_add(points);
        self.high_score = self.high_score.max(self.score);

        self.lines = self.lines.saturating_add(cleared as u32);
        self.level = level_for_lines(self.lines, self.config.lines_per_level);
        self.fall_interval_ms = fall_interval_ms(self.level, &self.config);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::spawn_shape;
    use crate::types::{PieceKind, EMPTY};

    fn engine() -> Engine {
        Engine::new(EngineConfig::desktop(), 12345).unwrap()
    }

    fn place(engine: &mut Engine, kind: PieceKind, x: i16, y: i16) {
        engine.current = Piece {
            kind,
            shape: spawn_shape(kind),
            x,
            y,
        };
    }

    /// Fill row `y` except the listed columns.
    fn fill_row_except(board: &mut Board, y: i16, gaps: &[i16]) {
        for x in 0..board.width() as i16 {
            if !gaps.contains(&x) {
                board.set(x, y, PieceKind::J.id());
            }
        }
    }

    fn occupied(board: &Board) -> usize {
        board.cells().iter().filter(|&&c| c != EMPTY).count()
    }

    #[test]
    fn test_new_engine_state() {
        let engine = engine();
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.lines_cleared(), 0);
        assert_eq!(engine.fall_interval_ms(), 500);
        assert_eq!(occupied(engine.board()), 0);
        assert_eq!(engine.current().y, 0);
        assert!(!engine.clear_effect().is_active());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = EngineConfig {
            board_height: 0,
            ..EngineConfig::desktop()
        };
        assert!(Engine::new(config, 1).is_err());
    }

    #[test]
    fn test_move_stops_at_wall() {
        let mut engine = engine();
        place(&mut engine, PieceKind::O, 2, 0);
        assert!(engine.move_by(-1, 0));
        assert!(engine.move_by(-1, 0));
        assert!(!engine.move_by(-1, 0));
        assert_eq!(engine.current().x, 0);
    }

    #[test]
    fn test_move_blocked_by_locked_cell() {
        let mut engine = engine();
        place(&mut engine, PieceKind::O, 4, 0);
        engine.board.set(6, 1, PieceKind::I.id());
        assert!(!engine.move_by(1, 0));
        assert_eq!(engine.current().x, 4);
    }

    #[test]
    fn test_rotate_in_place() {
        let mut engine = engine();
        place(&mut engine, PieceKind::T, 4, 5);
        assert!(engine.rotate());
        assert_eq!(engine.current().x, 4);
        assert_eq!(engine.current().shape, spawn_shape(PieceKind::T).rotated_cw());
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let mut engine = engine();
        let upright = spawn_shape(PieceKind::I).rotated_cw();
        engine.current = Piece {
            kind: PieceKind::I,
            shape: upright,
            x: 10,
            y: 5,
        };

        // In place, -1 and +1 all poke through the wall; -2 fits.
        assert!(engine.rotate());
        assert_eq!(engine.current().x, 8);
        assert_eq!(engine.current().shape, spawn_shape(PieceKind::I));
    }

    #[test]
    fn test_rotate_prefers_left_kick() {
        let mut engine = engine();
        place(&mut engine, PieceKind::T, 4, 5);
        // Rotated in place the T covers (5,5), (4,6), (5,6), (5,7).
        engine.board.set(5, 7, PieceKind::Z.id());
        assert!(engine.rotate());
        assert_eq!(engine.current().x, 3);
    }

    #[test]
    fn test_rotate_rejected_when_boxed_in() {
        let mut engine = engine();
        place(&mut engine, PieceKind::I, 4, 19);
        let before = *engine.current();
        // Flat I on the floor: upright needs three rows below the floor.
        assert!(!engine.rotate());
        assert_eq!(*engine.current(), before);
    }

    #[test]
    fn test_soft_drop_locks_at_floor() {
        let mut engine = engine();
        place(&mut engine, PieceKind::O, 0, 0);
        let next = *engine.next();

        assert!(engine.soft_drop());

        assert_eq!(engine.board().get(0, 18), Some(PieceKind::O.id()));
        assert_eq!(engine.board().get(1, 19), Some(PieceKind::O.id()));
        assert_eq!(occupied(engine.board()), 4);
        assert_eq!(engine.lines_cleared(), 0);
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(*engine.current(), next);

        let event = engine.take_last_event().unwrap();
        assert_eq!(event.lines_cleared(), 0);
        assert!(!event.game_over);
        assert!(engine.take_last_event().is_none());
    }

    #[test]
    fn test_double_clear_at_level_three() {
        let mut engine = engine();
        engine.level = 3;
        engine.lines = 20;
        fill_row_except(&mut engine.board, 18, &[0, 1]);
        fill_row_except(&mut engine.board, 19, &[0, 1]);
        place(&mut engine, PieceKind::O, 0, 0);

        engine.soft_drop();

        assert_eq!(engine.score(), 900);
        assert_eq!(engine.lines_cleared(), 22);
        assert_eq!(engine.level(), 3);
        assert_eq!(occupied(engine.board()), 0);
        assert_eq!(engine.clear_effect().rows, vec![18, 19]);
        assert_eq!(engine.clear_effect().remaining_ms, 400);
        assert_eq!(engine.high_score(), 900);

        let event = engine.take_last_event().unwrap();
        assert_eq!(event.rows_cleared, vec![18, 19]);
        assert_eq!(event.points, 900);
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let mut engine = engine();
        engine.lines = 9;
        fill_row_except(&mut engine.board, 19, &[0, 1]);
        place(&mut engine, PieceKind::O, 0, 0);

        engine.soft_drop();

        assert_eq!(engine.score(), 100);
        assert_eq!(engine.lines_cleared(), 10);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.fall_interval_ms(), 425);
        // The O's top half drops into the cleared row.
        assert_eq!(engine.board().get(0, 19), Some(PieceKind::O.id()));
        assert_eq!(occupied(engine.board()), 2);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut engine = engine();
        engine.set_high_score(10_000);
        for y in 0..3 {
            fill_row_except(&mut engine.board, y, &[0, 1]);
        }
        place(&mut engine, PieceKind::O, 0, 0);

        engine.soft_drop();

        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(engine.take_last_event().unwrap().game_over);
        assert_eq!(engine.take_high_score_candidate(), Some(0));
        assert_eq!(engine.take_high_score_candidate(), None);
        assert_eq!(engine.high_score(), 10_000);

        // Nothing moves, merges or clears any more.
        let board = engine.board().clone();
        let current = *engine.current();
        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::Rotate,
            Command::SoftDrop,
            Command::TogglePause,
        ] {
            assert!(!engine.handle_command(command));
        }
        assert!(!engine.update(0));
        assert!(!engine.update(100_000));
        assert_eq!(engine.board(), &board);
        assert_eq!(*engine.current(), current);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(engine.take_last_event().is_none());
    }

    #[test]
    fn test_clearing_lock_still_scores_before_game_over() {
        let mut engine = engine();
        for y in 0..3 {
            fill_row_except(&mut engine.board, y, &[0, 1]);
        }
        fill_row_except(&mut engine.board, 19, &[0, 1]);
        place(&mut engine, PieceKind::O, 0, 0);
        engine.spawner.force_next(PieceKind::O);

        engine.soft_drop();

        // Row 19 clears and everything shifts down one; row 1 still blocks the O.
        assert_eq!(engine.score(), 100);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.take_high_score_candidate(), Some(100));
    }

    #[test]
    fn test_pause_suspends_commands_and_gravity() {
        let mut engine = engine();
        let before = *engine.current();

        assert!(engine.handle_command(Command::TogglePause));
        assert_eq!(engine.phase(), Phase::Paused);
        assert!(!engine.handle_command(Command::MoveLeft));
        assert!(!engine.handle_command(Command::SoftDrop));
        assert!(!engine.update(0));
        assert!(!engine.update(10_000));
        assert_eq!(*engine.current(), before);

        assert!(engine.handle_command(Command::TogglePause));
        assert_eq!(engine.phase(), Phase::Running);
        // Paused time is not charged to gravity.
        assert!(!engine.update(10_100));
        assert!(engine.move_by(-1, 0));
    }

    #[test]
    fn test_piece_commands_gated_outside_running() {
        let mut engine = engine();
        engine.toggle_pause();
        let before = engine.snapshot();

        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::Rotate,
        ] {
            assert!(command.affects_piece());
            assert!(!engine.handle_command(command), "{command:?}");
        }
        assert_eq!(engine.snapshot(), before);

        // Session commands still go through.
        assert!(engine.handle_command(Command::TogglePause));
        engine.toggle_pause();
        assert!(engine.handle_command(Command::Reset));
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_gravity_waits_for_interval() {
        let mut engine = engine();
        let y0 = engine.current().y;

        assert!(!engine.update(1_000));
        assert!(!engine.update(1_500));
        assert_eq!(engine.current().y, y0);

        assert!(engine.update(1_501));
        assert_eq!(engine.current().y, y0 + 1);

        // Elapsed time is a timestamp delta, not a frame count.
        for t in (1_517..=2_001).step_by(16) {
            engine.update(t);
        }
        assert_eq!(engine.current().y, y0 + 1);
        assert!(engine.update(2_100));
        assert_eq!(engine.current().y, y0 + 2);
    }

    #[test]
    fn test_blocked_piece_locks_once_per_interval() {
        let mut engine = engine();
        place(&mut engine, PieceKind::O, 0, 18);

        engine.update(0);
        assert!(engine.update(501));
        assert_eq!(occupied(engine.board()), 4);
        assert!(engine.take_last_event().is_some());

        // The fresh piece is not locked again inside the same interval.
        assert!(!engine.update(800));
        assert!(engine.take_last_event().is_none());
        assert_eq!(occupied(engine.board()), 4);
    }

    #[test]
    fn test_clear_effect_expires() {
        let mut engine = engine();
        fill_row_except(&mut engine.board, 19, &[0, 1]);
        place(&mut engine, PieceKind::O, 0, 0);
        engine.soft_drop();
        assert!(engine.clear_effect().is_active());

        engine.update(0);
        engine.update(250);
        assert_eq!(engine.clear_effect().remaining_ms, 150);
        assert!(engine.clear_effect().is_active());

        engine.update(400);
        assert!(!engine.clear_effect().is_active());
        assert!(engine.clear_effect().rows.is_empty());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut engine = engine();
        engine.level = 3;
        fill_row_except(&mut engine.board, 19, &[0, 1]);
        place(&mut engine, PieceKind::O, 0, 0);
        engine.soft_drop();
        engine.board.set(5, 5, PieceKind::L.id());
        engine.toggle_pause();
        assert!(engine.score() > 0);

        assert!(engine.handle_command(Command::Reset));

        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.lines_cleared(), 0);
        assert_eq!(engine.fall_interval_ms(), 500);
        assert_eq!(occupied(engine.board()), 0);
        assert!(!engine.clear_effect().is_active());
        assert!(engine.take_last_event().is_none());
        assert_eq!(engine.high_score(), 300);
        assert_eq!(engine.current().y, 0);
    }

    #[test]
    fn test_reset_leaves_game_over() {
        let mut engine = engine();
        for y in 0..3 {
            fill_row_except(&mut engine.board, y, &[0, 1]);
        }
        place(&mut engine, PieceKind::O, 0, 0);
        engine.soft_drop();
        assert_eq!(engine.phase(), Phase::GameOver);

        engine.reset();
        assert_eq!(engine.phase(), Phase::Running);
        assert!(engine.take_high_score_candidate().is_none());
        assert!(engine.move_by(1, 0) || engine.move_by(-1, 0));
    }

    #[test]
    fn test_snapshot_mirrors_engine() {
        let mut engine = engine();
        fill_row_except(&mut engine.board, 19, &[0, 1]);
        place(&mut engine, PieceKind::O, 0, 0);
        engine.soft_drop();

        let snap = engine.snapshot();
        assert_eq!(snap.width, 12);
        assert_eq!(snap.height, 20);
        assert_eq!(snap.board, engine.board().cells());
        assert_eq!(snap.current, *engine.current());
        assert_eq!(snap.next, *engine.next());
        assert_eq!(snap.score, 100);
        assert_eq!(snap.clear_rows, vec![19]);
        assert_eq!(snap.clear_remaining_ms, 400);
        assert_eq!(snap.phase, Phase::Running);
    }
}
