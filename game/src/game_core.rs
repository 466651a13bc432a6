use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{Board, COLS, Rgb};
use crate::geometry::Piece;
use crate::pieces;
use crate::rng::Rng;

pub const FRAMES_PER_SEC: u32 = 90;
/// Duration of one update tick (~11 ms).
pub const TICK: Duration = Duration::from_nanos(1_000_000_000 / FRAMES_PER_SEC as u64);
pub(crate) const TICK_MS: f64 = 1000.0 / FRAMES_PER_SEC as f64;

pub const INIT_VELOCITY_SQUARES_PER_MS: f64 = 5.0 / 1000.0;
/// Velocity is multiplied by this on every successful spawn; it never
/// decreases within a run.
pub const VELOCITY_GROWTH_PER_SPAWN: f64 = 1.01;
/// Gravity multiplier while the soft-drop key is held.
pub const SOFT_DROP_BOOST: f64 = 10.0;
/// Wall-clock delay between game over and the automatic next run.
pub const RESTART_DELAY_MS: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Playing,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDir {
    Left,
    Right,
}

impl HorizontalDir {
    pub fn d_col(self) -> i32 {
        match self {
            HorizontalDir::Left => -1,
            HorizontalDir::Right => 1,
        }
    }
}

/// Discrete intents consumed by one tick: at most one horizontal step, one
/// rotation, and one hard drop. Boost is level state, not an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub horizontal: Option<HorizontalDir>,
    pub rotate: bool,
    pub hard_drop: bool,
    pub boost: bool,
}

/// What a tick did, so callers don't have to re-derive it from state diffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub lines_cleared: usize,
    pub fused: bool,
    pub game_over: bool,
    pub restarted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePiece {
    pub piece: Piece,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub active: Option<ActivePiece>,
    pub run_state: RunState,
    pub paused: bool,
    pub score: u32,
    pub high_score: u32,
    pub velocity_squares_per_ms: f64,
    pub gravity_progress: f64,
}

/// The whole game-state aggregate: board, active piece, score, velocity,
/// gravity accumulator, run state. All mutation goes through `tick` and
/// `start`; there are no ambient globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCore {
    board: Board,
    active: Option<ActivePiece>,
    run_state: RunState,
    paused: bool,
    score: u32,
    high_score: u32,
    velocity_squares_per_ms: f64,
    /// Fraction of a row fallen since the last whole-row step, in [0, 1).
    gravity_progress: f64,
    restart_elapsed_ms: f64,
    rng: Rng,
}

impl GameCore {
    pub fn new(seed: u64) -> Self {
        Self {
            board: Board::new(),
            active: None,
            run_state: RunState::Stopped,
            paused: false,
            score: 0,
            high_score: 0,
            velocity_squares_per_ms: INIT_VELOCITY_SQUARES_PER_MS,
            gravity_progress: 0.0,
            restart_elapsed_ms: 0.0,
            rng: Rng::new(seed),
        }
    }

    /// Begins a fresh run, folding the previous run's score into the high
    /// score first. This is the only place mutable run state resets.
    pub fn start(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.board = Board::new();
        self.score = 0;
        self.velocity_squares_per_ms = INIT_VELOCITY_SQUARES_PER_MS;
        self.gravity_progress = 0.0;
        self.restart_elapsed_ms = 0.0;
        self.paused = false;
        self.run_state = RunState::Playing;
        self.spawn_piece();
    }

    /// Advances the game by one fixed tick.
    pub fn tick(&mut self, input: TickInput) -> TickReport {
        let mut report = TickReport::default();

        if self.run_state == RunState::Stopped {
            self.restart_elapsed_ms += TICK_MS;
            if self.restart_elapsed_ms >= RESTART_DELAY_MS {
                self.start();
                report.restarted = true;
            }
            return report;
        }

        if self.paused {
            return report;
        }

        if let Some(dir) = input.horizontal {
            self.try_shift(dir);
        }
        if input.rotate {
            self.try_rotate();
        }

        if input.hard_drop && self.active.is_some() {
            // Full descent and immediate fusion; gravity and row clearing
            // pick up again next tick.
            self.hard_drop(&mut report);
            return report;
        }

        let boost = if input.boost { SOFT_DROP_BOOST } else { 1.0 };
        self.gravity_progress += self.velocity_squares_per_ms * TICK_MS * boost;
        if self.gravity_progress > 1.0 {
            self.gravity_progress = 0.0;
            if !self.try_descend() {
                self.fuse_and_respawn(&mut report);
            }
        }

        report.lines_cleared = self.board.clear_completed_rows();
        if report.lines_cleared > 0 {
            let n = report.lines_cleared as u32;
            self.score = self.score.saturating_add(n * (n + 1) / 2);
        }

        report
    }

    /// Freezes gravity and input application; rendering continues. Only
    /// meaningful while playing.
    pub fn toggle_pause(&mut self) {
        if self.run_state == RunState::Playing {
            self.paused = !self.paused;
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn velocity_squares_per_ms(&self) -> f64 {
        self.velocity_squares_per_ms
    }

    pub fn gravity_progress(&self) -> f64 {
        self.gravity_progress
    }

    /// Whether the active piece could descend one more row. The renderer uses
    /// this to gate sub-cell interpolation so the piece never draws into
    /// occupied cells on its final frame.
    pub fn descent_valid(&self) -> bool {
        self.active
            .as_ref()
            .map(|a| self.board.placement_valid(&a.piece.translate(0, 1)))
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            active: self.active,
            run_state: self.run_state,
            paused: self.paused,
            score: self.score,
            high_score: self.high_score,
            velocity_squares_per_ms: self.velocity_squares_per_ms,
            gravity_progress: self.gravity_progress,
        }
    }

    pub fn set_cell(&mut self, col: usize, row: usize, value: Option<Rgb>) {
        self.board.set_cell(col, row, value);
    }

    pub fn set_active_piece_for_test(&mut self, piece: Piece, color: Rgb) {
        self.active = Some(ActivePiece { piece, color });
    }

    fn spawn_piece(&mut self) -> bool {
        let template = pieces::random_piece(&mut self.rng);
        let pivot = template.center_of_mass();
        let candidate = template.translate(COLS as i32 / 2 - pivot.col, 0);

        if !self.board.placement_valid(&candidate) {
            self.active = None;
            self.run_state = RunState::Stopped;
            self.restart_elapsed_ms = 0.0;
            return false;
        }

        self.active = Some(ActivePiece {
            piece: candidate,
            color: pieces::random_color(&mut self.rng),
        });
        self.velocity_squares_per_ms *= VELOCITY_GROWTH_PER_SPAWN;
        true
    }

    fn try_shift(&mut self, dir: HorizontalDir) -> bool {
        self.try_replace(|piece| piece.translate(dir.d_col(), 0))
    }

    fn try_rotate(&mut self) -> bool {
        self.try_replace(|piece| piece.rotate())
    }

    fn try_descend(&mut self) -> bool {
        self.try_replace(|piece| piece.translate(0, 1))
    }

    /// Commits `candidate(piece)` only if it is a valid placement; otherwise
    /// the prior piece is retained. A blocked move is the normal outcome, not
    /// an error.
    fn try_replace(
        &mut self,
        candidate: impl FnOnce(&Piece) -> Piece,
    ) -> bool {
        let Some(mut active) = self.active else {
            return false;
        };
        let next = candidate(&active.piece);
        if !self.board.placement_valid(&next) {
            return false;
        }
        active.piece = next;
        self.active = Some(active);
        true
    }

    fn hard_drop(&mut self, report: &mut TickReport) {
        while self.try_descend() {}
        self.fuse_and_respawn(report);
    }

    fn fuse_and_respawn(&mut self, report: &mut TickReport) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.board.fuse(&active.piece, active.color);
        report.fused = true;
        if !self.spawn_piece() {
            report.game_over = true;
        }
    }
}
