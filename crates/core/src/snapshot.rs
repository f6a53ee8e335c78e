//! Read-only view of an engine for renderers.

use crate::piece::Piece;
use crate::types::{Cell, PieceKind, Phase};

/// Everything a renderer needs for one frame.
///
/// Owned so a host can keep it across frames and refill it with
/// [`crate::Engine::snapshot_into`] without reallocating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major board cells.
    pub board: Vec<Cell>,
    pub current: Piece,
    pub next: Piece,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub high_score: u32,
    pub fall_interval_ms: u32,
    pub phase: Phase,
    /// Rows blinking after a clear, empty when no effect is running.
    pub clear_rows: Vec<usize>,
    pub clear_remaining_ms: u32,
}

impl GameSnapshot {
    /// Locked cell at `(x, y)`, `None` outside the board.
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        if x >= self.width as u16 || y >= self.height as u16 {
            return None;
        }
        self.board
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn is_clearing(&self, y: u16) -> bool {
        self.clear_remaining_ms > 0 && self.clear_rows.contains(&(y as usize))
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let placeholder = Piece::spawn(PieceKind::I, 0);
        Self {
            width: 0,
            height: 0,
            board: Vec::new(),
            current: placeholder,
            next: placeholder,
            score: 0,
            level: 1,
            lines: 0,
            high_score: 0,
            fall_interval_ms: 0,
            phase: Phase::Running,
            clear_rows: Vec::new(),
            clear_remaining_ms: 0,
        }
    }
}
