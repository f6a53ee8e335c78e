//! Spawner - one piece of look-ahead over a [`PieceSource`]

use crate::piece::Piece;
use crate::rng::{PieceSource, Randomizer};

/// Deals pieces in spawn position and keeps the next one visible.
#[derive(Debug, Clone)]
pub struct Spawner {
    source: PieceSource,
    board_width: u8,
    next: Piece,
}

impl Spawner {
    pub fn new(policy: Randomizer, seed: u32, board_width: u8) -> Self {
        let mut source = PieceSource::new(policy, seed);
        let next = Piece::spawn(source.draw(), board_width);
        Self {
            source,
            board_width,
            next,
        }
    }

    /// The piece that the next [`Spawner::promote`] will hand out.
    pub fn peek(&self) -> &Piece {
        &self.next
    }

    /// Hand out the look-ahead piece and draw its replacement.
    pub fn promote(&mut self) -> Piece {
        let fresh = Piece::spawn(self.source.draw(), self.board_width);
        std::mem::replace(&mut self.next, fresh)
    }

    #[cfg(test)]
    pub(crate) fn force_next(&mut self, kind: crate::types::PieceKind) {
        self.next = Piece::spawn(kind, self.board_width);
    }

    /// Start over with a fresh look-ahead piece, continuing the same random stream.
    pub fn reset(&mut self) {
        self.source.discard_bag();
        self.next = Piece::spawn(self.source.draw(), self.board_width);
    }
}
