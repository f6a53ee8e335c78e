//! Falling piece - shape, anchor and identity

use crate::shapes::{spawn_shape, Shape};
use crate::types::{Cell, PieceKind};

/// A piece detached from the board.
///
/// `x`/`y` is the board position of the shape matrix's top-left cell. Moves and
/// rotations build a candidate and only commit it after the board accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i16,
    pub y: i16,
}

impl Piece {
    /// A piece in spawn orientation, centred horizontally on the top row.
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        let shape = spawn_shape(kind);
        Self {
            kind,
            shape,
            x: (board_width / 2) as i16 - (shape.width() / 2) as i16,
            y: 0,
        }
    }

    /// Value written into board cells when this piece locks.
    pub fn id(&self) -> Cell {
        self.kind.id()
    }

    /// Candidate orientation after one clockwise turn. Does not touch the board.
    pub fn rotated(&self) -> Shape {
        self.shape.rotated_cw()
    }

    /// Copy of this piece moved by `(dx, dy)`.
    pub fn shifted(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Board coordinates `(x, y)` of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.shape
            .cells()
            .into_iter()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}
