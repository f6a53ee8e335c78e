//! Shape catalog - the seven tetromino geometries
//!
//! A shape is a small rectangular boolean matrix (at most 4x4) packed into a
//! 16-bit mask. Orientation is never stored separately: rotating derives the
//! next matrix from the current one, so four rotations return to the start.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Largest side of any shape matrix.
pub const MAX_SHAPE_SIDE: u8 = 4;

/// Offset of a filled cell from the shape's top-left corner, as `(dx, dy)`.
pub type CellOffset = (i16, i16);

/// Filled cells of one shape. A 4x4 matrix has at most 16.
pub type ShapeCells = ArrayVec<CellOffset, 16>;

/// One orientation of a piece: a `height x width` matrix of filled cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    /// Row-major bits, `row * MAX_SHAPE_SIDE + col`.
    mask: u16,
}

impl Shape {
    /// Build a shape from rows of `0`/`1`. All rows must have equal length.
    ///
    /// Panics (at compile time when used in a const) on ragged or oversized input.
    pub const fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        assert!(height > 0 && height <= MAX_SHAPE_SIDE as usize);
        let width = rows[0].len();
        assert!(width > 0 && width <= MAX_SHAPE_SIDE as usize);

        let mut mask = 0u16;
        let mut r = 0;
        while r < height {
            assert!(rows[r].len() == width);
            let mut c = 0;
            while c < width {
                if rows[r][c] != 0 {
                    mask |= 1 << (r * MAX_SHAPE_SIDE as usize + c);
                }
                c += 1;
            }
            r += 1;
        }

        Self {
            width: width as u8,
            height: height as u8,
            mask,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the cell at `(row, col)` is filled. Out of range is empty.
    #[inline(always)]
    pub fn is_filled(&self, row: u8, col: u8) -> bool {
        row < self.height
            && col < self.width
            && self.mask & (1 << (row * MAX_SHAPE_SIDE + col)) != 0
    }

    /// Offsets of all filled cells, row by row.
    pub fn cells(&self) -> ShapeCells {
        let mut out = ShapeCells::new();
        for row in 0..self.height {
            for col in 0..self.width {
                if self.is_filled(row, col) {
                    out.push((col as i16, row as i16));
                }
            }
        }
        out
    }

    /// The shape turned 90° clockwise.
    ///
    /// Row `r` of the result is column `r` of this shape read bottom to top,
    /// so the result is `width x height`.
    pub fn rotated_cw(&self) -> Self {
        let mut mask = 0u16;
        for r in 0..self.width {
            for c in 0..self.height {
                if self.is_filled(self.height - 1 - c, r) {
                    mask |= 1 << (r * MAX_SHAPE_SIDE + c);
                }
            }
        }
        Self {
            width: self.height,
            height: self.width,
            mask,
        }
    }

    /// Matrix as rows of booleans, for display and assertions.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        (0..self.height)
            .map(|r| (0..self.width).map(|c| self.is_filled(r, c)).collect())
            .collect()
    }
}

/// Spawn orientations in catalog order (I, O, T, L, J, S, Z).
pub const CATALOG: [Shape; 7] = [
    Shape::from_rows(&[&[1, 1, 1, 1]]),
    Shape::from_rows(&[&[1, 1], &[1, 1]]),
    Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]),
    Shape::from_rows(&[&[1, 1, 1], &[1, 0, 0]]),
    Shape::from_rows(&[&[1, 1, 1], &[0, 0, 1]]),
    Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
    Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
];

/// Spawn orientation of a piece kind.
pub fn spawn_shape(kind: PieceKind) -> Shape {
    CATALOG[kind.index()]
}
