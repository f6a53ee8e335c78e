//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty (`0`) or holds
//! the shape id of a locked piece. Storage is a flat row-major vector sized once
//! at construction.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Rows above the board (`y < 0`) exist only for pieces that have not fully
//! entered yet; they are never stored.

use crate::piece::Piece;
use crate::shapes::Shape;
use crate::types::{Cell, EMPTY};

/// Row indices removed by one [`Board::clear_lines`] call, top to bottom.
pub type ClearedRows = Vec<usize>;

/// The game board, row-major flat storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    /// Build a board from rows of cell values. All rows must share one length.
    ///
    /// Panics on ragged rows or a side longer than 255 cells.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        assert!(rows.iter().all(|row| row.len() == width), "ragged board rows");
        assert!(
            width <= u8::MAX as usize && height <= u8::MAX as usize,
            "board larger than 255 cells on a side"
        );

        Self {
            width: width as u8,
            height: height as u8,
            cells: rows.concat(),
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether `shape` anchored at `(x, y)` hits a wall, the floor, or a locked cell.
    ///
    /// Cells above the top edge skip the overlap check but are still held to
    /// the side walls.
    pub fn collides(&self, shape: &Shape, x: i16, y: i16) -> bool {
        shape.cells().iter().any(|&(dx, dy)| {
            let px = x + dx;
            let py = y + dy;
            if px < 0 || px >= self.width as i16 || py >= self.height as i16 {
                return true;
            }
            py >= 0 && self.get(px, py) != Some(EMPTY)
        })
    }

    /// Whether the piece overlaps anything where it currently stands.
    pub fn collides_piece(&self, piece: &Piece) -> bool {
        self.collides(&piece.shape, piece.x, piece.y)
    }

    /// Write the piece's cells into the grid.
    ///
    /// Cells above the top edge are dropped rather than stored.
    pub fn merge(&mut self, piece: &Piece) {
        let id = piece.id();
        for (x, y) in piece.cells() {
            if y >= 0 {
                self.set(x, y, id);
            }
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map_or(false, |row| row.iter().all(|&cell| cell != EMPTY))
    }

    /// Remove every full row at once and return their indices, top to bottom.
    ///
    /// Full rows are found before anything moves, then the remaining rows are
    /// compacted downward in order and the freed rows at the top are emptied.
    pub fn clear_lines(&mut self) -> ClearedRows {
        let full: ClearedRows = (0..self.height as usize)
            .filter(|&y| self.is_row_full(y))
            .collect();
        if full.is_empty() {
            return full;
        }

        let width = self.width as usize;
        let mut write_y = self.height as usize;

        // Scan from bottom to top
        for read_y in (0..self.height as usize).rev() {
            if full.binary_search(&read_y).is_ok() {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        self.cells[..write_y * width].fill(EMPTY);
        full
    }

    /// One row of cells, or `None` past the bottom.
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert to a 2D vector for testing/display
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
}
