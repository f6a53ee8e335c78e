//! Shared types and tuning constants.
//!
//! Everything here is plain data with no dependencies, so the engine, the
//! input mapping and the terminal view can all agree on it.
//!
//! # Board Dimensions
//!
//! The engine takes its grid size from configuration. The defaults below are
//! the desktop layout; the compact layout is narrower.
//!
//! - **Desktop**: 12 columns x 20 rows
//! - **Compact**: 10 columns x 20 rows
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_FALL_MS` | 500 | Gravity interval at level 1 |
//! | `MIN_FALL_MS` | 50 | Floor for the gravity interval |
//! | `CLEAR_EFFECT_MS` | 400 | Cosmetic blink on cleared rows |
//!
//! The gravity interval shrinks geometrically with level:
//! `max(MIN_FALL_MS, BASE_FALL_MS * decay^(level - 1))`.
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, PieceKind};
//!
//! assert_eq!(PieceKind::from_id(3), Some(PieceKind::T));
//! assert_eq!(PieceKind::T.id(), 3);
//!
//! assert_eq!(Command::from_str("rotate"), Some(Command::Rotate));
//! assert_eq!(Command::TogglePause.as_str(), "togglePause");
//! ```

/// Desktop board width in cells.
pub const DEFAULT_BOARD_WIDTH: u8 = 12;

/// Compact (mobile) board width in cells.
pub const COMPACT_BOARD_WIDTH: u8 = 10;

/// Board height in cells, shared by every layout.
pub const DEFAULT_BOARD_HEIGHT: u8 = 20;

/// Smallest accepted board side. The I piece is four cells long.
pub const MIN_BOARD_SIDE: u8 = 4;

/// Gravity interval at level 1.
pub const BASE_FALL_MS: u32 = 500;

/// The gravity interval never drops below this.
pub const MIN_FALL_MS: u32 = 50;

/// Per-level speed decay of the desktop layout.
pub const DESKTOP_SPEED_DECAY: f64 = 0.85;

/// Per-level speed decay of the compact and alternate layouts.
pub const COMPACT_SPEED_DECAY: f64 = 0.7;

/// Lines needed per level on the desktop layout.
pub const DESKTOP_LINES_PER_LEVEL: u32 = 10;

/// Lines needed per level on the compact and alternate layouts.
pub const COMPACT_LINES_PER_LEVEL: u32 = 5;

/// Duration of the cleared-row blink.
pub const CLEAR_EFFECT_MS: u32 = 400;

/// Points for clearing 1, 2, 3 and 4 rows at once, before the level multiplier.
pub const LINE_SCORES: [u32; 4] = [100, 300, 500, 800];

/// Horizontal offsets tried, in order, when a rotation collides in place.
pub const WALL_KICK_OFFSETS: [i16; 4] = [-1, 1, -2, 2];

/// A board cell: `0` is empty, `1..=7` is the [`PieceKind::id`] of a locked piece.
pub type Cell = u8;

/// Empty board cell.
pub const EMPTY: Cell = 0;

/// The seven tetromino kinds, in catalog order.
///
/// The catalog order fixes the shape identifiers stored on the board:
/// I=1, O=2, T=3, L=4, J=5, S=6, Z=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Shape identifier in `1..=7`, as stored in board cells.
    pub fn id(self) -> Cell {
        self.index() as Cell + 1
    }

    /// Zero-based catalog index.
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::S => 5,
            PieceKind::Z => 6,
        }
    }

    /// Inverse of [`PieceKind::id`]. Returns `None` for `0` and anything above 7.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_id(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_id(7), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_id(0), None);
    /// ```
    pub fn from_id(id: Cell) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }
}

/// Discrete commands delivered by the input dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop the piece as far as it goes and lock it
    SoftDrop,
    /// Rotate piece 90° clockwise, with wall kicks
    Rotate,
    /// Switch between running and paused
    TogglePause,
    /// Start a fresh game in the same session
    Reset,
}

impl Command {
    /// Whether this command moves the falling piece.
    ///
    /// Piece commands are ignored unless the engine is running; the others
    /// are accepted in every phase.
    pub fn affects_piece(&self) -> bool {
        matches!(
            self,
            Command::MoveLeft | Command::MoveRight | Command::SoftDrop | Command::Rotate
        )
    }
}

/// Engine lifecycle phase.
///
/// `Running <-> Paused` toggles freely. `Running -> GameOver` happens only when
/// a freshly promoted piece cannot be placed, and only a reset leaves `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Running,
    Paused,
    GameOver,
}
