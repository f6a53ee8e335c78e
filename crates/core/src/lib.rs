//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the whole falling-block simulation and nothing else. It
//! never draws, reads input or touches storage; hosts feed it commands and
//! timestamps and read back a [`GameSnapshot`].
//!
//! # Module Structure
//!
//! - [`shapes`]: the seven tetromino matrices and clockwise rotation
//! - [`piece`]: a falling piece (shape + anchor + kind)
//! - [`board`]: the locked grid, collision, merge and line clearing
//! - [`rng`]: seeded uniform and 7-bag piece generation
//! - [`spawner`]: one piece of look-ahead over the generator
//! - [`scoring`]: line points, leveling and the gravity curve
//! - [`config`]: load-time settings and their validation
//! - [`engine`]: the session state machine
//! - [`snapshot`]: the renderer's read-only view
//!
//! # Game Rules
//!
//! - **Rotation**: clockwise only, derived from the current matrix; if the
//!   turned shape does not fit, offsets -1, +1, -2, +2 columns are tried in order
//! - **Drop**: moves the piece down until it is blocked, then locks it
//! - **Scoring**: 100/300/500/800 for 1-4 rows, times the level before the clear
//! - **Leveling**: `lines / lines_per_level + 1`, speeding gravity geometrically
//! - **Game over**: the next piece cannot be placed at its spawn position
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Engine, EngineConfig};
//! use blockfall_types::{Command, Phase};
//!
//! let mut engine = Engine::new(EngineConfig::desktop(), 12345).unwrap();
//!
//! engine.handle_command(Command::MoveLeft);
//! engine.handle_command(Command::Rotate);
//! engine.handle_command(Command::SoftDrop);
//!
//! // Drive gravity from a monotonic clock.
//! engine.update(0);
//! engine.update(16);
//!
//! assert_eq!(engine.phase(), Phase::Running);
//! assert_eq!(engine.lines_cleared(), 0);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;
pub mod spawner;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows};
pub use config::{ConfigError, EngineConfig};
pub use engine::{ClearEffect, Engine, LockEvent};
pub use piece::Piece;
pub use rng::{PieceSource, Randomizer, SimpleRng};
pub use shapes::{spawn_shape, Shape, CATALOG};
pub use snapshot::GameSnapshot;
pub use spawner::Spawner;
