//! Terminal input for the engine.
//!
//! Maps `crossterm` key events onto [`crate::types::Command`]. Device handling
//! stays here so the core only ever sees discrete commands.

pub mod map;

pub use blockfall_types as types;

pub use map::{command_for_key, should_quit};
