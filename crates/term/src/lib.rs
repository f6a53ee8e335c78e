//! Terminal front end for the blockfall engine.
//!
//! Renders into a plain character framebuffer instead of a widget toolkit, so
//! the layout stays exact (two columns per board cell) and the output can be
//! diffed frame to frame.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
