//! Terminal front end for the stacker.
//!
//! Frames are drawn into a plain character framebuffer and flushed with
//! crossterm; there is no widget or layout layer.
//!
//! - [`GameView`] projects a game snapshot into a [`FrameBuffer`] (pure)
//! - [`TermStage`] is the game's scene: membership, camera, leaderboard
//! - [`TerminalRenderer`] diffs framebuffers and writes them out with crossterm

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod stage;

pub use tui_stacker_core as core;
pub use tui_stacker_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport, PANEL_WIDTH};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use stage::TermStage;
