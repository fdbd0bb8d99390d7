//! Terminal input module.
//!
//! Maps `crossterm` key, mouse and resize events into [`Input`] values for the
//! game loop. The whole game is played with one trigger ([`GameAction::Drop`]),
//! so there is no key-hold or repeat handling: repeats are dropped.
//!
//! [`GameAction::Drop`]: crate::types::GameAction::Drop

pub mod map;

pub use tui_stacker_types as types;

pub use map::{handle_key_event, handle_mouse_event, map_event, should_quit, Input};
