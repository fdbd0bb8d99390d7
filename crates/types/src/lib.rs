//! Core types module - shared constants and small enums
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data with no external dependencies, making them usable in
//! any context (simulation core, terminal front end, input mapping).
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TARGET_FPS` | 60 | Frame rate that a normalized delta of 1.0 stands for |
//! | `MAX_ELAPSED_MS` | 100 | Clamp applied to a single frame's elapsed time |
//! | `FALL_DURATION_MS` | 1000 | Chopped fragment fall, released to the pool afterwards |
//! | `FALL_SPIN_DELAY_MS` | 50 | Delay before a fragment starts spinning |
//! | `FALL_SPIN_DURATION_MS` | 900 | Fragment spin duration |
//! | `RESET_SHRINK_MS` | 200 | Per-block shrink during a reset |
//! | `RESET_STAGGER_MS` | 20 | Extra delay per block, counted from the top of the stack |
//! | `CAMERA_MOVE_MS` | 300 | Camera follow after a new block spawns |
//!
//! A reset lasts `2 * RESET_SHRINK_MS + stack_len * RESET_STAGGER_MS`.
//!
//! # Examples
//!
//! ```
//! use tui_stacker_types::{GameAction, Phase};
//!
//! let phase = Phase::from_str("playing").unwrap();
//! assert_eq!(phase, Phase::Playing);
//! assert!(phase.accepts_action());
//! assert!(!Phase::Resetting.accepts_action());
//!
//! assert_eq!(GameAction::from_str("drop"), Some(GameAction::Drop));
//! ```

/// Frame rate that a normalized delta of 1.0 corresponds to.
pub const TARGET_FPS: f64 = 60.0;

/// Largest elapsed time fed into a single frame (tab suspend, debugger pause).
pub const MAX_ELAPSED_MS: f64 = 100.0;

/// Duration of the fall tween for a chopped fragment.
pub const FALL_DURATION_MS: f64 = 1000.0;

/// Delay before the fragment spin tween starts.
pub const FALL_SPIN_DELAY_MS: f64 = 50.0;

/// Duration of the fragment spin tween.
pub const FALL_SPIN_DURATION_MS: f64 = 900.0;

/// Horizontal distance a fragment drifts away from the stack while falling.
pub const FALL_DRIFT: f64 = 10.0;

/// Vertical distance a fragment falls.
pub const FALL_DROP: f64 = 30.0;

/// Final fragment rotation magnitude (radians).
pub const FALL_SPIN: f64 = 5.0;

/// Shrink duration for each block during a reset.
pub const RESET_SHRINK_MS: f64 = 200.0;

/// Stagger between consecutive blocks during a reset.
pub const RESET_STAGGER_MS: f64 = 20.0;

/// Final Y rotation of a block shrinking away during a reset (radians).
pub const RESET_SPIN: f64 = 0.5;

/// Camera follow duration after a block spawns.
pub const CAMERA_MOVE_MS: f64 = 300.0;

/// Upper bound (inclusive) of the per-round color offset.
pub const COLOR_OFFSET_MAX: u32 = 100;

/// Game lifecycle phase.
///
/// - **Loading**: waiting for configuration; actions are ignored
/// - **Ready**: base block placed, waiting for the first action
/// - **Playing**: a block sweeps over the stack until dropped
/// - **Ended**: the run is over and the score was submitted
/// - **Resetting**: the stack animates away; actions are ignored
///
/// The cycle goes: Loading → Ready → Playing → Ended → Resetting → Playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Loading,
    Ready,
    Playing,
    Ended,
    Resetting,
}

impl Phase {
    /// Parse phase from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "loading" => Some(Phase::Loading),
            "ready" => Some(Phase::Ready),
            "playing" => Some(Phase::Playing),
            "ended" => Some(Phase::Ended),
            "resetting" => Some(Phase::Resetting),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Playing => "playing",
            Phase::Ended => "ended",
            Phase::Resetting => "resetting",
        }
    }

    /// Whether the drop action does anything in this phase.
    pub fn accepts_action(&self) -> bool {
        matches!(self, Phase::Ready | Phase::Playing | Phase::Ended)
    }
}

/// Result of dropping the active block onto the one beneath it.
///
/// - **Missed**: no overlap at all, the run ends
/// - **Perfect**: overlap shortfall below the accuracy tolerance, snapped into place
/// - **Chopped**: partial overlap, the overhang falls away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutKind {
    Missed,
    Perfect,
    Chopped,
}

impl CutKind {
    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            CutKind::Missed => "missed",
            CutKind::Perfect => "perfect",
            CutKind::Chopped => "chopped",
        }
    }
}

/// Player-facing actions.
///
/// The whole game is driven by a single [`GameAction::Drop`] trigger; its meaning
/// depends on the current [`Phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Start, place the moving block, or restart (phase dependent)
    Drop,
    /// Stop or resume the frame clock
    Pause,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_stacker_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("DROP"), Some(GameAction::Drop));
    /// assert_eq!(GameAction::from_str("pause"), Some(GameAction::Pause));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "drop" => Some(GameAction::Drop),
            "pause" => Some(GameAction::Pause),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Drop => "drop",
            GameAction::Pause => "pause",
        }
    }
}
