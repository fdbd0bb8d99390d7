//! Stage module - the renderer contract
//!
//! The game never draws. It queues [`StageEvent`]s while handling actions and
//! ticks, then replays them into a [`Stage`] at render time, so the frame update
//! always precedes the render of the same tick.

use crate::block::{BlockId, BlockView};
use crate::service::LeaderboardEntry;
use crate::snapshot::GameSnapshot;

/// Scene the game draws into.
pub trait Stage {
    /// Start drawing a block.
    fn add(&mut self, block: BlockView);

    /// Stop drawing a block.
    fn remove(&mut self, id: BlockId);

    /// Move the camera so it follows height `y` (animated).
    fn set_camera(&mut self, y: f64, now_ms: f64);

    /// Return the camera to its home position over `duration_ms`.
    fn reset_camera(&mut self, duration_ms: f64, now_ms: f64);

    fn resize(&mut self, width: u16, height: u16);

    fn show_leaderboard(&mut self, _entries: &[LeaderboardEntry]) {}

    /// Draw the current frame.
    fn render(&mut self, snapshot: &GameSnapshot);
}

/// Scene change queued by the game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageEvent {
    Add(BlockView),
    Remove(BlockId),
    Camera { y: f64, at_ms: f64 },
    CameraReset { duration_ms: f64, at_ms: f64 },
}

impl StageEvent {
    pub fn apply(self, stage: &mut impl Stage) {
        match self {
            StageEvent::Add(view) => stage.add(view),
            StageEvent::Remove(id) => stage.remove(id),
            StageEvent::Camera { y, at_ms } => stage.set_camera(y, at_ms),
            StageEvent::CameraReset { duration_ms, at_ms } => {
                stage.reset_camera(duration_ms, at_ms)
            }
        }
    }
}

/// Stage that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStage;

impl Stage for NullStage {
    fn add(&mut self, _block: BlockView) {}
    fn remove(&mut self, _id: BlockId) {}
    fn set_camera(&mut self, _y: f64, _now_ms: f64) {}
    fn reset_camera(&mut self, _duration_ms: f64, _now_ms: f64) {}
    fn resize(&mut self, _width: u16, _height: u16) {}
    fn render(&mut self, _snapshot: &GameSnapshot) {}
}
