use arrayvec::ArrayVec;

use crate::block::BlockView;
use crate::service::AllTimeStats;
use crate::types::Phase;

/// Most blocks a snapshot carries. The stack is cut from the bottom when it
/// grows past this; the bottom is far below the camera by then.
pub const MAX_VISIBLE_BLOCKS: usize = 48;

/// Everything a front end needs to draw one frame, without borrowing the game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub phase: Phase,
    /// Placed blocks in the current round.
    pub score: u32,
    /// Score to show; counts down while resetting.
    pub display_score: u32,
    pub stack_len: usize,
    /// Stack blocks bottom to top, followed by falling or shrinking ones.
    pub blocks: ArrayVec<BlockView, MAX_VISIBLE_BLOCKS>,
    pub active: Option<BlockView>,
    /// Blocks currently animating out of the scene.
    pub falling: usize,
    pub new_high_score: bool,
    pub best: Option<AllTimeStats>,
    pub instructions_visible: bool,
    pub round: u32,
    pub now_ms: f64,
    /// A final score is waiting for a successful submission.
    pub pending_submission: bool,
    pub load_failed: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.phase = Phase::Loading;
        self.score = 0;
        self.display_score = 0;
        self.stack_len = 0;
        self.blocks.clear();
        self.active = None;
        self.falling = 0;
        self.new_high_score = false;
        self.best = None;
        self.instructions_visible = false;
        self.round = 0;
        self.now_ms = 0.0;
        self.pending_submission = false;
        self.load_failed = false;
    }

    /// Height of the top of the stack (0 when empty).
    pub fn top_y(&self) -> f64 {
        let stack_end = self.blocks.len().saturating_sub(self.falling);
        self.blocks[..stack_end]
            .last()
            .map(|b| b.position.y)
            .unwrap_or(0.0)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            score: 0,
            display_score: 0,
            stack_len: 0,
            blocks: ArrayVec::new(),
            active: None,
            falling: 0,
            new_high_score: false,
            best: None,
            instructions_visible: false,
            round: 0,
            now_ms: 0.0,
            pending_submission: false,
            load_failed: false,
        }
    }
}
