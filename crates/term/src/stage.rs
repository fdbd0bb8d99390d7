//! TermStage: the terminal implementation of the game's [`Stage`].
//!
//! Keeps the set of blocks that are currently part of the scene, follows the
//! camera with a tween, and renders each frame into an owned framebuffer that
//! the caller hands to [`TerminalRenderer::draw_swap`](crate::TerminalRenderer::draw_swap).

use crate::core::anim::{Easing, Tween};
use crate::core::color::parse_hex_color;
use crate::core::{BlockId, BlockView, GameConfig, GameSnapshot, LeaderboardEntry, Stage};
use crate::fb::{FrameBuffer, Rgb};
use crate::game_view::{GameView, Viewport};
use crate::types::CAMERA_MOVE_MS;

const MEMBER_CAPACITY: usize = 128;

#[derive(Debug)]
pub struct TermStage {
    view: GameView,
    viewport: Viewport,
    fb: FrameBuffer,
    members: Vec<BlockId>,
    camera: Tween,
    camera_offset: f64,
    leaderboard: Vec<LeaderboardEntry>,
    has_leaderboard: bool,
    scratch: GameSnapshot,
}

impl TermStage {
    pub fn new(viewport: Viewport) -> Self {
        let offset = GameConfig::default().camera.offset;
        Self {
            view: GameView::default(),
            viewport,
            fb: FrameBuffer::new(viewport.width, viewport.height),
            members: Vec::with_capacity(MEMBER_CAPACITY),
            camera: Tween::new(offset, offset, 0.0, 0.0),
            camera_offset: offset,
            leaderboard: Vec::new(),
            has_leaderboard: false,
            scratch: GameSnapshot::default(),
        }
    }

    /// Apply view settings from a loaded configuration.
    pub fn configure(&mut self, config: &GameConfig) {
        let mut view = GameView::new(config.camera.view_size, GameView::DEFAULT_VIEW_WIDTH);
        if let Ok(rgb) = parse_hex_color(&config.background.color) {
            view = view.with_background(Rgb::from_packed(rgb));
        }
        self.view = view;
        self.camera_offset = config.camera.offset;
        self.camera = Tween::new(self.camera_offset, self.camera_offset, 0.0, 0.0);
    }

    /// Camera height at `now_ms`.
    pub fn camera_y(&self, now_ms: f64) -> f64 {
        self.camera.value_at(now_ms)
    }

    pub fn is_member(&self, id: BlockId) -> bool {
        self.members.contains(&id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    /// The last rendered frame, for [`TerminalRenderer::draw_swap`](crate::TerminalRenderer::draw_swap).
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    fn move_camera(&mut self, to: f64, duration_ms: f64, now_ms: f64) {
        let from = self.camera.value_at(now_ms);
        self.camera = Tween::new(from, to, now_ms, duration_ms).eased(Easing::CubicOut);
    }
}

impl Stage for TermStage {
    fn add(&mut self, block: BlockView) {
        if !self.members.contains(&block.id) {
            self.members.push(block.id);
        }
    }

    fn remove(&mut self, id: BlockId) {
        if let Some(i) = self.members.iter().position(|m| *m == id) {
            self.members.swap_remove(i);
        }
    }

    fn set_camera(&mut self, y: f64, now_ms: f64) {
        self.move_camera(y + self.camera_offset, CAMERA_MOVE_MS, now_ms);
    }

    fn reset_camera(&mut self, duration_ms: f64, now_ms: f64) {
        self.move_camera(self.camera_offset, duration_ms, now_ms);
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(width, height);
    }

    fn show_leaderboard(&mut self, entries: &[LeaderboardEntry]) {
        self.leaderboard.clear();
        self.leaderboard.extend_from_slice(entries);
        self.has_leaderboard = true;
    }

    fn render(&mut self, snapshot: &GameSnapshot) {
        // Only blocks that were added and not yet removed are part of the scene.
        self.scratch.clone_from(snapshot);
        self.scratch.blocks.clear();
        let stack_end = snapshot.blocks.len().saturating_sub(snapshot.falling);
        let mut falling = 0;
        for (i, block) in snapshot.blocks.iter().enumerate() {
            if self.members.contains(&block.id) {
                self.scratch.blocks.push(*block);
                if i >= stack_end {
                    falling += 1;
                }
            }
        }
        self.scratch.falling = falling;

        let camera_y = self.camera.value_at(snapshot.now_ms);
        let leaderboard = if self.has_leaderboard {
            Some(self.leaderboard.as_slice())
        } else {
            None
        };
        self.view
            .render_into(&self.scratch, camera_y, leaderboard, self.viewport, &mut self.fb);
    }
}
