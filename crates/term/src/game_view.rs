//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! The stack is drawn twice, side by side: a front projection (X across, Y up)
//! and a side projection (Z across, Y up), so movement on either axis is
//! visible. The vertical window follows the camera height.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{BlockView, GameSnapshot, LeaderboardEntry};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Phase;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Width of the score / leaderboard panel.
pub const PANEL_WIDTH: u16 = 24;

/// Narrowest play area that still gets a panel next to it.
const MIN_PLAY_WIDTH: u16 = 40;

/// Fewest rows per world unit; one row per standard block height.
const MIN_ROW_SCALE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Projection {
    Front,
    Side,
}

impl Projection {
    fn across(self, v: &BlockView) -> (f64, f64) {
        match self {
            Projection::Front => (v.position.x, v.scale.x),
            Projection::Side => (v.position.z, v.scale.z),
        }
    }
}

/// Screen mapping for one frame.
#[derive(Debug, Clone, Copy)]
struct Frame {
    top: i32,
    bottom: i32,
    reference_row: f64,
    camera_y: f64,
    row_scale: f64,
    col_scale: f64,
}

impl Frame {
    fn row(&self, y: f64) -> i32 {
        (self.reference_row - (y - self.camera_y) * self.row_scale).round() as i32
    }
}

/// A lightweight terminal renderer for the stacking game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Half of the visible world height.
    view_size: f64,
    /// Half of the visible world width in each projection.
    view_width: f64,
    background: Rgb,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            view_size: 30.0,
            view_width: Self::DEFAULT_VIEW_WIDTH,
            background: Rgb::new(17, 17, 24),
        }
    }
}

impl GameView {
    /// Covers a block sweeping 12 units either side of a 10 wide stack.
    pub const DEFAULT_VIEW_WIDTH: f64 = 18.0;

    pub fn new(view_size: f64, view_width: f64) -> Self {
        Self {
            view_size,
            view_width,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        camera_y: f64,
        leaderboard: Option<&[LeaderboardEntry]>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(self.base_style().into_cell(' '));
        if viewport.width < 4 || viewport.height < 4 {
            return;
        }

        let with_panel = viewport.width >= MIN_PLAY_WIDTH + PANEL_WIDTH;
        let play_w = if with_panel {
            viewport.width - PANEL_WIDTH
        } else {
            viewport.width
        };
        let half_w = play_w / 2;

        let play_h = viewport.height - 1;
        let row_scale = (play_h as f64 / (2.0 * self.view_size)).max(MIN_ROW_SCALE);
        let col_scale = (2.0 * row_scale).min(half_w as f64 / (2.0 * self.view_width));
        let frame = Frame {
            top: 1,
            bottom: viewport.height as i32,
            reference_row: 1.0 + play_h as f64 / 2.0,
            camera_y,
            row_scale,
            col_scale,
        };

        let label = CellStyle {
            dim: true,
            ..self.base_style()
        };
        fb.put_str(1, 0, "FRONT", label);
        fb.put_str(half_w + 1, 0, "SIDE", label);
        for y in 0..viewport.height {
            fb.put_char(half_w, y, '│', label);
        }

        let stack_end = snap.blocks.len().saturating_sub(snap.falling);
        let active_id = snap.active.map(|a| a.id);
        for (projection, left) in [(Projection::Front, 0u16), (Projection::Side, half_w + 1)] {
            let center = left as f64 + half_w as f64 / 2.0;
            let right = (left + half_w).min(play_w);
            for (i, block) in snap.blocks.iter().enumerate() {
                let shade = if i >= stack_end {
                    Shade::Falling
                } else if Some(block.id) == active_id {
                    Shade::Active
                } else {
                    Shade::Placed
                };
                self.draw_block(
                    fb,
                    &frame,
                    projection,
                    block,
                    (left, right),
                    center,
                    shade,
                );
            }
        }

        if with_panel {
            self.draw_side_panel(fb, snap, leaderboard, viewport, play_w + 1);
        }
        self.draw_overlays(fb, snap, play_w, viewport.height);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        camera_y: f64,
        leaderboard: Option<&[LeaderboardEntry]>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, camera_y, leaderboard, viewport, &mut fb);
        fb
    }

    fn base_style(&self) -> CellStyle {
        CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: self.background,
            bold: false,
            dim: false,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_block(
        &self,
        fb: &mut FrameBuffer,
        frame: &Frame,
        projection: Projection,
        block: &BlockView,
        (min_x, max_x): (u16, u16),
        center: f64,
        shade: Shade,
    ) {
        let (pos, size) = projection.across(block);
        if size <= f64::EPSILON || block.scale.y <= f64::EPSILON {
            return;
        }

        let mut c0 = (center + (pos - size / 2.0) * frame.col_scale).round() as i32;
        let mut c1 = (center + (pos + size / 2.0) * frame.col_scale).round() as i32;
        if c1 <= c0 {
            c1 = c0 + 1;
        }
        c0 = c0.max(min_x as i32);
        c1 = c1.min(max_x as i32);

        let r0 = frame.row(block.position.y + block.scale.y / 2.0);
        let mut r1 = frame.row(block.position.y - block.scale.y / 2.0);
        if r1 <= r0 {
            r1 = r0 + 1;
        }
        let r0 = r0.max(frame.top);
        let r1 = r1.min(frame.bottom);

        if c1 <= c0 || r1 <= r0 {
            return;
        }

        let base = Rgb::from_packed(block.color);
        let fg = match projection {
            Projection::Front => base,
            Projection::Side => base.scaled(0.75),
        };
        let (ch, bold, dim) = match shade {
            Shade::Placed => ('█', false, false),
            Shade::Active => ('█', true, false),
            Shade::Falling => ('▓', false, true),
        };
        let style = CellStyle {
            fg,
            bg: self.background,
            bold,
            dim,
        };
        fb.fill_rect(
            c0 as u16,
            r0 as u16,
            (c1 - c0) as u16,
            (r1 - r0) as u16,
            ch,
            style,
        );
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        leaderboard: Option<&[LeaderboardEntry]>,
        viewport: Viewport,
        panel_x: u16,
    ) {
        let label = CellStyle {
            bold: true,
            ..self.base_style()
        };
        let value = self.base_style();
        let dim = CellStyle {
            dim: true,
            ..value
        };

        let mut y = 1;
        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.display_score, value);
        y += 2;

        fb.put_str(panel_x, y, "BEST", label);
        y += 1;
        match snap.best {
            Some(best) if best.rank > 0 => {
                let end = fb.put_u32(panel_x, y, best.score, value);
                fb.put_str(end + 1, y, "#", dim);
                fb.put_u32(end + 2, y, best.rank, dim);
            }
            _ => fb.put_str(panel_x, y, "-", value),
        }
        y += 2;

        fb.put_str(panel_x, y, "ROUND", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.round, value);
        y += 2;

        if let Some(entries) = leaderboard {
            fb.put_str(panel_x, y, "LEADERBOARD", label);
            y += 1;
            let name_w = PANEL_WIDTH.saturating_sub(11) as usize;
            for (i, entry) in entries.iter().enumerate() {
                if y + 4 >= viewport.height {
                    break;
                }
                let end = fb.put_u32(panel_x, y, i as u32 + 1, dim);
                fb.put_char(end, y, '.', dim);
                let name_x = panel_x + 4;
                for (k, ch) in entry.name.chars().take(name_w).enumerate() {
                    fb.put_char(name_x + k as u16, y, ch, value);
                }
                fb.put_u32(name_x + name_w as u16 + 1, y, entry.score, value);
                y += 1;
            }
            y += 1;
        }

        let hint_y = viewport.height.saturating_sub(3).max(y);
        if snap.pending_submission {
            fb.put_str(panel_x, hint_y, "SCORE NOT SAVED", label);
            fb.put_str(panel_x, hint_y + 1, "space to retry", dim);
        } else if snap.instructions_visible {
            fb.put_str(panel_x, hint_y, "SPACE / CLICK", label);
            fb.put_str(panel_x, hint_y + 1, "to drop the block", dim);
        }
    }

    fn draw_overlays(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, play_w: u16, height: u16) {
        let mid = height / 2;
        match snap.phase {
            Phase::Loading if snap.load_failed => {
                self.draw_overlay_text(fb, play_w, mid, "FAILED TO LOAD");
                self.draw_overlay_text(fb, play_w, mid + 1, "see log, q to quit");
            }
            Phase::Loading => self.draw_overlay_text(fb, play_w, mid, "LOADING"),
            Phase::Ready => self.draw_overlay_text(fb, play_w, mid, "PRESS SPACE"),
            Phase::Ended => {
                let text = if snap.new_high_score {
                    "NEW HIGH SCORE!"
                } else {
                    "GAME OVER"
                };
                self.draw_overlay_text(fb, play_w, mid, text);
                self.draw_overlay_text(fb, play_w, mid + 1, "space to play again");
            }
            Phase::Playing | Phase::Resetting => {}
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, play_w: u16, y: u16, text: &str) {
        let text_w = text.chars().count() as u16;
        let x = play_w.saturating_sub(text_w) / 2;
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, y, text, style);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shade {
    Placed,
    Active,
    Falling,
}
