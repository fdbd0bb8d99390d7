//! Ticker module - frame clock with normalized deltas
//!
//! The host calls [`Ticker::advance`] (or [`Ticker::update`]) once per frame with
//! a monotonic millisecond timestamp. A delta of 1.0 means "one frame at the
//! target rate"; elapsed time is clamped to [`MAX_ELAPSED_MS`] so a long stall
//! (suspended tab, debugger, slow terminal) doesn't teleport the moving block.

use crate::types::{MAX_ELAPSED_MS, TARGET_FPS};

/// One frame: timestamp and normalized delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub time_ms: f64,
    pub delta: f64,
}

#[derive(Debug, Clone)]
pub struct Ticker {
    started: bool,
    last_time_ms: f64,
    target_fpms: f64,
    max_elapsed_ms: f64,
}

impl Ticker {
    pub fn new(target_fps: f64) -> Self {
        Self {
            started: false,
            last_time_ms: -1.0,
            target_fpms: target_fps / 1000.0,
            max_elapsed_ms: MAX_ELAPSED_MS,
        }
    }

    /// Start producing frames. A second start while running is ignored.
    pub fn start(&mut self, now_ms: f64) {
        if self.started {
            return;
        }
        self.started = true;
        self.last_time_ms = now_ms;
    }

    /// Stop producing frames. A second stop is ignored.
    pub fn stop(&mut self) {
        self.started = false;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Frame for `now_ms`, or `None` when stopped or when no time has passed.
    ///
    /// The last timestamp advances even when the frame is skipped.
    pub fn advance(&mut self, now_ms: f64) -> Option<Frame> {
        if !self.started {
            return None;
        }

        let frame = if now_ms > self.last_time_ms {
            let elapsed = (now_ms - self.last_time_ms).min(self.max_elapsed_ms);
            Some(Frame {
                time_ms: now_ms,
                delta: elapsed * self.target_fpms,
            })
        } else {
            None
        };

        self.last_time_ms = now_ms;
        frame
    }

    /// Callback form of [`Ticker::advance`]. Returns whether the callback ran.
    pub fn update(&mut self, now_ms: f64, mut callback: impl FnMut(f64, f64)) -> bool {
        match self.advance(now_ms) {
            Some(frame) => {
                callback(frame.time_ms, frame.delta);
                true
            }
            None => false,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TARGET_FPS)
    }
}
