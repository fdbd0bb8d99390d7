//! Animation module - tweens driven by the frame clock
//!
//! Tweens are evaluated against the same millisecond timestamps the [`Ticker`]
//! produces, so animations never run concurrently with the simulation: a tween
//! only moves when the game ticks.
//!
//! [`Ticker`]: crate::ticker::Ticker

use glam::DVec3;

/// Easing curve applied to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    CubicIn,
    CubicOut,
}

impl Easing {
    /// Map progress `t` in [0, 1] onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
        }
    }
}

/// Scalar tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Push the start back by `delay_ms`.
    pub fn delayed(mut self, delay_ms: f64) -> Self {
        self.start_ms += delay_ms;
        self
    }

    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        now_ms >= self.end_ms()
    }

    /// Value at `now_ms`; holds `from` before the start and `to` after the end.
    pub fn value_at(&self, now_ms: f64) -> f64 {
        let p = progress(self.start_ms, self.duration_ms, now_ms);
        self.from + (self.to - self.from) * self.easing.apply(p)
    }
}

/// Vector tween, interpolating all three components with one curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VecTween {
    pub from: DVec3,
    pub to: DVec3,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl VecTween {
    pub fn new(from: DVec3, to: DVec3, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn delayed(mut self, delay_ms: f64) -> Self {
        self.start_ms += delay_ms;
        self
    }

    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    pub fn value_at(&self, now_ms: f64) -> DVec3 {
        let p = progress(self.start_ms, self.duration_ms, now_ms);
        self.from.lerp(self.to, self.easing.apply(p))
    }
}

fn progress(start_ms: f64, duration_ms: f64, now_ms: f64) -> f64 {
    if now_ms <= start_ms {
        return 0.0;
    }
    if duration_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - start_ms) / duration_ms).min(1.0)
}
