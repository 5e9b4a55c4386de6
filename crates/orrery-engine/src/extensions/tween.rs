// extensions/tween.rs
//
// Wall-clock Vec3 tween. Progress is derived from timestamps, not from
// accumulated frame deltas, so dropped frames never stretch a transition.
//
// Usage:
//   let tween = Tween::new(from, to, now_ms, 2000.0, Easing::CubicOut);
//   camera.eye = tween.sample(now_ms);
//   if tween.is_complete(now_ms) { ... }

use glam::Vec3;

use super::easing::{ease_vec3, Easing};

/// A timed interpolation between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Vec3,
    pub to: Vec3,
    /// Start timestamp in milliseconds.
    pub start_ms: f64,
    /// Duration in milliseconds.
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self { from, to, start_ms, duration_ms, easing }
    }

    /// Normalized progress [0, 1] at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
        }
    }

    /// Eased position at `now_ms`.
    pub fn sample(&self, now_ms: f64) -> Vec3 {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            // Land exactly on the target.
            self.to
        } else {
            ease_vec3(self.from, self.to, p, self.easing)
        }
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
