//! Post-processing chain description: scene render, bloom, then a color
//! grade pass. The renderer owns the actual passes; this is the parameter
//! block it reads every frame.

use std::f32::consts::TAU;

/// Unreal-style bloom parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomParams {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

/// Final grade: a constant brightness lift with a slow flicker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeParams {
    pub brightness: f32,
    pub flicker: f32,
    /// Seconds since start; animates the flicker.
    pub time: f32,
}

impl Default for GradeParams {
    fn default() -> Self {
        Self {
            brightness: 1.05,
            flicker: 0.02,
            time: 0.0,
        }
    }
}

impl GradeParams {
    /// Flicker cycles per second.
    pub const FLICKER_HZ: f32 = 0.5;

    /// Brightness multiplier the grade pass applies at `self.time`.
    pub fn multiplier(&self) -> f32 {
        self.brightness * (1.0 + self.flicker * (self.time * Self::FLICKER_HZ * TAU).sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostPass {
    Render,
    Bloom,
    Grade,
}

/// Pass order and parameters for the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcess {
    pub bloom: BloomParams,
    pub grade: GradeParams,
}

impl PostProcess {
    pub const PASSES: [PostPass; 3] = [PostPass::Render, PostPass::Bloom, PostPass::Grade];

    pub fn new(bloom: BloomParams) -> Self {
        Self {
            bloom,
            grade: GradeParams::default(),
        }
    }

    pub fn passes(&self) -> &'static [PostPass] {
        &Self::PASSES
    }

    /// Advance time-dependent uniforms.
    pub fn update(&mut self, time: f32) {
        self.grade.time = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_run_render_bloom_grade() {
        let pp = PostProcess::new(BloomParams { strength: 0.6, radius: 0.75, threshold: 0.4 });
        assert_eq!(pp.passes(), &[PostPass::Render, PostPass::Bloom, PostPass::Grade]);
    }

    #[test]
    fn grade_stays_within_flicker_band() {
        let mut pp = PostProcess::new(BloomParams { strength: 0.4, radius: 0.5, threshold: 0.5 });
        for i in 0..100 {
            pp.update(i as f32 * 0.137);
            let m = pp.grade.multiplier();
            assert!(m >= 1.05 * 0.98 - 1e-5 && m <= 1.05 * 1.02 + 1e-5, "{m}");
        }
    }

    #[test]
    fn grade_at_time_zero_is_plain_lift() {
        assert!((GradeParams::default().multiplier() - 1.05).abs() < 1e-6);
    }
}
