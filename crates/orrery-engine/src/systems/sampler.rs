use crate::api::types::PerformanceSample;
use crate::renderer::traits::RenderStats;

const BYTES_PER_MB: f32 = 1024.0 * 1024.0;

/// Counts frames and publishes a sample once per window.
/// Samples are informational only; nothing reacts to them inside the engine.
#[derive(Debug, Clone)]
pub struct PerformanceSampler {
    window_ms: f64,
    window_start: Option<f64>,
    frames: u32,
}

impl PerformanceSampler {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            window_start: None,
            frames: 0,
        }
    }

    /// Record one rendered frame. Returns a sample when at least one window
    /// has elapsed since the previous one.
    pub fn record(&mut self, now_ms: f64, stats: &RenderStats) -> Option<PerformanceSample> {
        let start = *self.window_start.get_or_insert(now_ms);
        self.frames += 1;
        if now_ms - start < self.window_ms {
            return None;
        }

        let fps = self.frames;
        self.frames = 0;
        self.window_start = Some(now_ms);
        Some(PerformanceSample {
            fps,
            frame_time_ms: if fps > 0 { 1000.0 / fps as f32 } else { 0.0 },
            triangle_count: stats.triangles,
            draw_calls: stats.draw_calls,
            geometries: stats.geometries,
            approx_memory_mb: stats.buffer_bytes as f32 / BYTES_PER_MB,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stats() -> RenderStats {
        RenderStats {
            draw_calls: 40,
            triangles: 90_000,
            geometries: 20,
            buffer_bytes: 3 * 1024 * 1024,
        }
    }

    #[test]
    fn no_sample_inside_window() {
        let mut s = PerformanceSampler::new(1000.0);
        for i in 0..59 {
            assert!(s.record(i as f64 * 16.0, &stats()).is_none());
        }
    }

    #[test]
    fn sample_after_one_second() {
        let mut s = PerformanceSampler::new(1000.0);
        let mut out = None;
        for i in 0..=60 {
            if let Some(sample) = s.record(i as f64 * (1000.0 / 60.0), &stats()) {
                out = Some(sample);
            }
        }
        let sample = out.unwrap();
        assert_eq!(sample.fps, 61);
        assert_relative_eq!(sample.frame_time_ms, 1000.0 / 61.0);
        assert_eq!(sample.draw_calls, 40);
        assert_eq!(sample.triangle_count, 90_000);
        assert_relative_eq!(sample.approx_memory_mb, 3.0);
    }

    #[test]
    fn slow_frames_report_low_fps() {
        let mut s = PerformanceSampler::new(1000.0);
        assert!(s.record(0.0, &stats()).is_none());
        let sample = s.record(2500.0, &stats()).unwrap();
        assert_eq!(sample.fps, 2);
        assert_relative_eq!(sample.frame_time_ms, 500.0);
    }

    #[test]
    fn window_restarts_after_sample() {
        let mut s = PerformanceSampler::new(1000.0);
        s.record(0.0, &stats());
        assert!(s.record(1000.0, &stats()).is_some());
        assert!(s.record(1500.0, &stats()).is_none());
        let sample = s.record(2000.0, &stats()).unwrap();
        assert_eq!(sample.fps, 2);
    }
}
