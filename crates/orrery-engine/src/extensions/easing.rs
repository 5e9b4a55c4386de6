use std::f32::consts::PI;

use glam::Vec3;
use serde::Deserialize;

/// Progress curve for camera transitions, selectable from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    /// `1 - (1 - p)^3`: fast departure, gentle arrival.
    #[default]
    CubicOut,
    CubicInOut,
    SineInOut,
}

impl Easing {
    /// Map progress `p` (clamped to [0, 1]) onto the curve.
    #[inline]
    pub fn apply(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Easing::Linear => p,
            Easing::CubicOut => {
                let rest = 1.0 - p;
                1.0 - rest * rest * rest
            }
            Easing::CubicInOut if p < 0.5 => 4.0 * p * p * p,
            Easing::CubicInOut => {
                let rest = 2.0 - 2.0 * p;
                1.0 - rest * rest * rest / 2.0
            }
            Easing::SineInOut => (1.0 - (PI * p).cos()) / 2.0,
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Point between `from` and `to` at eased progress `p`.
#[inline]
pub fn ease_vec3(from: Vec3, to: Vec3, p: f32, easing: Easing) -> Vec3 {
    from.lerp(to, easing.apply(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Easing; 4] = [Easing::Linear, Easing::CubicOut, Easing::CubicInOut, Easing::SineInOut];

    #[test]
    fn curves_start_at_zero_and_end_at_one() {
        for e in ALL {
            assert_relative_eq!(e.apply(0.0), 0.0, epsilon = 1e-6);
            assert_relative_eq!(e.apply(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn cubic_out_front_loads_motion() {
        assert_relative_eq!(Easing::CubicOut.apply(0.5), 0.875);
        assert_relative_eq!(Easing::CubicOut.apply(0.25), 1.0 - 0.75f32.powi(3));
        assert!(Easing::CubicOut.apply(0.1) > Easing::Linear.apply(0.1));
    }

    #[test]
    fn in_out_curves_are_symmetric_about_midpoint() {
        for e in [Easing::CubicInOut, Easing::SineInOut] {
            assert_relative_eq!(e.apply(0.5), 0.5, epsilon = 1e-6);
            assert_relative_eq!(e.apply(0.2) + e.apply(0.8), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn progress_outside_unit_range_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(1.7), 1.0);
        assert_eq!(Easing::SineInOut.apply(-0.3), 0.0);
    }

    #[test]
    fn ease_vec3_follows_curve() {
        assert_relative_eq!(lerp(100.0, 200.0, 0.25), 125.0);
        let v = ease_vec3(Vec3::new(0.0, 5.0, 25.0), Vec3::new(0.0, 5.0, 17.0), 0.5, Easing::CubicOut);
        assert_relative_eq!(v.z, 18.0, epsilon = 1e-5);
    }

    #[test]
    fn deserializes_camel_case_names() {
        let e: Easing = serde_json::from_str(r#""sineInOut""#).unwrap();
        assert_eq!(e, Easing::SineInOut);
    }
}
