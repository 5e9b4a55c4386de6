use glam::Vec3;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::extensions::easing::Easing;

/// Perspective projection settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Orbit controls tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlsConfig {
    /// Fraction of remaining angular velocity removed per frame.
    pub damping: f32,
    /// Radians of orbit per pixel of drag.
    pub rotate_speed: f32,
    /// Dolly factor per wheel notch (100 delta units).
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.95,
            min_distance: 5.0,
            max_distance: 100.0,
        }
    }
}

/// Engine configuration. Every field is optional in JSON; omitted fields
/// take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub fly_duration_ms: f64,
    pub return_duration_ms: f64,
    /// Camera offset from the selected body at the end of a flight.
    pub fly_offset: Vec3,
    pub overview_position: Vec3,
    pub overview_target: Vec3,
    pub easing: Easing,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    /// Minimum time between performance samples.
    pub sample_window_ms: f64,
    /// Pointer travel (CSS px) beyond which a press is a drag, not a click.
    pub drag_threshold_px: f32,
    /// Seed for particle placement.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fly_duration_ms: 2000.0,
            return_duration_ms: 1500.0,
            fly_offset: Vec3::new(0.0, 2.0, 10.0),
            overview_position: Vec3::new(0.0, 5.0, 25.0),
            overview_target: Vec3::ZERO,
            easing: Easing::CubicOut,
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            sample_window_ms: 1000.0,
            drag_threshold_px: 5.0,
            seed: 0x5eed,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
