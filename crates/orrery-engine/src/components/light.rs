//! Light sources attached to scene nodes.
//!
//! Position comes from the owning node's transform; directional lights aim
//! from that position toward the origin.

use serde::Serialize;

use crate::components::material::Color;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
    },
    #[serde(rename_all = "camelCase")]
    Point {
        color: Color,
        intensity: f32,
        /// Cutoff distance; 0 means unlimited.
        distance: f32,
        decay: f32,
        cast_shadow: bool,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Light::Directional { color, intensity }
    }

    pub fn point(color: Color, intensity: f32, distance: f32) -> Self {
        Light::Point {
            color,
            intensity,
            distance,
            decay: 2.0,
            cast_shadow: true,
        }
    }

    pub fn intensity(&self) -> f32 {
        match *self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => intensity,
        }
    }

    pub fn casts_shadow(&self) -> bool {
        matches!(self, Light::Point { cast_shadow: true, .. })
    }
}
