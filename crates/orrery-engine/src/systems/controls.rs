use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::api::config::ControlsConfig;
use crate::renderer::camera::Camera;

/// Keep the polar angle off the poles so `look_at` stays well defined.
const POLAR_EPSILON: f32 = 1e-3;

/// User-driven orbit around a target point: drag to rotate, wheel to dolly.
///
/// Input accumulates between frames and is applied in `update` with
/// exponential damping, so motion glides to a stop after release.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    config: ControlsConfig,
    /// Pending (azimuth, polar) rotation in radians.
    velocity: Vec2,
    /// Pending multiplicative dolly factor.
    zoom: f32,
}

impl OrbitControls {
    pub fn new(config: ControlsConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            config,
            velocity: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    /// Queue rotation from a pointer drag of `(dx, dy)` CSS pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.velocity.x -= dx * self.config.rotate_speed;
        self.velocity.y -= dy * self.config.rotate_speed;
    }

    /// Queue a dolly from a wheel delta; positive moves away from the target.
    pub fn dolly(&mut self, delta_y: f32) {
        let notches = delta_y / 100.0;
        self.zoom *= self.config.zoom_speed.powf(-notches);
    }

    /// Drop any pending motion (e.g. when a scripted transition takes over).
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.zoom = 1.0;
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.length_squared() > 1e-10 || (self.zoom - 1.0).abs() > 1e-6
    }

    /// Apply pending motion to the camera and decay it.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.eye - self.target;
        let mut radius = offset.length();
        if radius <= f32::EPSILON {
            radius = self.config.min_distance;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.velocity.x;
        phi = (phi + self.velocity.y).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        radius = (radius * self.zoom).clamp(self.config.min_distance, self.config.max_distance);

        camera.eye = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        camera.look_at(self.target);

        self.velocity *= 1.0 - self.config.damping;
        self.zoom = 1.0;
    }
}
