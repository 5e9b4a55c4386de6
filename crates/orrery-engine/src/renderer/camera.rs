use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::core::ray::Ray;

/// Perspective camera looking from `eye` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// Eye position; w is unused.
    pub eye: [f32; 4],
}

impl Camera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y,
            aspect,
            near,
            far,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio from viewport size. A zero height keeps the
    /// previous aspect.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if height > 0.0 && width > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// OpenGL-style clip space (z in [-1, 1]), matching WebGL.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            eye: self.eye.extend(1.0).to_array(),
        }
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let unproject = |z: f32| {
            let p = inv * Vec4::new(ndc.x, ndc.y, z, 1.0);
            p.truncate() / p.w
        };
        let near = unproject(-1.0);
        let far = unproject(1.0);
        Ray::new(near, far - near)
    }
}

/// Convert a CSS-pixel position on the canvas to normalized device
/// coordinates (x right, y up, both in [-1, 1]).
pub fn to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn overview() -> Camera {
        let mut cam = Camera::new(75.0, 16.0 / 9.0, 0.1, 1000.0);
        cam.eye = Vec3::new(0.0, 5.0, 25.0);
        cam
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = overview();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        let expected = (cam.target - cam.eye).normalize();
        assert_relative_eq!(ray.direction.dot(expected), 1.0, epsilon = 1e-4);
        assert!(ray.origin.distance(cam.eye) < 0.2);
    }

    #[test]
    fn ndc_corners() {
        assert_eq!(to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn zero_viewport_is_harmless() {
        let mut cam = overview();
        cam.set_viewport(0.0, 0.0);
        assert_relative_eq!(cam.aspect, 16.0 / 9.0);
        assert_eq!(to_ndc(10.0, 10.0, 0.0, 0.0), Vec2::ZERO);
    }

    #[test]
    fn uniform_is_pod() {
        let u = overview().uniform();
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&u));
        assert_eq!(floats.len(), 20);
        assert_eq!(floats[17], 5.0);
    }
}
