use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::components::geometry::Geometry;
use crate::components::material::{BlendMode, Color, PointsMaterial};

/// Static particle cloud scattered on a spherical shell around the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Sprite size in world units.
    pub size: f32,
    pub opacity: f32,
    /// Per-particle tints are picked from here.
    pub palette: Vec<Color>,
}

impl ParticleField {
    /// Distant starfield.
    pub fn starfield(count: usize) -> Self {
        Self {
            count,
            min_radius: 100.0,
            max_radius: 300.0,
            size: 0.7,
            opacity: 0.9,
            palette: vec![Color::WHITE, Color::hex(0xcad7ff), Color::hex(0xfff4e8), Color::hex(0xffd2a1)],
        }
    }

    /// Nearer dust between the outer orbits and the stars.
    pub fn dust(count: usize) -> Self {
        Self {
            count,
            min_radius: 20.0,
            max_radius: 60.0,
            size: 0.25,
            opacity: 0.5,
            palette: vec![Color::hex(0x6f7bd9), Color::hex(0x9a6fd9), Color::hex(0x6fc3d9)],
        }
    }

    /// Sample positions and colors. Directions are uniform on the sphere.
    pub fn generate(&self, rng: &mut impl Rng) -> Geometry {
        let mut positions = Vec::with_capacity(self.count);
        let mut colors = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let theta = rng.random::<f32>() * TAU;
            let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
            let radius = self.min_radius + rng.random::<f32>() * (self.max_radius - self.min_radius);
            positions.push(Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ));

            let tint = if self.palette.is_empty() {
                Color::WHITE
            } else {
                self.palette[rng.random_range(0..self.palette.len())]
            };
            colors.push(tint.scaled(rng.random_range(0.7..=1.0)).to_array());
        }
        Geometry::points(positions, colors)
    }

    pub fn material(&self) -> PointsMaterial {
        PointsMaterial {
            size: self.size,
            opacity: self.opacity,
            blend: BlendMode::Normal,
            vertex_colors: true,
            size_attenuation: true,
        }
    }
}
