use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

use crate::core::ray::Aabb;

/// How the vertex stream is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// Indexed triangle list.
    #[default]
    Triangles,
    /// One sprite per vertex (particle systems).
    Points,
}

/// CPU-side vertex data for a mesh or particle system.
///
/// Positions are in the owning node's local space.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Per-vertex RGB; empty when the material color is used instead.
    pub colors: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub topology: Topology,
    bounds: Aabb,
}

impl Geometry {
    /// Indexed triangle mesh. Normals may be empty.
    pub fn mesh(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points(&positions);
        Self {
            positions,
            normals,
            colors: Vec::new(),
            indices,
            topology: Topology::Triangles,
            bounds,
        }
    }

    /// UV sphere centered on the origin.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let w = width_segments.max(3);
        let h = height_segments.max(2);
        let row = w + 1;

        let mut positions = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
        let mut normals = Vec::with_capacity(positions.capacity());
        for iy in 0..=h {
            let v = iy as f32 / h as f32;
            for ix in 0..=w {
                let u = ix as f32 / w as f32;
                let normal = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                positions.push(normal * radius);
                normals.push(normal);
            }
        }

        let mut indices = Vec::with_capacity((w * h * 6) as usize);
        for iy in 0..h {
            for ix in 0..w {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                // Pole rows collapse to a single triangle per quad.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != h - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::mesh(positions, normals, indices)
    }

    /// Flat annulus in the XY plane, facing +Z.
    pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let row = segments + 1;
        let mut positions = Vec::with_capacity((row * 2) as usize);
        for radius in [inner_radius, outer_radius] {
            for i in 0..=segments {
                let theta = i as f32 / segments as f32 * TAU;
                positions.push(Vec3::new(radius * theta.cos(), radius * theta.sin(), 0.0));
            }
        }
        let normals = vec![Vec3::Z; positions.len()];

        let mut indices = Vec::with_capacity((segments * 6) as usize);
        for i in 0..segments {
            let a = i;
            let b = i + row;
            let c = i + row + 1;
            let d = i + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        Self::mesh(positions, normals, indices)
    }

    /// Unindexed point cloud with per-point colors.
    pub fn points(positions: Vec<Vec3>, colors: Vec<[f32; 3]>) -> Self {
        let bounds = Aabb::from_points(&positions);
        Self {
            positions,
            normals: Vec::new(),
            colors,
            indices: Vec::new(),
            topology: Topology::Points,
            bounds,
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Sphere around the bounding-box center that encloses every vertex.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        let center = self.bounds.center();
        let radius = self
            .positions
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0f32, f32::max)
            .sqrt();
        (center, radius)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Points => 0,
        }
    }

    /// Iterate triangles as vertex triples, skipping out-of-range indices.
    pub fn triangles(&self) -> impl Iterator<Item = (Vec3, Vec3, Vec3)> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = *self.positions.get(tri[0] as usize)?;
            let b = *self.positions.get(tri[1] as usize)?;
            let c = *self.positions.get(tri[2] as usize)?;
            Some((a, b, c))
        })
    }

    /// Bake a transform into the vertex data.
    pub fn apply_matrix(&mut self, m: &Mat4) {
        for p in &mut self.positions {
            *p = m.transform_point3(*p);
        }
        let normal_matrix = m.inverse().transpose();
        for n in &mut self.normals {
            *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
        }
        self.bounds = Aabb::from_points(&self.positions);
    }

    /// Approximate GPU buffer footprint in bytes.
    pub fn byte_size(&self) -> usize {
        self.positions.len() * 12
            + self.normals.len() * 12
            + self.colors.len() * 12
            + self.indices.len() * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let g = Geometry::sphere(0.6, 16, 12);
        for p in &g.positions {
            assert_relative_eq!(p.length(), 0.6, epsilon = 1e-5);
        }
        assert_relative_eq!(g.bounds().max_dimension(), 1.2, epsilon = 1e-5);
    }

    #[test]
    fn sphere_triangle_count_accounts_for_poles() {
        let g = Geometry::sphere(1.0, 8, 4);
        // 2 triangles per quad, minus one per quad on each pole row.
        assert_eq!(g.triangle_count(), 8 * 4 * 2 - 8 * 2);
    }

    #[test]
    fn ring_spans_inner_to_outer_radius() {
        let g = Geometry::ring(13.98, 14.02, 64);
        let (center, radius) = g.bounding_sphere();
        assert_relative_eq!(center.length(), 0.0, epsilon = 1e-3);
        assert_relative_eq!(radius, 14.02, epsilon = 1e-3);
        assert_eq!(g.triangle_count(), 128);
    }

    #[test]
    fn points_have_no_triangles() {
        let g = Geometry::points(vec![Vec3::X, Vec3::Y], vec![[1.0; 3]; 2]);
        assert_eq!(g.topology, Topology::Points);
        assert_eq!(g.triangle_count(), 0);
        assert_eq!(g.vertex_count(), 2);
    }

    #[test]
    fn apply_matrix_updates_bounds() {
        let mut g = Geometry::sphere(1.0, 8, 6);
        g.apply_matrix(&Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::IDENTITY,
            Vec3::new(5.0, 0.0, 0.0),
        ));
        assert_relative_eq!(g.bounds().center().x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(g.bounds().max_dimension(), 4.0, epsilon = 1e-4);
    }
}
