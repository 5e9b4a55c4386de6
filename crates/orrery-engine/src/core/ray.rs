//! Ray casting primitives: rays, axis-aligned boxes, sphere and triangle tests.

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any `extend` call will replace.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |mut acc, &p| {
            acc.extend(p);
            acc
        })
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Largest extent along any axis.
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform into another space. The direction is renormalized, so
    /// distances along the result are in the target space's units.
    pub fn transformed(&self, m: &Mat4) -> Ray {
        let origin = m.transform_point3(self.origin);
        let direction = m.transform_vector3(self.direction);
        Ray::new(origin, direction)
    }

    /// Nearest non-negative distance to a sphere surface, if hit.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t0 = -b - sq;
        let t1 = -b + sq;
        if t0 >= 0.0 {
            Some(t0)
        } else if t1 >= 0.0 {
            // Origin inside the sphere.
            Some(t1)
        } else {
            None
        }
    }

    /// Möller–Trumbore, double-sided.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        const EPS: f32 = 1e-7;
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv_det;
        (t > EPS).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn aabb_from_points_tracks_extents() {
        let b = Aabb::from_points(&[Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, -2.0, 1.0)]);
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(b.center(), Vec3::new(1.0, 0.0, 0.5));
        assert_relative_eq!(b.max_dimension(), 4.0);
    }

    #[test]
    fn empty_aabb_has_zero_size() {
        assert!(Aabb::EMPTY.is_empty());
        assert_eq!(Aabb::EMPTY.size(), Vec3::ZERO);
    }

    #[test]
    fn ray_hits_sphere_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert_relative_eq!(t, 9.0, epsilon = 1e-5);
    }

    #[test]
    fn ray_misses_sphere_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray.intersect_sphere(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn ray_hits_triangle_from_either_side() {
        let (a, b, c) = (Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let front = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let back = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert_relative_eq!(front.intersect_triangle(a, b, c).unwrap(), 5.0, epsilon = 1e-5);
        assert_relative_eq!(back.intersect_triangle(a, b, c).unwrap(), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn ray_misses_triangle_outside_edges() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = ray.intersect_triangle(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn transformed_ray_renormalizes_direction() {
        let m = Mat4::from_scale(Vec3::splat(2.0));
        let ray = Ray::new(Vec3::ONE, Vec3::X).transformed(&m);
        assert_eq!(ray.origin, Vec3::splat(2.0));
        assert_relative_eq!(ray.direction.length(), 1.0, epsilon = 1e-6);
    }
}
