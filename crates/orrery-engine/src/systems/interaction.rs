//! Pointer interpretation and body picking.
//!
//! A press that travels less than the drag threshold before release is a
//! click; anything further is a drag that orbits the camera. Picks cast a
//! ray through the pointer against meshes tagged with a body, never the sun
//! or the atmosphere shells.

use glam::{Mat4, Vec2};

use crate::api::types::Cursor;
use crate::core::ray::Ray;
use crate::core::scene::Scene;
use crate::components::geometry::Geometry;
use crate::components::node::NodeKind;
use crate::renderer::camera::{to_ndc, Camera};

/// Nearest body under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Catalog index of the body.
    pub body: usize,
    /// World-space distance from the ray origin.
    pub distance: f32,
}

/// What a pointer event amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    None,
    /// Drag by this many CSS pixels since the last move.
    Drag(Vec2),
    /// Press and release without travelling past the threshold.
    Click(Vec2),
    /// Free movement with no button held.
    Hover(Vec2),
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start: Vec2,
    last: Vec2,
    dragging: bool,
}

#[derive(Debug, Clone)]
pub struct InteractionResolver {
    drag_threshold: f32,
    press: Option<Press>,
    cursor: Cursor,
}

impl InteractionResolver {
    pub fn new(drag_threshold: f32) -> Self {
        Self {
            drag_threshold,
            press: None,
            cursor: Cursor::Default,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> PointerAction {
        let p = Vec2::new(x, y);
        self.press = Some(Press { start: p, last: p, dragging: false });
        PointerAction::None
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> PointerAction {
        let p = Vec2::new(x, y);
        let Some(press) = self.press.as_mut() else {
            return PointerAction::Hover(p);
        };
        if !press.dragging && press.start.distance(p) > self.drag_threshold {
            press.dragging = true;
        }
        let delta = p - press.last;
        press.last = p;
        if press.dragging {
            PointerAction::Drag(delta)
        } else {
            PointerAction::None
        }
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> PointerAction {
        let p = Vec2::new(x, y);
        match self.press.take() {
            Some(press) if !press.dragging && press.start.distance(p) <= self.drag_threshold => {
                PointerAction::Click(p)
            }
            _ => PointerAction::None,
        }
    }

    /// Abandon the current press, if any. The next move is a hover again.
    pub fn cancel(&mut self) {
        self.press = None;
    }

    /// Record hover state; returns the new cursor only when it changed.
    pub fn hover(&mut self, over_body: bool) -> Option<Cursor> {
        let cursor = if over_body { Cursor::Pointer } else { Cursor::Default };
        if cursor == self.cursor {
            return None;
        }
        self.cursor = cursor;
        Some(cursor)
    }

    /// Pick the body under a CSS-pixel pointer position.
    pub fn pick_at(&self, scene: &Scene, camera: &Camera, pointer: Vec2, viewport: Vec2) -> Option<Hit> {
        let ndc = to_ndc(pointer.x, pointer.y, viewport.x, viewport.y);
        pick(scene, &camera.ray_from_ndc(ndc))
    }
}

/// Nearest tagged body mesh hit by `ray`.
pub fn pick(scene: &Scene, ray: &Ray) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    scene.visit_visible(|_, node, world| {
        let (Some(tag), NodeKind::Mesh { geometry, .. }) = (&node.body, &node.kind) else {
            return;
        };
        let Some(geometry) = scene.resources().geometry(*geometry) else {
            return;
        };
        let Some(distance) = intersect_mesh(ray, world, geometry) else {
            return;
        };
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Hit { body: tag.index, distance });
        }
    });
    best
}

fn intersect_mesh(ray: &Ray, world: &Mat4, geometry: &Geometry) -> Option<f32> {
    // Broad phase: bounding sphere in world space.
    let (center, radius) = geometry.bounding_sphere();
    let (scale, _, _) = world.to_scale_rotation_translation();
    let world_radius = radius * scale.abs().max_element();
    ray.intersect_sphere(world.transform_point3(center), world_radius)?;

    // Narrow phase: triangles in local space, distances mapped back.
    let inverse = world.inverse();
    let local = ray.transformed(&inverse);
    geometry
        .triangles()
        .filter_map(|(a, b, c)| local.intersect_triangle(a, b, c))
        .map(|t| world.transform_point3(local.at(t)).distance(ray.origin))
        .min_by(f32::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyTag;
    use crate::assets::catalog::BodyCatalog;
    use crate::assets::loader::AssetLoader;
    use crate::components::material::{Color, Material, StandardMaterial};
    use crate::components::node::Node;
    use crate::systems::builder::{attach_model, build_scene, SceneIndex};
    use crate::systems::device::DeviceClass;
    use approx::assert_relative_eq;
    use glam::Vec3;

    // Slightly off the axis so the ray never lands exactly on a vertex.
    fn off_axis_ray() -> Ray {
        Ray::new(Vec3::new(0.05, 0.03, 0.0), Vec3::NEG_Z)
    }

    fn tagged_sphere(scene: &mut Scene, at: Vec3, radius: f32, tag: BodyTag) {
        let root = scene.root();
        let g = scene.resources_mut().add_geometry(Geometry::sphere(radius, 16, 8));
        let m = scene
            .resources_mut()
            .add_material(Material::Standard(StandardMaterial::new(Color::WHITE)));
        let group = scene.add(root, Node::group().with_position(at));
        scene.add(group, Node::mesh(g, m).with_body(tag));
    }

    #[test]
    fn ray_hits_nearest_tagged_mesh() {
        let mut scene = Scene::new();
        tagged_sphere(&mut scene, Vec3::new(0.0, 0.0, -10.0), 1.0, BodyTag { body_id: "far".into(), index: 0 });
        tagged_sphere(&mut scene, Vec3::new(0.0, 0.0, -5.0), 1.0, BodyTag { body_id: "near".into(), index: 1 });
        let hit = pick(&scene, &off_axis_ray()).unwrap();
        assert_eq!(hit.body, 1);
        assert_relative_eq!(hit.distance, 4.0, epsilon = 0.05);
    }

    #[test]
    fn untagged_meshes_are_ignored() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.resources_mut().add_geometry(Geometry::sphere(2.0, 16, 8));
        let m = scene
            .resources_mut()
            .add_material(Material::Standard(StandardMaterial::new(Color::WHITE)));
        scene.add(root, Node::mesh(g, m).with_position(Vec3::new(0.0, 0.0, -5.0)));
        assert!(pick(&scene, &Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
    }

    #[test]
    fn scaled_mesh_distance_is_in_world_units() {
        let mut scene = Scene::new();
        let root = scene.root();
        let g = scene.resources_mut().add_geometry(Geometry::sphere(1.0, 16, 8));
        let m = scene
            .resources_mut()
            .add_material(Material::Standard(StandardMaterial::new(Color::WHITE)));
        scene.add(
            root,
            Node::mesh(g, m)
                .with_position(Vec3::new(0.0, 0.0, -10.0))
                .with_scale(Vec3::splat(3.0))
                .with_body(BodyTag { body_id: "big".into(), index: 0 }),
        );
        let hit = pick(&scene, &off_axis_ray()).unwrap();
        assert_relative_eq!(hit.distance, 7.0, epsilon = 0.1);
    }

    #[test]
    fn short_press_is_a_click() {
        let mut ir = InteractionResolver::new(5.0);
        ir.pointer_down(100.0, 100.0);
        assert_eq!(ir.pointer_move(102.0, 101.0), PointerAction::None);
        assert_eq!(ir.pointer_up(103.0, 101.0), PointerAction::Click(Vec2::new(103.0, 101.0)));
    }

    #[test]
    fn long_press_is_a_drag() {
        let mut ir = InteractionResolver::new(5.0);
        ir.pointer_down(100.0, 100.0);
        assert_eq!(ir.pointer_move(110.0, 100.0), PointerAction::Drag(Vec2::new(10.0, 0.0)));
        assert_eq!(ir.pointer_move(112.0, 103.0), PointerAction::Drag(Vec2::new(2.0, 3.0)));
        // Coming back near the start does not turn it into a click.
        ir.pointer_move(100.0, 100.0);
        assert_eq!(ir.pointer_up(100.0, 100.0), PointerAction::None);
    }

    #[test]
    fn move_without_press_is_hover() {
        let mut ir = InteractionResolver::new(5.0);
        assert_eq!(ir.pointer_move(4.0, 2.0), PointerAction::Hover(Vec2::new(4.0, 2.0)));
        assert_eq!(ir.pointer_up(4.0, 2.0), PointerAction::None);
    }

    #[test]
    fn cancel_ends_a_drag_without_click() {
        let mut r = InteractionResolver::new(5.0);
        r.pointer_down(10.0, 10.0);
        assert_eq!(r.pointer_move(40.0, 10.0), PointerAction::Drag(Vec2::new(30.0, 0.0)));
        r.cancel();
        assert_eq!(r.pointer_move(50.0, 10.0), PointerAction::Hover(Vec2::new(50.0, 10.0)));
        assert_eq!(r.pointer_up(50.0, 10.0), PointerAction::None);
    }

    #[test]
    fn cursor_changes_are_reported_once() {
        let mut ir = InteractionResolver::new(5.0);
        assert_eq!(ir.hover(false), None);
        assert_eq!(ir.hover(true), Some(Cursor::Pointer));
        assert_eq!(ir.hover(true), None);
        assert_eq!(ir.hover(false), Some(Cursor::Default));
    }

    fn solar_system() -> (Scene, SceneIndex, BodyCatalog) {
        let catalog = BodyCatalog::default();
        let mut scene = Scene::new();
        let mut index = build_scene(&mut scene, &catalog, &DeviceClass::Desktop.defaults(), 1);
        let loader = AssetLoader::new(32);
        for (i, body) in catalog.iter().enumerate() {
            let tag = BodyTag { body_id: body.id.clone(), index: i };
            attach_model(&mut scene, &mut index, loader.fallback(body, tag));
        }
        (scene, index, catalog)
    }

    #[test]
    fn click_through_camera_picks_projects() {
        let (scene, index, catalog) = solar_system();

        let projects = catalog.index_of("projects").unwrap();
        let center = scene.world_matrix(index.bodies[projects].body).transform_point3(Vec3::ZERO);
        let mut camera = Camera::new(75.0, 1.0, 0.1, 1000.0);
        camera.eye = Vec3::new(0.0, 5.0, 25.0);
        camera.look_at(center);

        let ir = InteractionResolver::new(5.0);
        let viewport = Vec2::new(800.0, 800.0);
        let hit = ir.pick_at(&scene, &camera, viewport / 2.0, viewport).unwrap();
        assert_eq!(hit.body, projects);
    }

    #[test]
    fn sun_is_never_picked() {
        let (scene, _, _) = solar_system();
        let hit = pick(&scene, &Ray::new(Vec3::new(0.0, 0.0, 25.0), Vec3::NEG_Z));
        assert!(hit.is_none());
    }
}
