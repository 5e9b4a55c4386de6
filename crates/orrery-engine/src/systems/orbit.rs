//! Per-frame orbital motion: circular orbits in XZ with a small vertical bob.
//!
//! Pure math lives in `body_position`; `simulate` writes results into the
//! scene graph in place.

use glam::Vec3;

use crate::api::types::MaterialId;
use crate::assets::catalog::{BodyCatalog, BodyDescriptor};
use crate::components::material::Material;
use crate::core::scene::Scene;
use crate::systems::builder::SceneIndex;

/// Vertical bob: `sin(t * BOB_RATE + i) * BOB_AMPLITUDE`.
const BOB_RATE: f32 = 0.2;
const BOB_AMPLITUDE: f32 = 0.5;

/// Position of body `index` at `t` seconds since start.
pub fn body_position(body: &BodyDescriptor, index: usize, t: f32) -> Vec3 {
    let angle = body.initial_angle + t * body.orbit_speed;
    Vec3::new(
        angle.cos() * body.orbit_radius,
        (t * BOB_RATE + index as f32).sin() * BOB_AMPLITUDE,
        angle.sin() * body.orbit_radius,
    )
}

/// Advance every body to time `t`.
///
/// Self-rotation accumulates a fixed step per call (per frame, not per
/// second); the wobble axis alternates between even and odd bodies.
pub fn simulate(scene: &mut Scene, index: &SceneIndex, catalog: &BodyCatalog, t: f32) {
    for (i, (handles, body)) in index.bodies.iter().zip(catalog.iter()).enumerate() {
        let position = body_position(body, i, t);

        if let Some(node) = scene.get_mut(handles.body) {
            let transform = &mut node.transform;
            transform.position = position;
            transform.rotation.y += body.rotation_speed;
            if i % 2 == 0 {
                transform.rotation.x = (t * 0.1).sin() * 0.05;
            } else {
                transform.rotation.z = (t * 0.15).sin() * 0.03;
            }
        }
        if let Some(atmosphere) = scene.get_mut(handles.atmosphere) {
            atmosphere.transform.position = position;
        }
        set_glow_time(scene, handles.glow_material, t);
    }
    set_glow_time(scene, index.sun_glow_material, t);
}

fn set_glow_time(scene: &mut Scene, material: MaterialId, t: f32) {
    if let Some(Material::Shader(shader)) = scene.resources_mut().material_mut(material) {
        shader.uniforms.time = t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::builder::build_scene;
    use crate::systems::device::DeviceClass;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    fn setup() -> (Scene, SceneIndex, BodyCatalog) {
        let catalog = BodyCatalog::default();
        let mut scene = Scene::new();
        let index = build_scene(&mut scene, &catalog, &DeviceClass::Mobile.defaults(), 3);
        (scene, index, catalog)
    }

    #[test]
    fn contact_at_time_zero() {
        let catalog = BodyCatalog::default();
        let i = catalog.index_of("contact").unwrap();
        let p = body_position(&catalog.bodies[i], i, 0.0);
        assert_relative_eq!(p.x, 14.0 * (PI * 0.8).cos(), epsilon = 1e-4);
        assert_relative_eq!(p.x, -11.326, epsilon = 1e-3);
        assert_relative_eq!(p.z, 8.229, epsilon = 1e-3);
        assert_relative_eq!(p.y, (i as f32).sin() * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn simulate_moves_body_and_atmosphere_together() {
        let (mut scene, index, catalog) = setup();
        simulate(&mut scene, &index, &catalog, 12.5);
        for handles in &index.bodies {
            let body = scene.get(handles.body).unwrap().transform.position;
            let atmosphere = scene.get(handles.atmosphere).unwrap().transform.position;
            assert_eq!(body, atmosphere);
        }
    }

    #[test]
    fn rotation_accumulates_per_call() {
        let (mut scene, index, catalog) = setup();
        for _ in 0..10 {
            simulate(&mut scene, &index, &catalog, 0.0);
        }
        let rot = scene.get(index.bodies[1].body).unwrap().transform.rotation;
        assert_relative_eq!(rot.y, catalog.bodies[1].rotation_speed * 10.0, epsilon = 1e-6);
    }

    #[test]
    fn wobble_axis_alternates_by_index() {
        let (mut scene, index, catalog) = setup();
        simulate(&mut scene, &index, &catalog, 20.0);
        let even = scene.get(index.bodies[0].body).unwrap().transform.rotation;
        let odd = scene.get(index.bodies[1].body).unwrap().transform.rotation;
        assert_relative_eq!(even.x, (2.0f32).sin() * 0.05, epsilon = 1e-6);
        assert_eq!(even.z, 0.0);
        assert_relative_eq!(odd.z, (3.0f32).sin() * 0.03, epsilon = 1e-6);
        assert_eq!(odd.x, 0.0);
    }

    #[test]
    fn glow_time_tracks_simulation_time() {
        let (mut scene, index, catalog) = setup();
        simulate(&mut scene, &index, &catalog, 4.25);
        let Some(Material::Shader(glow)) = scene.resources().material(index.bodies[0].glow_material) else {
            panic!("glow should be a shader material");
        };
        assert_eq!(glow.uniforms.time, 4.25);
    }

    proptest! {
        #[test]
        fn orbit_stays_on_its_circle(
            t in 0.0f32..10_000.0,
            radius in 0.5f32..500.0,
            speed in -2.0f32..2.0,
            angle in 0.0f32..std::f32::consts::TAU,
            index in 0usize..16,
        ) {
            let mut body = BodyCatalog::default().bodies[0].clone();
            body.orbit_radius = radius;
            body.orbit_speed = speed;
            body.initial_angle = angle;
            let p = body_position(&body, index, t);
            let xz = (p.x * p.x + p.z * p.z).sqrt();
            prop_assert!((xz - radius).abs() <= radius * 1e-4 + 1e-4, "xz {} vs r {}", xz, radius);
            prop_assert!(p.y.abs() <= 0.5 + 1e-6);
        }
    }
}
