//! One-shot scene construction from the body catalog.
//!
//! Layout under the root:
//! ```text
//! root
//! ├── sun (emissive mesh) ── sun glow shell
//! ├── pivot[i] (group at origin, one per body, catalog order)
//! │   ├── body[i] (group; model meshes attach here when loaded)
//! │   ├── atmosphere[i] (group) ── 3 translucent shells + fresnel glow shell
//! │   └── orbit ring
//! ├── stars, dust (points)
//! └── ambient, directional, point lights
//! ```

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::api::types::{MaterialId, NodeId, Notification, ResourceId};
use crate::assets::catalog::{BodyCatalog, BodyDescriptor};
use crate::assets::loader::BodyModel;
use crate::components::geometry::Geometry;
use crate::components::light::Light;
use crate::components::material::{
    BlendMode, Color, EmissiveMaterial, GlowUniforms, Material, ShaderMaterial, ShaderProgram, Side,
    StandardMaterial,
};
use crate::components::node::Node;
use crate::components::particles::ParticleField;
use crate::core::scene::Scene;
use crate::systems::device::RenderDefaults;

/// Scale and opacity of the layered atmosphere shells, inner to outer.
pub const ATMOSPHERE_LAYERS: [(f32, f32); 3] = [(1.1, 0.15), (1.2, 0.10), (1.35, 0.05)];
/// Scale of the fresnel glow shell.
pub const GLOW_SCALE: f32 = 1.5;
/// Half-width of the orbit path ring.
pub const RING_HALF_WIDTH: f32 = 0.02;
pub const RING_SEGMENTS: u32 = 128;
pub const RING_OPACITY: f32 = 0.15;

/// Handles for one catalog body.
#[derive(Debug, Clone)]
pub struct BodyHandles {
    pub pivot: NodeId,
    /// Group the loaded or fallback model attaches to.
    pub body: NodeId,
    pub atmosphere: NodeId,
    pub ring: NodeId,
    /// Translucent shells then the glow shell.
    pub shell_materials: Vec<MaterialId>,
    pub glow_material: MaterialId,
    /// Whether a model has been attached.
    pub loaded: bool,
}

/// Handles to a particle system.
#[derive(Debug, Clone, Copy)]
pub struct ParticleHandles {
    pub node: NodeId,
    pub material: MaterialId,
}

/// Indices produced by the builder, in catalog order.
#[derive(Debug, Clone)]
pub struct SceneIndex {
    pub sun: NodeId,
    pub sun_glow_material: MaterialId,
    pub bodies: Vec<BodyHandles>,
    pub pivots: Vec<NodeId>,
    pub stars: ParticleHandles,
    pub dust: ParticleHandles,
    pub lights: Vec<NodeId>,
}

impl SceneIndex {
    /// Catalog index of the body a mesh node is tagged with.
    pub fn body_of(&self, scene: &Scene, node: NodeId) -> Option<usize> {
        scene.get(node)?.body.as_ref().map(|tag| tag.index)
    }
}

/// Initial body position on its orbit: `(cos a · r, 0, sin a · r)`.
pub fn initial_position(body: &BodyDescriptor) -> Vec3 {
    Vec3::new(
        body.initial_angle.cos() * body.orbit_radius,
        0.0,
        body.initial_angle.sin() * body.orbit_radius,
    )
}

/// Build the static scene graph. Body nodes start empty; attach models with
/// [`attach_model`] as loads resolve.
pub fn build_scene(scene: &mut Scene, catalog: &BodyCatalog, defaults: &RenderDefaults, seed: u64) -> SceneIndex {
    let root = scene.root();
    let segments = defaults.sphere_segments;
    let mut rng = SmallRng::seed_from_u64(seed);

    // Sun
    let sun_geometry = scene
        .resources_mut()
        .add_geometry(Geometry::sphere(catalog.sun.size, segments, segments / 2));
    let sun_material = scene.resources_mut().add_material(Material::Emissive(EmissiveMaterial {
        color: catalog.sun.color,
        intensity: 1.5,
    }));
    let sun = scene.add(root, Node::mesh(sun_geometry, sun_material).with_name("sun"));
    let sun_glow_material = scene.resources_mut().add_material(glow_material(catalog.sun.color, 0.1, 2.5));
    scene.add(
        sun,
        Node::mesh(sun_geometry, sun_glow_material)
            .with_name("sun-glow")
            .with_scale(Vec3::splat(1.3)),
    );

    // Bodies
    let mut bodies = Vec::with_capacity(catalog.len());
    let mut pivots = Vec::with_capacity(catalog.len());
    for descriptor in catalog.iter() {
        let handles = build_pivot(scene, descriptor, segments);
        pivots.push(handles.pivot);
        bodies.push(handles);
    }

    // Particles
    let stars = add_particles(scene, "stars", &ParticleField::starfield(defaults.star_count), &mut rng);
    let dust = add_particles(scene, "dust", &ParticleField::dust(defaults.dust_count), &mut rng);

    // Lights
    let lights = vec![
        scene.add(root, Node::light(Light::ambient(Color::hex(0x404060), 0.4)).with_name("ambient")),
        scene.add(
            root,
            Node::light(Light::directional(Color::WHITE, 0.5))
                .with_name("directional")
                .with_position(Vec3::new(10.0, 10.0, 5.0)),
        ),
        scene.add(
            root,
            Node::light(Light::point(catalog.sun.color, 2.0, 100.0)).with_name("sun-light"),
        ),
    ];

    log::info!(
        "scene built: {} bodies, {} stars, {} dust, {} nodes",
        bodies.len(),
        defaults.star_count,
        defaults.dust_count,
        scene.len()
    );

    SceneIndex {
        sun,
        sun_glow_material,
        bodies,
        pivots,
        stars,
        dust,
        lights,
    }
}

fn glow_material(color: Color, c: f32, p: f32) -> Material {
    Material::Shader(ShaderMaterial {
        program: ShaderProgram::FresnelGlow,
        uniforms: GlowUniforms { color, c, p, time: 0.0 },
        opacity: 1.0,
        blend: BlendMode::Additive,
        side: Side::Back,
    })
}

fn build_pivot(scene: &mut Scene, descriptor: &BodyDescriptor, segments: u32) -> BodyHandles {
    let root = scene.root();
    let position = initial_position(descriptor);
    let pivot = scene.add(root, Node::group().with_name(format!("{}-pivot", descriptor.id)));
    let body = scene.add(pivot, Node::group().with_name(descriptor.id.clone()).with_position(position));

    // Atmosphere: shells share one body-radius sphere scaled per layer.
    let atmosphere = scene.add(
        pivot,
        Node::group()
            .with_name(format!("{}-atmosphere", descriptor.id))
            .with_position(position),
    );
    let shell_geometry = scene
        .resources_mut()
        .add_geometry(Geometry::sphere(descriptor.size, segments, segments / 2));
    let mut shell_materials = Vec::with_capacity(ATMOSPHERE_LAYERS.len() + 1);
    for (scale, opacity) in ATMOSPHERE_LAYERS {
        let material = scene.resources_mut().add_material(Material::Standard(
            StandardMaterial::new(descriptor.atmosphere_color).translucent(opacity, Side::Back),
        ));
        scene.add(
            atmosphere,
            Node::mesh(shell_geometry, material).with_scale(Vec3::splat(scale)),
        );
        shell_materials.push(material);
    }
    let glow = scene
        .resources_mut()
        .add_material(glow_material(descriptor.atmosphere_color, 0.2, 4.0));
    scene.add(
        atmosphere,
        Node::mesh(shell_geometry, glow).with_scale(Vec3::splat(GLOW_SCALE)),
    );
    shell_materials.push(glow);

    // Orbit path, rotated from the XY plane onto XZ.
    let ring_geometry = scene.resources_mut().add_geometry(Geometry::ring(
        descriptor.orbit_radius - RING_HALF_WIDTH,
        descriptor.orbit_radius + RING_HALF_WIDTH,
        RING_SEGMENTS,
    ));
    let ring_material = scene.resources_mut().add_material(Material::Standard(
        StandardMaterial::new(descriptor.color).translucent(RING_OPACITY, Side::Double),
    ));
    let ring = scene.add(
        pivot,
        Node::mesh(ring_geometry, ring_material)
            .with_name(format!("{}-orbit", descriptor.id))
            .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
    );

    BodyHandles {
        pivot,
        body,
        atmosphere,
        ring,
        shell_materials,
        glow_material: glow,
        loaded: false,
    }
}

fn add_particles(scene: &mut Scene, name: &str, field: &ParticleField, rng: &mut SmallRng) -> ParticleHandles {
    let root = scene.root();
    let geometry = scene.resources_mut().add_geometry(field.generate(rng));
    let material = scene.resources_mut().add_material(Material::Points(field.material()));
    let node = scene.add(root, Node::points(geometry, material).with_name(name));
    ParticleHandles { node, material }
}

/// Replace whatever hangs under a body node with `model`. Every mesh keeps
/// the model's body tag. Returns the resources the previous model held, which
/// the renderer still has to evict.
pub fn attach_model(scene: &mut Scene, index: &mut SceneIndex, model: BodyModel) -> Vec<ResourceId> {
    let Some(handles) = index.bodies.get_mut(model.tag.index) else {
        log::warn!("attach_model: no body at index {}", model.tag.index);
        return Vec::new();
    };
    let mut freed = Vec::new();
    for removed in scene.clear_children(handles.body) {
        let Some((geometry, material)) = removed.drawable() else {
            continue;
        };
        for id in [ResourceId::Geometry(geometry), ResourceId::Material(material)] {
            if scene.resources_mut().release(id) {
                freed.push(id);
            }
        }
    }

    for mesh in model.meshes {
        let geometry = scene.resources_mut().add_geometry(mesh.geometry);
        let material = scene.resources_mut().add_material(mesh.material);
        scene.add(
            handles.body,
            Node::mesh(geometry, material)
                .with_name(mesh.name)
                .with_shadows(mesh.cast_shadow, mesh.receive_shadow)
                .with_body(model.tag.clone()),
        );
    }
    handles.loaded = true;
    freed
}

/// Counts resolved body loads and produces progress notifications.
#[derive(Debug, Clone, Copy)]
pub struct LoadProgress {
    total: usize,
    resolved: usize,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self { total, resolved: 0 }
    }

    /// Record one resolved load (loaded or fallen back).
    pub fn resolve(&mut self) -> Vec<Notification> {
        if self.is_complete() {
            return Vec::new();
        }
        self.resolved += 1;
        let mut out = vec![Notification::LoadingProgress(self.percent())];
        if self.is_complete() {
            out.push(Notification::LoadingComplete);
        }
        out
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            100
        } else {
            ((self.resolved as f32 / self.total as f32) * 100.0).round() as u8
        }
    }

    pub fn is_complete(&self) -> bool {
        self.resolved >= self.total
    }
}
