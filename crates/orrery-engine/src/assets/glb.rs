//! Binary glTF (`.glb`) decoding into baked triangle meshes.
//!
//! Node transforms are multiplied down the hierarchy and baked into vertex
//! positions, so every decoded mesh lives in model space with an identity
//! transform. Only triangle-list primitives with embedded buffers are read.

use glam::{Mat4, Vec3};

use crate::components::geometry::Geometry;
use crate::components::material::{Color, StandardMaterial};
use crate::error::AssetError;

/// One triangle primitive pulled out of a glTF scene.
#[derive(Debug, Clone)]
pub struct DecodedMesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: StandardMaterial,
}

/// Decode a `.glb` payload. An empty vector means the container parsed but
/// held nothing drawable; the caller decides whether that is an error.
#[cfg(feature = "gltf")]
pub fn decode(bytes: &[u8]) -> Result<Vec<DecodedMesh>, AssetError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
    let blob = gltf.blob.as_deref();

    let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for node in scene.nodes() {
        collect(&node, Mat4::IDENTITY, blob, &mut out);
    }
    Ok(out)
}

#[cfg(not(feature = "gltf"))]
pub fn decode(_bytes: &[u8]) -> Result<Vec<DecodedMesh>, AssetError> {
    Err(AssetError::Decode("glTF support not compiled in".into()))
}

#[cfg(feature = "gltf")]
fn collect(node: &gltf::Node<'_>, parent: Mat4, blob: Option<&[u8]>, out: &mut Vec<DecodedMesh>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().or(node.name()).unwrap_or("mesh").to_string();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("glb: skipping non-triangle primitive in `{}`", name);
                continue;
            }
            let reader = primitive.reader(|buffer| match buffer.source() {
                gltf::buffer::Source::Bin => blob,
                gltf::buffer::Source::Uri(_) => None,
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from).collect();
            if positions.is_empty() {
                continue;
            }
            let normals: Vec<Vec3> = reader
                .read_normals()
                .map(|n| n.map(Vec3::from).collect())
                .unwrap_or_default();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let mut geometry = Geometry::mesh(positions, normals, indices);
            geometry.apply_matrix(&world);

            let pbr = primitive.material().pbr_metallic_roughness();
            let [r, g, b, a] = pbr.base_color_factor();
            let mut material = StandardMaterial::new(Color::new(r, g, b));
            material.roughness = pbr.roughness_factor();
            material.metalness = pbr.metallic_factor();
            material.opacity = a;
            material.transparent = a < 1.0;

            out.push(DecodedMesh { name: name.clone(), geometry, material });
        }
    }

    for child in node.children() {
        collect(&child, world, blob, out);
    }
}
