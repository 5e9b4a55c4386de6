use glam::Vec3;

use crate::components::node::NodeKind;
use crate::core::scene::Scene;
use crate::renderer::draw_list::{DrawItem, DrawList, LightItem};

/// Flatten the visible scene into a draw list.
/// Groups items by material transparency: opaque first, then translucent.
/// Sets `transparent_split` at the boundary.
pub fn build_draw_list(scene: &Scene, list: &mut DrawList) {
    list.clear();

    let mut opaque: Vec<DrawItem> = Vec::new();
    let mut translucent: Vec<DrawItem> = Vec::new();

    scene.visit_visible(|id, node, world| {
        let (geometry, material, mut flags) = match node.kind {
            NodeKind::Mesh { geometry, material } => (geometry, material, 0),
            NodeKind::Points { geometry, material } => (geometry, material, DrawItem::POINTS),
            NodeKind::Light(light) => {
                list.lights.push(LightItem {
                    light,
                    position: world.transform_point3(Vec3::ZERO),
                });
                return;
            }
            NodeKind::Group => return,
        };
        let Some(mat) = scene.resources().material(material) else {
            return;
        };
        if node.cast_shadow {
            flags |= DrawItem::CAST_SHADOW;
        }
        if node.receive_shadow {
            flags |= DrawItem::RECEIVE_SHADOW;
        }

        let item = DrawItem::new(id.index, geometry.0, material.0, flags, world);
        if mat.is_transparent() {
            translucent.push(item);
        } else {
            opaque.push(item);
        }
    });

    let split = opaque.len() as u32;

    for item in opaque {
        list.push(item);
    }
    list.set_transparent_split(split);
    for item in translucent {
        list.push(item);
    }
}
