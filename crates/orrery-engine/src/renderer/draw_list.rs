use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::components::light::Light;

/// Per-draw record handed to the renderer.
/// Must match the JS protocol: 20 floats = 80 bytes stride.
///
/// Ids are stored as f32 (exact up to 2^24), like every other wire field.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct DrawItem {
    /// Scene node arena index.
    pub node: f32,
    pub geometry: f32,
    pub material: f32,
    /// Bit flags, see `DrawItem::CAST_SHADOW` and friends.
    pub flags: f32,
    /// Column-major world matrix.
    pub world: [f32; 16],
}

impl DrawItem {
    pub const FLOATS: usize = 20;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const CAST_SHADOW: u32 = 1;
    pub const RECEIVE_SHADOW: u32 = 1 << 1;
    pub const POINTS: u32 = 1 << 2;

    pub fn new(node: u32, geometry: u32, material: u32, flags: u32, world: &Mat4) -> Self {
        Self {
            node: node as f32,
            geometry: geometry as f32,
            material: material as f32,
            flags: flags as f32,
            world: world.to_cols_array(),
        }
    }

    pub fn geometry_id(&self) -> u32 {
        self.geometry as u32
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        (self.flags as u32) & flag != 0
    }
}

/// A light resolved to world space for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightItem {
    pub light: Light,
    pub position: Vec3,
}

/// Draw items for one frame plus the lights that illuminate them.
pub struct DrawList {
    /// Opaque items first, then translucent ones from `transparent_split`.
    pub items: Vec<DrawItem>,
    pub transparent_split: u32,
    pub lights: Vec<LightItem>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(64),
            transparent_split: 0,
            lights: Vec::with_capacity(4),
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.transparent_split = 0;
        self.lights.clear();
    }

    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    pub fn set_transparent_split(&mut self, split: u32) {
        self.transparent_split = split;
    }

    pub fn item_count(&self) -> u32 {
        self.items.len() as u32
    }

    /// Items as a flat float slice for the wire buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.items)
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_item_is_20_floats() {
        assert_eq!(std::mem::size_of::<DrawItem>(), 80);
        assert_eq!(DrawItem::FLOATS, 20);
    }

    #[test]
    fn flags_round_trip_through_f32() {
        let item = DrawItem::new(3, 7, 9, DrawItem::CAST_SHADOW | DrawItem::POINTS, &Mat4::IDENTITY);
        assert!(item.has_flag(DrawItem::CAST_SHADOW));
        assert!(item.has_flag(DrawItem::POINTS));
        assert!(!item.has_flag(DrawItem::RECEIVE_SHADOW));
        assert_eq!(item.geometry_id(), 7);
    }

    #[test]
    fn as_floats_flattens_items() {
        let mut list = DrawList::new();
        list.push(DrawItem::new(1, 2, 3, 0, &Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0))));
        let floats = list.as_floats();
        assert_eq!(floats.len(), 20);
        assert_eq!(&floats[..3], &[1.0, 2.0, 3.0]);
        // Translation lives in the last matrix column.
        assert_eq!(&floats[16..19], &[4.0, 5.0, 6.0]);
    }
}
