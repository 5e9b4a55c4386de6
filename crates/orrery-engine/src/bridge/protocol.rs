//! Per-frame wire buffer layout.
//! Must stay in sync with the JS renderer's `protocol.js`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 32 floats]
//! [Draw items: item_count × 20 floats]
//! [Lights: light_count × 12 floats]
//! ```
//!
//! Counts are written into the header every frame.
//! JS reads them from the header to compute offsets dynamically.

use crate::components::light::Light;
use crate::renderer::draw_list::{DrawItem, LightItem};
use crate::renderer::traits::{FrameData, ShadowKind};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 32;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_TIME: usize = 2;
/// Eye x, y, z.
pub const HEADER_CAMERA_EYE: usize = 3;
/// Target x, y, z.
pub const HEADER_CAMERA_TARGET: usize = 6;
pub const HEADER_CAMERA_FOV: usize = 9;
pub const HEADER_CAMERA_ASPECT: usize = 10;
pub const HEADER_CAMERA_NEAR: usize = 11;
pub const HEADER_CAMERA_FAR: usize = 12;
pub const HEADER_PIXEL_RATIO: usize = 13;
pub const HEADER_BLOOM_STRENGTH: usize = 14;
pub const HEADER_BLOOM_RADIUS: usize = 15;
pub const HEADER_BLOOM_THRESHOLD: usize = 16;
pub const HEADER_GRADE_BRIGHTNESS: usize = 17;
pub const HEADER_GRADE_FLICKER: usize = 18;
pub const HEADER_GRADE_TIME: usize = 19;
pub const HEADER_SHADOWS_ENABLED: usize = 20;
/// 0 = basic, 1 = PCF soft.
pub const HEADER_SHADOW_KIND: usize = 21;
pub const HEADER_ITEM_COUNT: usize = 22;
pub const HEADER_TRANSPARENT_SPLIT: usize = 23;
pub const HEADER_LIGHT_COUNT: usize = 24;
// 25..32 reserved.

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per draw item (wire format, never changes).
pub const ITEM_FLOATS: usize = DrawItem::FLOATS;

/// Floats per light: kind, r, g, b, intensity, x, y, z, distance, decay, cast_shadow, pad.
pub const LIGHT_FLOATS: usize = 12;

/// Light kind codes.
pub const LIGHT_AMBIENT: f32 = 0.0;
pub const LIGHT_DIRECTIONAL: f32 = 1.0;
pub const LIGHT_POINT: f32 = 2.0;

/// Frame buffer layout for a given item and light count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolLayout {
    pub item_count: usize,
    pub light_count: usize,

    /// Offset (in floats) where draw items begin.
    pub item_data_offset: usize,
    /// Offset (in floats) where lights begin.
    pub light_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(item_count: usize, light_count: usize) -> Self {
        let item_data_offset = HEADER_FLOATS;
        let light_data_offset = item_data_offset + item_count * ITEM_FLOATS;
        let buffer_total_floats = light_data_offset + light_count * LIGHT_FLOATS;
        Self {
            item_count,
            light_count,
            item_data_offset,
            light_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Read the layout back from a packed header.
    pub fn from_header(header: &[f32]) -> Option<Self> {
        if header.len() < HEADER_FLOATS || header[HEADER_PROTOCOL_VERSION] != PROTOCOL_VERSION {
            return None;
        }
        Some(Self::new(
            header[HEADER_ITEM_COUNT] as usize,
            header[HEADER_LIGHT_COUNT] as usize,
        ))
    }
}

/// Pack one frame into `out`, replacing its contents. Returns the layout used.
pub fn pack_frame(frame: &FrameData, out: &mut Vec<f32>) -> ProtocolLayout {
    let list = frame.draw_list;
    let layout = ProtocolLayout::new(list.items.len(), list.lights.len());
    out.clear();
    out.resize(HEADER_FLOATS, 0.0);

    let camera = frame.camera;
    let header = &mut out[..HEADER_FLOATS];
    header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    header[HEADER_FRAME_COUNTER] = frame.frame as f32;
    header[HEADER_TIME] = frame.time;
    header[HEADER_CAMERA_EYE..HEADER_CAMERA_EYE + 3].copy_from_slice(&camera.eye.to_array());
    header[HEADER_CAMERA_TARGET..HEADER_CAMERA_TARGET + 3].copy_from_slice(&camera.target.to_array());
    header[HEADER_CAMERA_FOV] = camera.fov_y;
    header[HEADER_CAMERA_ASPECT] = camera.aspect;
    header[HEADER_CAMERA_NEAR] = camera.near;
    header[HEADER_CAMERA_FAR] = camera.far;
    header[HEADER_PIXEL_RATIO] = frame.pixel_ratio;
    header[HEADER_BLOOM_STRENGTH] = frame.post.bloom.strength;
    header[HEADER_BLOOM_RADIUS] = frame.post.bloom.radius;
    header[HEADER_BLOOM_THRESHOLD] = frame.post.bloom.threshold;
    header[HEADER_GRADE_BRIGHTNESS] = frame.post.grade.brightness;
    header[HEADER_GRADE_FLICKER] = frame.post.grade.flicker;
    header[HEADER_GRADE_TIME] = frame.post.grade.time;
    header[HEADER_SHADOWS_ENABLED] = if frame.shadows.enabled { 1.0 } else { 0.0 };
    header[HEADER_SHADOW_KIND] = match frame.shadows.kind {
        ShadowKind::Basic => 0.0,
        ShadowKind::PcfSoft => 1.0,
    };
    header[HEADER_ITEM_COUNT] = layout.item_count as f32;
    header[HEADER_TRANSPARENT_SPLIT] = list.transparent_split as f32;
    header[HEADER_LIGHT_COUNT] = layout.light_count as f32;

    out.extend_from_slice(list.as_floats());
    for light in &list.lights {
        out.extend_from_slice(&light_floats(light));
    }
    debug_assert_eq!(out.len(), layout.buffer_total_floats);
    layout
}

fn light_floats(item: &LightItem) -> [f32; LIGHT_FLOATS] {
    let p = item.position;
    let (kind, color, intensity, distance, decay, shadow) = match item.light {
        Light::Ambient { color, intensity } => (LIGHT_AMBIENT, color, intensity, 0.0, 0.0, false),
        Light::Directional { color, intensity } => (LIGHT_DIRECTIONAL, color, intensity, 0.0, 0.0, false),
        Light::Point { color, intensity, distance, decay, cast_shadow } => {
            (LIGHT_POINT, color, intensity, distance, decay, cast_shadow)
        }
    };
    [
        kind,
        color.r,
        color.g,
        color.b,
        intensity,
        p.x,
        p.y,
        p.z,
        distance,
        decay,
        if shadow { 1.0 } else { 0.0 },
        0.0,
    ]
}
