use std::collections::HashMap;

use crate::api::types::{GeometryId, ResourceId};
use crate::renderer::traits::{FrameData, RenderStats, Renderer, ShadowSettings};

/// CPU-only renderer: walks the draw list and keeps the same counters a GPU
/// backend would. Used natively and in tests.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub shadows: ShadowSettings,
    pub antialias: bool,
    /// Resident geometries by id, with their buffer size in bytes.
    resident: HashMap<u32, u64>,
    released: Vec<ResourceId>,
    frames: u64,
    last: RenderStats,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_stats(&self) -> RenderStats {
        self.last
    }

    /// Geometries drawn at least once and not released since.
    pub fn resident_geometries(&self) -> usize {
        self.resident.len()
    }

    /// Every `release` call received, in order.
    pub fn released(&self) -> &[ResourceId] {
        &self.released
    }
}

impl Renderer for HeadlessRenderer {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    fn set_shadows(&mut self, shadows: ShadowSettings) {
        self.shadows = shadows;
    }

    fn set_antialias(&mut self, enabled: bool) {
        self.antialias = enabled;
    }

    fn draw(&mut self, frame: &FrameData) -> RenderStats {
        let mut stats = RenderStats::default();
        for item in &frame.draw_list.items {
            let id = item.geometry_id();
            let Some(geometry) = frame.resources.geometry(GeometryId(id)) else {
                continue;
            };
            stats.draw_calls += 1;
            stats.triangles += geometry.triangle_count() as u64;
            self.resident.entry(id).or_insert(geometry.byte_size() as u64);
        }
        stats.geometries = self.resident.len() as u32;
        stats.buffer_bytes = self.resident.values().sum();
        self.frames += 1;
        self.last = stats;
        stats
    }

    fn release(&mut self, resource: ResourceId) {
        if let ResourceId::Geometry(g) = resource {
            self.resident.remove(&g.0);
        }
        self.released.push(resource);
    }
}
