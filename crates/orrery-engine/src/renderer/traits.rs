//! Renderer trait: the boundary between scene orchestration and a GPU backend.
//!
//! In the browser the backend is a JS object bound by `orrery-web`; natively
//! (and in tests) it is `HeadlessRenderer`. Backends never see the scene
//! graph, only a flattened `FrameData` per frame.

use crate::api::types::ResourceId;
use crate::core::resources::Resources;
use crate::renderer::camera::Camera;
use crate::renderer::draw_list::DrawList;
use crate::renderer::postprocess::PostProcess;

/// Shadow-map filtering algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowKind {
    /// Unfiltered depth comparison.
    #[default]
    Basic,
    /// Percentage-closer filtering with soft edges.
    PcfSoft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowSettings {
    pub enabled: bool,
    pub kind: ShadowKind,
}

/// Counters reported by the backend after drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub draw_calls: u32,
    pub triangles: u64,
    /// Geometries currently resident on the backend.
    pub geometries: u32,
    /// Bytes of resident vertex/index buffers.
    pub buffer_bytes: u64,
}

/// Renderer trait for GPU backends.
///
/// # Example Implementation
///
/// ```ignore
/// struct WebGlRenderer { /* ... */ }
///
/// impl Renderer for WebGlRenderer {
///     fn backend(&self) -> &'static str { "webgl2" }
///
///     fn draw(&mut self, frame: &FrameData) -> RenderStats {
///         // Upload new geometry, run render -> bloom -> grade...
///     }
///     // ...
/// }
/// ```
pub trait Renderer {
    /// Backend identifier (e.g., "webgl2", "headless").
    fn backend(&self) -> &'static str;

    /// Handle viewport resize (CSS pixels).
    fn resize(&mut self, width: u32, height: u32);

    /// Device pixel ratio used for the drawing buffer.
    fn set_pixel_ratio(&mut self, ratio: f32);

    fn set_shadows(&mut self, shadows: ShadowSettings);

    /// Multisampling hint from the device class. Applied once, before the
    /// first frame.
    fn set_antialias(&mut self, enabled: bool);

    /// Draw a complete frame through the post-processing chain.
    fn draw(&mut self, frame: &FrameData) -> RenderStats;

    /// Free the backend copy of a geometry or material.
    fn release(&mut self, resource: ResourceId);
}

/// Complete frame data for rendering.
pub struct FrameData<'a> {
    /// Frames rendered before this one.
    pub frame: u64,
    /// Seconds since start.
    pub time: f32,
    pub camera: &'a Camera,
    pub draw_list: &'a DrawList,
    /// Resource arena the draw items index into.
    pub resources: &'a Resources,
    pub post: &'a PostProcess,
    pub pixel_ratio: f32,
    pub shadows: ShadowSettings,
}
