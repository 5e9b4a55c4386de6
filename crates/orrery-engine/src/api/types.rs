use serde::Serialize;

/// Handle to a node in the scene arena.
///
/// The generation guards against stale handles: once a slot is freed and
/// reused, old ids stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub index: u32,
    pub generation: u32,
}

/// Handle to a geometry in the resource arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GeometryId(pub u32);

/// Handle to a material in the resource arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MaterialId(pub u32);

/// Either kind of GPU-backed resource, used when telling a renderer to release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    Geometry(GeometryId),
    Material(MaterialId),
}

/// Identifying metadata carried by every mesh belonging to a catalog body.
/// Ray-cast hits map back to a descriptor through this tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyTag {
    pub body_id: String,
    /// Position of the body in catalog order.
    pub index: usize,
}

/// Pointer affordance requested from the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Snapshot of renderer performance, published about once per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub fps: u32,
    pub frame_time_ms: f32,
    pub triangle_count: u64,
    pub draw_calls: u32,
    pub geometries: u32,
    pub approx_memory_mb: f32,
}

/// Outbound notification produced during a tick, drained by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum Notification {
    /// A body was clicked and the camera started flying to it.
    Navigate(String),
    /// Periodic performance counters.
    Performance(PerformanceSample),
    /// Startup progress in percent (0-100).
    LoadingProgress(u8),
    /// Every body model has resolved (loaded or fallen back).
    LoadingComplete,
    /// Hover state changed over interactive bodies.
    CursorChanged(Cursor),
}

impl Notification {
    /// Short event name used by the web bridge when dispatching to JS.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Navigate(_) => "navigate",
            Notification::Performance(_) => "performance",
            Notification::LoadingProgress(_) => "loadingProgress",
            Notification::LoadingComplete => "loadingComplete",
            Notification::CursorChanged(_) => "cursorChanged",
        }
    }
}
