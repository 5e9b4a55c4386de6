pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::config::{CameraConfig, ControlsConfig, EngineConfig};
pub use api::context::{Context, LoadJob, Viewport};
pub use api::types::{
    BodyTag, Cursor, GeometryId, MaterialId, NodeId, Notification, PerformanceSample, ResourceId,
};
pub use assets::catalog::{BodyCatalog, BodyDescriptor, RelatedContent, SunDescriptor};
pub use assets::loader::{AssetLoader, BodyModel, LoadOutcome, LoadTicket};
pub use components::geometry::Geometry;
pub use components::material::{Color, Material};
pub use core::scene::Scene;
pub use core::time::Clock;
pub use error::{AssetError, CatalogError, ConfigError};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::camera::Camera;
pub use renderer::draw_list::{DrawItem, DrawList};
pub use renderer::headless::HeadlessRenderer;
pub use renderer::traits::{FrameData, RenderStats, Renderer, ShadowKind, ShadowSettings};
pub use bridge::protocol::{pack_frame, ProtocolLayout};
pub use systems::device::{DeviceClass, DeviceWatch, RenderDefaults};
pub use systems::quality::QualityProfile;
pub use systems::spotlight::Rect;
pub use systems::transition::TransitionState;

// Extensions: easing curves and wall-clock tweens
pub use extensions::{ease_vec3, lerp, Easing, Tween};
