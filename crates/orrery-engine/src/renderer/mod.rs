pub mod camera;
pub mod draw_list;
pub mod headless;
pub mod postprocess;
pub mod traits;

// Re-export key types for convenient access
pub use camera::{Camera, CameraUniform};
pub use draw_list::{DrawItem, DrawList, LightItem};
pub use headless::HeadlessRenderer;
pub use postprocess::{BloomParams, GradeParams, PostPass, PostProcess};
pub use traits::{FrameData, RenderStats, Renderer, ShadowKind, ShadowSettings};
