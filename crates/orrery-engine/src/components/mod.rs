pub mod geometry;
pub mod light;
pub mod material;
pub mod node;
pub mod particles;

pub use geometry::{Geometry, Topology};
pub use light::Light;
pub use material::{
    BlendMode, Color, EmissiveMaterial, GlowUniforms, Material, PointsMaterial, ShaderMaterial,
    ShaderProgram, Side, StandardMaterial,
};
pub use node::{Node, NodeKind, Transform};
pub use particles::ParticleField;
