// extensions/mod.rs
//
// Interpolation helpers shared by camera systems.
// Decoupled from Scene/Context: pure math over timestamps.

pub mod easing;
pub mod tween;

pub use easing::{ease_vec3, lerp, Easing};
pub use tween::Tween;
