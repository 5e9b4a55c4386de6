pub mod builder;
pub mod controls;
pub mod device;
pub mod interaction;
pub mod orbit;
pub mod quality;
pub mod render;
pub mod sampler;
pub mod spotlight;
pub mod transition;
