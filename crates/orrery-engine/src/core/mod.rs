pub mod ray;
pub mod resources;
pub mod scene;
pub mod time;

pub use ray::{Aabb, Ray};
pub use resources::Resources;
pub use scene::Scene;
pub use time::Clock;
