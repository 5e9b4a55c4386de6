pub mod catalog;
pub mod glb;
pub mod loader;

pub use catalog::{BodyCatalog, BodyDescriptor, RelatedContent, SunDescriptor};
pub use loader::{AssetLoader, BodyModel, LoadOutcome, LoadTicket, ModelMesh};
