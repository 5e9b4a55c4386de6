use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::api::types::BodyTag;
use crate::assets::catalog::BodyDescriptor;
use crate::assets::glb;
use crate::components::geometry::Geometry;
use crate::components::material::{Material, StandardMaterial};
use crate::core::ray::Aabb;
use crate::error::AssetError;

/// A drawable piece of a body model, in body-local space.
#[derive(Debug, Clone)]
pub struct ModelMesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// Geometry for one catalog body, ready to attach under its body node.
/// Loaded and fallback models have the same shape.
#[derive(Debug, Clone)]
pub struct BodyModel {
    pub tag: BodyTag,
    pub meshes: Vec<ModelMesh>,
}

impl BodyModel {
    /// Combined bounds of every mesh.
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for mesh in &self.meshes {
            let b = mesh.geometry.bounds();
            if !b.is_empty() {
                bounds.extend(b.min);
                bounds.extend(b.max);
            }
        }
        bounds
    }
}

/// Terminal result of a load attempt.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(BodyModel),
    /// The asset failed; `model` is the procedural sphere standing in for it.
    Fallback { model: BodyModel, error: AssetError },
    /// Teardown cancelled the ticket before the load resolved.
    Cancelled,
}

impl LoadOutcome {
    pub fn into_model(self) -> Option<BodyModel> {
        match self {
            LoadOutcome::Loaded(model) | LoadOutcome::Fallback { model, .. } => Some(model),
            LoadOutcome::Cancelled => None,
        }
    }
}

/// Shared cancellation flag for an in-flight load.
#[derive(Debug, Clone, Default)]
pub struct LoadTicket(Rc<Cell<bool>>);

impl LoadTicket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Turns fetched model bytes into normalized body models, substituting a
/// procedural sphere on any failure. Cheap to clone into async tasks.
#[derive(Debug, Clone, Copy)]
pub struct AssetLoader {
    width_segments: u32,
    height_segments: u32,
}

impl AssetLoader {
    /// `segments` is the fallback sphere's width segment count; height uses half.
    pub fn new(segments: u32) -> Self {
        Self {
            width_segments: segments.max(3),
            height_segments: (segments / 2).max(2),
        }
    }

    /// Fetch and resolve a body model. `fetch` receives the model reference
    /// and is not called when the descriptor has none. No retries.
    pub async fn load<F, Fut>(
        &self,
        descriptor: &BodyDescriptor,
        index: usize,
        ticket: &LoadTicket,
        fetch: F,
    ) -> LoadOutcome
    where
        F: FnOnce(&str) -> Fut,
        Fut: Future<Output = Result<Vec<u8>, AssetError>>,
    {
        let bytes = match descriptor.model_reference.as_deref() {
            Some(url) => fetch(url).await,
            None => Err(AssetError::MissingModel),
        };
        if ticket.is_cancelled() {
            log::debug!("load `{}`: cancelled", descriptor.id);
            return LoadOutcome::Cancelled;
        }
        self.resolve(descriptor, index, bytes)
    }

    /// Resolve already-fetched bytes (or a fetch error) into an outcome.
    pub fn resolve(
        &self,
        descriptor: &BodyDescriptor,
        index: usize,
        bytes: Result<Vec<u8>, AssetError>,
    ) -> LoadOutcome {
        let tag = BodyTag { body_id: descriptor.id.clone(), index };
        match bytes.and_then(|b| self.build(descriptor, &tag, &b)) {
            Ok(model) => {
                log::debug!("load `{}`: {} meshes", descriptor.id, model.meshes.len());
                LoadOutcome::Loaded(model)
            }
            Err(error) => {
                log::warn!("load `{}` failed ({error}), using procedural sphere", descriptor.id);
                LoadOutcome::Fallback { model: self.fallback(descriptor, tag), error }
            }
        }
    }

    fn build(&self, descriptor: &BodyDescriptor, tag: &BodyTag, bytes: &[u8]) -> Result<BodyModel, AssetError> {
        let decoded = glb::decode(bytes)?;
        let mut model = BodyModel {
            tag: tag.clone(),
            meshes: decoded
                .into_iter()
                .filter(|m| m.geometry.triangle_count() > 0)
                .map(|m| ModelMesh {
                    name: m.name,
                    geometry: m.geometry,
                    material: Material::Standard(m.material),
                    cast_shadow: true,
                    receive_shadow: true,
                })
                .collect(),
        };

        let bounds = model.bounds();
        let extent = bounds.max_dimension();
        if model.meshes.is_empty() || !extent.is_finite() || extent <= 0.0 {
            return Err(AssetError::EmptyScene);
        }

        // Largest dimension becomes the body diameter, centered on the origin.
        let scale = 2.0 * descriptor.size / extent;
        let normalize = Mat4::from_scale(Vec3::splat(scale)) * Mat4::from_translation(-bounds.center());
        for mesh in &mut model.meshes {
            mesh.geometry.apply_matrix(&normalize);
        }
        Ok(model)
    }

    /// Procedural stand-in: a lit sphere of radius `size` in the body color.
    pub fn fallback(&self, descriptor: &BodyDescriptor, tag: BodyTag) -> BodyModel {
        BodyModel {
            tag,
            meshes: vec![ModelMesh {
                name: format!("{}-fallback", descriptor.id),
                geometry: Geometry::sphere(descriptor.size, self.width_segments, self.height_segments),
                material: Material::Standard(StandardMaterial::new(descriptor.color)),
                cast_shadow: true,
                receive_shadow: true,
            }],
        }
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::BodyCatalog;
    use crate::assets::glb::fixtures;
    use approx::assert_relative_eq;

    fn skills() -> (BodyDescriptor, usize) {
        let catalog = BodyCatalog::default();
        let index = catalog.index_of("skills").unwrap();
        (catalog.bodies[index].clone(), index)
    }

    fn assert_sphere_of(model: &BodyModel, radius: f32) {
        assert_eq!(model.meshes.len(), 1);
        for p in &model.meshes[0].geometry.positions {
            assert_relative_eq!(p.length(), radius, epsilon = 1e-5);
        }
    }

    #[test]
    fn failed_fetch_falls_back_to_tagged_sphere() {
        let (skills, index) = skills();
        let loader = AssetLoader::new(32);
        let ticket = LoadTicket::new();
        let outcome = pollster::block_on(loader.load(&skills, index, &ticket, |_| async {
            Err(AssetError::Network("offline".into()))
        }));
        let LoadOutcome::Fallback { model, error } = outcome else {
            panic!("expected fallback");
        };
        assert_eq!(error, AssetError::Network("offline".into()));
        assert_eq!(model.tag.body_id, "skills");
        assert_eq!(model.tag.index, index);
        assert_sphere_of(&model, 0.6);
        assert_eq!(model.meshes[0].material, Material::Standard(StandardMaterial::new(skills.color)));
    }

    #[test]
    fn missing_reference_skips_fetch() {
        let (mut skills, index) = skills();
        skills.model_reference = None;
        let loader = AssetLoader::default();
        let mut fetched = false;
        let outcome = pollster::block_on(loader.load(&skills, index, &LoadTicket::new(), |_| {
            fetched = true;
            async { Ok(Vec::new()) }
        }));
        assert!(!fetched);
        assert!(matches!(outcome, LoadOutcome::Fallback { error: AssetError::MissingModel, .. }));
    }

    #[test]
    fn cancelled_ticket_discards_result() {
        let (skills, index) = skills();
        let ticket = LoadTicket::new();
        let fetch_ticket = ticket.clone();
        let outcome = pollster::block_on(AssetLoader::default().load(&skills, index, &ticket, move |_| async move {
            fetch_ticket.cancel();
            Ok(fixtures::empty_scene())
        }));
        assert!(matches!(outcome, LoadOutcome::Cancelled));
        assert!(LoadOutcome::Cancelled.into_model().is_none());
    }

    #[test]
    fn fetch_receives_model_reference() {
        let (skills, index) = skills();
        let mut seen = String::new();
        pollster::block_on(AssetLoader::default().load(&skills, index, &LoadTicket::new(), |url| {
            seen = url.to_string();
            async { Err(AssetError::Http(404)) }
        }));
        assert_eq!(seen, "models/skills.glb");
    }

    #[test]
    fn loaded_model_is_normalized_and_recentered() {
        let (skills, index) = skills();
        let glb = fixtures::triangle([[10.0, 10.0, 0.0], [14.0, 10.0, 0.0], [10.0, 12.0, 0.0]], None);
        let LoadOutcome::Loaded(model) = AssetLoader::default().resolve(&skills, index, Ok(glb)) else {
            panic!("expected loaded model");
        };
        let bounds = model.bounds();
        assert_relative_eq!(bounds.max_dimension(), 1.2, epsilon = 1e-5);
        assert_relative_eq!(bounds.center().length(), 0.0, epsilon = 1e-5);
        assert!(model.meshes.iter().all(|m| m.cast_shadow && m.receive_shadow));
    }

    #[test]
    fn fallback_and_loaded_share_metadata_shape() {
        let (skills, index) = skills();
        let loader = AssetLoader::default();
        let glb = fixtures::triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], None);
        let loaded = loader.resolve(&skills, index, Ok(glb)).into_model().unwrap();
        let fallback = loader.resolve(&skills, index, Err(AssetError::Http(500))).into_model().unwrap();
        assert_eq!(loaded.tag, fallback.tag);
        assert_relative_eq!(loaded.bounds().max_dimension(), fallback.bounds().max_dimension(), epsilon = 1e-4);
    }

    #[test]
    fn empty_scene_falls_back() {
        let (skills, index) = skills();
        let outcome = AssetLoader::default().resolve(&skills, index, Ok(fixtures::empty_scene()));
        assert!(matches!(outcome, LoadOutcome::Fallback { error: AssetError::EmptyScene, .. }));
    }
}
