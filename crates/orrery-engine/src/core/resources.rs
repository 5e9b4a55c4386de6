use crate::api::types::{GeometryId, MaterialId, ResourceId};
use crate::components::geometry::Geometry;
use crate::components::material::Material;

/// Arena of GPU-backed resources referenced by scene nodes.
///
/// Ids are never reused. Releasing an entry drops its data but keeps the
/// slot, so stale ids resolve to `None` instead of aliasing a newer resource.
#[derive(Default)]
pub struct Resources {
    /// `None` once released.
    geometries: Vec<Option<Geometry>>,
    materials: Vec<Option<Material>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId(self.geometries.len() as u32);
        self.geometries.push(Some(geometry));
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(Some(material));
        id
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0 as usize)?.as_ref()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)?.as_ref()
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn is_allocated(&self, id: ResourceId) -> bool {
        match id {
            ResourceId::Geometry(g) => self.geometry(g).is_some(),
            ResourceId::Material(m) => self.material(m).is_some(),
        }
    }

    /// Release a resource and drop its data. Returns false if it was already
    /// released or never existed.
    pub fn release(&mut self, id: ResourceId) -> bool {
        match id {
            ResourceId::Geometry(g) => self.geometries.get_mut(g.0 as usize).and_then(Option::take).is_some(),
            ResourceId::Material(m) => self.materials.get_mut(m.0 as usize).and_then(Option::take).is_some(),
        }
    }

    /// Every still-allocated resource, geometries first.
    pub fn allocated(&self) -> Vec<ResourceId> {
        let geometries = self
            .geometries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| ResourceId::Geometry(GeometryId(i as u32)));
        let materials = self
            .materials
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| ResourceId::Material(MaterialId(i as u32)));
        geometries.chain(materials).collect()
    }

    pub fn allocated_count(&self) -> usize {
        self.geometries.iter().flatten().count() + self.materials.iter().flatten().count()
    }
}
