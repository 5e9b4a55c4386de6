use std::collections::HashSet;

use glam::Mat4;

use crate::api::types::{NodeId, ResourceId};
use crate::components::node::Node;
use crate::core::resources::Resources;

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Scene graph stored in a flat arena.
///
/// Nodes own their children by id; parents are back-references. The root is
/// a group created with the scene and never removed.
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    resources: Resources,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a scene with a specific node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(1));
        slots.push(Slot {
            generation: 0,
            node: Some(Node::group().with_name("root")),
        });
        Self {
            slots,
            free: Vec::new(),
            root: NodeId { index: 0, generation: 0 },
            resources: Resources::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Attach a node under `parent`. A stale parent id falls back to the root.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let parent = if self.contains(parent) {
            parent
        } else {
            log::warn!("add: parent {:?} no longer exists, attaching to root", parent);
            self.root
        };
        node.parent = Some(parent);
        node.children.clear();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, node: Some(node) });
                NodeId { index, generation: 0 }
            }
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    /// Remove a node and its whole subtree. Returns the removed nodes in
    /// pre-order. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Vec<Node> {
        if id == self.root || !self.contains(id) {
            return Vec::new();
        }
        if let Some(parent) = self.get(id).and_then(|n| n.parent) {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|&c| c != id);
            }
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.free_slot(n))
            .collect()
    }

    /// Remove every child subtree of `id`, keeping `id` itself.
    pub fn clear_children(&mut self, id: NodeId) -> Vec<Node> {
        let children = self.get(id).map(|n| n.children.clone()).unwrap_or_default();
        children.into_iter().flat_map(|c| self.remove(c)).collect()
    }

    fn free_slot(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    /// `id` followed by all of its descendants, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.get(n) else { continue };
            out.push(n);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Composite transform from node space to world space.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            let Some(node) = self.get(n) else { break };
            m = node.transform.matrix() * m;
            cursor = node.parent;
        }
        m
    }

    /// Depth-first walk of visible nodes with their world matrices.
    /// Invisible nodes hide their whole subtree.
    pub fn visit_visible(&self, mut f: impl FnMut(NodeId, &Node, &Mat4)) {
        let mut stack = vec![(self.root, Mat4::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            f(id, node, &world);
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
    }

    /// Iterate over all live nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.node.as_ref().map(|n| {
                (NodeId { index: i as u32, generation: s.generation }, n)
            })
        })
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Tear down the graph: release every geometry and material referenced by
    /// a node reachable from the root, then drop all nodes but the root.
    /// `release` is called once per resource. Returns the number released.
    pub fn dispose(&mut self, mut release: impl FnMut(ResourceId)) -> usize {
        let mut seen = HashSet::new();
        for id in self.descendants(self.root) {
            let Some((geometry, material)) = self.get(id).and_then(|n| n.drawable()) else {
                continue;
            };
            seen.insert(ResourceId::Geometry(geometry));
            seen.insert(ResourceId::Material(material));
        }

        let mut released = 0;
        let mut ordered: Vec<ResourceId> = seen.into_iter().collect();
        ordered.sort_by_key(|r| match *r {
            ResourceId::Geometry(g) => (0, g.0),
            ResourceId::Material(m) => (1, m.0),
        });
        for resource in ordered {
            if self.resources.release(resource) {
                release(resource);
                released += 1;
            }
        }

        self.clear_children(self.root);
        released
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::geometry::Geometry;
    use crate::components::material::{Color, Material, StandardMaterial};
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn mesh(scene: &mut Scene) -> Node {
        let g = scene.resources_mut().add_geometry(Geometry::sphere(1.0, 8, 6));
        let m = scene
            .resources_mut()
            .add_material(Material::Standard(StandardMaterial::new(Color::WHITE)));
        Node::mesh(g, m)
    }

    #[test]
    fn add_links_parent_and_child() {
        let mut scene = Scene::new();
        let root = scene.root();
        let pivot = scene.add(root, Node::group());
        let child = scene.add(pivot, Node::group());
        assert_eq!(scene.get(child).unwrap().parent(), Some(pivot));
        assert_eq!(scene.get(pivot).unwrap().children(), &[child]);
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn remove_drops_subtree_and_invalidates_ids() {
        let mut scene = Scene::new();
        let root = scene.root();
        let pivot = scene.add(root, Node::group());
        let child = scene.add(pivot, Node::group());
        let removed = scene.remove(pivot);
        assert_eq!(removed.len(), 2);
        assert!(!scene.contains(child));
        assert!(scene.get(root).unwrap().children().is_empty());

        // Slot reuse bumps the generation.
        let reused = scene.add(root, Node::group());
        assert!(reused.index == pivot.index || reused.index == child.index);
        assert_ne!(reused, pivot);
        assert_ne!(reused, child);
        assert!(!scene.contains(pivot));
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut scene = Scene::new();
        assert!(scene.remove(scene.root()).is_empty());
        assert!(scene.contains(scene.root()));
    }

    #[test]
    fn world_matrix_composes_parent_chain() {
        let mut scene = Scene::new();
        let root = scene.root();
        let pivot = scene.add(root, Node::group().with_position(Vec3::new(10.0, 0.0, 0.0)));
        let child = scene.add(pivot, Node::group().with_position(Vec3::new(0.0, 1.0, 0.0)));
        let p = scene.world_matrix(child).transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 10.0);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn visit_skips_hidden_subtrees() {
        let mut scene = Scene::new();
        let root = scene.root();
        let hidden = scene.add(root, Node::group());
        scene.add(hidden, Node::group());
        scene.get_mut(hidden).unwrap().visible = false;
        let mut count = 0;
        scene.visit_visible(|_, _, _| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn dispose_releases_each_resource_once() {
        let mut scene = Scene::new();
        let root = scene.root();
        let node = mesh(&mut scene);
        let shared = node.clone();
        scene.add(root, node);
        scene.add(root, shared);

        let mut released = Vec::new();
        let n = scene.dispose(|r| released.push(r));
        assert_eq!(n, 2);
        assert_eq!(released.len(), 2);
        assert_eq!(scene.resources().allocated_count(), 0);
        assert_eq!(scene.len(), 1);
    }
}
