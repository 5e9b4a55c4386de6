use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::api::types::{BodyTag, GeometryId, MaterialId, NodeId};
use crate::components::light::Light;

/// Local transform: translation, XYZ Euler rotation (radians), scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// What a node draws, if anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Pure transform node.
    Group,
    Mesh { geometry: GeometryId, material: MaterialId },
    Points { geometry: GeometryId, material: MaterialId },
    Light(Light),
}

/// Fat scene node: a transform plus optional drawable and metadata.
///
/// Children are owned through the arena; `parent` is a back-reference used
/// for world-matrix walks only.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Set on every mesh that belongs to a catalog body.
    pub body: Option<BodyTag>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: String::new(),
            kind,
            transform: Transform::default(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            body: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn mesh(geometry: GeometryId, material: MaterialId) -> Self {
        Self::new(NodeKind::Mesh { geometry, material })
    }

    pub fn points(geometry: GeometryId, material: MaterialId) -> Self {
        Self::new(NodeKind::Points { geometry, material })
    }

    pub fn light(light: Light) -> Self {
        Self::new(NodeKind::Light(light))
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn with_body(mut self, tag: BodyTag) -> Self {
        self.body = Some(tag);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Geometry and material handles, for drawable kinds.
    pub fn drawable(&self) -> Option<(GeometryId, MaterialId)> {
        match self.kind {
            NodeKind::Mesh { geometry, material } | NodeKind::Points { geometry, material } => {
                Some((geometry, material))
            }
            NodeKind::Group | NodeKind::Light(_) => None,
        }
    }
}
