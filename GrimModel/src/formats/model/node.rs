//! Scene graph nodes

use std::io::Read;

use super::entity::MeshEntity;
use super::geometry::Mat4x3;
use super::primitives::{BinaryReader, RawString};
use super::{NODE_TYPE_EMPTY, NODE_TYPE_MESH_ENTITY, NO_PARENT};
use crate::error::{Error, Result};

/// What a node carries besides its transform.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    /// Type -1: a pure transform node.
    Empty,
    /// Type 0: a renderable mesh.
    Mesh(Box<MeshEntity>),
}

/// One entry of the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: RawString,
    pub local_to_parent: Mat4x3,
    /// Index of the parent node or -1 if no parent
    pub parent: i32,
    pub payload: NodePayload,
}

impl Node {
    /// Read the node at position `index` in the node list.
    pub(crate) fn read<R: Read>(reader: &mut BinaryReader<R>, index: usize) -> Result<Self> {
        let name = reader.read_string("node name")?;
        let local_to_parent = Mat4x3::read(reader)?;
        let parent = reader.read_i32("node parent")?;
        let node_type = reader.read_i32("node type")?;

        let payload = match node_type {
            NODE_TYPE_EMPTY => NodePayload::Empty,
            NODE_TYPE_MESH_ENTITY => NodePayload::Mesh(Box::new(MeshEntity::read(reader)?)),
            _ => return Err(Error::UnknownNodeType { node: index, node_type }),
        };

        tracing::trace!(
            "node {}: '{}' parent {} type {}",
            index,
            name,
            parent,
            node_type
        );

        Ok(Self { name, local_to_parent, parent, payload })
    }

    /// The type discriminant as stored in the file.
    pub fn node_type(&self) -> i32 {
        match self.payload {
            NodePayload::Empty => NODE_TYPE_EMPTY,
            NodePayload::Mesh(_) => NODE_TYPE_MESH_ENTITY,
        }
    }

    pub fn mesh_entity(&self) -> Option<&MeshEntity> {
        match &self.payload {
            NodePayload::Mesh(entity) => Some(entity),
            NodePayload::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.payload, NodePayload::Empty)
    }

    /// Parent index, or `None` for roots (and for invalid negative indices).
    pub fn parent_index(&self) -> Option<usize> {
        if self.parent == NO_PARENT {
            None
        } else {
            usize::try_from(self.parent).ok()
        }
    }
}
