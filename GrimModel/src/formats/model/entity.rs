//! Mesh entities and their skinning bones

use std::io::Read;

use super::geometry::{Mat4x3, Vec3};
use super::mesh::MeshData;
use super::primitives::BinaryReader;
use crate::error::Result;

/// A skinning joint driven by a node's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    /// Index of the node used to deform the object
    pub node_index: i32,
    /// Transform from model space to bone space
    pub inv_rest_matrix: Mat4x3,
}

impl Bone {
    pub(crate) fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let node_index = reader.read_i32("bone node index")?;
        let inv_rest_matrix = Mat4x3::read(reader)?;
        Ok(Self { node_index, inv_rest_matrix })
    }

    pub fn node(&self) -> Option<usize> {
        usize::try_from(self.node_index).ok()
    }
}

/// Mesh payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshEntity {
    pub mesh_data: MeshData,
    pub bones: Vec<Bone>,
    /// Deprecated by the engine, normally 0,0,0
    pub emissive_color: Vec3,
    /// 0 = shadow casting off, 1 = on; other values are kept as read
    pub cast_shadow: u8,
}

impl MeshEntity {
    pub(crate) fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let mesh_data = MeshData::read(reader)?;

        let num_bones = reader.read_count("bone")?;
        let mut bones = Vec::with_capacity(num_bones.min(1024));
        for _ in 0..num_bones {
            bones.push(Bone::read(reader)?);
        }

        let emissive_color = Vec3::read(reader)?;
        let cast_shadow = reader.read_u8("cast shadow")?;

        Ok(Self { mesh_data, bones, emissive_color, cast_shadow })
    }

    pub fn casts_shadow(&self) -> bool {
        self.cast_shadow != 0
    }

    pub fn is_skinned(&self) -> bool {
        !self.bones.is_empty()
    }
}
