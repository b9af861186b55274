//! The model file root and its cross-reference checks

use std::io::Read;

use super::geometry::Mat4x3;
use super::node::Node;
use super::primitives::{BinaryReader, FourCC};
use super::entity::MeshEntity;
use super::{FORMAT_VERSION, MODEL_MAGIC, NO_PARENT};
use crate::error::{Error, Result};

/// A decoded `.model` file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFile {
    /// "MDL1"
    pub magic: FourCC,
    /// Always 2
    pub version: i32,
    /// Never empty
    pub nodes: Vec<Node>,
}

impl ModelFile {
    /// Decode a whole model from `reader`.
    ///
    /// Only the structure is checked here; see [`ModelFile::validate`] for
    /// the index cross-references.
    pub fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let magic = reader.read_fourcc("model magic")?;
        if magic != MODEL_MAGIC {
            return Err(Error::InvalidModelMagic(magic));
        }

        let version = reader.read_i32("model version")?;
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedModelVersion { version });
        }

        let count = reader.read_i32("node count")?;
        let num_nodes = usize::try_from(count)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(Error::InvalidNodeCount { count })?;
        tracing::debug!("model header ok, {} nodes", num_nodes);

        let mut nodes = Vec::with_capacity(num_nodes.min(4096));
        for index in 0..num_nodes {
            nodes.push(Node::read(reader, index)?);
        }

        Ok(Self { magic, version, nodes })
    }

    /// Check every index that points back into the node list or the index buffer.
    ///
    /// - `parent` must be -1 or another node's index
    /// - every bone's `node_index` must name a node
    /// - every segment's triangles must lie inside the mesh's index buffer
    pub fn validate(&self) -> Result<()> {
        let num_nodes = self.nodes.len();

        for (index, node) in self.nodes.iter().enumerate() {
            if node.parent != NO_PARENT {
                let valid = node.parent_index().is_some_and(|p| p < num_nodes && p != index);
                if !valid {
                    return Err(Error::InvalidParentIndex { node: index, parent: node.parent, num_nodes });
                }
            }

            let Some(entity) = node.mesh_entity() else {
                continue;
            };

            for (bone_index, bone) in entity.bones.iter().enumerate() {
                if !bone.node().is_some_and(|n| n < num_nodes) {
                    return Err(Error::InvalidBoneNodeIndex {
                        node: index,
                        bone: bone_index,
                        node_index: bone.node_index,
                        num_nodes,
                    });
                }
            }

            let mesh = &entity.mesh_data;
            for (segment_index, segment) in mesh.segments.iter().enumerate() {
                let first = usize::try_from(segment.first_index).unwrap_or(0);
                let in_bounds = segment
                    .index_range()
                    .is_some_and(|range| range.end <= mesh.indices.len());
                if !in_bounds {
                    let end = segment.index_range().map_or(usize::MAX, |range| range.end);
                    return Err(Error::SegmentOutOfBounds {
                        node: index,
                        segment: segment_index,
                        first,
                        end,
                        num_indices: mesh.indices.len(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Nodes carrying a mesh entity, with their index.
    pub fn mesh_nodes(&self) -> impl Iterator<Item = (usize, &Node, &MeshEntity)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.mesh_entity().map(|entity| (i, node, entity)))
    }

    /// Indices of nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent_index().is_none())
            .map(|(i, _)| i)
    }

    /// Indices of the direct children of `parent`.
    pub fn children(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.parent_index() == Some(parent))
            .map(|(i, _)| i)
    }

    /// Model-space transform of node `index`, composed up its parent chain.
    ///
    /// `None` if the index or any parent is out of range, or the chain loops.
    pub fn world_transform(&self, index: usize) -> Option<Mat4x3> {
        let mut world = self.nodes.get(index)?.local_to_parent;
        let mut current = index;

        // A chain longer than the node list must revisit a node.
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[current];
            if node.parent == NO_PARENT {
                return Some(world);
            }
            let parent = node.parent_index()?;
            world = self.nodes.get(parent)?.local_to_parent.compose(&world);
            current = parent;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::formats::model::{NodePayload, RawString, Vec3};

    fn node(parent: i32, translation: Vec3) -> Node {
        Node {
            name: RawString::from("n"),
            local_to_parent: Mat4x3 { translation, ..Mat4x3::IDENTITY },
            parent,
            payload: NodePayload::Empty,
        }
    }

    fn model(nodes: Vec<Node>) -> ModelFile {
        ModelFile { magic: MODEL_MAGIC, version: FORMAT_VERSION, nodes }
    }

    #[test]
    fn test_world_transform_chain() {
        let model = model(vec![
            node(-1, Vec3::new(1.0, 0.0, 0.0)),
            node(0, Vec3::new(0.0, 2.0, 0.0)),
            node(1, Vec3::new(0.0, 0.0, 3.0)),
        ]);

        let world = model.world_transform(2).unwrap();
        assert_eq!(world.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(model.roots().collect::<Vec<_>>(), vec![0]);
        assert_eq!(model.children(1).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_world_transform_cycle() {
        let model = model(vec![node(1, Vec3::ZERO), node(0, Vec3::ZERO)]);

        assert!(model.world_transform(0).is_none());
        assert!(model.world_transform(1).is_none());
    }

    #[test]
    fn test_validate_allows_mutual_parents() {
        // Mutual parents are in range, so only a self-reference is rejected.
        let mutual = model(vec![node(1, Vec3::ZERO), node(0, Vec3::ZERO)]);
        assert!(mutual.validate().is_ok());

        let selfish = model(vec![node(0, Vec3::ZERO)]);
        let err = selfish.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(err, Error::InvalidParentIndex { node: 0, parent: 0, num_nodes: 1 }));
    }

    #[test]
    fn test_validate_negative_parent() {
        let model = model(vec![node(-2, Vec3::ZERO)]);
        assert!(matches!(
            model.validate(),
            Err(Error::InvalidParentIndex { parent: -2, .. })
        ));
    }
}
