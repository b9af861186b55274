//! Serializable model summaries
//!
//! Backs the CLI's `--json` output.

use std::path::Path;

use serde::Serialize;

use super::file::ModelFile;
use super::mesh::MeshData;
use super::primitives::RawString;
use super::read_model;
use crate::error::Result;

/// Layout of one present vertex channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelInfo {
    pub channel: &'static str,
    pub data_type: &'static str,
    pub dim: i32,
    pub stride: i32,
}

/// Mesh summary of a node.
#[derive(Debug, Clone, Serialize)]
pub struct MeshInfo {
    pub vertex_count: i32,
    pub index_count: usize,
    pub triangle_count: usize,
    pub channels: Vec<ChannelInfo>,
    pub materials: Vec<RawString>,
    pub bone_count: usize,
    pub cast_shadow: bool,
}

/// One node of the summary.
#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    pub index: usize,
    pub name: RawString,
    pub parent: Option<usize>,
    pub mesh: Option<MeshInfo>,
}

/// Complete model summary.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub file_path: String,
    pub version: i32,
    pub node_count: usize,
    pub mesh_count: usize,
    pub nodes: Vec<NodeInfo>,
}

impl ModelInfo {
    pub fn from_model(model: &ModelFile, file_path: impl Into<String>) -> Self {
        let nodes: Vec<NodeInfo> = model
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| NodeInfo {
                index,
                name: node.name.clone(),
                parent: node.parent_index(),
                mesh: node.mesh_entity().map(|entity| MeshInfo {
                    bone_count: entity.bones.len(),
                    cast_shadow: entity.casts_shadow(),
                    ..mesh_info(&entity.mesh_data)
                }),
            })
            .collect();

        Self {
            file_path: file_path.into(),
            version: model.version,
            node_count: nodes.len(),
            mesh_count: nodes.iter().filter(|n| n.mesh.is_some()).count(),
            nodes,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn mesh_info(mesh: &MeshData) -> MeshInfo {
    MeshInfo {
        vertex_count: mesh.num_vertices,
        index_count: mesh.indices.len(),
        triangle_count: mesh.triangle_count(),
        channels: mesh
            .present_channels()
            .map(|(channel, array)| ChannelInfo {
                channel: channel.name(),
                data_type: array.data_type().map_or("unknown", |t| t.name()),
                dim: array.dim,
                stride: array.stride,
            })
            .collect(),
        materials: mesh.segments.iter().map(|s| s.material.clone()).collect(),
        bone_count: 0,
        cast_shadow: false,
    }
}

/// Read a model file and summarize it.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn extract_model_info<P: AsRef<Path>>(source: P) -> Result<ModelInfo> {
    let source_path = source.as_ref();
    let model = read_model(source_path)?;
    Ok(ModelInfo::from_model(&model, source_path.to_string_lossy()))
}
