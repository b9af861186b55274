//! File format handlers
//!
//! Only the Grimrock `.model` format is supported. Animation files are not read.

pub mod model;

// Re-export main model types
pub use model::{
    Bone, MeshData, MeshEntity, MeshSegment, ModelFile, Node, NodePayload, ReadOptions,
    VertexArray, VertexChannel, parse_model_bytes, read_model, read_model_with,
};
