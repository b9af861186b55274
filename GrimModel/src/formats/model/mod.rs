//! Legend of Grimrock `.model` format
//!
//! A model is a flat list of scene graph nodes. Each node has a name, a
//! parent-relative transform, a parent index and optionally a mesh entity
//! (geometry, skinning bones and render flags).
//!
//! Layout reference: <https://www.grimrock.net/modding/model-and-animation-file-formats/>
//!
//! ```text
//! ModelFile   magic "MDL1", version 2, numNodes, Node[numNodes]
//! Node        name, Mat4x3, parent, type (-1 empty | 0 MeshEntity), [MeshEntity]
//! MeshEntity  MeshData, numBones, Bone[numBones], emissive Vec3, castShadow u8
//! MeshData    magic "MESH", version 2, numVertices, VertexArray[15],
//!             numIndices, i32[numIndices], numSegments, MeshSegment[numSegments],
//!             boundCenter, boundRadius, boundMin, boundMax
//! ```

mod batch;
mod dump;
mod entity;
mod file;
mod geometry;
mod inspect;
mod mesh;
mod node;
mod primitives;
mod vertex_array;

pub use batch::{BatchEntry, BatchProgress, decode_batch, find_model_files};
pub use dump::{DumpOptions, dump_model};
pub use entity::{Bone, MeshEntity};
pub use file::ModelFile;
pub use geometry::{Mat4x3, Vec3};
pub use inspect::{ChannelInfo, MeshInfo, ModelInfo, NodeInfo, extract_model_info};
pub use mesh::{MeshData, MeshSegment};
pub use node::{Node, NodePayload};
pub use primitives::{BinaryReader, FourCC, RawString};
pub use vertex_array::{DataType, VertexArray, VertexChannel};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;

/// "MDL1" root block tag
pub const MODEL_MAGIC: FourCC = FourCC::new(b"MDL1");

/// "MESH" mesh block tag
pub const MESH_MAGIC: FourCC = FourCC::new(b"MESH");

/// The only model and mesh version in use
pub const FORMAT_VERSION: i32 = 2;

/// Node type: no entity data follows
pub const NODE_TYPE_EMPTY: i32 = -1;

/// Node type: a mesh entity follows
pub const NODE_TYPE_MESH_ENTITY: i32 = 0;

/// Parent index of root nodes
pub const NO_PARENT: i32 = -1;

/// Segment primitive type for triangle lists (the only one used)
pub const PRIMITIVE_TRIANGLE_LIST: i32 = 2;

/// Options controlling how a model is read.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Run [`ModelFile::validate`] after decoding (default: true).
    pub validate: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Read a .model file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read,
/// [`Error::TruncatedInput`] if it ends early and a format error for any
/// structural or cross-reference violation.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<ModelFile> {
    read_model_with(path, &ReadOptions::default())
}

/// Read a .model file from disk with explicit options
pub fn read_model_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<ModelFile> {
    let path = path.as_ref();
    tracing::debug!("Reading model: {}", path.display());

    // Dropped on every return path, including errors.
    let file = File::open(path)?;
    read_model_from(BufReader::new(file), options)
}

/// Parse .model data from bytes
///
/// # Errors
///
/// Same as [`read_model`], minus the file system errors.
pub fn parse_model_bytes(data: &[u8]) -> Result<ModelFile> {
    parse_model_bytes_with(data, &ReadOptions::default())
}

/// Parse .model data from bytes with explicit options
pub fn parse_model_bytes_with(data: &[u8], options: &ReadOptions) -> Result<ModelFile> {
    read_model_from(data, options)
}

/// Decode a model from any byte source, consuming it front to back.
pub fn read_model_from<R: Read>(source: R, options: &ReadOptions) -> Result<ModelFile> {
    let mut reader = BinaryReader::new(source);
    let model = ModelFile::read(&mut reader)?;

    if options.validate {
        model.validate()?;
    }

    tracing::debug!(
        "Decoded {} nodes ({} meshes) from {} bytes",
        model.nodes.len(),
        model.mesh_nodes().count(),
        reader.position()
    );

    Ok(model)
}
