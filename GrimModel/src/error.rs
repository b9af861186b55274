//! Error types for `GrimModel`

use thiserror::Error;

use crate::formats::model::FourCC;

/// Coarse classification of an [`Error`].
///
/// Every decode failure falls into exactly one of these buckets, which is what
/// batch drivers use to summarize a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The byte source could not be opened or read at all.
    IoUnavailable,
    /// A read could not obtain the number of bytes the format requires.
    TruncatedInput,
    /// A decoded field violates a structural contract of the format.
    Format,
}

/// The error type for `GrimModel` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input ended in the middle of a field.
    #[error("truncated input while reading {what}")]
    TruncatedInput {
        /// The field that could not be read in full.
        what: &'static str,
    },

    // ==================== Model Format Errors ====================
    /// The file is not a model file (missing MDL1 magic).
    #[error("invalid model magic: expected MDL1, found {0}")]
    InvalidModelMagic(FourCC),

    /// The model file version is not supported.
    #[error("unsupported model version: {version} (supported: 2)")]
    UnsupportedModelVersion {
        /// The version number found in the file.
        version: i32,
    },

    /// The model file declares no nodes.
    #[error("invalid node count: {count} (must be at least 1)")]
    InvalidNodeCount {
        /// The node count found in the file.
        count: i32,
    },

    /// A node carries a type discriminant other than -1 or 0.
    #[error("node {node}: unknown node type {node_type}")]
    UnknownNodeType {
        /// Index of the offending node.
        node: usize,
        /// The discriminant found in the file.
        node_type: i32,
    },

    // ==================== Mesh Format Errors ====================
    /// The mesh block is missing its MESH magic.
    #[error("invalid mesh magic: expected MESH, found {0}")]
    InvalidMeshMagic(FourCC),

    /// The mesh block version is not supported.
    #[error("unsupported mesh version: {version} (supported: 2)")]
    UnsupportedMeshVersion {
        /// The version number found in the file.
        version: i32,
    },

    /// A count field holds a negative value.
    #[error("negative {what} count: {count}")]
    NegativeCount {
        /// What is being counted.
        what: &'static str,
        /// The value found in the file.
        count: i32,
    },

    /// A length-prefixed string declares a negative length.
    #[error("negative string length: {0}")]
    NegativeStringLength(i32),

    /// `num_vertices * stride` does not fit in memory.
    #[error("vertex data size overflow: {num_vertices} vertices x {stride} bytes")]
    VertexDataOverflow {
        /// Vertex count of the owning mesh.
        num_vertices: i32,
        /// Per-vertex stride of the array.
        stride: i32,
    },

    /// A block of `count` elements is too large to address.
    #[error("{what} size overflow: {count} elements")]
    SizeOverflow {
        /// What is being read.
        what: &'static str,
        /// The element count found in the file.
        count: usize,
    },

    /// A mesh segment is not a triangle list.
    #[error("segment '{material}': unsupported primitive type {primitive_type} (expected 2)")]
    InvalidPrimitiveType {
        /// Material name of the segment.
        material: String,
        /// The primitive type found in the file.
        primitive_type: i32,
    },

    /// A mesh segment has a negative start or a non-positive triangle count.
    #[error("segment '{material}': invalid range (first index {first_index}, {count} triangles)")]
    InvalidSegmentRange {
        /// Material name of the segment.
        material: String,
        /// First index in the shared index buffer.
        first_index: i32,
        /// Number of triangles.
        count: i32,
    },

    // ==================== Cross-Reference Errors ====================
    /// A node's parent index does not name another node in the file.
    #[error("node {node}: parent index {parent} out of range ({num_nodes} nodes)")]
    InvalidParentIndex {
        /// Index of the offending node.
        node: usize,
        /// The parent index found in the file.
        parent: i32,
        /// Number of nodes in the file.
        num_nodes: usize,
    },

    /// A bone references a node outside the node list.
    #[error("node {node}, bone {bone}: node index {node_index} out of range ({num_nodes} nodes)")]
    InvalidBoneNodeIndex {
        /// Index of the node owning the mesh entity.
        node: usize,
        /// Index of the bone within the entity.
        bone: usize,
        /// The node index found in the file.
        node_index: i32,
        /// Number of nodes in the file.
        num_nodes: usize,
    },

    /// A segment's triangles extend past the end of the index buffer.
    #[error("node {node}, segment {segment}: indices {first}..{end} exceed index buffer of {num_indices}")]
    SegmentOutOfBounds {
        /// Index of the node owning the mesh.
        node: usize,
        /// Index of the segment within the mesh.
        segment: usize,
        /// First index used by the segment.
        first: usize,
        /// One past the last index used by the segment.
        end: usize,
        /// Length of the index buffer.
        num_indices: usize,
    },

    // ==================== Export Errors ====================
    /// A channel the exporter writes has a layout it cannot express.
    #[error("node {node}: cannot export {channel} channel ({dim}x {data_type}, stride {stride})")]
    UnsupportedExportChannel {
        /// Index of the node owning the mesh.
        node: usize,
        /// Display name of the channel.
        channel: &'static str,
        /// Display name of the raw data type.
        data_type: &'static str,
        /// Components per vertex.
        dim: i32,
        /// Bytes between consecutive vertices.
        stride: i32,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Map an IO error raised while reading `what` onto the decode taxonomy.
    ///
    /// Running out of bytes is a truncated file, anything else is a failing source.
    pub(crate) fn from_read(err: std::io::Error, what: &'static str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::TruncatedInput { what }
        } else {
            Error::Io(err)
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::IoUnavailable,
            Error::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            _ => ErrorKind::Format,
        }
    }
}

/// A specialized Result type for `GrimModel` operations.
pub type Result<T> = std::result::Result<T, Error>;
