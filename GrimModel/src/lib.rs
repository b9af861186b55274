//! # GrimModel
//!
//! A pure-Rust library for reading Legend of Grimrock `.model` files.
//!
//! ## Supported Formats
//!
//! - **MODEL** - Scene graph of mesh nodes with vertex arrays, bones and material segments
//! - **OBJ** - Wavefront export of positions, normals, UVs and material groups
//!
//! ## Quick Start
//!
//! ### Reading a Model
//!
//! ```no_run
//! use grimmodel::formats::model::read_model;
//!
//! let model = read_model("dungeon_wall.model")?;
//! for (index, node, entity) in model.mesh_nodes() {
//!     println!("node {index} '{}': {} vertices", node.name, entity.mesh_data.num_vertices);
//! }
//! # Ok::<(), grimmodel::Error>(())
//! ```
//!
//! ### Converting to OBJ
//!
//! ```no_run
//! use grimmodel::converter::convert_model_to_obj;
//!
//! let stats = convert_model_to_obj("dungeon_wall.model", "dungeon_wall.obj")?;
//! println!("{} faces", stats.faces);
//! # Ok::<(), grimmodel::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use grimmodel::prelude::*;
//!
//! // Now you have access to:
//! // - ModelFile, Node, MeshEntity, MeshData, VertexArray, ...
//! // - read_model, parse_model_bytes, dump_model, write_obj
//! // - Error, ErrorKind, Result
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `grimmodel` command-line binary

pub mod error;
pub mod formats;
pub mod converter;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::formats::model::{
        Bone, DataType, DumpOptions, FourCC, Mat4x3, MeshData, MeshEntity, MeshSegment,
        ModelFile, ModelInfo, Node, NodePayload, RawString, ReadOptions, Vec3, VertexArray,
        VertexChannel, dump_model, parse_model_bytes, read_model, read_model_with,
    };

    // Batch decoding
    pub use crate::formats::model::{BatchEntry, decode_batch, find_model_files};

    pub use crate::converter::{ObjOptions, ObjStats, convert_model_to_obj, export_obj, write_obj};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
