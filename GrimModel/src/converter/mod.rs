//! Format conversion utilities
//!
//! This module handles conversions from `.model` files to interchange formats:
//! - MODEL → OBJ (Wavefront) - positions, normals, first UV channel, material groups

pub mod model_to_obj;

// MODEL/OBJ conversion exports
pub use model_to_obj::{
    ObjOptions, ObjStats, check_exportable, convert_model_to_obj, convert_model_to_obj_with, export_obj, write_obj,
};
