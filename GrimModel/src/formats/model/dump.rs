//! Human-readable model dump

use std::io::Write;

use super::entity::{Bone, MeshEntity};
use super::file::ModelFile;
use super::geometry::{Mat4x3, Vec3};
use super::mesh::{MeshData, MeshSegment};
use super::node::Node;
use super::vertex_array::{DataType, VertexArray, VertexChannel};
use super::NO_PARENT;
use crate::error::Result;

/// Which optional parts of a model to include in a dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOptions {
    /// List nodes without a mesh entity
    pub include_empty_nodes: bool,
    /// List the bones of skinned meshes
    pub include_bones: bool,
    /// Print local/world transforms, bone matrices and bounds
    pub include_transforms: bool,
}

/// Write a hierarchical report of `model` to `out`.
pub fn dump_model<W: Write>(model: &ModelFile, out: &mut W, options: &DumpOptions) -> Result<()> {
    writeln!(out, "  nodes: {}", model.nodes.len())?;
    for (index, node) in model.nodes.iter().enumerate() {
        dump_node(model, node, index, out, options)?;
    }
    Ok(())
}

fn dump_node<W: Write>(
    model: &ModelFile,
    node: &Node,
    index: usize,
    out: &mut W,
    options: &DumpOptions,
) -> Result<()> {
    let entity = node.mesh_entity();
    if entity.is_none() && !options.include_empty_nodes {
        return Ok(());
    }

    write!(out, "    node.{index}: '{}'", node.name)?;
    if node.parent != NO_PARENT {
        write!(out, " -> node.{}", node.parent)?;
    }
    match entity {
        Some(_) => writeln!(out, "  MeshEntity")?,
        None => writeln!(out, " <empty>")?,
    }

    if options.include_transforms {
        writeln!(out, "      local: {}", format_matrix(&node.local_to_parent))?;
        match model.world_transform(index) {
            Some(world) => writeln!(out, "      world: {}", format_matrix(&world))?,
            None => writeln!(out, "      world: <unresolved parent chain>")?,
        }
    }

    if let Some(entity) = entity {
        dump_mesh_entity(entity, out, options)?;
    }
    Ok(())
}

fn dump_mesh_entity<W: Write>(entity: &MeshEntity, out: &mut W, options: &DumpOptions) -> Result<()> {
    dump_mesh_data(&entity.mesh_data, out, options)?;

    if !entity.bones.is_empty() && options.include_bones {
        writeln!(out, "      bones: {}", entity.bones.len())?;
        for (index, bone) in entity.bones.iter().enumerate() {
            dump_bone(bone, index, out, options)?;
        }
    }
    Ok(())
}

fn dump_mesh_data<W: Write>(mesh: &MeshData, out: &mut W, options: &DumpOptions) -> Result<()> {
    writeln!(
        out,
        "      vertices: {} indices: {} segments: {}",
        mesh.num_vertices,
        mesh.indices.len(),
        mesh.segments.len()
    )?;

    if options.include_transforms {
        writeln!(
            out,
            "      bounds: center {} radius {} min {} max {}",
            format_vec3(mesh.bound_center),
            mesh.bound_radius,
            format_vec3(mesh.bound_min),
            format_vec3(mesh.bound_max)
        )?;
    }

    for (channel, array) in mesh.present_channels() {
        dump_vertex_array(channel, array, out)?;
    }

    for (index, segment) in mesh.segments.iter().enumerate() {
        dump_segment(segment, index, out)?;
    }
    Ok(())
}

fn dump_vertex_array<W: Write>(channel: VertexChannel, array: &VertexArray, out: &mut W) -> Result<()> {
    let type_name = array.data_type().map_or("unknown", DataType::name);
    writeln!(out, "        {:<11} ({}x {})", channel.name(), array.dim, type_name)?;
    Ok(())
}

fn dump_segment<W: Write>(segment: &MeshSegment, index: usize, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "        segment.{index}: '{}' {} tris",
        segment.material, segment.count
    )?;
    Ok(())
}

fn dump_bone<W: Write>(bone: &Bone, index: usize, out: &mut W, options: &DumpOptions) -> Result<()> {
    write!(out, "        bone.{index} -> node.{}", bone.node_index)?;
    if options.include_transforms {
        write!(out, "  inv rest: {}", format_matrix(&bone.inv_rest_matrix))?;
    }
    writeln!(out)?;
    Ok(())
}

fn format_vec3(v: Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

fn format_matrix(m: &Mat4x3) -> String {
    let [x, y, z, t] = m.rows();
    format!(
        "x {} y {} z {} t {}",
        format_vec3(x),
        format_vec3(y),
        format_vec3(z),
        format_vec3(t)
    )
}
