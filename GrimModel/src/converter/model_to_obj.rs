//! Model to Wavefront OBJ conversion
//!
//! Writes positions (`v`), normals (`vn`) and the first texture coordinate
//! channel (`vt`) of every mesh node, then one `o <material>` group per
//! segment followed by its `f` records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::formats::model::{MeshData, MeshSegment, ModelFile, VertexArray, VertexChannel, read_model};

/// Options for OBJ output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjOptions {
    /// Write 1-based face indices offset by the vertices of earlier meshes,
    /// as OBJ readers expect. By default the raw per-mesh indices are written.
    pub one_based: bool,
}

/// Counts of what an export wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjStats {
    pub meshes: usize,
    pub positions: usize,
    pub normals: usize,
    pub tex_coords: usize,
    pub groups: usize,
    pub faces: usize,
}

/// Convert a .model file to an OBJ file
pub fn convert_model_to_obj<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<ObjStats> {
    convert_model_to_obj_with(source, dest, &ObjOptions::default())
}

/// Convert a .model file to an OBJ file with explicit options
pub fn convert_model_to_obj_with<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    dest: Q,
    options: &ObjOptions,
) -> Result<ObjStats> {
    let model = read_model(&source)?;
    export_obj(&model, dest, options)
}

/// Write an already decoded model to an OBJ file
pub fn export_obj<P: AsRef<Path>>(model: &ModelFile, dest: P, options: &ObjOptions) -> Result<ObjStats> {
    let dest = dest.as_ref();

    // Nothing is created for a model that cannot be written in full.
    check_exportable(model)?;

    let file = File::create(dest)?;
    let mut writer = BufWriter::new(file);

    let written = write_obj(model, &dest.to_string_lossy(), &mut writer, options)
        .and_then(|stats| writer.flush().map(|()| stats).map_err(Error::from));
    let stats = match written {
        Ok(stats) => stats,
        Err(e) => {
            drop(writer);
            if let Err(remove_err) = std::fs::remove_file(dest) {
                tracing::warn!("Failed to remove partial OBJ {}: {}", dest.display(), remove_err);
            }
            return Err(e);
        }
    };

    tracing::info!(
        "Wrote OBJ {}: {} vertices, {} faces in {} groups",
        dest.display(),
        stats.positions,
        stats.faces,
        stats.groups
    );
    Ok(stats)
}

/// Write `model` as OBJ text to `out`.
///
/// `name` goes into the leading comment line.
pub fn write_obj<W: Write>(model: &ModelFile, name: &str, out: &mut W, options: &ObjOptions) -> Result<ObjStats> {
    let mut stats = ObjStats::default();
    writeln!(out, "# {name}")?;

    for (index, _node, entity) in model.mesh_nodes() {
        let mesh = &entity.mesh_data;

        let positions = exportable(mesh, VertexChannel::Position, index)?;
        let normals = exportable(mesh, VertexChannel::Normal, index)?;
        let tex_coords = exportable(mesh, VertexChannel::TexCoord0, index)?;

        let base = if options.one_based { stats.positions as i64 + 1 } else { 0 };

        stats.positions += write_vertices(out, "v", positions)?;
        stats.normals += write_vertices(out, "vn", normals)?;
        stats.tex_coords += write_vertices(out, "vt", tex_coords)?;

        for (segment_index, segment) in mesh.segments.iter().enumerate() {
            let triangles = mesh
                .triangles(segment)
                .ok_or_else(|| segment_out_of_bounds(mesh, segment, index, segment_index))?;

            writeln!(out, "o {}", segment.material)?;
            stats.groups += 1;

            for [a, b, c] in triangles {
                writeln!(
                    out,
                    "f {} {} {}",
                    i64::from(a) + base,
                    i64::from(b) + base,
                    i64::from(c) + base
                )?;
                stats.faces += 1;
            }
        }

        stats.meshes += 1;
    }

    Ok(stats)
}

/// Check every mesh the exporter would touch without writing anything.
///
/// Fails with the same error [`write_obj`] would stop on.
pub fn check_exportable(model: &ModelFile) -> Result<()> {
    for (index, _node, entity) in model.mesh_nodes() {
        let mesh = &entity.mesh_data;
        for channel in [VertexChannel::Position, VertexChannel::Normal, VertexChannel::TexCoord0] {
            exportable(mesh, channel, index)?;
        }
        for (segment_index, segment) in mesh.segments.iter().enumerate() {
            if mesh.triangles(segment).is_none() {
                return Err(segment_out_of_bounds(mesh, segment, index, segment_index));
            }
        }
    }
    Ok(())
}

fn segment_out_of_bounds(mesh: &MeshData, segment: &MeshSegment, node: usize, segment_index: usize) -> Error {
    Error::SegmentOutOfBounds {
        node,
        segment: segment_index,
        first: usize::try_from(segment.first_index).unwrap_or(0),
        end: segment.index_range().map_or(usize::MAX, |r| r.end),
        num_indices: mesh.indices.len(),
    }
}

/// The array for `channel` if it is present and stored as float32 components.
fn exportable(mesh: &MeshData, channel: VertexChannel, node: usize) -> Result<Option<&VertexArray>> {
    let Some(array) = mesh.channel(channel) else {
        return Ok(None);
    };

    if !array.is_float_layout() {
        return Err(Error::UnsupportedExportChannel {
            node,
            channel: channel.name(),
            data_type: array.data_type().map_or("unknown", |t| t.name()),
            dim: array.dim,
            stride: array.stride,
        });
    }
    Ok(Some(array))
}

fn write_vertices<W: Write>(out: &mut W, prefix: &str, array: Option<&VertexArray>) -> Result<usize> {
    let Some(vertices) = array.and_then(|a| a.f32_vertices()) else {
        return Ok(0);
    };

    let mut count = 0;
    for vertex in vertices {
        out.write_all(prefix.as_bytes())?;
        for component in vertex {
            write!(out, " {component:.6}")?;
        }
        writeln!(out)?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::model::{
        FORMAT_VERSION, MESH_MAGIC, MODEL_MAGIC, Mat4x3, MeshEntity, Node, NodePayload, Vec3,
    };

    fn float_array(dim: i32, values: &[f32]) -> VertexArray {
        VertexArray {
            data_type: 3,
            dim,
            stride: dim * 4,
            raw_data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn mesh_node(arrays: &[(VertexChannel, VertexArray)], indices: Vec<i32>, segments: Vec<MeshSegment>) -> Node {
        let mut vertex_arrays: [VertexArray; VertexChannel::COUNT] = Default::default();
        for (channel, array) in arrays {
            vertex_arrays[channel.index()] = array.clone();
        }
        let num_vertices = arrays.first().map_or(0, |(_, a)| a.vertex_count() as i32);

        Node {
            name: "mesh".into(),
            local_to_parent: Mat4x3::IDENTITY,
            parent: -1,
            payload: NodePayload::Mesh(Box::new(MeshEntity {
                mesh_data: MeshData {
                    magic: MESH_MAGIC,
                    version: FORMAT_VERSION,
                    num_vertices,
                    vertex_arrays,
                    indices,
                    segments,
                    bound_center: Vec3::ZERO,
                    bound_radius: 0.0,
                    bound_min: Vec3::ZERO,
                    bound_max: Vec3::ZERO,
                },
                bones: Vec::new(),
                emissive_color: Vec3::ZERO,
                cast_shadow: 1,
            })),
        }
    }

    fn segment(material: &str, first_index: i32, count: i32) -> MeshSegment {
        MeshSegment { material: material.into(), primitive_type: 2, first_index, count }
    }

    fn triangle() -> Node {
        mesh_node(
            &[(VertexChannel::Position, float_array(3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]))],
            vec![0, 1, 2],
            vec![segment("m", 0, 1)],
        )
    }

    fn model(nodes: Vec<Node>) -> ModelFile {
        ModelFile { magic: MODEL_MAGIC, version: FORMAT_VERSION, nodes }
    }

    fn export(model: &ModelFile, options: &ObjOptions) -> Result<String> {
        let mut out = Vec::new();
        write_obj(model, "test.obj", &mut out, options)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_triangle() {
        let text = export(&model(vec![triangle()]), &ObjOptions::default()).unwrap();
        let expected = "# test.obj\n\
                        v 0.000000 0.000000 0.000000\n\
                        v 1.000000 0.000000 0.000000\n\
                        v 0.000000 1.000000 0.000000\n\
                        o m\n\
                        f 0 1 2\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_segment_starts_at_first_index() {
        let node = mesh_node(
            &[(VertexChannel::Position, float_array(3, &[0.0; 12]))],
            vec![0, 1, 2, 1, 2, 3],
            vec![segment("a", 0, 1), segment("b", 3, 1)],
        );
        let text = export(&model(vec![node]), &ObjOptions::default()).unwrap();
        assert!(text.ends_with("o a\nf 0 1 2\no b\nf 1 2 3\n"));
    }

    #[test]
    fn test_one_based_offsets_later_meshes() {
        let options = ObjOptions { one_based: true };
        let mut out = Vec::new();
        let stats = write_obj(&model(vec![triangle(), triangle()]), "x", &mut out, &options).unwrap();
        let text = String::from_utf8(out).unwrap();

        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, vec!["f 1 2 3", "f 4 5 6"]);
        assert_eq!(stats.positions, 6);
        assert_eq!(stats.meshes, 2);
    }

    #[test]
    fn test_normals_and_uvs() {
        let node = mesh_node(
            &[
                (VertexChannel::Position, float_array(3, &[1.0, 2.0, 3.0])),
                (VertexChannel::Normal, float_array(3, &[0.0, 0.0, 1.0])),
                (VertexChannel::TexCoord0, float_array(2, &[0.25, 0.5])),
            ],
            Vec::new(),
            Vec::new(),
        );
        let text = export(&model(vec![node]), &ObjOptions::default()).unwrap();
        assert!(text.contains("\nv 1.000000 2.000000 3.000000\n"));
        assert!(text.contains("\nvn 0.000000 0.000000 1.000000\n"));
        assert!(text.contains("\nvt 0.250000 0.500000\n"));
    }

    #[test]
    fn test_rejects_non_float_positions() {
        let positions = VertexArray { data_type: 1, dim: 3, stride: 6, raw_data: vec![0; 6] };
        let node = mesh_node(&[(VertexChannel::Position, positions)], Vec::new(), Vec::new());
        let err = export(&model(vec![node]), &ObjOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedExportChannel { channel: "position", data_type: "int16", .. }
        ));
    }

    #[test]
    fn test_segment_past_index_buffer() {
        let node = mesh_node(
            &[(VertexChannel::Position, float_array(3, &[0.0; 9]))],
            vec![0, 1, 2],
            vec![segment("m", 0, 2)],
        );
        let err = export(&model(vec![node]), &ObjOptions::default()).unwrap_err();
        assert!(matches!(err, Error::SegmentOutOfBounds { end: 6, num_indices: 3, .. }));
    }

    #[test]
    fn test_empty_nodes_are_skipped() {
        let empty = Node {
            name: "root".into(),
            local_to_parent: Mat4x3::IDENTITY,
            parent: -1,
            payload: NodePayload::Empty,
        };
        let text = export(&model(vec![empty]), &ObjOptions::default()).unwrap();
        assert_eq!(text, "# test.obj\n");
    }

    #[test]
    fn test_failed_export_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("broken.obj");
        let int_positions = VertexArray { data_type: 1, dim: 3, stride: 6, raw_data: vec![0; 18] };
        let bad = mesh_node(&[(VertexChannel::Position, int_positions)], vec![0, 1, 2], vec![segment("m", 0, 1)]);

        let err = export_obj(&model(vec![triangle(), bad]), &dest, &ObjOptions::default()).unwrap_err();

        assert!(matches!(err, Error::UnsupportedExportChannel { node: 1, .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_check_exportable_finds_bad_segment() {
        let overrun = mesh_node(
            &[(VertexChannel::Position, float_array(3, &[0.0; 9]))],
            vec![0, 1, 2],
            vec![segment("m", 0, 1), segment("n", 3, 1)],
        );
        let err = check_exportable(&model(vec![triangle(), overrun])).unwrap_err();
        assert!(matches!(err, Error::SegmentOutOfBounds { node: 1, segment: 1, first: 3, end: 6, .. }));
        assert!(check_exportable(&model(vec![triangle()])).is_ok());
    }
}
