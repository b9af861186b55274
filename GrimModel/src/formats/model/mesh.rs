//! Mesh blocks: vertex arrays, the shared index buffer and material segments

use std::io::Read;
use std::ops::Range;

use super::geometry::Vec3;
use super::primitives::{BinaryReader, FourCC, RawString};
use super::vertex_array::{VertexArray, VertexChannel};
use super::{FORMAT_VERSION, MESH_MAGIC, PRIMITIVE_TRIANGLE_LIST};
use crate::error::{Error, Result};

/// A run of triangles drawn with one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshSegment {
    /// Name of the material defined in the game's scripts
    pub material: RawString,
    /// Always 2 (triangle list)
    pub primitive_type: i32,
    /// Starting location in the index list
    pub first_index: i32,
    /// Number of triangles
    pub count: i32,
}

impl MeshSegment {
    pub(crate) fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let material = reader.read_string("segment material")?;
        let primitive_type = reader.read_i32("segment primitive type")?;
        let first_index = reader.read_i32("segment first index")?;
        let count = reader.read_i32("segment count")?;

        if primitive_type != PRIMITIVE_TRIANGLE_LIST {
            return Err(Error::InvalidPrimitiveType {
                material: material.to_string_lossy(),
                primitive_type,
            });
        }
        if first_index < 0 || count <= 0 {
            return Err(Error::InvalidSegmentRange {
                material: material.to_string_lossy(),
                first_index,
                count,
            });
        }

        Ok(Self { material, primitive_type, first_index, count })
    }

    /// Range of the index buffer covered by this segment's triangles.
    ///
    /// `None` if the fields are negative or the end does not fit in `usize`.
    pub fn index_range(&self) -> Option<Range<usize>> {
        let first = usize::try_from(self.first_index).ok()?;
        let len = usize::try_from(self.count).ok()?.checked_mul(3)?;
        Some(first..first.checked_add(len)?)
    }
}

/// Geometry of one mesh entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// "MESH"
    pub magic: FourCC,
    /// Must be 2
    pub version: i32,
    pub num_vertices: i32,
    /// One array per [`VertexChannel`], in channel order
    pub vertex_arrays: [VertexArray; VertexChannel::COUNT],
    pub indices: Vec<i32>,
    pub segments: Vec<MeshSegment>,
    /// Center of the bounding sphere in model space
    pub bound_center: Vec3,
    /// Radius of the bounding sphere in model space
    pub bound_radius: f32,
    /// Minimum extents of the bounding box in model space
    pub bound_min: Vec3,
    /// Maximum extents of the bounding box in model space
    pub bound_max: Vec3,
}

impl MeshData {
    pub(crate) fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let magic = reader.read_fourcc("mesh magic")?;
        if magic != MESH_MAGIC {
            return Err(Error::InvalidMeshMagic(magic));
        }

        let version = reader.read_i32("mesh version")?;
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedMeshVersion { version });
        }

        let num_vertices = reader.read_i32("mesh vertex count")?;

        let mut vertex_arrays: [VertexArray; VertexChannel::COUNT] = Default::default();
        for (channel, array) in VertexChannel::ALL.iter().zip(vertex_arrays.iter_mut()) {
            *array = VertexArray::read(reader, num_vertices)?;
            if array.is_present() {
                tracing::trace!(
                    "{} array: type {} dim {} stride {}",
                    channel,
                    array.data_type,
                    array.dim,
                    array.stride
                );
            }
        }

        let num_indices = reader.read_count("index")?;
        let indices = reader.read_i32_array(num_indices, "indices")?;

        let num_segments = reader.read_count("segment")?;
        let mut segments = Vec::with_capacity(num_segments.min(1024));
        for _ in 0..num_segments {
            segments.push(MeshSegment::read(reader)?);
        }

        let bound_center = Vec3::read(reader)?;
        let bound_radius = reader.read_f32("bound radius")?;
        let bound_min = Vec3::read(reader)?;
        let bound_max = Vec3::read(reader)?;

        tracing::trace!(
            "mesh: {} vertices, {} indices, {} segments",
            num_vertices,
            indices.len(),
            segments.len()
        );

        Ok(Self {
            magic,
            version,
            num_vertices,
            vertex_arrays,
            indices,
            segments,
            bound_center,
            bound_radius,
            bound_min,
            bound_max,
        })
    }

    pub fn array(&self, channel: VertexChannel) -> &VertexArray {
        &self.vertex_arrays[channel.index()]
    }

    /// The array for `channel`, if present.
    pub fn channel(&self, channel: VertexChannel) -> Option<&VertexArray> {
        Some(self.array(channel)).filter(|a| a.is_present())
    }

    pub fn position(&self) -> Option<&VertexArray> {
        self.channel(VertexChannel::Position)
    }

    pub fn normal(&self) -> Option<&VertexArray> {
        self.channel(VertexChannel::Normal)
    }

    pub fn tex_coord(&self, n: usize) -> Option<&VertexArray> {
        self.channel(VertexChannel::tex_coord(n)?)
    }

    /// Present arrays paired with their channel, in file order.
    pub fn present_channels(&self) -> impl Iterator<Item = (VertexChannel, &VertexArray)> {
        VertexChannel::ALL
            .iter()
            .zip(self.vertex_arrays.iter())
            .filter(|(_, array)| array.is_present())
            .map(|(channel, array)| (*channel, array))
    }

    pub fn vertex_count(&self) -> usize {
        usize::try_from(self.num_vertices).unwrap_or(0)
    }

    /// Total triangles across all segments.
    pub fn triangle_count(&self) -> usize {
        self.segments
            .iter()
            .map(|s| usize::try_from(s.count).unwrap_or(0))
            .sum()
    }

    /// Index triples of `segment`, or `None` if its range leaves the index buffer.
    pub fn triangles(&self, segment: &MeshSegment) -> Option<impl Iterator<Item = [i32; 3]> + '_> {
        let range = segment.index_range()?;
        let slice = self.indices.get(range)?;
        Some(slice.chunks_exact(3).map(|t| [t[0], t[1], t[2]]))
    }
}
