//! Vertex attribute arrays
//!
//! A mesh always stores 15 arrays, one per [`VertexChannel`], in channel
//! order. Unused channels keep their header but carry no data.

use std::fmt;
use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};

use super::primitives::BinaryReader;
use crate::error::{Error, Result};

/// Component type of a vertex array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DataType {
    Byte = 0,
    Int16 = 1,
    Int32 = 2,
    Float32 = 3,
}

impl DataType {
    pub fn from_raw(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Byte),
            1 => Some(Self::Int16),
            2 => Some(Self::Int32),
            3 => Some(Self::Float32),
            _ => None,
        }
    }

    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Float32 => "float32",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The purpose of a vertex array. The discriminant is the array's position in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexChannel {
    Position = 0,
    Normal = 1,
    Tangent = 2,
    Bitangent = 3,
    Color = 4,
    TexCoord0 = 5,
    TexCoord1 = 6,
    TexCoord2 = 7,
    TexCoord3 = 8,
    TexCoord4 = 9,
    TexCoord5 = 10,
    TexCoord6 = 11,
    TexCoord7 = 12,
    BoneIndex = 13,
    BoneWeight = 14,
}

impl VertexChannel {
    pub const COUNT: usize = 15;

    /// All channels in file order.
    pub const ALL: [VertexChannel; Self::COUNT] = [
        Self::Position,
        Self::Normal,
        Self::Tangent,
        Self::Bitangent,
        Self::Color,
        Self::TexCoord0,
        Self::TexCoord1,
        Self::TexCoord2,
        Self::TexCoord3,
        Self::TexCoord4,
        Self::TexCoord5,
        Self::TexCoord6,
        Self::TexCoord7,
        Self::BoneIndex,
        Self::BoneWeight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The texture coordinate channel `n` (0-7).
    pub fn tex_coord(n: usize) -> Option<Self> {
        if n < 8 {
            Some(Self::ALL[Self::TexCoord0.index() + n])
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Normal => "normal",
            Self::Tangent => "tangent",
            Self::Bitangent => "bitangent",
            Self::Color => "color",
            Self::TexCoord0 => "uv0",
            Self::TexCoord1 => "uv1",
            Self::TexCoord2 => "uv2",
            Self::TexCoord3 => "uv3",
            Self::TexCoord4 => "uv4",
            Self::TexCoord5 => "uv5",
            Self::TexCoord6 => "uv6",
            Self::TexCoord7 => "uv7",
            Self::BoneIndex => "bone",
            Self::BoneWeight => "bone-weight",
        }
    }
}

impl fmt::Display for VertexChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One strided attribute buffer.
///
/// The header fields are kept exactly as read; presence is always derived
/// from them through [`VertexArray::is_present`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexArray {
    /// 0 = byte, 1 = int16, 2 = int32, 3 = float32
    pub data_type: i32,
    /// Components per vertex (2-4)
    pub dim: i32,
    /// Byte offset from one vertex to the next
    pub stride: i32,
    /// `num_vertices * stride` bytes when present, empty otherwise
    pub raw_data: Vec<u8>,
}

impl VertexArray {
    /// Whether the header describes a used array.
    pub fn is_present(&self) -> bool {
        Self::header_is_present(self.data_type, self.dim, self.stride)
    }

    fn header_is_present(data_type: i32, dim: i32, stride: i32) -> bool {
        DataType::from_raw(data_type).is_some() && (2..=4).contains(&dim) && stride > 0
    }

    /// The component type, if the array is present.
    pub fn data_type(&self) -> Option<DataType> {
        if self.is_present() {
            DataType::from_raw(self.data_type)
        } else {
            None
        }
    }

    pub(crate) fn read<R: Read>(reader: &mut BinaryReader<R>, num_vertices: i32) -> Result<Self> {
        let data_type = reader.read_i32("vertex array data type")?;
        let dim = reader.read_i32("vertex array dim")?;
        let stride = reader.read_i32("vertex array stride")?;

        let raw_data = if Self::header_is_present(data_type, dim, stride) {
            let size = usize::try_from(num_vertices)
                .ok()
                .zip(usize::try_from(stride).ok())
                .and_then(|(n, s)| n.checked_mul(s))
                .ok_or(Error::VertexDataOverflow { num_vertices, stride })?;
            reader.read_bytes(size, "vertex array data")?
        } else {
            Vec::new()
        };

        Ok(Self { data_type, dim, stride, raw_data })
    }

    /// Raw bytes of vertex `index`, from its start to the end of the stride.
    pub fn vertex_bytes(&self, index: usize) -> Option<&[u8]> {
        if !self.is_present() {
            return None;
        }
        let stride = self.stride as usize;
        let start = index.checked_mul(stride)?;
        self.raw_data.get(start..start.checked_add(stride)?)
    }

    /// Number of whole vertices held in the buffer.
    pub fn vertex_count(&self) -> usize {
        if self.is_present() {
            self.raw_data.len() / self.stride as usize
        } else {
            0
        }
    }

    /// Whether each vertex can be read as `dim` float32 components.
    pub fn is_float_layout(&self) -> bool {
        self.data_type() == Some(DataType::Float32) && self.stride as usize >= self.dim as usize * 4
    }

    /// Iterate the float components of every vertex.
    ///
    /// Returns `None` unless [`is_float_layout`](Self::is_float_layout) holds.
    pub fn f32_vertices(&self) -> Option<impl Iterator<Item = Vec<f32>> + '_> {
        if !self.is_float_layout() {
            return None;
        }
        let dim = self.dim as usize;
        Some(
            self.raw_data
                .chunks_exact(self.stride as usize)
                .map(move |vertex| vertex[..dim * 4].chunks_exact(4).map(LittleEndian::read_f32).collect()),
        )
    }
}
