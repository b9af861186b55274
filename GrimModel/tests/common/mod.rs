//! Little-endian byte builder for hand-made .model buffers.

#![allow(dead_code)]

pub const IDENTITY: [f32; 12] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];

pub fn translation(x: f32, y: f32, z: f32) -> [f32; 12] {
    [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, x, y, z]
}

#[derive(Debug, Clone)]
pub struct ArraySpec {
    pub channel: usize,
    pub data_type: i32,
    pub dim: i32,
    pub stride: i32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub material: String,
    pub primitive_type: i32,
    pub first_index: i32,
    pub count: i32,
}

#[derive(Debug, Clone)]
pub struct MeshSpec {
    pub num_vertices: i32,
    pub arrays: Vec<ArraySpec>,
    pub indices: Vec<i32>,
    pub segments: Vec<SegmentSpec>,
    pub bones: Vec<(i32, [f32; 12])>,
    pub emissive: [f32; 3],
    pub cast_shadow: u8,
}

impl MeshSpec {
    pub fn new(num_vertices: i32) -> Self {
        Self {
            num_vertices,
            arrays: Vec::new(),
            indices: Vec::new(),
            segments: Vec::new(),
            bones: Vec::new(),
            emissive: [0.0; 3],
            cast_shadow: 1,
        }
    }

    /// Three float32 positions, one triangle, one segment "m".
    pub fn triangle() -> Self {
        Self::new(3)
            .floats(0, 3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .indices(&[0, 1, 2])
            .segment("m", 2, 0, 1)
    }

    pub fn array(mut self, channel: usize, data_type: i32, dim: i32, stride: i32, data: Vec<u8>) -> Self {
        self.arrays.push(ArraySpec { channel, data_type, dim, stride, data });
        self
    }

    /// A tightly packed float32 channel.
    pub fn floats(self, channel: usize, dim: i32, values: &[f32]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.array(channel, 3, dim, dim * 4, data)
    }

    pub fn indices(mut self, indices: &[i32]) -> Self {
        self.indices = indices.to_vec();
        self
    }

    pub fn segment(mut self, material: &str, primitive_type: i32, first_index: i32, count: i32) -> Self {
        self.segments.push(SegmentSpec {
            material: material.to_string(),
            primitive_type,
            first_index,
            count,
        });
        self
    }

    pub fn bone(mut self, node_index: i32, inv_rest: [f32; 12]) -> Self {
        self.bones.push((node_index, inv_rest));
        self
    }

    pub fn emissive(mut self, color: [f32; 3]) -> Self {
        self.emissive = color;
        self
    }

    pub fn cast_shadow(mut self, value: u8) -> Self {
        self.cast_shadow = value;
        self
    }
}

/// Writes a model front to back; the caller adds exactly `num_nodes` nodes.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    buf: Vec<u8>,
}

impl ModelBuilder {
    pub fn new(num_nodes: i32) -> Self {
        Self::with_header(b"MDL1", 2, num_nodes)
    }

    pub fn with_header(magic: &[u8; 4], version: i32, num_nodes: i32) -> Self {
        let mut builder = Self::default();
        builder.bytes(magic).i32(version).i32(num_nodes);
        builder
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    pub fn string(&mut self, s: &str) -> &mut Self {
        self.i32(s.len() as i32).bytes(s.as_bytes())
    }

    pub fn matrix(&mut self, m: &[f32; 12]) -> &mut Self {
        for v in m {
            self.f32(*v);
        }
        self
    }

    pub fn empty_node(&mut self, name: &str, parent: i32) -> &mut Self {
        self.string(name).matrix(&IDENTITY).i32(parent).i32(-1)
    }

    /// Node header with an arbitrary type and nothing after it.
    pub fn node_header(&mut self, name: &str, transform: &[f32; 12], parent: i32, node_type: i32) -> &mut Self {
        self.string(name).matrix(transform).i32(parent).i32(node_type)
    }

    pub fn mesh_node(&mut self, name: &str, parent: i32, mesh: &MeshSpec) -> &mut Self {
        self.mesh_node_at(name, &IDENTITY, parent, mesh)
    }

    pub fn mesh_node_at(&mut self, name: &str, transform: &[f32; 12], parent: i32, mesh: &MeshSpec) -> &mut Self {
        self.node_header(name, transform, parent, 0);
        self.mesh_data(mesh);

        self.i32(mesh.bones.len() as i32);
        for (node_index, inv_rest) in &mesh.bones {
            self.i32(*node_index).matrix(inv_rest);
        }

        let [r, g, b] = mesh.emissive;
        self.f32(r).f32(g).f32(b).u8(mesh.cast_shadow)
    }

    fn mesh_data(&mut self, mesh: &MeshSpec) -> &mut Self {
        self.bytes(b"MESH").i32(2).i32(mesh.num_vertices);

        for channel in 0..15 {
            match mesh.arrays.iter().find(|a| a.channel == channel) {
                Some(array) => {
                    self.i32(array.data_type).i32(array.dim).i32(array.stride).bytes(&array.data);
                }
                None => {
                    self.i32(0).i32(0).i32(0);
                }
            }
        }

        self.i32(mesh.indices.len() as i32);
        for index in &mesh.indices {
            self.i32(*index);
        }

        self.i32(mesh.segments.len() as i32);
        for segment in &mesh.segments {
            self.string(&segment.material)
                .i32(segment.primitive_type)
                .i32(segment.first_index)
                .i32(segment.count);
        }

        // bound center, radius, min, max
        self.f32(0.5).f32(0.5).f32(0.0).f32(0.75);
        self.f32(0.0).f32(0.0).f32(0.0);
        self.f32(1.0).f32(1.0).f32(0.0)
    }

    pub fn build(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

/// A complete single-node model holding `mesh`.
pub fn single_mesh_model(mesh: &MeshSpec) -> Vec<u8> {
    ModelBuilder::new(1).mesh_node("mesh", -1, mesh).build()
}
