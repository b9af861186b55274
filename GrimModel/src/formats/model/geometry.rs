//! Vectors and affine transforms stored in `.model` files

use std::io::Read;

use glam::{Affine3A, Mat3A, Vec3A};
use serde::Serialize;

use super::primitives::BinaryReader;
use crate::error::Result;

/// Three f32 components, kept bit-for-bit as read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub(crate) fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let x = reader.read_f32("vec3.x")?;
        let y = reader.read_f32("vec3.y")?;
        let z = reader.read_f32("vec3.z")?;
        Ok(Self { x, y, z })
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vec3A {
    fn from(v: Vec3) -> Self {
        Vec3A::new(v.x, v.y, v.z)
    }
}

impl From<Vec3A> for Vec3 {
    fn from(v: Vec3A) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// A 4x3 affine transform: three basis vectors followed by a translation.
///
/// A point `p` maps to `p.x * base_x + p.y * base_y + p.z * base_z + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Mat4x3 {
    pub base_x: Vec3,
    pub base_y: Vec3,
    pub base_z: Vec3,
    pub translation: Vec3,
}

impl Mat4x3 {
    pub const IDENTITY: Self = Self {
        base_x: Vec3::new(1.0, 0.0, 0.0),
        base_y: Vec3::new(0.0, 1.0, 0.0),
        base_z: Vec3::new(0.0, 0.0, 1.0),
        translation: Vec3::ZERO,
    };

    pub(crate) fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let base_x = Vec3::read(reader)?;
        let base_y = Vec3::read(reader)?;
        let base_z = Vec3::read(reader)?;
        let translation = Vec3::read(reader)?;
        Ok(Self { base_x, base_y, base_z, translation })
    }

    pub fn rows(&self) -> [Vec3; 4] {
        [self.base_x, self.base_y, self.base_z, self.translation]
    }

    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_cols(
            self.base_x.into(),
            self.base_y.into(),
            self.base_z.into(),
            self.translation.into(),
        )
    }

    pub fn from_affine(affine: &Affine3A) -> Self {
        let Mat3A { x_axis, y_axis, z_axis } = affine.matrix3;
        Self {
            base_x: x_axis.into(),
            base_y: y_axis.into(),
            base_z: z_axis.into(),
            translation: affine.translation.into(),
        }
    }

    /// `self` applied after `inner`.
    pub fn compose(&self, inner: &Mat4x3) -> Self {
        Self::from_affine(&(self.to_affine() * inner.to_affine()))
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.to_affine().transform_point3a(p.into()).into()
    }
}
