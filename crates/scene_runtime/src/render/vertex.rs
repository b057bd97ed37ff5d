//! Vertex layout shared by the batched and immediate draw paths
//!
//! The layout is position (3 x f32), normal (3 x f32), color (4 x u8), packed
//! with `#[repr(C)]` so a slice of vertices can be handed to the device as raw
//! bytes without conversion.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Mat4, Vec3};

/// 8-bit RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque red
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Opaque cornflower blue
    pub const CORNFLOWER_BLUE: Self = Self::rgb(100, 149, 237);

    /// Create a color from all four channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Channel-wise multiply, treating 255 as 1.0
    ///
    /// Modulating by white is the identity.
    #[must_use]
    pub fn modulate(self, tint: Self) -> Self {
        let mul = |a: u8, b: u8| ((u16::from(a) * u16::from(b) + 127) / 255) as u8;
        Self::rgba(
            mul(self.r, tint.r),
            mul(self.g, tint.g),
            mul(self.b, tint.b),
            mul(self.a, tint.a),
        )
    }

    /// Channels as normalized floats
    pub fn to_array(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

/// A single vertex: position, normal and color
///
/// Vertices are immutable once built; transforming one produces a new vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: Color,
}

impl Vertex {
    /// Size of one vertex in bytes as uploaded to the device
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new vertex
    pub fn new(position: Vec3, normal: Vec3, color: Color) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            color,
        }
    }

    /// Position in model or world space
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Surface normal
    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal)
    }

    /// Vertex color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Apply a world matrix and a tint
    ///
    /// Positions go through the full matrix; normals go through the inverse
    /// transpose of its upper 3x3 block and are renormalized.
    #[must_use]
    pub fn transformed(&self, world: &Mat4, tint: Color) -> Self {
        let normal_matrix = world
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map_or_else(|| world.fixed_view::<3, 3>(0, 0).into_owned(), |inv| inv.transpose());
        let position = world.transform_point(&self.position().into()).coords;
        let normal = (normal_matrix * self.normal())
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| self.normal());

        Self::new(position, normal, self.color.modulate(tint))
    }

    /// View a vertex slice as raw bytes for upload
    pub fn slice_as_bytes(vertices: &[Self]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}
