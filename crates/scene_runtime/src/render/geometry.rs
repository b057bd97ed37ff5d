//! Procedural mesh builders
//!
//! Pure functions producing validated [`Mesh`] data from a handful of shape
//! parameters. Faces that should shade flat get their own copies of shared
//! corners so each copy can carry the face normal.

use super::{Color, Mesh, Vertex};
use crate::foundation::math::utils::{face_normal, world_down};
use crate::foundation::math::Vec3;

/// Base triangles followed by the four side faces, each side face addressing
/// its own three vertices
const PYRAMID_INDICES: [u16; 18] = [0, 2, 1, 0, 3, 2, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Build a square-based pyramid standing on the XZ plane
///
/// The base is centred on the origin with side `base_size`; the apex sits at
/// `(0, height, 0)`. The result has 4 base vertices sharing a downward normal
/// and 12 side vertices (three per face) carrying that face's normal, computed
/// from the face's corners in the order they are listed.
pub fn build_pyramid(base_size: f32, height: f32, color: Color) -> Mesh {
    let half = base_size * 0.5;
    let corners = [
        Vec3::new(-half, 0.0, -half), // back-left
        Vec3::new(half, 0.0, -half),  // back-right
        Vec3::new(half, 0.0, half),   // front-right
        Vec3::new(-half, 0.0, half),  // front-left
    ];
    let apex = Vec3::new(0.0, height, 0.0);

    let mut vertices = Vec::with_capacity(16);
    vertices.extend(corners.iter().map(|&corner| Vertex::new(corner, world_down(), color)));

    for (i, &a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        let normal = face_normal(a, b, apex);
        vertices.extend([a, b, apex].map(|position| Vertex::new(position, normal, color)));
    }

    Mesh::from_parts(vertices, PYRAMID_INDICES.to_vec())
}
