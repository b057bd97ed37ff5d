//! Mesh representation and ownership
//!
//! A [`Mesh`] is an indexed triangle list over [`Vertex`] data. Meshes are
//! owned by a [`MeshCache`] arena; components refer to them through
//! [`MeshHandle`]s, which never keep the mesh alive on their own.

use slotmap::SlotMap;

use super::{RenderError, RenderResult, Vertex};

slotmap::new_key_type! {
    /// Non-owning handle to a mesh stored in a [`MeshCache`]
    pub struct MeshHandle;
}

/// Indexed triangle-list geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
}

impl Mesh {
    /// Create a mesh, validating its index buffer
    ///
    /// Every index must address an existing vertex and the index count must
    /// describe whole triangles.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> RenderResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(RenderError::InvalidArgument(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(bad) = indices.iter().find(|&&i| usize::from(i) >= vertices.len()) {
            return Err(RenderError::InvalidArgument(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }
        Ok(Self { vertices, indices })
    }

    /// Construct from data the caller has already proven valid
    pub(crate) fn from_parts(vertices: Vec<Vertex>, indices: Vec<u16>) -> Self {
        debug_assert!(indices.iter().all(|&i| usize::from(i) < vertices.len()));
        Self { vertices, indices }
    }

    /// Vertex data
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle-list indices
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Arena owning every mesh referenced by the scene
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: SlotMap<MeshHandle, Mesh>,
}

impl MeshCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a mesh and return its handle
    pub fn insert(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = self.meshes.insert(mesh);
        log::trace!("Mesh cached: {handle:?}");
        handle
    }

    /// Look up a mesh
    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    /// Remove a mesh; outstanding handles stop resolving
    pub fn remove(&mut self, handle: MeshHandle) -> Option<Mesh> {
        self.meshes.remove(handle)
    }

    /// Whether the handle still resolves
    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains_key(handle)
    }

    /// Number of cached meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
