//! Mesh rendering component
//!
//! Draws a mesh owned by the renderer's [`MeshCache`](crate::render::MeshCache)
//! at its entity's transform. The component only keeps a [`MeshHandle`], so
//! removing the mesh from the cache never leaves a dangling reference.

use std::any::Any;

use crate::render::{Color, MeshHandle, PrimitiveRenderer, RenderResult};
use crate::scene::component::{Capabilities, Component, DrawContext};

/// How a [`MeshRenderer`] submits its mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPath {
    /// Dedicated upload and draw under the entity's world matrix
    #[default]
    Immediate,
    /// World matrix baked into the vertices and appended to the shared batch
    Batched,
}

/// Draws a cached mesh with a tint
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderer {
    /// Mesh to draw
    pub mesh: MeshHandle,
    /// Tint multiplied into the mesh colors
    pub color: Color,
    /// Submission path
    pub path: RenderPath,
    missing_reported: bool,
}

impl MeshRenderer {
    /// Draw `mesh` through the immediate path
    pub fn new(mesh: MeshHandle, color: Color) -> Self {
        Self {
            mesh,
            color,
            path: RenderPath::Immediate,
            missing_reported: false,
        }
    }

    /// Builder pattern: choose the submission path
    pub fn with_path(mut self, path: RenderPath) -> Self {
        self.path = path;
        self
    }
}

impl Component for MeshRenderer {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DRAWABLE
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>, renderer: &mut PrimitiveRenderer) -> RenderResult<()> {
        if !renderer.meshes().contains(self.mesh) {
            if !self.missing_reported {
                log::warn!("{:?} references a mesh that is no longer cached", ctx.entity());
                self.missing_reported = true;
            }
            return Ok(());
        }

        let world = *ctx.transform_mut().update_matrix();
        match self.path {
            RenderPath::Immediate => renderer.draw_mesh_handle(self.mesh, &world, self.color),
            RenderPath::Batched => renderer.add_mesh_handle_transformed(self.mesh, &world, self.color),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
