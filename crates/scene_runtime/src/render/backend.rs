//! Backend abstraction for the rendering system
//!
//! This module defines the trait a device backend implements so the
//! [`PrimitiveRenderer`](super::PrimitiveRenderer) can upload geometry and
//! issue indexed triangle-list draws without knowing which graphics API sits
//! underneath. [`RecordingBackend`] is a headless implementation that records
//! every call, used by tests and by hosts without a window.

use std::any::Any;

use super::{Color, RenderResult, Vertex};
use crate::config::ShadingConfig;
use crate::foundation::math::Mat4;

/// Result type for backend operations
pub type BackendResult<T> = RenderResult<T>;

/// Transform state consumed by both draw paths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderTransforms {
    /// Projection matrix
    pub projection: Mat4,
    /// View matrix
    pub view: Mat4,
    /// World matrix
    pub world: Mat4,
}

impl Default for ShaderTransforms {
    fn default() -> Self {
        Self {
            projection: Mat4::identity(),
            view: Mat4::identity(),
            world: Mat4::identity(),
        }
    }
}

impl ShaderTransforms {
    /// Copy of these transforms with a different world matrix
    #[must_use]
    pub fn with_world(self, world: Mat4) -> Self {
        Self { world, ..self }
    }
}

/// Main rendering backend trait
///
/// The vertex layout is fixed ([`Vertex`]) and indices are 16-bit. A draw call
/// always reads from the geometry most recently uploaded.
pub trait RenderBackend {
    /// Configure the flat lit shading mode
    fn configure_shading(&mut self, shading: &ShadingConfig) -> BackendResult<()>;

    /// Set projection, view and world matrices
    fn set_transforms(&mut self, transforms: &ShaderTransforms);

    /// Set the tint multiplied into vertex colors
    fn set_tint(&mut self, tint: Color);

    /// Upload vertex and index data into the device buffers
    fn upload(&mut self, vertices: &[Vertex], indices: &[u16]) -> BackendResult<()>;

    /// Issue one indexed triangle-list draw over the uploaded buffers
    fn draw_indexed(&mut self, first_index: u32, primitive_count: u32) -> BackendResult<()>;

    /// Downcast to concrete backend type
    fn as_any(&self) -> &dyn Any;

    /// Downcast to mutable concrete backend type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A single backend call captured by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// Shading mode was configured
    ConfigureShading {
        /// Whether lighting was enabled
        lighting_enabled: bool,
    },
    /// Transform state changed
    SetTransforms(ShaderTransforms),
    /// Tint changed
    SetTint(Color),
    /// Geometry was uploaded
    Upload {
        /// Uploaded vertices
        vertices: Vec<Vertex>,
        /// Uploaded indices
        indices: Vec<u16>,
    },
    /// A draw call was issued
    DrawIndexed {
        /// First index read by the draw
        first_index: u32,
        /// Number of triangles drawn
        primitive_count: u32,
    },
}

/// Headless backend that records every call in order
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<BackendCommand>,
    bytes_uploaded: usize,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, oldest first
    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    /// Only the draw calls, as `(first_index, primitive_count)`
    pub fn draw_calls(&self) -> Vec<(u32, u32)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                BackendCommand::DrawIndexed { first_index, primitive_count } => {
                    Some((*first_index, *primitive_count))
                }
                _ => None,
            })
            .collect()
    }

    /// Only the uploads, as `(vertices, indices)`
    pub fn uploads(&self) -> Vec<(&[Vertex], &[u16])> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                BackendCommand::Upload { vertices, indices } => Some((vertices.as_slice(), indices.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// Total bytes uploaded since creation
    pub fn bytes_uploaded(&self) -> usize {
        self.bytes_uploaded
    }

    /// Forget all recorded calls
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn configure_shading(&mut self, shading: &ShadingConfig) -> BackendResult<()> {
        self.commands.push(BackendCommand::ConfigureShading {
            lighting_enabled: shading.lighting_enabled,
        });
        Ok(())
    }

    fn set_transforms(&mut self, transforms: &ShaderTransforms) {
        self.commands.push(BackendCommand::SetTransforms(*transforms));
    }

    fn set_tint(&mut self, tint: Color) {
        self.commands.push(BackendCommand::SetTint(tint));
    }

    fn upload(&mut self, vertices: &[Vertex], indices: &[u16]) -> BackendResult<()> {
        self.bytes_uploaded += Vertex::slice_as_bytes(vertices).len();
        self.bytes_uploaded += bytemuck::cast_slice::<u16, u8>(indices).len();
        self.commands.push(BackendCommand::Upload {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        });
        Ok(())
    }

    fn draw_indexed(&mut self, first_index: u32, primitive_count: u32) -> BackendResult<()> {
        self.commands.push(BackendCommand::DrawIndexed {
            first_index,
            primitive_count,
        });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
