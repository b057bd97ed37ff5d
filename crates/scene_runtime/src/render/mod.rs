//! # Rendering
//!
//! Everything between the scene and the GPU-facing backend:
//!
//! - **Vertex / Color**: the fixed vertex layout shared by every draw path
//! - **Mesh / MeshCache**: validated triangle-list geometry and the arena that owns it
//! - **RenderBackend**: the seam to the device (upload, indexed draw, transform state)
//! - **PrimitiveRenderer**: batched accumulation with flush-on-overflow plus an immediate path
//! - **FreeLookCamera**: yaw/pitch driven view and projection matrices
//! - **Geometry**: pure mesh builders
//! - **GroundGrid**: a batched reference grid for navigation

pub mod backend;
pub mod batch_renderer;
pub mod camera;
pub mod geometry;
pub mod ground_grid;
pub mod mesh;
pub mod vertex;

pub use backend::{BackendCommand, BackendResult, RecordingBackend, RenderBackend, ShaderTransforms};
pub use batch_renderer::{BatchStats, PrimitiveRenderer, RenderBatch};
pub use camera::FreeLookCamera;
pub use geometry::build_pyramid;
pub use ground_grid::GroundGrid;
pub use mesh::{Mesh, MeshCache, MeshHandle};
pub use vertex::{Color, Vertex};

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised by the rendering layer
///
/// Batch capacity exhaustion is not an error; it is resolved by flushing.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A caller handed the renderer something it can never accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A mesh handle does not resolve in the mesh cache
    #[error("Unknown mesh handle: {0:?}")]
    MissingMesh(MeshHandle),

    /// The device rejected an upload or draw
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<ConfigError> for RenderError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
