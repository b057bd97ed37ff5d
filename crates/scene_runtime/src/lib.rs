//! # Scene Runtime
//!
//! A minimal real-time 3D scene runtime: a registry of entities built from
//! components, a batched primitive renderer and a free-look camera.
//!
//! ## Features
//!
//! - **Scene Registry**: deferred-mutation entity lifecycle, safe to spawn and
//!   destroy from inside an update pass
//! - **Capability Dispatch**: components are classified as updatable and/or
//!   drawable once, when they are attached
//! - **Batched Rendering**: vertex/index accumulation with automatic
//!   flush-on-overflow and an immediate path for large meshes
//! - **Free-Look Camera**: yaw/pitch driven view with pitch clamping
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_runtime::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::default();
//!     let mut renderer = PrimitiveRenderer::new(Box::new(RecordingBackend::new()), config.renderer.clone())?;
//!     let mut camera = FreeLookCamera::new(Vec3::new(5.0, 3.0, 15.0), 1280, 720, config.camera.clone())?;
//!     let mut scene = SceneRegistry::new();
//!
//!     let mesh = renderer.meshes_mut().insert(build_pyramid(2.0, 3.0, Color::WHITE));
//!     let mut pyramid = Entity::at(Vec3::zeros());
//!     pyramid.add_component(Box::new(MeshRenderer::new(mesh, Color::WHITE)))?;
//!     pyramid.add_component(Box::new(SimpleMotion::new(Vec3::zeros(), Vec3::new(0.0, 0.5, 0.0))))?;
//!     scene.add(pyramid);
//!
//!     let input = FrameInput::default();
//!     camera.update(1.0 / 60.0, &input);
//!     scene.update(1.0 / 60.0);
//!
//!     renderer.set_matrices(camera.projection_matrix(), camera.view_matrix(), None)?;
//!     renderer.begin();
//!     scene.draw(&mut renderer)?;
//!     renderer.end()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod input;
pub mod scene;
pub mod render;

#[cfg(test)]
mod tests;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        config::{BatchConfig, CameraBindings, CameraConfig, Config, ConfigError, RuntimeConfig, ShadingConfig},
        foundation::math::{Mat4, Vec2, Vec3},
        input::{FrameInput, InputState, Key},
        render::{
            build_pyramid, BackendCommand, Color, FreeLookCamera, GroundGrid, Mesh, MeshHandle,
            PrimitiveRenderer, RecordingBackend, RenderBackend, RenderError, RenderResult, Vertex,
        },
        scene::{
            Capabilities, Component, DrawContext, Entity, EntityId, Lifetime, MeshRenderer,
            RenderPath, SceneError, SceneRegistry, SceneResult, SimpleMotion, Transform,
            UpdateContext,
        },
    };
}
