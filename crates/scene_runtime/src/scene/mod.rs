//! # Scene Runtime
//!
//! Entities, their components, and the registry that owns them.
//!
//! ## Architecture
//!
//! ```text
//! SceneRegistry ── owns ──> Entity ── owns ──> Transform
//!                                  └─ owns ──> Box<dyn Component> ...
//! ```
//!
//! - **Component**: a unit of behavior or render contribution, classified once
//!   at attach time by its [`Capabilities`]
//! - **Entity**: exactly one [`Transform`] plus ordered components, with
//!   separate dispatch lists for updatable and drawable components
//! - **SceneRegistry**: the authoritative entity collection; structural changes
//!   requested while it iterates are buffered and reconciled between passes
//!
//! Components never hold references to their entity. They receive the owning
//! [`EntityId`] through the update and draw contexts.

pub mod component;
pub mod components;
pub mod entity;
pub mod registry;

pub use component::{Capabilities, Component, DrawContext, SceneCommand, UpdateContext};
pub use components::{Lifetime, MeshRenderer, RenderPath, SimpleMotion, Transform};
pub use entity::{Entity, EntityId};
pub use registry::{SceneRegistry, SceneStats};

use thiserror::Error;

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised by the scene runtime
#[derive(Debug, Error)]
pub enum SceneError {
    /// A caller handed the scene something it can never accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An entity id that was never issued or has been purged
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(EntityId),
}
