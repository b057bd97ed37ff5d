//! Built-in components
//!
//! - [`Transform`]: position, Euler rotation and scale (one per entity)
//! - [`MeshRenderer`]: draws a cached mesh with a tint
//! - [`SimpleMotion`]: constant linear and angular velocity
//! - [`Lifetime`]: destroys its entity after a duration

pub mod lifetime;
pub mod mesh_renderer;
pub mod motion;
pub mod transform;

pub use lifetime::Lifetime;
pub use mesh_renderer::{MeshRenderer, RenderPath};
pub use motion::SimpleMotion;
pub use transform::Transform;
