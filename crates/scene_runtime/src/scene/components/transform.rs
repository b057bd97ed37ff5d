//! Spatial transform component
//!
//! Position, Euler rotation and scale, with a cached world matrix that is only
//! refreshed by an explicit [`Transform::update_matrix`] call. Drawable
//! components refresh it right before they consume it.

use std::any::Any;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::scene::component::{Capabilities, Component};

/// Position, rotation (radians) and scale of an entity
///
/// `rotation.y` is yaw, `rotation.x` pitch and `rotation.z` roll. The world
/// matrix applies scale, then rotation (roll, pitch, yaw), then translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World space position
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    world: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            world: Mat4::identity(),
        }
    }
}

impl Transform {
    /// Create a transform at `position`
    ///
    /// The cached matrix starts as identity until the first refresh.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: set rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: set a uniform scale
    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::new(scale, scale, scale))
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Add `delta` to the Euler angles
    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation += delta;
    }

    /// World matrix for the current fields, without touching the cache
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * Mat4::yaw_pitch_roll(self.rotation.y, self.rotation.x, self.rotation.z)
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Recompute the cached world matrix and return it
    pub fn update_matrix(&mut self) -> &Mat4 {
        self.world = self.compute_matrix();
        &self.world
    }

    /// Cached world matrix as of the last [`update_matrix`](Self::update_matrix)
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }
}

impl Component for Transform {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_is_not_refreshed_implicitly() {
        let mut transform = Transform::new(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(*transform.world_matrix(), Mat4::identity());

        transform.update_matrix();
        transform.position.x = 5.0;
        assert_relative_eq!(transform.world_matrix()[(0, 3)], 1.0);

        transform.update_matrix();
        assert_relative_eq!(transform.world_matrix()[(0, 3)], 5.0);
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let mut transform = Transform::new(Vec3::new(0.0, 0.0, 10.0))
            .with_rotation(Vec3::new(0.0, HALF_PI, 0.0))
            .with_uniform_scale(2.0);
        let world = *transform.update_matrix();

        // +X scaled to 2, yawed onto -Z, then moved to z = 10
        let p = world.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.coords, Vec3::new(0.0, 0.0, 8.0), epsilon = 1e-5);
    }

    #[test]
    fn test_pitch_applies_before_yaw() {
        let mut transform = Transform::default().with_rotation(Vec3::new(HALF_PI, HALF_PI, 0.0));
        let world = *transform.update_matrix();

        // Pitch takes +Y to +Z, then yaw carries +Z to +X
        let v = world.transform_vector(&Vec3::y());
        assert_relative_eq!(v, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }
}
