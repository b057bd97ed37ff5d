//! Constant-velocity motion behavior

use std::any::Any;

use crate::foundation::math::Vec3;
use crate::scene::component::{Capabilities, Component, UpdateContext};

/// Integrates constant linear and angular velocity into the transform
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleMotion {
    /// Units per second
    pub velocity: Vec3,
    /// Radians per second, per Euler axis
    pub angular_velocity: Vec3,
}

impl SimpleMotion {
    /// Create a motion behavior
    pub fn new(velocity: Vec3, angular_velocity: Vec3) -> Self {
        Self {
            velocity,
            angular_velocity,
        }
    }

    /// Spin in place
    pub fn spinning(angular_velocity: Vec3) -> Self {
        Self::new(Vec3::zeros(), angular_velocity)
    }
}

impl Component for SimpleMotion {
    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATABLE
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let dt = ctx.delta_time();
        let transform = ctx.transform_mut();
        transform.translate(self.velocity * dt);
        transform.rotate(self.angular_velocity * dt);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
