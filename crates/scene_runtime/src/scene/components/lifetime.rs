//! Lifetime Component
//!
//! Destroys its entity once a fixed duration has elapsed.

use std::any::Any;

use crate::scene::component::{Capabilities, Component, UpdateContext};

/// Flags its entity destroyed after `duration` seconds of updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// How long the entity should live (in seconds)
    pub duration: f32,
    elapsed: f32,
}

impl Lifetime {
    /// Create a lifetime; a non-positive duration never expires
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    /// Check if this entity's lifetime has expired
    pub fn is_expired(&self) -> bool {
        self.duration > 0.0 && self.elapsed >= self.duration
    }

    /// Seconds left before expiry
    pub fn remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            f32::INFINITY
        } else {
            (self.duration - self.elapsed).max(0.0)
        }
    }
}

impl Component for Lifetime {
    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATABLE
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.is_expired() {
            return;
        }
        self.elapsed += ctx.delta_time();
        if self.is_expired() {
            log::trace!("Lifetime of {:?} expired after {:.2}s", ctx.entity(), self.elapsed);
            ctx.destroy_self();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
