//! Component trait and dispatch contexts

use std::any::Any;

use bitflags::bitflags;

use super::{Entity, EntityId, Transform};
use crate::render::{PrimitiveRenderer, RenderResult};

bitflags! {
    /// Optional capabilities a component exposes
    ///
    /// Read once when the component is attached; an entity only dispatches
    /// `update` to updatable components and `draw` to drawable ones.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Receives a per-frame tick
        const UPDATABLE = 1 << 0;
        /// Contributes geometry during the draw pass
        const DRAWABLE  = 1 << 1;
    }
}

/// A unit of per-entity behavior or render contribution
pub trait Component: Any {
    /// Which dispatch lists this component joins
    fn capabilities(&self) -> Capabilities;

    /// Called when the owning entity receives its id
    fn on_attach(&mut self, _owner: EntityId) {}

    /// Per-frame tick; only called for [`Capabilities::UPDATABLE`] components
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Render contribution; only called for [`Capabilities::DRAWABLE`] components
    fn draw(&mut self, _ctx: &mut DrawContext<'_>, _renderer: &mut PrimitiveRenderer) -> RenderResult<()> {
        Ok(())
    }

    /// Downcast support for [`Entity::get_component`]
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support for [`Entity::get_component_mut`]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Structural change requested from inside an update pass
pub enum SceneCommand {
    /// Register a new entity; it becomes active at the next update
    Spawn(Entity),
    /// Flag an entity destroyed
    Destroy(EntityId),
}

/// What an updatable component sees of its entity and the scene
pub struct UpdateContext<'a> {
    entity: EntityId,
    delta_time: f32,
    transform: &'a mut Transform,
    commands: &'a mut Vec<SceneCommand>,
}

impl<'a> UpdateContext<'a> {
    pub(crate) fn new(
        entity: EntityId,
        delta_time: f32,
        transform: &'a mut Transform,
        commands: &'a mut Vec<SceneCommand>,
    ) -> Self {
        Self {
            entity,
            delta_time,
            transform,
            commands,
        }
    }

    /// Id of the entity being updated
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Seconds elapsed since the previous frame
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// The entity's transform
    pub fn transform(&self) -> &Transform {
        self.transform
    }

    /// The entity's transform, mutably
    pub fn transform_mut(&mut self) -> &mut Transform {
        self.transform
    }

    /// Queue a new entity; it is invisible until the next update
    pub fn spawn(&mut self, entity: Entity) {
        self.commands.push(SceneCommand::Spawn(entity));
    }

    /// Flag another entity destroyed once this entity's update completes
    pub fn destroy(&mut self, entity: EntityId) {
        self.commands.push(SceneCommand::Destroy(entity));
    }

    /// Flag the entity being updated destroyed
    pub fn destroy_self(&mut self) {
        self.commands.push(SceneCommand::Destroy(self.entity));
    }
}

/// What a drawable component sees of its entity
pub struct DrawContext<'a> {
    entity: EntityId,
    transform: &'a mut Transform,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(entity: EntityId, transform: &'a mut Transform) -> Self {
        Self { entity, transform }
    }

    /// Id of the entity being drawn
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// The entity's transform
    pub fn transform(&self) -> &Transform {
        self.transform
    }

    /// The entity's transform, mutably (to refresh its world matrix)
    pub fn transform_mut(&mut self) -> &mut Transform {
        self.transform
    }
}
