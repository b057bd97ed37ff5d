//! Scene entities
//!
//! An [`Entity`] owns exactly one [`Transform`] and an ordered list of
//! components. Capability classification happens in [`Entity::add_component`];
//! dispatch walks the precomputed index lists without inspecting components.

use std::any::{Any, TypeId};

use super::component::{Capabilities, Component, DrawContext, SceneCommand, UpdateContext};
use super::{SceneError, SceneResult, Transform};
use crate::foundation::math::Vec3;
use crate::render::{PrimitiveRenderer, RenderResult};

slotmap::new_key_type! {
    /// Non-owning handle to an entity registered in a
    /// [`SceneRegistry`](super::SceneRegistry)
    pub struct EntityId;
}

/// An addressable object in the scene: a transform plus components
pub struct Entity {
    id: Option<EntityId>,
    transform: Transform,
    components: Vec<Box<dyn Component>>,
    updatable: Vec<usize>,
    drawable: Vec<usize>,
    destroyed: bool,
}

impl Default for Entity {
    fn default() -> Self {
        Self::with_transform(Transform::default())
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("position", &self.transform.position)
            .field("components", &self.components.len())
            .field("updatable", &self.updatable.len())
            .field("drawable", &self.drawable.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Entity {
    /// Create an entity at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity at `position`
    pub fn at(position: Vec3) -> Self {
        Self::with_transform(Transform::new(position))
    }

    /// Create an entity around an existing transform
    pub fn with_transform(transform: Transform) -> Self {
        Self {
            id: None,
            transform,
            components: Vec::new(),
            updatable: Vec::new(),
            drawable: Vec::new(),
            destroyed: false,
        }
    }

    /// Attach a component and classify it by its capabilities
    ///
    /// Every entity already owns its transform, so attaching another
    /// [`Transform`] fails with [`SceneError::InvalidArgument`].
    pub fn add_component(&mut self, mut component: Box<dyn Component>) -> SceneResult<()> {
        if component.as_any().is::<Transform>() {
            return Err(SceneError::InvalidArgument(
                "entity already owns a transform".to_string(),
            ));
        }

        let index = self.components.len();
        let capabilities = component.capabilities();
        if capabilities.contains(Capabilities::UPDATABLE) {
            self.updatable.push(index);
        }
        if capabilities.contains(Capabilities::DRAWABLE) {
            self.drawable.push(index);
        }
        if let Some(id) = self.id {
            component.on_attach(id);
        }

        log::trace!("Attached component {index} with {capabilities:?}");
        self.components.push(component);
        Ok(())
    }

    /// Builder pattern: attach a component
    pub fn with_component(mut self, component: Box<dyn Component>) -> SceneResult<Self> {
        self.add_component(component)?;
        Ok(self)
    }

    /// First attached component of type `T`, or `None`
    ///
    /// The transform counts as the first component.
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return (&self.transform as &dyn Any).downcast_ref::<T>();
        }
        self.components
            .iter()
            .find_map(|component| component.as_any().downcast_ref::<T>())
    }

    /// First attached component of type `T`, mutably
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return (&mut self.transform as &mut dyn Any).downcast_mut::<T>();
        }
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<T>())
    }

    /// Whether a component of type `T` is attached
    pub fn has_component<T: Component>(&self) -> bool {
        self.get_component::<T>().is_some()
    }

    /// The entity's transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The entity's transform, mutably
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Registry id, once registered
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Number of components including the transform
    pub fn component_count(&self) -> usize {
        self.components.len() + 1
    }

    /// Number of components receiving `update`
    pub fn updatable_count(&self) -> usize {
        self.updatable.len()
    }

    /// Number of components receiving `draw`
    pub fn drawable_count(&self) -> usize {
        self.drawable.len()
    }

    /// Whether the entity has been flagged for removal
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Flag the entity for removal at the next sweep; cannot be undone
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub(crate) fn bind(&mut self, id: EntityId) {
        self.id = Some(id);
        for component in &mut self.components {
            component.on_attach(id);
        }
    }

    pub(crate) fn update(&mut self, id: EntityId, delta_time: f32, commands: &mut Vec<SceneCommand>) {
        for &index in &self.updatable {
            let mut ctx = UpdateContext::new(id, delta_time, &mut self.transform, commands);
            self.components[index].update(&mut ctx);
        }
    }

    pub(crate) fn draw(&mut self, id: EntityId, renderer: &mut PrimitiveRenderer) -> RenderResult<()> {
        for &index in &self.drawable {
            let mut ctx = DrawContext::new(id, &mut self.transform);
            self.components[index].draw(&mut ctx, renderer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Color, MeshHandle};
    use crate::scene::{Lifetime, MeshRenderer, SimpleMotion};

    #[test]
    fn test_capabilities_classified_at_attach() {
        let mut entity = Entity::new();
        entity
            .add_component(Box::new(SimpleMotion::new(Vec3::x(), Vec3::zeros())))
            .unwrap();
        entity
            .add_component(Box::new(MeshRenderer::new(MeshHandle::default(), Color::WHITE)))
            .unwrap();
        entity.add_component(Box::new(Lifetime::new(3.0))).unwrap();

        assert_eq!(entity.component_count(), 4);
        assert_eq!(entity.updatable_count(), 2);
        assert_eq!(entity.drawable_count(), 1);
    }

    #[test]
    fn test_second_transform_is_rejected() {
        let mut entity = Entity::new();
        let result = entity.add_component(Box::new(Transform::default()));
        assert!(matches!(result, Err(SceneError::InvalidArgument(_))));
        assert_eq!(entity.component_count(), 1);
    }

    #[test]
    fn test_get_component_absent_is_none() {
        let entity = Entity::at(Vec3::new(1.0, 2.0, 3.0));
        assert!(entity.get_component::<MeshRenderer>().is_none());
        assert!(!entity.has_component::<SimpleMotion>());
    }

    #[test]
    fn test_get_component_finds_transform_first() {
        let mut entity = Entity::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            entity.get_component::<Transform>().map(|t| t.position),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );

        entity.get_component_mut::<Transform>().unwrap().position.y = 9.0;
        assert_eq!(entity.transform().position.y, 9.0);
    }

    #[test]
    fn test_get_component_returns_first_match() {
        let entity = Entity::new()
            .with_component(Box::new(SimpleMotion::new(Vec3::x(), Vec3::zeros())))
            .unwrap()
            .with_component(Box::new(SimpleMotion::new(Vec3::y(), Vec3::zeros())))
            .unwrap();

        assert_eq!(entity.get_component::<SimpleMotion>().map(|m| m.velocity), Some(Vec3::x()));
    }
}
