//! # Scene Registry
//!
//! The authoritative collection of entities and the per-frame dispatch over it.
//!
//! ## Frame contract
//!
//! ```text
//! update(dt):  sweep (commit pending, purge destroyed) -> dispatch Update
//! draw(r):     dispatch Draw over the active sequence
//! ```
//!
//! The active sequence is never modified during a dispatch pass. Entities
//! spawned from inside an update wait in the pending queue and join the active
//! sequence at the start of the next update, so they miss the rest of the
//! current frame. Destruction only raises a flag: a flagged entity stops
//! receiving updates immediately, is still drawn for the rest of the frame and
//! is purged at the start of the next update.

use slotmap::SlotMap;

use super::component::SceneCommand;
use super::{Entity, EntityId, SceneError, SceneResult};
use crate::render::{PrimitiveRenderer, RenderResult};

/// Statistics for scene monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Entities in the active sequence
    pub active: usize,
    /// Entities waiting for the next sweep
    pub pending: usize,
    /// Entities committed by the last sweep
    pub committed: usize,
    /// Entities purged by the last sweep
    pub purged: usize,
    /// Entities visited by the last update pass
    pub updated: usize,
    /// Entities visited by the last draw pass
    pub drawn: usize,
}

/// Owns every entity and drives update and draw dispatch
#[derive(Default)]
pub struct SceneRegistry {
    entities: SlotMap<EntityId, Entity>,
    active: Vec<EntityId>,
    pending: Vec<EntityId>,
    updating: bool,
    commands: Vec<SceneCommand>,
    stats: SceneStats,
}

impl SceneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity and return its id
    ///
    /// Outside an update pass the entity is active immediately; during one it
    /// is queued until the next sweep.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(entity);
        if let Some(entity) = self.entities.get_mut(id) {
            entity.bind(id);
        }

        if self.updating {
            self.pending.push(id);
            log::trace!("Queued {id:?} until the next update");
        } else {
            self.active.push(id);
            log::trace!("Added {id:?}");
        }
        id
    }

    /// Sweep, then dispatch `update` to every live entity in registration order
    pub fn update(&mut self, delta_time: f32) {
        self.sweep();

        self.updating = true;
        let mut updated = 0;
        for i in 0..self.active.len() {
            let id = self.active[i];
            let Some(entity) = self.entities.get_mut(id) else {
                continue;
            };
            if entity.is_destroyed() {
                continue;
            }
            entity.update(id, delta_time, &mut self.commands);
            updated += 1;
            self.apply_commands();
        }
        self.updating = false;

        self.stats.updated = updated;
        self.refresh_counts();
    }

    /// Dispatch `draw` to every active entity in registration order
    ///
    /// Entities flagged destroyed since the last update are still drawn.
    pub fn draw(&mut self, renderer: &mut PrimitiveRenderer) -> RenderResult<()> {
        let mut drawn = 0;
        for &id in &self.active {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.draw(id, renderer)?;
                drawn += 1;
            }
        }
        self.stats.drawn = drawn;
        Ok(())
    }

    /// Flag an entity destroyed
    pub fn destroy(&mut self, id: EntityId) -> SceneResult<()> {
        let entity = self.entities.get_mut(id).ok_or(SceneError::UnknownEntity(id))?;
        entity.destroy();
        log::trace!("Flagged {id:?} destroyed");
        Ok(())
    }

    /// Flag every active and pending entity destroyed
    pub fn clear_all(&mut self) {
        for id in self.active.iter().chain(&self.pending) {
            if let Some(entity) = self.entities.get_mut(*id) {
                entity.destroy();
            }
        }
        log::debug!(
            "Cleared scene: {} active, {} pending flagged",
            self.active.len(),
            self.pending.len()
        );
    }

    /// Look up an entity (active or pending)
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Look up an entity mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Whether `id` is registered and not yet purged
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Whether `id` is in the active sequence
    pub fn is_active(&self, id: EntityId) -> bool {
        self.active.contains(&id)
    }

    /// Active entities in registration order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.active
            .iter()
            .filter_map(|&id| self.entities.get(id).map(|entity| (id, entity)))
    }

    /// Number of active entities
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether there are no active entities
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of entities waiting for the next sweep
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether an update pass is running
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Statistics as of the last update and draw
    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    /// Commit queued additions, then purge destroyed entities
    fn sweep(&mut self) {
        let committed = self.pending.len();
        self.active.append(&mut self.pending);

        let before = self.active.len();
        let entities = &mut self.entities;
        self.active.retain(|&id| {
            let keep = entities.get(id).is_some_and(|entity| !entity.is_destroyed());
            if !keep {
                entities.remove(id);
            }
            keep
        });
        let purged = before - self.active.len();

        if committed > 0 || purged > 0 {
            log::debug!("Scene sweep: {committed} committed, {purged} purged");
        }
        self.stats.committed = committed;
        self.stats.purged = purged;
    }

    /// Apply what the entity just updated asked for
    fn apply_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        let mut commands = std::mem::take(&mut self.commands);
        for command in commands.drain(..) {
            match command {
                SceneCommand::Spawn(entity) => {
                    self.add(entity);
                }
                SceneCommand::Destroy(id) => {
                    if let Err(err) = self.destroy(id) {
                        log::warn!("Ignoring destroy request: {err}");
                    }
                }
            }
        }
        self.commands = commands;
    }

    fn refresh_counts(&mut self) {
        self.stats.active = self.active.len();
        self.stats.pending = self.pending.len();
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::config::BatchConfig;
    use crate::foundation::math::Vec3;
    use crate::render::RecordingBackend;
    use crate::scene::component::{Capabilities, Component, DrawContext, UpdateContext};
    use crate::scene::{Lifetime, SimpleMotion};

    /// Counts its own update and draw calls
    #[derive(Default)]
    struct Probe {
        updates: usize,
        draws: usize,
    }

    impl Component for Probe {
        fn capabilities(&self) -> Capabilities {
            Capabilities::UPDATABLE | Capabilities::DRAWABLE
        }

        fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
            self.updates += 1;
        }

        fn draw(&mut self, _ctx: &mut DrawContext<'_>, _renderer: &mut PrimitiveRenderer) -> RenderResult<()> {
            self.draws += 1;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Spawns one probe entity on its first update
    struct Spawner {
        spawned: bool,
    }

    impl Component for Spawner {
        fn capabilities(&self) -> Capabilities {
            Capabilities::UPDATABLE
        }

        fn update(&mut self, ctx: &mut UpdateContext<'_>) {
            if !self.spawned {
                let child = Entity::at(ctx.transform().position)
                    .with_component(Box::new(Probe::default()))
                    .unwrap();
                ctx.spawn(child);
                self.spawned = true;
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Destroys a target entity on every update
    struct Killer {
        target: EntityId,
    }

    impl Component for Killer {
        fn capabilities(&self) -> Capabilities {
            Capabilities::UPDATABLE
        }

        fn update(&mut self, ctx: &mut UpdateContext<'_>) {
            ctx.destroy(self.target);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn renderer() -> PrimitiveRenderer {
        PrimitiveRenderer::new(Box::new(RecordingBackend::new()), BatchConfig::default()).unwrap()
    }

    fn probe_entity() -> Entity {
        Entity::new().with_component(Box::new(Probe::default())).unwrap()
    }

    fn probe(scene: &SceneRegistry, id: EntityId) -> (usize, usize) {
        let probe = scene.get(id).and_then(Entity::get_component::<Probe>).unwrap();
        (probe.updates, probe.draws)
    }

    fn frame(scene: &mut SceneRegistry, renderer: &mut PrimitiveRenderer) {
        scene.update(0.016);
        renderer.begin();
        scene.draw(renderer).unwrap();
        renderer.end().unwrap();
    }

    #[test]
    fn test_add_outside_update_is_active_immediately() {
        let mut scene = SceneRegistry::new();
        let id = scene.add(probe_entity());
        assert!(scene.is_active(id));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(id).and_then(Entity::id), Some(id));
    }

    #[test]
    fn test_entity_spawned_during_update_waits_a_frame() {
        let mut scene = SceneRegistry::new();
        let mut renderer = renderer();
        let spawner = scene.add(Entity::new().with_component(Box::new(Spawner { spawned: false })).unwrap());

        frame(&mut scene, &mut renderer);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.pending_len(), 1);
        assert_eq!(scene.stats().drawn, 1);

        let child = scene
            .entities()
            .map(|(id, _)| id)
            .chain(scene.pending.iter().copied())
            .find(|&id| id != spawner)
            .unwrap();
        assert!(!scene.is_active(child));
        assert_eq!(probe(&scene, child), (0, 0));

        frame(&mut scene, &mut renderer);
        assert!(scene.is_active(child));
        assert_eq!(probe(&scene, child), (1, 1));
        assert_eq!(scene.stats().committed, 1);
    }

    #[test]
    fn test_destroyed_entity_drawn_this_frame_and_gone_next() {
        let mut scene = SceneRegistry::new();
        let mut renderer = renderer();
        let victim = scene.add(probe_entity());
        scene.add(Entity::new().with_component(Box::new(Killer { target: victim })).unwrap());

        // The victim updates before its killer, so it is updated and drawn in frame N
        frame(&mut scene, &mut renderer);
        assert!(scene.get(victim).unwrap().is_destroyed());
        assert_eq!(probe(&scene, victim), (1, 1));

        scene.update(0.016);
        assert!(scene.get(victim).is_none());
        assert_eq!(scene.stats().purged, 1);
        renderer.begin();
        scene.draw(&mut renderer).unwrap();
        renderer.end().unwrap();
        assert!(scene.entities().all(|(id, _)| id != victim));
    }

    #[test]
    fn test_flagged_entity_skips_rest_of_update_pass() {
        let mut scene = SceneRegistry::new();
        let mut renderer = renderer();
        let killer = scene.add(Entity::new());
        let target = scene.add(probe_entity());
        scene
            .get_mut(killer)
            .unwrap()
            .add_component(Box::new(Killer { target }))
            .unwrap();

        frame(&mut scene, &mut renderer);

        // Flagged before its turn: skipped by update, still drawn
        assert_eq!(probe(&scene, target), (0, 1));
        assert_eq!(scene.stats().updated, 1);
    }

    #[test]
    fn test_self_destroy_with_lifetime() {
        let mut scene = SceneRegistry::new();
        let id = scene.add(
            Entity::new()
                .with_component(Box::new(SimpleMotion::new(Vec3::x(), Vec3::zeros())))
                .unwrap()
                .with_component(Box::new(Lifetime::new(0.02)))
                .unwrap(),
        );

        scene.update(0.016);
        assert!(!scene.get(id).unwrap().is_destroyed());
        scene.update(0.016);
        assert!(scene.get(id).unwrap().is_destroyed());
        // Motion ran on both frames
        assert!((scene.get(id).unwrap().transform().position.x - 0.032).abs() < 1e-6);

        scene.update(0.016);
        assert!(!scene.contains(id));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_clear_all_flags_active_and_pending() {
        let mut scene = SceneRegistry::new();
        let mut renderer = renderer();
        scene.add(probe_entity());
        scene.add(Entity::new().with_component(Box::new(Spawner { spawned: false })).unwrap());

        scene.update(0.016);
        assert_eq!(scene.pending_len(), 1);
        scene.clear_all();

        renderer.begin();
        scene.draw(&mut renderer).unwrap();
        renderer.end().unwrap();
        assert_eq!(scene.stats().drawn, 2);

        scene.update(0.016);
        assert!(scene.is_empty());
        assert_eq!(scene.pending_len(), 0);
        assert_eq!(scene.stats().committed, 1);
        assert_eq!(scene.stats().purged, 3);
    }

    #[test]
    fn test_destroy_unknown_entity() {
        let mut scene = SceneRegistry::new();
        let id = scene.add(Entity::new());
        scene.destroy(id).unwrap();
        scene.update(0.016);

        assert!(matches!(scene.destroy(id), Err(SceneError::UnknownEntity(_))));
    }

    #[test]
    fn test_dispatch_follows_registration_order() {
        let mut scene = SceneRegistry::new();
        let mut renderer = renderer();
        let ids: Vec<_> = (0..4).map(|_| scene.add(probe_entity())).collect();

        frame(&mut scene, &mut renderer);

        let order: Vec<_> = scene.entities().map(|(id, _)| id).collect();
        assert_eq!(order, ids);
        for id in ids {
            assert_eq!(probe(&scene, id), (1, 1));
        }
    }
}
