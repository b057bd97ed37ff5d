//! Full-frame integration tests
//!
//! Drives camera, scene and renderer in the host order (camera update, scene
//! update, begin, draw, end) against the recording backend.

use crate::config::RuntimeConfig;
use crate::foundation::math::Vec3;
use crate::input::{FrameInput, Key};
use crate::render::{build_pyramid, BackendCommand, Color, FreeLookCamera, GroundGrid, PrimitiveRenderer, RecordingBackend};
use crate::scene::{Entity, Lifetime, MeshRenderer, RenderPath, SceneRegistry, SimpleMotion};

struct Host {
    camera: FreeLookCamera,
    scene: SceneRegistry,
    renderer: PrimitiveRenderer,
    grid: GroundGrid,
}

impl Host {
    fn new() -> Self {
        let config = RuntimeConfig::default();
        Self {
            camera: FreeLookCamera::new(Vec3::new(-10.0, 3.0, 0.0), 1280, 720, config.camera.clone()).unwrap(),
            scene: SceneRegistry::new(),
            renderer: PrimitiveRenderer::new(Box::new(RecordingBackend::new()), config.renderer).unwrap(),
            grid: GroundGrid::default(),
        }
    }

    fn frame(&mut self, dt: f32, input: &FrameInput) {
        self.camera.update(dt, input);
        self.scene.update(dt);

        self.renderer
            .set_matrices(self.camera.projection_matrix(), self.camera.view_matrix(), None)
            .unwrap();
        self.renderer.begin();
        self.grid.draw(&mut self.renderer).unwrap();
        self.scene.draw(&mut self.renderer).unwrap();
        self.renderer.end().unwrap();
    }

    fn recorder(&self) -> &RecordingBackend {
        self.renderer.backend_as::<RecordingBackend>().unwrap()
    }
}

#[test]
fn test_grid_batch_precedes_immediate_pyramid() {
    let mut host = Host::new();
    let mesh = host.renderer.meshes_mut().insert(build_pyramid(2.0, 3.0, Color::WHITE));
    host.scene.add(
        Entity::at(Vec3::new(0.0, 0.0, 5.0))
            .with_component(Box::new(MeshRenderer::new(mesh, Color::RED)))
            .unwrap(),
    );

    host.frame(1.0 / 60.0, &FrameInput::new());

    let grid_triangles = (host.grid.line_count() * 2) as u32;
    assert_eq!(host.recorder().draw_calls(), vec![(0, grid_triangles), (0, 6)]);
    assert_eq!(host.renderer.stats().flush_count, 1);
    assert_eq!(host.renderer.stats().immediate_draws, 1);
}

#[test]
fn test_moving_pyramid_is_drawn_where_it_moved() {
    let mut host = Host::new();
    let mesh = host.renderer.meshes_mut().insert(build_pyramid(2.0, 3.0, Color::WHITE));
    let id = host.scene.add(
        Entity::new()
            .with_component(Box::new(SimpleMotion::new(Vec3::new(0.0, 0.0, 2.0), Vec3::zeros())))
            .unwrap()
            .with_component(Box::new(MeshRenderer::new(mesh, Color::WHITE).with_path(RenderPath::Batched)))
            .unwrap(),
    );

    host.frame(0.5, &FrameInput::new());

    let transform = host.scene.get(id).unwrap().transform();
    assert_eq!(transform.position, Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(transform.world_matrix()[(2, 3)], 1.0);

    // Batched with the grid: a single draw call carrying both
    let uploads = host.recorder().uploads();
    assert_eq!(uploads.len(), 1);
    let apex = uploads[0].0[host.grid.line_count() * 4 + 6];
    assert_eq!(apex.position(), Vec3::new(0.0, 3.0, 1.0));
}

#[test]
fn test_short_lived_entities_leave_the_scene() {
    let mut host = Host::new();
    let mesh = host.renderer.meshes_mut().insert(build_pyramid(1.0, 1.0, Color::BLUE));
    for i in 0..3 {
        host.scene.add(
            Entity::at(Vec3::new(i as f32, 0.0, 0.0))
                .with_component(Box::new(MeshRenderer::new(mesh, Color::WHITE)))
                .unwrap()
                .with_component(Box::new(Lifetime::new(0.25 * (i + 1) as f32)))
                .unwrap(),
        );
    }

    let mut alive = Vec::new();
    for _ in 0..5 {
        host.frame(0.25, &FrameInput::new());
        alive.push(host.scene.len());
    }

    // Each expiry is purged at the start of the following frame
    assert_eq!(alive, vec![3, 2, 1, 0, 0]);
}

#[test]
fn test_camera_input_reaches_renderer_matrices() {
    let mut host = Host::new();
    let input = FrameInput::new().with_held(Key::W).with_mouse_delta(50.0, 0.0);

    host.frame(1.0, &input);

    assert_eq!(host.renderer.transforms().view, host.camera.view_matrix());
    assert_eq!(host.renderer.transforms().projection, host.camera.projection_matrix());
    assert!(host.camera.position().x > -10.0);
    assert!(host
        .recorder()
        .commands()
        .iter()
        .any(|c| matches!(c, BackendCommand::SetTransforms(t) if t.view == host.camera.view_matrix())));
}

#[test]
fn test_clear_all_then_respawn() {
    let mut host = Host::new();
    let mesh = host.renderer.meshes_mut().insert(build_pyramid(1.0, 1.0, Color::WHITE));
    let spawn = |host: &mut Host| {
        host.scene.add(
            Entity::new()
                .with_component(Box::new(MeshRenderer::new(mesh, Color::WHITE)))
                .unwrap(),
        )
    };

    spawn(&mut host);
    spawn(&mut host);
    host.frame(0.016, &FrameInput::new());
    assert_eq!(host.renderer.stats().immediate_draws, 2);

    host.scene.clear_all();
    let fresh = spawn(&mut host);
    host.frame(0.016, &FrameInput::new());

    // Cleared entities are purged before the update; the new one was added after clear_all
    assert_eq!(host.scene.len(), 1);
    assert!(host.scene.is_active(fresh));
    assert_eq!(host.renderer.stats().immediate_draws, 1);
}
