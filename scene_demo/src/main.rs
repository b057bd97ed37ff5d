//! Headless scene demo
//!
//! Runs the scene runtime frame loop against a recording backend with a
//! scripted input track: the camera flies forward while panning, `R` spawns a
//! random spinning pyramid, `C` clears the scene and `Escape` ends the run.
//!
//! Usage: `scene_demo [config.toml|config.ron]`

use rand::prelude::*;
use scene_runtime::prelude::*;
use scene_runtime::render::BatchStats;
use scene_runtime::scene::SceneStats;
use thiserror::Error;

const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 600;
const SPAWN_AREA: f32 = 40.0;

#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

struct DemoApp {
    camera: FreeLookCamera,
    scene: SceneRegistry,
    renderer: PrimitiveRenderer,
    grid: GroundGrid,
    rng: ThreadRng,
    meshes: Vec<MeshHandle>,
    frame: u32,
}

impl DemoApp {
    fn new(config: &RuntimeConfig) -> Result<Self, DemoError> {
        log::info!("Creating scene demo...");
        let renderer = PrimitiveRenderer::new(Box::new(RecordingBackend::new()), config.renderer.clone())?;
        let camera = FreeLookCamera::new(Vec3::new(-15.0, 4.0, 0.0), 1280, 720, config.camera.clone())?;

        let mut app = Self {
            camera,
            scene: SceneRegistry::new(),
            renderer,
            grid: GroundGrid::default(),
            rng: thread_rng(),
            meshes: Vec::new(),
            frame: 0,
        };

        // A fixed pyramid at the origin to look at
        let mesh = app.renderer.meshes_mut().insert(build_pyramid(2.0, 3.0, Color::WHITE));
        app.meshes.push(mesh);
        let origin = Entity::at(Vec3::zeros())
            .with_component(Box::new(MeshRenderer::new(mesh, Color::WHITE)))?;
        app.scene.add(origin);

        log::info!("Scene demo ready");
        Ok(app)
    }

    fn spawn_random_pyramid(&mut self) -> Result<EntityId, DemoError> {
        let rng = &mut self.rng;
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * SPAWN_AREA,
            0.0,
            (rng.gen::<f32>() - 0.5) * SPAWN_AREA,
        );
        let base_size = rng.gen_range(0.5..2.0);
        let height = rng.gen_range(1.0..3.0);
        let color = Color::rgb(rng.gen_range(50..255), rng.gen_range(50..255), rng.gen_range(50..255));
        let velocity = Vec3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0));
        let spin = Vec3::new(0.0, rng.gen_range(-0.5..0.5), 0.0);

        let mesh = self.renderer.meshes_mut().insert(build_pyramid(base_size, height, color));
        self.meshes.push(mesh);
        let pyramid = Entity::at(position)
            .with_component(Box::new(MeshRenderer::new(mesh, color).with_path(RenderPath::Batched)))?
            .with_component(Box::new(SimpleMotion::new(velocity, spin)))?;

        let id = self.scene.add(pyramid);
        log::info!("Spawned pyramid {id:?} at ({:.1}, {:.1})", position.x, position.z);
        Ok(id)
    }

    /// Scripted stand-in for a sampled keyboard and mouse
    fn scripted_input(frame: u32) -> FrameInput {
        let mut input = FrameInput::new().with_mouse_delta(1.5, 0.0);
        if (30..240).contains(&frame) {
            input = input.with_held(Key::W);
        }
        if (240..270).contains(&frame) {
            input = input.with_held(Key::Space).with_mouse_delta(0.0, 4.0);
        }
        if frame % 45 == 0 {
            input = input.with_pressed(Key::R);
        }
        if frame == 400 {
            input = input.with_pressed(Key::C);
        }
        if frame == 100 {
            input = input.with_scroll(2);
        }
        if frame + 1 == MAX_FRAMES {
            input = input.with_pressed(Key::Escape);
        }
        input
    }

    fn update(&mut self, input: &FrameInput) -> Result<(), DemoError> {
        self.camera.update(FRAME_TIME, input);

        if input.was_pressed(Key::R) {
            self.spawn_random_pyramid()?;
        }
        if input.was_pressed(Key::C) {
            // Flagged before the sweep, so nothing draws these meshes again
            self.scene.clear_all();
            for mesh in self.meshes.drain(..) {
                self.renderer.meshes_mut().remove(mesh);
            }
            log::info!("Cleared all entities");
        }

        self.scene.update(FRAME_TIME);
        Ok(())
    }

    fn render(&mut self) -> Result<(), DemoError> {
        self.renderer
            .set_matrices(self.camera.projection_matrix(), self.camera.view_matrix(), None)?;
        self.renderer.begin();
        self.grid.draw(&mut self.renderer)?;
        self.scene.draw(&mut self.renderer)?;
        self.renderer.end()?;

        // Keep the recording from growing without bound
        if let Some(recorder) = self.renderer.backend_as_mut::<RecordingBackend>() {
            recorder.clear();
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), DemoError> {
        log::info!("Starting frame loop ({MAX_FRAMES} frames)");
        while self.frame < MAX_FRAMES {
            let input = Self::scripted_input(self.frame);
            if input.was_pressed(Key::Escape) {
                log::info!("Escape pressed, stopping");
                break;
            }

            self.update(&input)?;
            self.render()?;

            if self.frame % 60 == 0 {
                log_frame(self.frame, self.camera.position(), self.scene.stats(), self.renderer.stats());
            }
            self.frame += 1;
        }
        log::info!("Frame loop finished after {} frames", self.frame);
        Ok(())
    }
}

fn log_frame(frame: u32, camera: Vec3, scene: SceneStats, batch: BatchStats) {
    log::info!(
        "Frame {frame}: {} entities ({} pending) | camera ({:.1}, {:.1}, {:.1}) | {} draw calls, {} triangles",
        scene.active,
        scene.pending,
        camera.x,
        camera.y,
        camera.z,
        batch.draw_calls(),
        batch.primitives_submitted
    );
}

fn load_config() -> Result<RuntimeConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load_from_file(&path)?,
        None => RuntimeConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            scene_runtime::foundation::logging::init_with_level("info");
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    scene_runtime::foundation::logging::init_with_level(&config.log_level);

    let result = DemoApp::new(&config).and_then(|mut app| app.run());
    if let Err(e) = result {
        log::error!("Scene demo failed: {e}");
        std::process::exit(1);
    }
}
