//! # Free-Look Camera
//!
//! A camera whose orientation is driven by continuously accumulated yaw and
//! pitch rather than a fixed look target.
//!
//! ## Coordinate System
//! Right-handed, Y-up. Yaw rotates about world Y starting from +X, pitch
//! tilts toward +Y. With yaw and pitch at zero the camera looks along +X.
//!
//! ## Per-frame update order
//! 1. Scroll adjusts mouse sensitivity (clamped)
//! 2. Mouse delta accumulates into yaw/pitch (Y inverted)
//! 3. Pitch is clamped short of straight up/down; yaw is wrapped into [-2π, 2π]
//! 4. Forward/right/up are recomputed
//! 5. Held keys translate the position; vertical keys move along world up
//! 6. View and projection matrices are rebuilt

use crate::config::{CameraConfig, ConfigError};
use crate::foundation::math::constants::{HALF_PI, TAU};
use crate::foundation::math::utils::world_up;
use crate::foundation::math::{Mat4, Mat4Ext, Vec2, Vec3, Vec4};
use crate::input::InputState;

/// Margin kept between pitch and the poles
pub const PITCH_MARGIN: f32 = 0.1;

/// Largest pitch magnitude the camera accepts
pub const MAX_PITCH: f32 = HALF_PI - PITCH_MARGIN;

/// Free-look camera with derived view and projection matrices
///
/// Yaw, pitch and position are the only independent state; every vector and
/// matrix is derived from them during [`update`](Self::update).
#[derive(Debug, Clone)]
pub struct FreeLookCamera {
    position: Vec3,
    yaw: f32,
    pitch: f32,

    forward: Vec3,
    right: Vec3,
    up: Vec3,

    view: Mat4,
    projection: Mat4,

    viewport_width: u32,
    viewport_height: u32,
    config: CameraConfig,
}

impl FreeLookCamera {
    /// Create a camera at `position` looking along +X
    ///
    /// Fails when `config` does not validate.
    pub fn new(
        position: Vec3,
        viewport_width: u32,
        viewport_height: u32,
        config: CameraConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            forward: Vec3::x(),
            right: Vec3::z(),
            up: world_up(),
            view: Mat4::identity(),
            projection: Mat4::identity(),
            viewport_width,
            viewport_height,
            config,
        };
        camera.update_vectors();
        camera.update_view();
        camera.update_projection();
        log::debug!("Camera created at {position:?} with viewport {viewport_width}x{viewport_height}");
        Ok(camera)
    }

    /// Advance the camera by one frame of input
    pub fn update(&mut self, delta_time: f32, input: &dyn InputState) {
        let scroll = input.scroll_delta();
        if scroll != 0 {
            self.adjust_sensitivity(scroll);
        }

        let look = input.mouse_delta();
        self.rotate(look.x, look.y);

        let step = self.config.movement_speed * delta_time;
        let bindings = &self.config.bindings;
        let mut movement = Vec3::zeros();
        if input.any_held(&bindings.forward) {
            movement += self.forward;
        }
        if input.any_held(&bindings.backward) {
            movement -= self.forward;
        }
        if input.any_held(&bindings.right) {
            movement += self.right;
        }
        if input.any_held(&bindings.left) {
            movement -= self.right;
        }
        if input.any_held(&bindings.ascend) {
            movement += world_up();
        }
        if input.any_held(&bindings.descend) {
            movement -= world_up();
        }
        self.position += movement * step;

        self.update_view();
        self.update_projection();
    }

    /// Apply a look delta to yaw and pitch
    ///
    /// Pitch is clamped to the closed range `[-π/2 + 0.1, π/2 - 0.1]`, so it
    /// may sit exactly on a bound; yaw is wrapped once it leaves `[-2π, 2π]`.
    /// The basis vectors and view matrix are refreshed.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let sensitivity = self.config.mouse_sensitivity;
        self.yaw += dx * sensitivity;
        self.pitch -= dy * sensitivity;

        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        if self.yaw.abs() > TAU {
            self.yaw %= TAU;
        }
        self.update_vectors();
        self.update_view();
    }

    fn adjust_sensitivity(&mut self, notches: i32) {
        let config = &mut self.config;
        config.mouse_sensitivity = (config.mouse_sensitivity
            + notches as f32 * config.scroll_sensitivity_step)
            .clamp(config.min_sensitivity, config.max_sensitivity);
        log::debug!("Mouse sensitivity now {:.4}", config.mouse_sensitivity);
    }

    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.forward = Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        // Pitch never reaches the poles, so forward is never parallel to world up
        self.right = self.forward.cross(&world_up()).normalize();
        self.up = self.right.cross(&self.forward).normalize();
    }

    fn update_view(&mut self) {
        self.view = Mat4::look_at(self.position, self.position + self.forward, self.up);
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective(
            self.config.field_of_view,
            self.aspect_ratio(),
            self.config.near_plane,
            self.config.far_plane,
        );
    }

    /// Resize the viewport; only the projection changes
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.update_projection();
        log::debug!("Camera viewport resized to {width}x{height}");
    }

    /// Project a world position to viewport pixels (origin top-left)
    ///
    /// Returns `None` for points at or behind the camera plane.
    pub fn world_to_screen(&self, world_position: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * Vec4::new(world_position.x, world_position.y, world_position.z, 1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(Vec2::new(
            (ndc_x + 1.0) * 0.5 * self.viewport_width as f32,
            (1.0 - ndc_y) * 0.5 * self.viewport_height as f32,
        ))
    }

    /// Width over height, falling back to 1.0 for a zero-height viewport
    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport_height == 0 {
            1.0
        } else {
            self.viewport_width as f32 / self.viewport_height as f32
        }
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the camera without changing its orientation
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_view();
    }

    /// Accumulated yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Accumulated pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Look direction
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Right vector, perpendicular to forward and world up
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Camera up vector, re-orthogonalized against forward
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Point one unit ahead of the camera
    pub fn target(&self) -> Vec3 {
        self.position + self.forward
    }

    /// View matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Current mouse sensitivity
    pub fn mouse_sensitivity(&self) -> f32 {
        self.config.mouse_sensitivity
    }

    /// Camera configuration
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}
