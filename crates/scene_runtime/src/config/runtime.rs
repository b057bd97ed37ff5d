//! # Runtime Configuration
//!
//! Configuration for the batched renderer, the free-look camera and the host
//! loop. Every struct implements `Default` with the values the runtime was
//! tuned for, builder-style `with_*` setters and a `validate()` check.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::constants::QUARTER_PI;
use crate::input::Key;

/// Largest vertex capacity addressable by 16-bit indices
pub const MAX_INDEXABLE_VERTICES: usize = u16::MAX as usize + 1;

/// # Shading Configuration
///
/// Parameters of the flat lit shading mode applied by the backend to both the
/// batched and the immediate draw path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Whether per-vertex lighting is enabled
    pub lighting_enabled: bool,
    /// Ambient light color
    pub ambient: [f32; 3],
    /// Specular color
    pub specular: [f32; 3],
    /// Specular exponent
    pub specular_power: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            lighting_enabled: true,
            ambient: [0.3, 0.3, 0.3],
            specular: [0.2, 0.2, 0.2],
            specular_power: 16.0,
        }
    }
}

/// # Batch Configuration
///
/// Fixed capacities of the shared vertex and index buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum vertices held by one batch before it must flush
    pub max_vertices: usize,
    /// Maximum indices held by one batch before it must flush
    pub max_indices: usize,
    /// Shading mode handed to the backend at construction
    pub shading: ShadingConfig,
}

impl BatchConfig {
    /// Create a batch configuration with explicit capacities
    pub fn new(max_vertices: usize, max_indices: usize) -> Self {
        Self {
            max_vertices,
            max_indices,
            shading: ShadingConfig::default(),
        }
    }

    /// Set custom shading configuration
    pub fn with_shading(mut self, shading: ShadingConfig) -> Self {
        self.shading = shading;
        self
    }

    /// Validate the configuration
    ///
    /// A batch must hold at least one quad (4 vertices, 6 indices) and its
    /// vertices must be addressable by 16-bit indices.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_vertices < 4 {
            return Err(ConfigError::Invalid(format!(
                "max_vertices must be at least 4, got {}",
                self.max_vertices
            )));
        }
        if self.max_vertices > MAX_INDEXABLE_VERTICES {
            return Err(ConfigError::Invalid(format!(
                "max_vertices {} exceeds the 16-bit index range ({MAX_INDEXABLE_VERTICES})",
                self.max_vertices
            )));
        }
        if self.max_indices < 6 {
            return Err(ConfigError::Invalid(format!(
                "max_indices must be at least 6, got {}",
                self.max_indices
            )));
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(5000, 15000)
    }
}

/// Key bindings for free-look movement
///
/// Each logical direction is held when any of its keys is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraBindings {
    /// Move along the look direction
    pub forward: Vec<Key>,
    /// Move against the look direction
    pub backward: Vec<Key>,
    /// Strafe left
    pub left: Vec<Key>,
    /// Strafe right
    pub right: Vec<Key>,
    /// Rise along world up
    pub ascend: Vec<Key>,
    /// Sink along world up
    pub descend: Vec<Key>,
}

impl Default for CameraBindings {
    fn default() -> Self {
        Self {
            forward: vec![Key::W, Key::ArrowUp],
            backward: vec![Key::S, Key::ArrowDown],
            left: vec![Key::A, Key::ArrowLeft],
            right: vec![Key::D, Key::ArrowRight],
            ascend: vec![Key::Space, Key::Q],
            descend: vec![Key::E],
        }
    }
}

/// # Camera Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Translation speed in world units per second
    pub movement_speed: f32,
    /// Radians of rotation per unit of mouse delta
    pub mouse_sensitivity: f32,
    /// Lower bound for scroll-adjusted sensitivity
    pub min_sensitivity: f32,
    /// Upper bound for scroll-adjusted sensitivity
    pub max_sensitivity: f32,
    /// Sensitivity change per scroll notch
    pub scroll_sensitivity_step: f32,
    /// Vertical field of view in radians
    pub field_of_view: f32,
    /// Near clipping plane distance
    pub near_plane: f32,
    /// Far clipping plane distance
    pub far_plane: f32,
    /// Movement key bindings
    pub bindings: CameraBindings,
}

impl CameraConfig {
    /// Set movement speed
    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    /// Set mouse sensitivity
    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Set the projection parameters
    pub fn with_projection(mut self, field_of_view: f32, near_plane: f32, far_plane: f32) -> Self {
        self.field_of_view = field_of_view;
        self.near_plane = near_plane;
        self.far_plane = far_plane;
        self
    }

    /// Set custom key bindings
    pub fn with_bindings(mut self, bindings: CameraBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.near_plane <= 0.0 || self.far_plane <= self.near_plane {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near_plane, self.far_plane
            )));
        }
        if self.field_of_view <= 0.0 || self.field_of_view >= std::f32::consts::PI {
            return Err(ConfigError::Invalid(format!(
                "field of view must lie in (0, pi), got {}",
                self.field_of_view
            )));
        }
        if !self.min_sensitivity.is_finite() || !self.max_sensitivity.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "sensitivity bounds must be finite, got min={} max={}",
                self.min_sensitivity, self.max_sensitivity
            )));
        }
        if self.min_sensitivity > self.max_sensitivity {
            return Err(ConfigError::Invalid(format!(
                "sensitivity bounds are inverted: {} > {}",
                self.min_sensitivity, self.max_sensitivity
            )));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            mouse_sensitivity: 0.003,
            min_sensitivity: 0.001,
            max_sensitivity: 0.01,
            scroll_sensitivity_step: 0.0005,
            field_of_view: QUARTER_PI,
            near_plane: 0.1,
            far_plane: 1000.0,
            bindings: CameraBindings::default(),
        }
    }
}

/// # Complete Runtime Configuration
///
/// Top-level configuration a host loads once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Default log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Batched renderer configuration
    pub renderer: BatchConfig,
    /// Free-look camera configuration
    pub camera: CameraConfig,
}

impl RuntimeConfig {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.renderer.validate()?;
        self.camera.validate()?;
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            renderer: BatchConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for RuntimeConfig {}
