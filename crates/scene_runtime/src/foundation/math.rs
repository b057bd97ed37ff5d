//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene, camera and renderer.
//! All matrices use nalgebra's column-vector convention, so a world matrix that
//! applies scale, then rotation, then translation reads `T * R * S`.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;
}

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// World up axis (+Y)
    pub fn world_up() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    /// World down axis (-Y)
    pub fn world_down() -> Vec3 {
        Vec3::new(0.0, -1.0, 0.0)
    }

    /// World right axis (+X)
    pub fn world_right() -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }

    /// Normalize a vector, returning `None` for zero-length input
    pub fn try_normalize(v: Vec3) -> Option<Vec3> {
        v.try_normalize(f32::EPSILON)
    }

    /// Normalized cross product of two edge vectors `(b - a) x (c - a)`
    ///
    /// This is the flat face normal of triangle `a, b, c`. Degenerate
    /// triangles yield the zero vector.
    pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        try_normalize((b - a).cross(&(c - a))).unwrap_or_else(Vec3::zeros)
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a rotation from yaw (Y), pitch (X) and roll (Z)
    ///
    /// Roll is applied first, then pitch, then yaw.
    fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat4;

    /// Create a right-handed perspective projection matrix
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an off-center orthographic projection matrix
    fn orthographic_off_center(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat4 {
        Self::rotation_y(yaw) * Self::rotation_x(pitch) * Self::rotation_z(roll)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn orthographic_off_center(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_orthographic(left, right, bottom, top, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}
