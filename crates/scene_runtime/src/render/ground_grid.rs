//! Reference grid drawn on the ground plane
//!
//! Gives the free-look camera something to navigate against: a square grid of
//! batched lines on the XZ plane plus coloured X (red), Y (green) and Z (blue)
//! axes through the origin.

use super::{Color, PrimitiveRenderer, RenderResult};
use crate::foundation::math::Vec3;

const GRID_LINE_THICKNESS: f32 = 0.02;
const AXIS_THICKNESS: f32 = 0.05;
const AXIS_LIFT: f32 = 0.01;
const Y_AXIS_LENGTH: f32 = 2.0;

/// Square grid of lines centred on the origin
#[derive(Debug, Clone, PartialEq)]
pub struct GroundGrid {
    cells: u32,
    spacing: f32,
    primary_color: Color,
    secondary_color: Color,
    major_every: u32,
}

impl Default for GroundGrid {
    fn default() -> Self {
        Self::new(40, 2.0)
    }
}

impl GroundGrid {
    /// Create a grid `cells` cells wide with `spacing` units between lines
    pub fn new(cells: u32, spacing: f32) -> Self {
        Self {
            cells,
            spacing,
            primary_color: Color::rgb(100, 100, 100),
            secondary_color: Color::rgb(60, 60, 60),
            major_every: 10,
        }
    }

    /// Builder pattern: set the major and minor line colors
    pub fn with_colors(mut self, primary: Color, secondary: Color) -> Self {
        self.primary_color = primary;
        self.secondary_color = secondary;
        self
    }

    /// Builder pattern: draw every `n`th line in the primary color
    pub fn with_major_every(mut self, n: u32) -> Self {
        self.major_every = n.max(1);
        self
    }

    /// Distance from the origin to the grid edge
    pub fn half_extent(&self) -> f32 {
        self.cells as f32 * self.spacing * 0.5
    }

    /// Number of line segments [`draw`](Self::draw) emits
    pub fn line_count(&self) -> usize {
        2 * (self.cells as usize + 1) + 3
    }

    /// Color of the `index`th line counted from the negative edge
    fn line_color(&self, index: u32) -> Color {
        if index % self.major_every == 0 {
            self.primary_color
        } else {
            self.secondary_color
        }
    }

    /// Append the grid and axes to the current batch
    pub fn draw(&self, renderer: &mut PrimitiveRenderer) -> RenderResult<()> {
        let half = self.half_extent();

        for i in 0..=self.cells {
            let offset = i as f32 * self.spacing - half;
            let color = self.line_color(i);
            renderer.add_line(
                Vec3::new(-half, 0.0, offset),
                Vec3::new(half, 0.0, offset),
                color,
                GRID_LINE_THICKNESS,
            )?;
            renderer.add_line(
                Vec3::new(offset, 0.0, -half),
                Vec3::new(offset, 0.0, half),
                color,
                GRID_LINE_THICKNESS,
            )?;
        }

        renderer.add_line(
            Vec3::new(-half, AXIS_LIFT, 0.0),
            Vec3::new(half, AXIS_LIFT, 0.0),
            Color::RED,
            AXIS_THICKNESS,
        )?;
        renderer.add_line(
            Vec3::new(0.0, AXIS_LIFT, -half),
            Vec3::new(0.0, AXIS_LIFT, half),
            Color::BLUE,
            AXIS_THICKNESS,
        )?;
        renderer.add_line(Vec3::zeros(), Vec3::new(0.0, Y_AXIS_LENGTH, 0.0), Color::GREEN, AXIS_THICKNESS)
    }
}
