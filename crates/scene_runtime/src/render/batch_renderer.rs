//! # Batched Primitive Renderer
//!
//! Accumulates vertex and index data from many small draw calls into shared
//! buffers and submits them to the backend as a single indexed draw.
//!
//! ## Architecture
//!
//! - **RenderBatch**: the transient vertex/index accumulation for one draw call
//! - **PrimitiveRenderer**: owns the batch, the mesh cache and the backend;
//!   flushes when capacity would be exceeded and at frame end
//!
//! ## Draw paths
//!
//! Batched calls (`add_mesh`, `add_line`, `add_triangle`) append geometry under
//! the shared world matrix. The immediate path (`draw_mesh`) flushes whatever
//! is pending, draws one mesh under its own world matrix and tint, then
//! restores the shared state. The two paths never interleave without a flush,
//! so paint order follows call order.

use super::backend::{RenderBackend, ShaderTransforms};
use super::{Color, Mesh, MeshCache, MeshHandle, RenderError, RenderResult, Vertex};
use crate::config::BatchConfig;
use crate::foundation::math::utils::{face_normal, try_normalize, world_right, world_up};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Dot product above which a line counts as parallel to world up
const PARALLEL_THRESHOLD: f32 = 0.9;

/// Vertex and index accumulation for a single draw call
///
/// Counts never exceed the capacities the batch was created with.
#[derive(Debug)]
pub struct RenderBatch {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    max_vertices: usize,
    max_indices: usize,
}

impl RenderBatch {
    /// Create an empty batch with fixed capacities
    pub fn with_capacity(max_vertices: usize, max_indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_vertices),
            indices: Vec::with_capacity(max_indices),
            max_vertices,
            max_indices,
        }
    }

    /// Whether geometry of this size can be appended without flushing
    pub fn fits(&self, vertex_count: usize, index_count: usize) -> bool {
        self.vertices.len() + vertex_count <= self.max_vertices
            && self.indices.len() + index_count <= self.max_indices
    }

    /// Whether geometry of this size fits into an empty batch at all
    pub fn can_hold(&self, vertex_count: usize, index_count: usize) -> bool {
        vertex_count <= self.max_vertices && index_count <= self.max_indices
    }

    /// Append geometry, offsetting its indices by the current vertex count
    ///
    /// Callers check [`fits`](Self::fits) first.
    fn append<I>(&mut self, vertices: I, indices: &[u16])
    where
        I: IntoIterator<Item = Vertex>,
    {
        let base = self.vertices.len();
        self.vertices.extend(vertices);
        debug_assert!(self.vertices.len() <= self.max_vertices);
        self.indices
            .extend(indices.iter().map(|&index| (base + usize::from(index)) as u16));
    }

    /// Accumulated vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Accumulated indices
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Number of accumulated vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of accumulated indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of accumulated triangles
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Reset all counters
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// Statistics for one `begin`/`end` bracket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Batched draw calls issued
    pub flush_count: usize,
    /// Immediate draw calls issued
    pub immediate_draws: usize,
    /// Vertices handed to the backend
    pub vertices_submitted: usize,
    /// Triangles handed to the backend
    pub primitives_submitted: usize,
    /// Batches thrown away by `begin` without being drawn
    pub discarded_batches: usize,
}

impl BatchStats {
    /// Total draw calls issued on both paths
    pub fn draw_calls(&self) -> usize {
        self.flush_count + self.immediate_draws
    }
}

/// Backend-facing state, kept apart from the mesh cache so cached meshes can
/// be borrowed while geometry is submitted
struct Submitter {
    backend: Box<dyn RenderBackend>,
    batch: RenderBatch,
    transforms: ShaderTransforms,
    stats: BatchStats,
}

impl Submitter {
    fn flush(&mut self) -> RenderResult<()> {
        if self.batch.is_empty() {
            return Ok(());
        }

        let primitives = self.batch.primitive_count();
        self.backend.upload(self.batch.vertices(), self.batch.indices())?;
        self.backend.draw_indexed(0, primitives as u32)?;

        self.stats.flush_count += 1;
        self.stats.vertices_submitted += self.batch.vertex_count();
        self.stats.primitives_submitted += primitives;
        log::debug!(
            "Flushed batch: {} vertices, {} triangles",
            self.batch.vertex_count(),
            primitives
        );

        self.batch.clear();
        Ok(())
    }

    /// Flush first if the next primitive would overflow either buffer
    fn make_room(&mut self, vertex_count: usize, index_count: usize) -> RenderResult<()> {
        if !self.batch.fits(vertex_count, index_count) {
            log::trace!("Batch full, flushing before {vertex_count} more vertices");
            self.flush()?;
        }
        Ok(())
    }

    fn add_mesh(&mut self, mesh: &Mesh) -> RenderResult<()> {
        if mesh.is_empty() {
            return Ok(());
        }
        if !self.batch.can_hold(mesh.vertex_count(), mesh.index_count()) {
            log::debug!(
                "Mesh of {} vertices exceeds batch capacity, drawing immediately",
                mesh.vertex_count()
            );
            let world = self.transforms.world;
            return self.draw_mesh(mesh, &world, Color::WHITE);
        }

        self.make_room(mesh.vertex_count(), mesh.index_count())?;
        self.batch
            .append(mesh.vertices().iter().copied(), mesh.indices());
        Ok(())
    }

    fn add_mesh_transformed(&mut self, mesh: &Mesh, world: &Mat4, tint: Color) -> RenderResult<()> {
        if mesh.is_empty() {
            return Ok(());
        }
        if !self.batch.can_hold(mesh.vertex_count(), mesh.index_count()) {
            let combined = self.transforms.world * world;
            return self.draw_mesh(mesh, &combined, tint);
        }

        self.make_room(mesh.vertex_count(), mesh.index_count())?;
        self.batch.append(
            mesh.vertices().iter().map(|vertex| vertex.transformed(world, tint)),
            mesh.indices(),
        );
        Ok(())
    }

    fn add_quad(&mut self, corners: [Vec3; 4], normal: Vec3, color: Color) -> RenderResult<()> {
        self.make_room(4, 6)?;
        self.batch.append(
            corners.map(|corner| Vertex::new(corner, normal, color)),
            &[0, 1, 2, 0, 2, 3],
        );
        Ok(())
    }

    fn add_triangle(&mut self, vertices: [Vertex; 3]) -> RenderResult<()> {
        self.make_room(3, 3)?;
        self.batch.append(vertices, &[0, 1, 2]);
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: &Mesh, world: &Mat4, tint: Color) -> RenderResult<()> {
        if mesh.is_empty() {
            return Ok(());
        }
        self.flush()?;

        let primitives = mesh.triangle_count();
        self.backend.set_transforms(&self.transforms.with_world(*world));
        self.backend.set_tint(tint);
        let drawn = self
            .backend
            .upload(mesh.vertices(), mesh.indices())
            .and_then(|()| self.backend.draw_indexed(0, primitives as u32));

        // Shared state comes back even when the draw failed
        self.backend.set_transforms(&self.transforms);
        self.backend.set_tint(Color::WHITE);
        drawn?;

        self.stats.immediate_draws += 1;
        self.stats.vertices_submitted += mesh.vertex_count();
        self.stats.primitives_submitted += primitives;
        log::trace!("Immediate draw: {primitives} triangles");
        Ok(())
    }
}

/// Batched renderer for meshes, lines and triangles
///
/// A frame is bracketed by [`begin`](Self::begin) and [`end`](Self::end).
/// Capacity exhaustion inside the bracket is handled by flushing and is never
/// reported to the caller.
pub struct PrimitiveRenderer {
    config: BatchConfig,
    meshes: MeshCache,
    submitter: Submitter,
    in_frame: bool,
}

impl PrimitiveRenderer {
    /// Create a renderer over a backend
    ///
    /// Fails with [`RenderError::InvalidArgument`] when the batch capacities
    /// are unusable.
    pub fn new(mut backend: Box<dyn RenderBackend>, config: BatchConfig) -> RenderResult<Self> {
        config.validate()?;
        backend.configure_shading(&config.shading)?;

        let transforms = ShaderTransforms::default();
        backend.set_transforms(&transforms);
        backend.set_tint(Color::WHITE);

        log::info!(
            "Primitive renderer ready: {} vertices / {} indices per batch",
            config.max_vertices,
            config.max_indices
        );

        Ok(Self {
            meshes: MeshCache::new(),
            submitter: Submitter {
                backend,
                batch: RenderBatch::with_capacity(config.max_vertices, config.max_indices),
                transforms,
                stats: BatchStats::default(),
            },
            config,
            in_frame: false,
        })
    }

    /// Set the shared projection, view and (optionally) world matrices
    ///
    /// Pending geometry is flushed first so it is drawn with the matrices in
    /// effect when it was added. Without a world matrix the shared world
    /// resets to identity.
    pub fn set_matrices(&mut self, projection: Mat4, view: Mat4, world: Option<Mat4>) -> RenderResult<()> {
        self.submitter.flush()?;

        let transforms = &mut self.submitter.transforms;
        transforms.projection = projection;
        transforms.view = view;
        transforms.world = world.unwrap_or_else(Mat4::identity);
        let transforms = *transforms;
        self.submitter.backend.set_transforms(&transforms);
        Ok(())
    }

    /// Start a frame: reset batch counters and statistics
    pub fn begin(&mut self) {
        self.submitter.stats = BatchStats::default();
        if !self.submitter.batch.is_empty() {
            log::warn!(
                "Discarding {} unflushed triangles from the previous frame",
                self.submitter.batch.primitive_count()
            );
            self.submitter.stats.discarded_batches = 1;
            self.submitter.batch.clear();
        }
        self.in_frame = true;
    }

    /// Finish a frame: flush whatever is pending
    pub fn end(&mut self) -> RenderResult<()> {
        if !self.in_frame {
            log::warn!("end() called without a matching begin()");
        }
        self.submitter.flush()?;
        self.in_frame = false;

        let stats = self.submitter.stats;
        log::trace!(
            "Frame submitted: {} draw calls, {} triangles",
            stats.draw_calls(),
            stats.primitives_submitted
        );
        Ok(())
    }

    /// Upload the pending batch and issue its draw call
    pub fn flush(&mut self) -> RenderResult<()> {
        self.submitter.flush()
    }

    /// Append a mesh to the batch in its own coordinates
    ///
    /// A mesh too large for the batch is drawn through the immediate path.
    pub fn add_mesh(&mut self, mesh: &Mesh) -> RenderResult<()> {
        self.submitter.add_mesh(mesh)
    }

    /// Append a mesh after baking `world` and `tint` into its vertices
    pub fn add_mesh_transformed(&mut self, mesh: &Mesh, world: &Mat4, tint: Color) -> RenderResult<()> {
        self.submitter.add_mesh_transformed(mesh, world, tint)
    }

    /// Append a cached mesh to the batch
    pub fn add_mesh_handle(&mut self, handle: MeshHandle) -> RenderResult<()> {
        let mesh = self.meshes.get(handle).ok_or(RenderError::MissingMesh(handle))?;
        self.submitter.add_mesh(mesh)
    }

    /// Append a cached mesh after baking `world` and `tint` into its vertices
    pub fn add_mesh_handle_transformed(&mut self, handle: MeshHandle, world: &Mat4, tint: Color) -> RenderResult<()> {
        let mesh = self.meshes.get(handle).ok_or(RenderError::MissingMesh(handle))?;
        self.submitter.add_mesh_transformed(mesh, world, tint)
    }

    /// Append a line segment as a thin quad
    ///
    /// The quad is widened perpendicular to the segment and to world up, or to
    /// world right when the segment is nearly vertical. Zero-length segments
    /// draw nothing.
    pub fn add_line(&mut self, start: Vec3, end: Vec3, color: Color, thickness: f32) -> RenderResult<()> {
        let Some(direction) = try_normalize(end - start) else {
            log::trace!("Skipping zero-length line at {start:?}");
            return Ok(());
        };

        let reference = if direction.dot(&world_up()).abs() > PARALLEL_THRESHOLD {
            world_right()
        } else {
            world_up()
        };
        let Some(side) = try_normalize(direction.cross(&reference)) else {
            return Ok(());
        };
        let perpendicular = side * (thickness * 0.5);
        let normal = direction.cross(&side);

        self.submitter.add_quad(
            [start - perpendicular, start + perpendicular, end + perpendicular, end - perpendicular],
            normal,
            color,
        )
    }

    /// Append a flat-shaded triangle; the normal comes from the winding
    pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color) -> RenderResult<()> {
        let normal = face_normal(a, b, c);
        self.submitter.add_triangle([
            Vertex::new(a, normal, color),
            Vertex::new(b, normal, color),
            Vertex::new(c, normal, color),
        ])
    }

    /// Append a triangle with explicit per-vertex normals
    pub fn add_triangle_with_normals(&mut self, vertices: [Vertex; 3]) -> RenderResult<()> {
        self.submitter.add_triangle(vertices)
    }

    /// Draw one mesh immediately under its own world matrix and tint
    ///
    /// Any pending batch is flushed first, and the shared world matrix and
    /// white tint are restored afterwards.
    pub fn draw_mesh(&mut self, mesh: &Mesh, world: &Mat4, tint: Color) -> RenderResult<()> {
        self.submitter.draw_mesh(mesh, world, tint)
    }

    /// Draw a cached mesh immediately
    pub fn draw_mesh_handle(&mut self, handle: MeshHandle, world: &Mat4, tint: Color) -> RenderResult<()> {
        let mesh = self.meshes.get(handle).ok_or(RenderError::MissingMesh(handle))?;
        self.submitter.draw_mesh(mesh, world, tint)
    }

    /// Perspective projection helper
    pub fn perspective_projection(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective(fov_y, aspect, near, far)
    }

    /// Screen-space orthographic projection helper (origin top-left, y down)
    pub fn orthographic_projection(width: f32, height: f32) -> Mat4 {
        Mat4::orthographic_off_center(0.0, width, height, 0.0, -1.0, 1.0)
    }

    /// Mesh cache owned by this renderer
    pub fn meshes(&self) -> &MeshCache {
        &self.meshes
    }

    /// Mutable mesh cache owned by this renderer
    pub fn meshes_mut(&mut self) -> &mut MeshCache {
        &mut self.meshes
    }

    /// Current pending batch
    pub fn batch(&self) -> &RenderBatch {
        &self.submitter.batch
    }

    /// Statistics since the last `begin`
    pub fn stats(&self) -> BatchStats {
        self.submitter.stats
    }

    /// Shared transform state
    pub fn transforms(&self) -> &ShaderTransforms {
        &self.submitter.transforms
    }

    /// Batch configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Whether a `begin`/`end` bracket is open
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Borrow the backend as its concrete type
    pub fn backend_as<T: RenderBackend + 'static>(&self) -> Option<&T> {
        self.submitter.backend.as_any().downcast_ref::<T>()
    }

    /// Borrow the backend mutably as its concrete type
    pub fn backend_as_mut<T: RenderBackend + 'static>(&mut self) -> Option<&mut T> {
        self.submitter.backend.as_any_mut().downcast_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::{BackendCommand, RecordingBackend};
    use crate::render::geometry::build_pyramid;
    use approx::assert_relative_eq;

    fn renderer(max_vertices: usize, max_indices: usize) -> PrimitiveRenderer {
        PrimitiveRenderer::new(
            Box::new(RecordingBackend::new()),
            BatchConfig::new(max_vertices, max_indices),
        )
        .unwrap()
    }

    fn recorder(renderer: &PrimitiveRenderer) -> &RecordingBackend {
        renderer.backend_as::<RecordingBackend>().unwrap()
    }

    #[test]
    fn test_rejects_invalid_capacity() {
        let result = PrimitiveRenderer::new(Box::new(RecordingBackend::new()), BatchConfig::new(2, 15000));
        assert!(matches!(result, Err(RenderError::InvalidArgument(_))));
    }

    #[test]
    fn test_overflow_flushes_once_before_append() {
        // Room for two quads by vertices
        let mut renderer = renderer(8, 100);
        renderer.begin();
        renderer.add_line(Vec3::zeros(), Vec3::x(), Color::RED, 0.1).unwrap();
        renderer.add_line(Vec3::zeros(), Vec3::z(), Color::RED, 0.1).unwrap();
        assert_eq!(renderer.stats().flush_count, 0);

        renderer.add_line(Vec3::zeros(), Vec3::y(), Color::RED, 0.1).unwrap();

        assert_eq!(renderer.stats().flush_count, 1);
        assert_eq!(renderer.batch().vertex_count(), 4);
        assert_eq!(renderer.batch().index_count(), 6);
        assert_eq!(recorder(&renderer).draw_calls(), vec![(0, 4)]);
    }

    #[test]
    fn test_index_overflow_also_flushes() {
        let mut renderer = renderer(1000, 9);
        renderer.begin();
        renderer.add_line(Vec3::zeros(), Vec3::x(), Color::RED, 0.1).unwrap();
        renderer.add_triangle(Vec3::zeros(), Vec3::x(), Vec3::y(), Color::RED).unwrap();
        assert_eq!(renderer.stats().flush_count, 0);

        renderer.add_triangle(Vec3::zeros(), Vec3::x(), Vec3::y(), Color::RED).unwrap();

        assert_eq!(renderer.stats().flush_count, 1);
        assert_eq!(renderer.batch().vertex_count(), 3);
        assert_eq!(renderer.batch().index_count(), 3);
    }

    #[test]
    fn test_indices_are_offset_by_vertex_count() {
        let mut renderer = renderer(100, 100);
        renderer.begin();
        renderer.add_triangle(Vec3::zeros(), Vec3::x(), Vec3::y(), Color::WHITE).unwrap();
        renderer.add_line(Vec3::zeros(), Vec3::x(), Color::WHITE, 0.1).unwrap();

        assert_eq!(renderer.batch().indices(), &[0, 1, 2, 3, 4, 5, 3, 5, 6]);
    }

    #[test]
    fn test_line_quad_geometry() {
        let mut renderer = renderer(100, 100);
        renderer.begin();
        renderer.add_line(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), Color::RED, 0.2).unwrap();

        let vertices = renderer.batch().vertices();
        assert_eq!(vertices.len(), 4);
        // direction +X, reference +Y: side = X x Y = +Z, normal = X x Z = -Y
        assert_relative_eq!(vertices[0].position(), Vec3::new(0.0, 0.0, -0.1), epsilon = 1e-6);
        assert_relative_eq!(vertices[1].position(), Vec3::new(0.0, 0.0, 0.1), epsilon = 1e-6);
        assert_relative_eq!(vertices[2].position(), Vec3::new(2.0, 0.0, 0.1), epsilon = 1e-6);
        assert_relative_eq!(vertices[3].position(), Vec3::new(2.0, 0.0, -0.1), epsilon = 1e-6);
        assert_relative_eq!(vertices[0].normal(), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_vertical_line_uses_secondary_reference() {
        let mut renderer = renderer(100, 100);
        renderer.begin();
        renderer.add_line(Vec3::zeros(), Vec3::new(0.0, 2.0, 0.0), Color::GREEN, 0.5).unwrap();

        for vertex in renderer.batch().vertices() {
            assert!(vertex.position().iter().all(|c| c.is_finite()));
            assert_relative_eq!(vertex.normal().norm(), 1.0, epsilon = 1e-6);
        }
        let width = (renderer.batch().vertices()[1].position() - renderer.batch().vertices()[0].position()).norm();
        assert_relative_eq!(width, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_length_line_is_skipped() {
        let mut renderer = renderer(100, 100);
        renderer.begin();
        renderer.add_line(Vec3::x(), Vec3::x(), Color::RED, 0.1).unwrap();
        assert!(renderer.batch().is_empty());
    }

    #[test]
    fn test_draw_mesh_flushes_pending_batch_first() {
        let mut renderer = renderer(100, 100);
        let pyramid = build_pyramid(2.0, 3.0, Color::WHITE);
        let world = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));

        renderer.begin();
        renderer.add_line(Vec3::zeros(), Vec3::x(), Color::RED, 0.1).unwrap();
        renderer.draw_mesh(&pyramid, &world, Color::BLUE).unwrap();
        renderer.end().unwrap();

        assert_eq!(recorder(&renderer).draw_calls(), vec![(0, 2), (0, 6)]);
        assert_eq!(renderer.stats().flush_count, 1);
        assert_eq!(renderer.stats().immediate_draws, 1);
    }

    #[test]
    fn test_draw_mesh_restores_shared_state() {
        let mut renderer = renderer(100, 100);
        let pyramid = build_pyramid(1.0, 1.0, Color::WHITE);
        let world = Mat4::new_translation(&Vec3::new(5.0, 0.0, 0.0));

        renderer.begin();
        renderer.backend_as_mut::<RecordingBackend>().unwrap().clear();
        renderer.draw_mesh(&pyramid, &world, Color::RED).unwrap();

        let commands = recorder(&renderer).commands();
        let shared = *renderer.transforms();
        assert_eq!(commands[0], BackendCommand::SetTransforms(shared.with_world(world)));
        assert_eq!(commands[1], BackendCommand::SetTint(Color::RED));
        assert!(matches!(commands[2], BackendCommand::Upload { .. }));
        assert_eq!(commands[3], BackendCommand::DrawIndexed { first_index: 0, primitive_count: 6 });
        assert_eq!(commands[4], BackendCommand::SetTransforms(shared));
        assert_eq!(commands[5], BackendCommand::SetTint(Color::WHITE));
    }

    #[test]
    fn test_oversized_mesh_takes_immediate_path() {
        let mut renderer = renderer(8, 100);
        let pyramid = build_pyramid(2.0, 3.0, Color::WHITE);

        renderer.begin();
        renderer.add_mesh(&pyramid).unwrap();

        assert!(renderer.batch().is_empty());
        assert_eq!(renderer.stats().immediate_draws, 1);
    }

    #[test]
    fn test_mesh_transformed_bakes_world_matrix() {
        let mut renderer = renderer(100, 100);
        let pyramid = build_pyramid(2.0, 3.0, Color::WHITE);
        let world = Mat4::new_translation(&Vec3::new(0.0, 10.0, 0.0));

        renderer.begin();
        renderer.add_mesh_transformed(&pyramid, &world, Color::RED).unwrap();

        let apex = renderer.batch().vertices()[6];
        assert_relative_eq!(apex.position(), Vec3::new(0.0, 13.0, 0.0), epsilon = 1e-5);
        assert_eq!(apex.color(), Color::RED);
    }

    #[test]
    fn test_end_flushes_and_begin_resets_stats() {
        let mut renderer = renderer(100, 100);
        renderer.begin();
        renderer.add_triangle(Vec3::zeros(), Vec3::x(), Vec3::y(), Color::WHITE).unwrap();
        renderer.end().unwrap();

        assert!(renderer.batch().is_empty());
        assert_eq!(renderer.stats().flush_count, 1);
        assert_eq!(renderer.stats().primitives_submitted, 1);

        renderer.begin();
        assert_eq!(renderer.stats(), BatchStats::default());
        renderer.end().unwrap();
        assert_eq!(renderer.stats().flush_count, 0);
    }

    #[test]
    fn test_set_matrices_flushes_pending_geometry() {
        let mut renderer = renderer(100, 100);
        renderer.begin();
        renderer.add_triangle(Vec3::zeros(), Vec3::x(), Vec3::y(), Color::WHITE).unwrap();
        renderer
            .set_matrices(Mat4::identity(), Mat4::new_scaling(2.0), None)
            .unwrap();

        assert_eq!(renderer.stats().flush_count, 1);
        assert_eq!(renderer.transforms().view, Mat4::new_scaling(2.0));
        assert_eq!(renderer.transforms().world, Mat4::identity());
    }

    #[test]
    fn test_set_matrices_without_world_resets_to_identity() {
        let mut renderer = renderer(100, 100);
        let shifted = Mat4::new_translation(&Vec3::new(100.0, 0.0, 0.0));
        renderer.set_matrices(Mat4::identity(), Mat4::identity(), Some(shifted)).unwrap();
        assert_eq!(renderer.transforms().world, shifted);

        renderer.set_matrices(Mat4::identity(), Mat4::identity(), None).unwrap();
        assert_eq!(renderer.transforms().world, Mat4::identity());

        // The backend no longer draws batches under the old shift
        let last = recorder(&renderer).commands().iter().rev().find_map(|command| match command {
            BackendCommand::SetTransforms(transforms) => Some(transforms.world),
            _ => None,
        });
        assert_eq!(last, Some(Mat4::identity()));
    }

    #[test]
    fn test_mesh_overflow_flushes_once() {
        let mut renderer = renderer(20, 100);
        let pyramid = build_pyramid(2.0, 3.0, Color::WHITE);
        renderer.begin();
        renderer.add_mesh(&pyramid).unwrap();
        assert_eq!(renderer.stats().flush_count, 0);

        renderer.add_mesh(&pyramid).unwrap();

        assert_eq!(renderer.stats().flush_count, 1);
        assert_eq!(renderer.batch().vertex_count(), 16);
        assert_eq!(renderer.batch().index_count(), 18);
        assert_eq!(&renderer.batch().indices()[..6], &[0, 2, 1, 0, 3, 2]);
        assert_eq!(recorder(&renderer).draw_calls(), vec![(0, 6)]);
    }

    #[test]
    fn test_transformed_mesh_overflow_flushes_once() {
        let mut renderer = renderer(20, 100);
        let pyramid = build_pyramid(2.0, 3.0, Color::WHITE);
        let world = Mat4::new_translation(&Vec3::new(5.0, 0.0, 0.0));
        renderer.begin();
        renderer.add_mesh_transformed(&pyramid, &world, Color::RED).unwrap();
        renderer.add_mesh_transformed(&pyramid, &world, Color::RED).unwrap();

        assert_eq!(renderer.stats().flush_count, 1);
        assert_eq!(renderer.batch().vertex_count(), 16);
        assert_eq!(renderer.batch().index_count(), 18);
        assert_eq!(renderer.batch().indices()[0], 0);
    }

    #[test]
    fn test_missing_mesh_handle() {
        let mut renderer = renderer(100, 100);
        let handle = renderer.meshes_mut().insert(build_pyramid(1.0, 1.0, Color::WHITE));
        renderer.meshes_mut().remove(handle);

        renderer.begin();
        let result = renderer.add_mesh_handle(handle);
        assert!(matches!(result, Err(RenderError::MissingMesh(h)) if h == handle));
    }
}
