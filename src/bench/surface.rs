use glam::Mat4;

use crate::error::{CrateResult, RendererError};
use crate::mesh::MeshVertex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSetup {
    pub polygon_mode: PolygonMode,
    pub width: u32,
    pub height: u32,
}

/// `apply_transform(m)` post-multiplies: the current matrix `c` becomes `c * m`.
pub trait RenderSurface {
    fn configure(&mut self, setup: &SurfaceSetup) -> CrateResult<()>;

    fn push_transforms(&mut self);

    fn pop_transforms(&mut self);

    fn load_transform(&mut self, matrix: Mat4);

    fn apply_transform(&mut self, matrix: Mat4);

    fn bind_vertices(&mut self, vertices: &[MeshVertex]) -> CrateResult<()>;

    fn draw_triangles(&mut self, vertex_count: u32);

    /// Blocks until every submitted command has completed.
    fn finish(&mut self);

    fn release(&mut self);

    /// Returns and clears the first error recorded since the last call.
    fn take_error(&mut self) -> Option<RendererError>;

    fn with_transform_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        self.push_transforms();
        let result = f(self);
        self.pop_transforms();
        result
    }
}
