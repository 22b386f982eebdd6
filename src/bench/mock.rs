use std::cell::Cell;

use glam::Mat4;

use crate::bench::clock::Clock;
use crate::bench::surface::{RenderSurface, SurfaceSetup};
use crate::error::{CrateResult, RendererError};
use crate::mesh::MeshVertex;

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Configure(SurfaceSetup),
    Push,
    Pop,
    Load(Mat4),
    Apply(Mat4),
    Bind(usize),
    Draw(u32),
    Finish,
    Release,
}

pub struct MockSurface {
    calls: Vec<SurfaceCall>,
    current: Mat4,
    stack: Vec<Mat4>,
    bound: Option<usize>,
    errors: Vec<RendererError>,
    pub inject_error: Option<RendererError>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            current: Mat4::IDENTITY,
            stack: Vec::new(),
            bound: None,
            errors: Vec::new(),
            inject_error: None,
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn current(&self) -> Mat4 {
        self.current
    }

    pub fn draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Draw(_)))
            .count()
    }
}

impl RenderSurface for MockSurface {
    fn configure(&mut self, setup: &SurfaceSetup) -> CrateResult<()> {
        self.calls.push(SurfaceCall::Configure(*setup));
        Ok(())
    }

    fn push_transforms(&mut self) {
        self.calls.push(SurfaceCall::Push);
        self.stack.push(self.current);
    }

    fn pop_transforms(&mut self) {
        self.calls.push(SurfaceCall::Pop);
        match self.stack.pop() {
            Some(m) => self.current = m,
            None => self.errors.push(RendererError::StackUnderflow),
        }
    }

    fn load_transform(&mut self, matrix: Mat4) {
        self.calls.push(SurfaceCall::Load(matrix));
        self.current = matrix;
    }

    fn apply_transform(&mut self, matrix: Mat4) {
        self.calls.push(SurfaceCall::Apply(matrix));
        self.current *= matrix;
    }

    fn bind_vertices(&mut self, vertices: &[MeshVertex]) -> CrateResult<()> {
        self.calls.push(SurfaceCall::Bind(vertices.len()));
        self.bound = Some(vertices.len());
        Ok(())
    }

    fn draw_triangles(&mut self, vertex_count: u32) {
        self.calls.push(SurfaceCall::Draw(vertex_count));
        if self.bound.is_none_or(|len| vertex_count as usize > len) {
            self.errors.push(RendererError::InvalidValue);
        }
    }

    fn finish(&mut self) {
        self.calls.push(SurfaceCall::Finish);
    }

    fn release(&mut self) {
        self.calls.push(SurfaceCall::Release);
        self.bound = None;
    }

    fn take_error(&mut self) -> Option<RendererError> {
        if let Some(err) = self.inject_error.take() {
            return Some(err);
        }
        let first = self.errors.first().copied();
        self.errors.clear();
        first
    }
}

pub struct StepClock {
    now: Cell<f64>,
    step: f64,
    reads: Cell<usize>,
}

impl StepClock {
    pub fn new(step: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            step,
            reads: Cell::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl Clock for StepClock {
    fn now(&self) -> f64 {
        let t = self.now.get();
        self.now.set(t + self.step);
        self.reads.set(self.reads.get() + 1);
        t
    }
}
