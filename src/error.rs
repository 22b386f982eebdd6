//! Error types for the triangle-rate benchmark

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererError {
    #[error("Invalid Enum")]
    InvalidEnum,

    #[error("Invalid Value")]
    InvalidValue,

    #[error("Invalid Operation")]
    InvalidOperation,

    #[error("Stack Overflow")]
    StackOverflow,

    #[error("Stack Underflow")]
    StackUnderflow,

    #[error("Out of Memory")]
    OutOfMemory,

    #[error("Unknown")]
    Unknown,
}

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Unrecognized argument: {0}")]
    UnrecognizedArgument(String),

    #[error("Argument {0} expects a value")]
    MissingValue(String),

    #[error("Renderer error: {0}")]
    Renderer(#[from] RendererError),

    #[error("Failed to allocate {what} for {count} vertices")]
    Allocation { what: &'static str, count: usize },

    #[error("Elapsed time is zero, throughput is undefined")]
    ZeroElapsed,

    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Failed to compile {path}: {message}")]
    ShaderCompile { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with [`BenchError`]
pub type CrateResult<T> = std::result::Result<T, BenchError>;
