//! Triangle and vertex throughput benchmark.
//!
//! A square grid of triangles with a chosen on-screen area is drawn over and
//! over for a fixed wall-clock duration while it slowly rotates about the
//! viewport center; the accumulated counts are reduced to triangles, vertices,
//! fragments and frames per second.

pub mod bench;
pub mod config;
pub mod error;
pub mod mesh;
pub mod renderer;

pub use bench::{RunStats, run_benchmark};
pub use config::{AppConfig, Command, parse_args};
pub use error::{BenchError, CrateResult, RendererError};
