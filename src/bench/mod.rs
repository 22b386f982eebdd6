pub mod clock;
pub mod run;
pub mod stats;
pub mod surface;

#[cfg(test)]
pub mod mock;

pub use clock::{Clock, SystemClock};
pub use run::{RunPhase, ROTATION_STEP_DEGREES, run_benchmark};
pub use stats::{RunCounters, RunStats, reduce, report_line};
pub use surface::{PolygonMode, RenderSurface, SurfaceSetup};
