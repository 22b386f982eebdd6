pub mod canvas;
pub mod gpu;
pub mod shader;

pub use canvas::Canvas;
pub use gpu::GpuState;
pub use shader::{BUILTIN_SHADER, draw_shader_module, load_shader_module};
