pub mod dispatch;
pub mod geometry;


pub use dispatch::{DispatchBuffer, effective_triangle_budget, pack_disjoint_triangles};
pub use geometry::{BaseMesh, MeshVertex, generate_base_mesh};
