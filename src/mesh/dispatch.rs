use crate::error::{BenchError, CrateResult};
use crate::mesh::geometry::{BaseMesh, MeshVertex};

#[derive(Debug)]
pub struct DispatchBuffer {
    pub vertices: Vec<MeshVertex>,
    pub triangle_count: usize,
    pub vertex_count: usize,
}

impl DispatchBuffer {
    pub fn triangles(&self) -> impl Iterator<Item = &[MeshVertex]> {
        self.vertices.chunks_exact(3)
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

pub fn effective_triangle_budget(triangle_limit: usize, vertex_buf_limit: usize) -> usize {
    triangle_limit.min(vertex_buf_limit / 3)
}

/// Two triangles per grid quad, row-major. The result is always a prefix of
/// the uncapped emission order.
pub fn pack_disjoint_triangles(
    mesh: &BaseMesh,
    triangle_capacity: usize,
) -> CrateResult<DispatchBuffer> {
    let triangle_count = mesh.triangle_count().min(triangle_capacity);
    let vertex_count = triangle_count * 3;

    let mut vertices = Vec::new();
    vertices
        .try_reserve_exact(vertex_count)
        .map_err(|_| BenchError::Allocation {
            what: "dispatch buffer",
            count: vertex_count,
        })?;

    let axis = mesh.axis_vertex_count;
    let stride = mesh.row_stride();
    let base = &mesh.vertices;

    'quads: for j in 0..axis {
        for i in 0..axis {
            let s = j * stride + i;
            let quad = [
                [s, s + 1, s + stride],
                [s + stride, s + 1, s + stride + 1],
            ];

            for triangle in quad {
                if vertices.len() == vertex_count {
                    break 'quads;
                }
                vertices.extend(triangle.iter().map(|&idx| base[idx]));
            }
        }
    }

    log::debug!(
        "packed {triangle_count} of {} mesh triangles ({vertex_count} vertices)",
        mesh.triangle_count()
    );

    Ok(DispatchBuffer {
        vertices,
        triangle_count,
        vertex_count,
    })
}
