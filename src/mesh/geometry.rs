use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::error::{BenchError, CrateResult};

// Only position and color reach the draw pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: Vec2,
    pub color: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

#[derive(Debug)]
pub struct BaseMesh {
    pub vertices: Vec<MeshVertex>,
    pub axis_vertex_count: usize,
    pub spacing: f64,
}

impl BaseMesh {
    pub fn row_stride(&self) -> usize {
        self.axis_vertex_count + 1
    }

    pub fn quad_count(&self) -> usize {
        self.axis_vertex_count * self.axis_vertex_count
    }

    pub fn triangle_count(&self) -> usize {
        if self.vertices.is_empty() {
            0
        } else {
            self.quad_count() * 2
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

pub fn grid_spacing(target_area: f64) -> f64 {
    (2.0 * target_area).sqrt()
}

/// Quads per axis. The grid spans half of the smaller viewport dimension.
pub fn axis_vertex_count(spacing: f64, width: u32, height: u32) -> CrateResult<usize> {
    let usable = f64::from(width.min(height)) / 2.0;
    if !(spacing > 0.0) || !spacing.is_finite() {
        return Ok(0);
    }
    let count = (usable / spacing).floor();
    if !count.is_finite() || count >= usize::MAX as f64 {
        return Err(BenchError::Allocation {
            what: "base mesh",
            count: usize::MAX,
        });
    }
    Ok(if count >= 0.0 { count as usize } else { 0 })
}

pub fn generate_base_mesh(target_area: f64, width: u32, height: u32) -> CrateResult<BaseMesh> {
    let spacing = grid_spacing(target_area);

    if !(target_area > 0.0) || width == 0 || height == 0 {
        log::debug!("degenerate mesh request: area={target_area} viewport={width}x{height}");
        return Ok(BaseMesh {
            vertices: Vec::new(),
            axis_vertex_count: 0,
            spacing,
        });
    }

    let axis = axis_vertex_count(spacing, width, height)?;
    let count = axis
        .checked_add(1)
        .and_then(|stride| stride.checked_mul(stride))
        .ok_or(BenchError::Allocation {
            what: "base mesh",
            count: usize::MAX,
        })?;
    let stride = axis + 1;

    let mut vertices = Vec::new();
    vertices
        .try_reserve_exact(count)
        .map_err(|_| BenchError::Allocation {
            what: "base mesh",
            count,
        })?;

    let (w, h) = (width as f32, height as f32);
    let origin = Vec2::new(0.25 * w, 0.25 * h);
    let center = Vec2::new(0.5 * w, 0.5 * h);
    let eye_height = (w + h) * 0.25;
    let ramp = if axis > 0 { 1.0 / axis as f32 } else { 0.0 };

    // red and s grow along x, green and t along y
    for j in 0..stride {
        let y = origin.y as f64 + j as f64 * spacing;
        let v = j as f32 * ramp;

        for i in 0..stride {
            let x = origin.x as f64 + i as f64 * spacing;
            let u = i as f32 * ramp;
            let position = Vec2::new(x as f32, y as f32);

            vertices.push(MeshVertex {
                position,
                color: Vec3::new(u, v, 1.0),
                normal: normalize_normal((position - center).extend(eye_height)),
                tex_coord: Vec2::new(u, v),
            });
        }
    }

    log::debug!(
        "base mesh: spacing={spacing:.3} axis={axis} vertices={}",
        vertices.len()
    );

    Ok(BaseMesh {
        vertices,
        axis_vertex_count: axis,
        spacing,
    })
}

fn normalize_normal(n: Vec3) -> Vec3 {
    let len = n.length();
    if len != 0.0 { n / len } else { n }
}
