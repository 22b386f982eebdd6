use glam::{Mat4, Vec2, Vec3};

use crate::bench::clock::Clock;
use crate::bench::stats::{RunCounters, RunStats, reduce};
use crate::bench::surface::{PolygonMode, RenderSurface, SurfaceSetup};
use crate::config::AppConfig;
use crate::error::{CrateResult, RendererError};
use crate::mesh::{effective_triangle_budget, generate_base_mesh, pack_disjoint_triangles};

pub const ROTATION_STEP_DEGREES: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Setup,
    Drawing,
    Teardown,
}

pub fn pixel_space_projection(width: u32, height: u32) -> Mat4 {
    Mat4::from_translation(Vec3::new(-1.0, -1.0, 0.0))
        * Mat4::from_scale(Vec3::new(2.0 / width as f32, 2.0 / height as f32, 1.0))
}

pub fn rotation_about(center: Vec2, degrees: f32) -> Mat4 {
    Mat4::from_translation(center.extend(0.0))
        * Mat4::from_rotation_z(degrees.to_radians())
        * Mat4::from_translation(-center.extend(0.0))
}

/// Any error the surface reports once drawing is over fails the whole run.
pub fn run_benchmark<S, C>(config: &AppConfig, surface: &mut S, clock: &C) -> CrateResult<RunStats>
where
    S: RenderSurface,
    C: Clock,
{
    log::debug!("phase {:?}", RunPhase::Setup);

    let setup = SurfaceSetup {
        polygon_mode: if config.outline_mode {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        },
        width: config.width,
        height: config.height,
    };
    surface.configure(&setup)?;

    let outcome = surface.with_transform_scope(|surface| -> CrateResult<(RunCounters, f64)> {
        surface.load_transform(pixel_space_projection(config.width, config.height));

        let mesh = generate_base_mesh(config.triangle_area, config.width, config.height)?;
        let budget = effective_triangle_budget(config.triangle_limit, config.vertex_buf_limit);
        let dispatch = pack_disjoint_triangles(&mesh, budget)?;
        let draw_count =
            u32::try_from(dispatch.vertex_count).map_err(|_| RendererError::InvalidValue)?;

        surface.bind_vertices(&dispatch.vertices)?;
        surface.finish();

        log::debug!("phase {:?}", RunPhase::Drawing);
        log::info!(
            "drawing {} triangles per call for {:.2}s",
            dispatch.triangle_count,
            config.test_duration_seconds
        );

        let step = rotation_about(
            Vec2::new(config.width as f32 * 0.5, config.height as f32 * 0.5),
            ROTATION_STEP_DEGREES,
        );
        let mut counters = RunCounters {
            vertices_per_draw: dispatch.vertex_count,
            ..Default::default()
        };

        let duration = if config.test_duration_seconds.is_finite() {
            config.test_duration_seconds
        } else {
            0.0
        };

        let start = clock.now();
        loop {
            surface.draw_triangles(draw_count);
            surface.apply_transform(step);
            let now = clock.now();

            counters.frames += 1;
            counters.total_triangles += dispatch.triangle_count as u64;
            counters.total_vertices += dispatch.vertex_count as u64;

            if config.screenshot_mode || now - start >= duration {
                break;
            }
        }

        log::debug!("phase {:?}", RunPhase::Teardown);
        surface.finish();
        let end = clock.now();

        Ok((counters, end - start))
    });

    surface.release();

    if let Some(err) = surface.take_error() {
        return Err(err.into());
    }

    let (counters, elapsed) = outcome?;
    log::info!(
        "{} frames in {elapsed:.3}s, {} vertices per draw",
        counters.frames,
        counters.vertices_per_draw
    );

    reduce(&counters, elapsed, config.triangle_area)
}
