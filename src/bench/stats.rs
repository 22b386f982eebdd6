use crate::error::{BenchError, CrateResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub total_triangles: u64,
    pub total_vertices: u64,
    pub frames: u64,
    pub vertices_per_draw: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunStats {
    pub fps: f64,
    pub tris_per_sec: f64,
    pub vertex_ops_per_sec: f64,
    /// Millions of fragments per second, assuming every triangle rasterizes
    /// its full nominal area.
    pub frags_per_sec: f64,
    pub vertices_per_draw: usize,
    pub indices_per_draw: usize,
    pub frames: u64,
    pub elapsed_seconds: f64,
}

pub fn reduce(
    counters: &RunCounters,
    elapsed_seconds: f64,
    triangle_area: f64,
) -> CrateResult<RunStats> {
    if !(elapsed_seconds > 0.0) || !elapsed_seconds.is_finite() {
        return Err(BenchError::ZeroElapsed);
    }

    let tris_per_sec = counters.total_triangles as f64 / 1e6 / elapsed_seconds;
    let vertex_ops_per_sec = counters.total_vertices as f64 / 1e6 / elapsed_seconds;

    Ok(RunStats {
        // counts frame boundaries rather than frames
        fps: (counters.frames as f64 + 1.0) / elapsed_seconds,
        tris_per_sec,
        vertex_ops_per_sec,
        frags_per_sec: tris_per_sec * triangle_area,
        vertices_per_draw: counters.vertices_per_draw,
        indices_per_draw: 0,
        frames: counters.frames,
        elapsed_seconds,
    })
}

pub fn report_line(triangle_area: f64, stats: &RunStats) -> String {
    format!(
        " TriBench: area={:2.1} px, tri rate = {:3.2} Mtri/sec, vertex rate={:3.2} Mverts/sec, fill rate = {:4.2} Mpix/sec, verts/bucket={}, indices/bucket={}",
        triangle_area,
        stats.tris_per_sec,
        stats.vertex_ops_per_sec,
        stats.frags_per_sec,
        stats.vertices_per_draw,
        stats.indices_per_draw,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn counters(tris: u64, verts: u64, frames: u64) -> RunCounters {
        RunCounters {
            total_triangles: tris,
            total_vertices: verts,
            frames,
            vertices_per_draw: 300,
        }
    }

    #[test]
    fn rates_in_millions_per_second() {
        let stats = reduce(&counters(10_000_000, 30_000_000, 99), 2.0, 8.0).unwrap();
        assert_eq!(stats.tris_per_sec, 5.0);
        assert_eq!(stats.vertex_ops_per_sec, 15.0);
        assert_eq!(stats.fps, 50.0);
        assert_eq!(stats.frags_per_sec, 40.0);
        assert_eq!(stats.vertices_per_draw, 300);
        assert_eq!(stats.indices_per_draw, 0);
        assert_eq!(stats.frames, 99);
    }

    #[test]
    fn reduce_is_deterministic() {
        let c = counters(123_456, 370_368, 17);
        assert_eq!(reduce(&c, 0.37, 12.5).unwrap(), reduce(&c, 0.37, 12.5).unwrap());
    }

    #[test]
    fn triangle_rate_scales_linearly() {
        let one = reduce(&counters(1_000_000, 0, 1), 4.0, 1.0).unwrap();
        let three = reduce(&counters(3_000_000, 0, 1), 4.0, 1.0).unwrap();
        assert!((three.tris_per_sec - 3.0 * one.tris_per_sec).abs() < 1e-12);
    }

    #[test]
    fn zero_elapsed_is_an_error() {
        let err = reduce(&counters(1, 3, 1), 0.0, 128.0).unwrap_err();
        assert!(matches!(err, BenchError::ZeroElapsed));
        assert!(reduce(&counters(1, 3, 1), -1.0, 128.0).is_err());
        assert!(reduce(&counters(1, 3, 1), f64::NAN, 128.0).is_err());
    }

    #[test]
    fn report_line_format() {
        let stats = reduce(&counters(10_000_000, 30_000_000, 99), 2.0, 8.0).unwrap();
        assert_eq!(
            report_line(8.0, &stats),
            " TriBench: area=8.0 px, tri rate = 5.00 Mtri/sec, vertex rate=15.00 Mverts/sec, fill rate = 40.00 Mpix/sec, verts/bucket=300, indices/bucket=0"
        );
    }
}
