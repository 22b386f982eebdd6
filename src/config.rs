use std::path::PathBuf;

use crate::error::{BenchError, CrateResult};

pub const DEFAULT_TRIANGLE_AREA: f64 = 128.0;
pub const DEFAULT_TEST_DURATION_SECONDS: f64 = 5.0;
pub const DEFAULT_WIN_WIDTH: u32 = 1024;
pub const DEFAULT_WIN_HEIGHT: u32 = 1024;
pub const DEFAULT_TRIANGLE_LIMIT: usize = 1024 * 1024 * 1024;
pub const DEFAULT_VERTEXBUF_LIMIT: usize = 1024 * 1024 * 1024;

pub const USAGE: &str = "\
[-a AAAA]\tsets triangle area in pixels (double precision value)
[-tl LLLL]\tsets maximum number of triangles (-l is accepted as an alias)
[-vl VVVV]\tsets maximum number of vertices per draw call
[-s NNNN]\tsets the duration of the test in seconds
[-line]\tdraw triangle outlines, no fill (default)
[-fill]\tdraw filled triangles
[-shader PATH]\tload the draw shader from a WGSL file
[-screenshot]\trender one frame, hold it for 5 seconds, then exit
[-help]\tprint this message
";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TriangleType {
    #[default]
    Disjoint,
}

impl TriangleType {
    pub fn code(self) -> u32 {
        match self {
            TriangleType::Disjoint => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub triangle_area: f64,
    pub test_duration_seconds: f64,
    pub width: u32,
    pub height: u32,
    pub triangle_limit: usize,
    pub vertex_buf_limit: usize,
    pub outline_mode: bool,
    pub triangle_type: TriangleType,
    pub shader_path: Option<PathBuf>,
    pub screenshot_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            triangle_area: DEFAULT_TRIANGLE_AREA,
            test_duration_seconds: DEFAULT_TEST_DURATION_SECONDS,
            width: DEFAULT_WIN_WIDTH,
            height: DEFAULT_WIN_HEIGHT,
            triangle_limit: DEFAULT_TRIANGLE_LIMIT,
            vertex_buf_limit: DEFAULT_VERTEXBUF_LIMIT,
            outline_mode: true,
            triangle_type: TriangleType::Disjoint,
            shader_path: None,
            screenshot_mode: false,
        }
    }
}

impl AppConfig {
    /// Adopts the size the window actually got. Returns `true` if it differed.
    pub fn fit_viewport(&mut self, width: u32, height: u32) -> bool {
        if (width, height) == (self.width, self.height) || width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Run(AppConfig),
    Help,
}

/// Numeric values that fail to parse, or are not finite, become zero.
pub fn parse_args<I, S>(args: I) -> CrateResult<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut config = AppConfig::default();
    let mut args = args.into_iter().map(Into::into);

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "-a" => config.triangle_area = parse_float(&value_for(&flag, &mut args)?),
            "-s" => config.test_duration_seconds = parse_float(&value_for(&flag, &mut args)?),
            "-l" | "-tl" => config.triangle_limit = parse_count(&value_for(&flag, &mut args)?),
            "-vl" => config.vertex_buf_limit = parse_count(&value_for(&flag, &mut args)?),
            "-line" => config.outline_mode = true,
            "-fill" => config.outline_mode = false,
            "-shader" => config.shader_path = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            "-screenshot" => config.screenshot_mode = true,
            "-help" | "--help" => return Ok(Command::Help),
            _ => return Err(BenchError::UnrecognizedArgument(flag)),
        }
    }

    Ok(Command::Run(config))
}

fn value_for(flag: &str, args: &mut impl Iterator<Item = String>) -> CrateResult<String> {
    args.next()
        .ok_or_else(|| BenchError::MissingValue(flag.to_string()))
}

fn parse_float(value: &str) -> f64 {
    value
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_count(value: &str) -> usize {
    value.trim().parse().unwrap_or(0)
}
