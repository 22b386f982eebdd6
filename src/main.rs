use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use tribench::bench::{SystemClock, report_line, run_benchmark};
use tribench::config::{AppConfig, Command, USAGE, parse_args};
use tribench::renderer::GpuState;

const SETTLE_PAUSE: Duration = Duration::from_millis(250);
const SCREENSHOT_HOLD: Duration = Duration::from_secs(5);

struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    finished: bool,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            finished: false,
            failure: None,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), &self.config))
            .context("Failed to initialize the GPU")?;

        let size = gpu.size;
        let requested = (self.config.width, self.config.height);
        if self.config.fit_viewport(size.width, size.height) {
            warn!(
                "window is {}x{} instead of {}x{}, running at the window size",
                size.width, size.height, requested.0, requested.1
            );
        }

        print_info(&gpu, &window, &self.config);

        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };

        let clock = SystemClock::new();
        let stats = run_benchmark(&self.config, gpu, &clock)?;

        std::thread::sleep(SETTLE_PAUSE);

        println!("verts/frame = {} ", stats.vertices_per_draw);
        println!("nframes = {} ", stats.frames);
        eprintln!("{}", report_line(self.config.triangle_area, &stats));

        gpu.present().context("Failed to present the canvas")?;

        if self.config.screenshot_mode {
            std::thread::sleep(SCREENSHOT_HOLD);
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("tribench")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow::anyhow!("Failed to create window: {e}")),
        };

        if let Err(e) = self.init_gpu(window.clone()) {
            return self.fail(event_loop, e);
        }

        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed
                {
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
            }

            WindowEvent::RedrawRequested if !self.finished => {
                self.finished = true;
                match self.run() {
                    Ok(()) => event_loop.exit(),
                    Err(e) => self.fail(event_loop, e),
                }
            }

            _ => {}
        }
    }
}

fn print_info(gpu: &GpuState, window: &Window, config: &AppConfig) {
    let adapter = &gpu.adapter_info;
    let size = window.inner_size();
    let position = window.outer_position().unwrap_or_default();

    println!("--------------------------------------------------");
    println!("Vendor:      {:#06x}", adapter.vendor);
    println!("Renderer:    {}", adapter.name);
    println!(
        "Version:     {:?} {} {}",
        adapter.backend, adapter.driver, adapter.driver_info
    );
    println!("Format:      {:?}", gpu.config.format);
    println!(
        "Geometry:    {}x{}+{}+{}",
        size.width, size.height, position.x, position.y
    );
    if let Some(monitor) = window.current_monitor() {
        let screen = monitor.size();
        println!("Screen:      {}x{}", screen.width, screen.height);
    }
    println!("--------------------------------------------------");

    println!("Triangle area\t{:4.3} (pixels^2)", config.triangle_area);
    println!("Test duration\t{:.6}(s)", config.test_duration_seconds);
    println!("Screen W/H\t({},{})", config.width, config.height);
    println!("Triangle limit\t{}", config.triangle_limit);
    println!("VertexBuf limit\t{}", config.vertex_buf_limit);
    println!("Triangle type\t{} ", config.triangle_type.code());
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .format_timestamp_micros()
    .init();

    let config = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print!("{USAGE}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            eprint!("{USAGE}");
            std::process::exit(1);
        }
    };

    info!(
        "area={} duration={}s limits={}/{} outline={}",
        config.triangle_area,
        config.test_duration_seconds,
        config.triangle_limit,
        config.vertex_buf_limit,
        config.outline_mode
    );

    let event_loop =
        EventLoop::new().map_err(|e| anyhow::anyhow!("Failed to create the event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop failed: {e}"))?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
