use std::sync::Arc;

use glam::Mat4;
use parking_lot::Mutex;
use wgpu::util::DeviceExt;

use crate::bench::surface::{PolygonMode, RenderSurface, SurfaceSetup};
use crate::config::AppConfig;
use crate::error::{BenchError, CrateResult, RendererError};
use crate::mesh::MeshVertex;
use crate::renderer::canvas::Canvas;
use crate::renderer::shader::draw_shader_module;

const MAX_TRANSFORM_DEPTH: usize = 32;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub matrix: [[f32; 4]; 4],
}

pub fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(MeshVertex, position) as wgpu::BufferAddress,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(MeshVertex, color) as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    }
}

fn map_device_error(err: &wgpu::Error) -> RendererError {
    match err {
        wgpu::Error::OutOfMemory { .. } => RendererError::OutOfMemory,
        wgpu::Error::Validation { .. } => RendererError::InvalidOperation,
        _ => RendererError::Unknown,
    }
}

// Keeps the first error until it is taken; later ones are only counted.
#[derive(Debug, Default)]
struct ErrorSink {
    first: Option<RendererError>,
    dropped: usize,
}

impl ErrorSink {
    fn record(&mut self, err: RendererError) {
        if self.first.is_none() {
            self.first = Some(err);
        } else {
            self.dropped += 1;
        }
    }

    fn take(&mut self) -> Option<RendererError> {
        if self.dropped > 0 {
            log::warn!("{} further renderer errors dropped", self.dropped);
            self.dropped = 0;
        }
        self.first.take()
    }
}

struct VertexBinding {
    buffer: Option<wgpu::Buffer>,
    len: usize,
}

pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub adapter_info: wgpu::AdapterInfo,
    pub line_mode_supported: bool,

    shader: wgpu::ShaderModule,
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    pipeline_layout: wgpu::PipelineLayout,
    pipeline: Option<wgpu::RenderPipeline>,
    canvas: Canvas,

    binding: Option<VertexBinding>,
    current: Mat4,
    stack: Vec<Mat4>,
    errors: Arc<Mutex<ErrorSink>>,
}

impl GpuState {
    pub async fn new(
        window: Arc<winit::window::Window>,
        app_config: &AppConfig,
    ) -> CrateResult<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(BenchError::NoAdapter)?;

        let line_mode_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if line_mode_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features,
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let errors = Arc::new(Mutex::new(ErrorSink::default()));
        let sink = Arc::clone(&errors);
        device.on_uncaptured_error(Box::new(move |err: wgpu::Error| {
            log::error!("{err}");
            sink.lock().record(map_device_error(&err));
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = draw_shader_module(&device, app_config.shader_path.as_deref());

        let transform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Transform Buffer"),
            size: std::mem::size_of::<TransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let transform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Transform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: &transform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Triangle Pipeline Layout"),
            bind_group_layouts: &[&transform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let canvas = Canvas::new(&device, surface_format, app_config.width, app_config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            adapter_info: adapter.get_info(),
            line_mode_supported,
            shader,
            transform_buffer,
            transform_bind_group,
            pipeline_layout,
            pipeline: None,
            canvas,
            binding: None,
            current: Mat4::IDENTITY,
            stack: Vec::new(),
            errors,
        })
    }

    fn create_pipeline(&self, mode: wgpu::PolygonMode) -> wgpu::RenderPipeline {
        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Triangle Render Pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &self.shader,
                    entry_point: Some("vs_main"),
                    buffers: &[mesh_vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &self.shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    polygon_mode: mode,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }

    fn record(&self, err: RendererError) {
        self.errors.lock().record(err);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn present(&self) -> CrateResult<()> {
        self.canvas
            .present(&self.device, &self.queue, &self.surface, &self.config)
    }
}

impl RenderSurface for GpuState {
    fn configure(&mut self, setup: &SurfaceSetup) -> CrateResult<()> {
        let mode = match setup.polygon_mode {
            PolygonMode::Line if self.line_mode_supported => wgpu::PolygonMode::Line,
            PolygonMode::Line => {
                log::warn!("adapter lacks line polygon mode, drawing filled triangles");
                wgpu::PolygonMode::Fill
            }
            PolygonMode::Fill => wgpu::PolygonMode::Fill,
        };

        if (setup.width, setup.height) != (self.canvas.texture.width(), self.canvas.texture.height())
        {
            self.canvas = Canvas::new(&self.device, self.config.format, setup.width, setup.height);
        }

        self.pipeline = Some(self.create_pipeline(mode));
        self.canvas.clear(&self.device, &self.queue);
        Ok(())
    }

    fn push_transforms(&mut self) {
        if self.stack.len() >= MAX_TRANSFORM_DEPTH {
            self.record(RendererError::StackOverflow);
            return;
        }
        self.stack.push(self.current);
    }

    fn pop_transforms(&mut self) {
        match self.stack.pop() {
            Some(m) => self.current = m,
            None => self.record(RendererError::StackUnderflow),
        }
    }

    fn load_transform(&mut self, matrix: Mat4) {
        self.current = matrix;
    }

    fn apply_transform(&mut self, matrix: Mat4) {
        self.current *= matrix;
    }

    fn bind_vertices(&mut self, vertices: &[MeshVertex]) -> CrateResult<()> {
        let buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Dispatch Vertex Buffer"),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        self.binding = Some(VertexBinding {
            buffer,
            len: vertices.len(),
        });
        Ok(())
    }

    fn draw_triangles(&mut self, vertex_count: u32) {
        let (Some(pipeline), Some(binding)) = (&self.pipeline, &self.binding) else {
            self.record(RendererError::InvalidOperation);
            return;
        };
        if vertex_count as usize > binding.len {
            self.record(RendererError::InvalidValue);
            return;
        }
        let Some(buffer) = &binding.buffer else {
            return;
        };
        if vertex_count == 0 {
            return;
        }

        let uniform = TransformUniform {
            matrix: self.current.to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.transform_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Triangle Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Triangle Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.canvas.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.transform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, buffer.slice(..));
            render_pass.draw(0..vertex_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        let _ = self.device.poll(wgpu::Maintain::Poll);
    }

    fn finish(&mut self) {
        self.queue.submit(std::iter::empty());
        let _ = self.device.poll(wgpu::Maintain::Wait);
    }

    fn release(&mut self) {
        if let Some(VertexBinding {
            buffer: Some(buffer),
            ..
        }) = self.binding.take()
        {
            buffer.destroy();
        }
    }

    fn take_error(&mut self) -> Option<RendererError> {
        self.errors.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn error_sink_keeps_only_the_first_error() {
        let mut sink = ErrorSink::default();
        sink.record(RendererError::InvalidOperation);
        for _ in 0..1000 {
            sink.record(RendererError::OutOfMemory);
        }
        assert_eq!(sink.dropped, 1000);

        assert_eq!(sink.take(), Some(RendererError::InvalidOperation));
        assert_eq!(sink.dropped, 0);
        assert_eq!(sink.take(), None);

        sink.record(RendererError::StackUnderflow);
        assert_eq!(sink.take(), Some(RendererError::StackUnderflow));
    }

    #[test]
    fn vertex_layout_covers_position_and_color() {
        let layout = mesh_vertex_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<MeshVertex>() as u64);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 8);
    }
}
