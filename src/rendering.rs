//! Rendering system with wgpu pipeline, frame capture and offscreen snapshots.

mod text;

use std::path::Path;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use log::{debug, error, warn};

use crate::chart::{clear_color, ChartMesh, SceneGeometry, Vertex, Viewport};
use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::params::{RecordingConfig, RenderConfig};

use text::TextPipeline;

/// Vertex capacity allocated up front (grows on demand)
const INITIAL_VERTEX_CAPACITY: u64 = 16 * 1024;

/// Uniform buffer for the chart shader (scene → clip transform)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ViewUniforms {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

impl ViewUniforms {
    pub fn from_viewport(viewport: &Viewport) -> Self {
        let (scale, offset) = viewport.clip_transform();
        Self { scale, offset }
    }
}

/// Pipeline, buffers and bind group for drawing a [`ChartMesh`]
struct ChartPipeline {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl ChartPipeline {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Chart Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let vertex_buffer = create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("View Uniform Buffer"),
            size: std::mem::size_of::<ViewUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("View Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("View Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Chart Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Chart Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x4,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Tessellated shapes mix windings
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            render_pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
            uniform_buffer,
            uniform_bind_group,
        }
    }

    /// Upload a new mesh, growing the vertex buffer if needed
    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, mesh: &ChartMesh) {
        let needed = mesh.vertices.len() as u64;
        if needed > self.vertex_capacity {
            let capacity = needed.next_power_of_two();
            debug!("Growing vertex buffer to {} vertices", capacity);
            self.vertex_buffer = create_vertex_buffer(device, capacity);
            self.vertex_capacity = capacity;
        }
        if needed > 0 {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }
        self.vertex_count = mesh.vertex_count();
    }

    fn update_view(&self, queue: &wgpu::Queue, uniforms: &ViewUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Chart triangles, then glyphs on top, in one pass
fn encode_frame(
    encoder: &mut wgpu::CommandEncoder,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    chart: &ChartPipeline,
    text: &TextPipeline,
) -> Result<()> {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Chart Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    chart.draw(&mut render_pass);
    text.render(&mut render_pass)
}

/// Surface size clamped to the device's largest 2D texture
fn clamp_surface_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    (width.clamp(1, max_dimension), height.clamp(1, max_dimension))
}

/// Offscreen targets are rejected rather than clamped
fn check_texture_size(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width > max_dimension || height > max_dimension {
        return Err(Error::TextureTooLarge {
            width,
            height,
            max: max_dimension,
        });
    }
    Ok(())
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Chart Vertex Buffer"),
        size: capacity * std::mem::size_of::<Vertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
    let device = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await?;
    Ok(device)
}

/// Rendering system managing the window surface, chart and text pipelines
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    chart: ChartPipeline,
    text: TextPipeline,
    viewport: Viewport,
    max_dimension: u32,
    clear: wgpu::Color,
    recording_config: Option<RecordingConfig>,
}

impl RenderSystem {
    /// Create new rendering system for a window
    pub async fn new(
        window: Arc<winit::window::Window>,
        render_config: &RenderConfig,
        recording_config: Option<RecordingConfig>,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(Error::NoAdapter)?;

        let (device, queue) = request_device(&adapter).await?;
        let max_dimension = device.limits().max_texture_dimension_2d;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;

        // Frame capture copies out of the surface texture
        if recording_config.is_some() {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let (width, height) = clamp_surface_size(size.width, size.height, max_dimension);
        if (width, height) != (size.width.max(1), size.height.max(1)) {
            warn!(
                "Window {}x{} exceeds the {} px texture limit, rendering at {}x{}",
                size.width, size.height, max_dimension, width, height
            );
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        debug!("Surface configured: {:?} {}x{}", surface_format, width, height);

        let viewport = Viewport::fit(width, height);
        let chart = ChartPipeline::new(&device, surface_format);
        chart.update_view(&queue, &ViewUniforms::from_viewport(&viewport));
        let text = TextPipeline::new(&device, &queue, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            chart,
            text,
            viewport,
            max_dimension,
            clear: clear_color(Rgb::from_hex(render_config.background)),
            recording_config,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Mapping between surface pixels and scene units
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Reconfigure the surface and viewport after a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let (width, height) = clamp_surface_size(width, height, self.max_dimension);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.viewport = Viewport::fit(width, height);
        self.chart
            .update_view(&self.queue, &ViewUniforms::from_viewport(&self.viewport));
    }

    /// Replace the triangles and text drawn by subsequent frames
    pub fn update_geometry(&mut self, geometry: &SceneGeometry) {
        self.chart.upload(&self.device, &self.queue, &geometry.mesh);
        self.text.set_runs(&geometry.text);
    }

    /// Render a frame (and capture it if recording)
    pub fn render(&mut self, frame_num: usize) -> Result<()> {
        let (width, height) = self.size();
        self.text
            .prepare(&self.device, &self.queue, &self.viewport, width, height)?;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        encode_frame(&mut encoder, &view, self.clear, &self.chart, &self.text)?;
        self.queue.submit(std::iter::once(encoder.finish()));

        if let Some(ref config) = self.recording_config {
            let path = config.frame_path(frame_num);
            let swap = is_bgra(self.config.format);
            match read_texture(&self.device, &self.queue, &output.texture, width, height, swap) {
                Ok(pixels) => {
                    if let Err(e) = save_png(&path, &pixels, width, height) {
                        error!("Failed to save frame {}: {}", frame_num, e);
                    }
                }
                Err(e) => error!("Failed to capture frame {}: {}", frame_num, e),
            }
        }

        output.present();
        self.text.trim();

        Ok(())
    }
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Row pitch of a texture copy, rounded up to the copy alignment
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Drop row padding and convert BGRA to RGBA if needed
fn unpad_rows(data: &[u8], width: u32, height: u32, padded_row: u32, swap_rb: bool) -> Vec<u8> {
    let row = (width * 4) as usize;
    let mut pixels = Vec::with_capacity(row * height as usize);
    for y in 0..height as usize {
        let start = y * padded_row as usize;
        pixels.extend_from_slice(&data[start..start + row]);
    }
    if swap_rb {
        for pixel in pixels.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    pixels
}

/// Copy a texture into CPU memory as tightly packed RGBA8
fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
    swap_rb: bool,
) -> Result<Vec<u8>> {
    let padded_row = padded_bytes_per_row(width);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Frame Capture Buffer"),
        size: (padded_row * height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Frame Capture Encoder"),
    });

    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = buffer.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device.poll(wgpu::Maintain::Wait);
    receiver.recv().map_err(|_| Error::BufferMapAbandoned)??;

    let data = buffer_slice.get_mapped_range();
    let pixels = unpad_rows(&data, width, height, padded_row, swap_rb);
    drop(data);
    buffer.unmap();

    Ok(pixels)
}

/// Write tightly packed RGBA8 pixels as a PNG
pub fn save_png(path: &Path, pixels: &[u8], width: u32, height: u32) -> Result<()> {
    image::save_buffer(path, pixels, width, height, image::ColorType::Rgba8)
        .map_err(|e| Error::image(path, e))
}

/// Render scene geometry without a window and return RGBA8 pixels
pub async fn render_offscreen(
    geometry: &SceneGeometry,
    width: u32,
    height: u32,
    background: Rgb,
) -> Result<Vec<u8>> {
    let width = width.max(1);
    let height = height.max(1);

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(Error::NoAdapter)?;

    let (device, queue) = request_device(&adapter).await?;
    check_texture_size(width, height, device.limits().max_texture_dimension_2d)?;

    let format = wgpu::TextureFormat::Rgba8UnormSrgb;
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Snapshot Target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let viewport = Viewport::fit(width, height);
    let mut chart = ChartPipeline::new(&device, format);
    chart.upload(&device, &queue, &geometry.mesh);
    chart.update_view(&queue, &ViewUniforms::from_viewport(&viewport));

    let mut text = TextPipeline::new(&device, &queue, format);
    text.set_runs(&geometry.text);
    text.prepare(&device, &queue, &viewport, width, height)?;

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Snapshot Encoder"),
    });
    encode_frame(&mut encoder, &view, clear_color(background), &chart, &text)?;
    queue.submit(std::iter::once(encoder.finish()));

    read_texture(&device, &queue, &texture, width, height, false)
}
