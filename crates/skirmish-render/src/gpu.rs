//! Debug wgpu backend.
//!
//! Sprites are drawn as flat palette-tinted quads and lines as colored line
//! segments; there is no texture atlas. It exists so a human can look at what
//! the composer and overlays produce, not as the game's real backend.
//!
//! # Architecture
//!
//! The sinks handed to [`WorldRenderer`](crate::frame::WorldRenderer) do not
//! touch the GPU. Each flush converts the queued primitives into a
//! [`GpuBatch`] and appends it to a shared [`DrawList`]. At the end of the
//! frame, [`GpuRenderer::present`] uploads every batch into one vertex buffer
//! and replays them in flush order, so the on-screen layering matches the
//! flush sequence exactly.
//!
//! This module is feature-gated behind `renderer`.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

use skirmish_world::geometry::Float2;
use skirmish_world::sprite::Sprite;
use wgpu::util::DeviceExt;

use crate::color::Color;
use crate::frame::TerrainRenderer;
use crate::sink::{LineBatch, LineSink, SpriteBatch, SpriteSink};
use crate::viewport::Viewport;

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A single vertex with 2D world position and RGBA color, sent to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl Vertex {
    fn new(position: Float2, color: [f32; 4]) -> Self {
        Self {
            position: [position.x, position.y],
            color,
        }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
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
        }
    }
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// Tint per palette index; indices past the end wrap around.
const PALETTE_TINTS: &[[f32; 4]] = &[
    [0.85, 0.85, 0.85, 1.0], // Neutral
    [0.35, 0.55, 1.0, 1.0],  // Blue
    [1.0, 0.35, 0.3, 1.0],   // Red
    [0.35, 0.9, 0.4, 1.0],   // Green
    [1.0, 0.8, 0.3, 1.0],    // Orange
    [0.7, 0.4, 1.0, 1.0],    // Purple
];

/// Flat color standing in for a sprite's pixels: the palette tint, shaded by
/// sprite id so different sprites under one palette stay distinguishable.
pub fn sprite_color(sprite: Sprite, palette: usize) -> [f32; 4] {
    let tint = PALETTE_TINTS[palette % PALETTE_TINTS.len()];
    let shade = 0.6 + 0.4 * ((sprite.id.0.wrapping_mul(37) % 11) as f32 / 10.0);
    [tint[0] * shade, tint[1] * shade, tint[2] * shade, tint[3]]
}

/// Two triangles covering `size` from the top-left corner `position`.
pub fn quad(position: Float2, size: Float2, color: [f32; 4]) -> [Vertex; 6] {
    let tl = position;
    let tr = Float2::new(position.x + size.x, position.y);
    let br = position + size;
    let bl = Float2::new(position.x, position.y + size.y);
    [
        Vertex::new(tl, color),
        Vertex::new(bl, color),
        Vertex::new(br, color),
        Vertex::new(tl, color),
        Vertex::new(br, color),
        Vertex::new(tr, color),
    ]
}

// ---------------------------------------------------------------------------
// DrawList
// ---------------------------------------------------------------------------

/// Primitive type of a [`GpuBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

impl Primitive {
    fn vertices_per_primitive(self) -> usize {
        match self {
            Primitive::Triangles => 3,
            Primitive::Lines => 2,
        }
    }
}

/// The vertices of one flush.
#[derive(Debug, Clone)]
pub struct GpuBatch {
    pub primitive: Primitive,
    pub vertices: Vec<Vertex>,
}

/// Batches committed this frame, in flush order. Shared by every sink of
/// one [`GpuRenderer`].
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    batches: Rc<RefCell<Vec<GpuBatch>>>,
}

impl DrawList {
    fn push(&self, primitive: Primitive, vertices: Vec<Vertex>) {
        if vertices.is_empty() {
            return;
        }
        self.batches.borrow_mut().push(GpuBatch {
            primitive,
            vertices,
        });
    }

    fn take(&self) -> Vec<GpuBatch> {
        std::mem::take(&mut *self.batches.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.batches.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.borrow().is_empty()
    }
}

/// Lay `batches` out in one vertex array, returning each batch's range.
///
/// Batches that would push the total past `max_vertices` are dropped whole.
fn pack_batches(
    batches: Vec<GpuBatch>,
    max_vertices: usize,
) -> (Vec<Vertex>, Vec<(Primitive, Range<u32>)>) {
    let mut vertices = Vec::new();
    let mut ranges = Vec::with_capacity(batches.len());
    let mut dropped = 0usize;

    for batch in batches {
        debug_assert_eq!(batch.vertices.len() % batch.primitive.vertices_per_primitive(), 0);
        if vertices.len() + batch.vertices.len() > max_vertices {
            dropped += batch.vertices.len();
            continue;
        }
        let start = vertices.len() as u32;
        vertices.extend_from_slice(&batch.vertices);
        ranges.push((batch.primitive, start..vertices.len() as u32));
    }

    if dropped > 0 {
        tracing::warn!(dropped, max_vertices, "vertex budget exceeded, batches skipped");
    }
    (vertices, ranges)
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Sprite sink feeding a [`GpuRenderer`]'s draw list.
#[derive(Debug)]
pub struct GpuSpriteSink {
    draws: DrawList,
    batch: SpriteBatch,
}

impl SpriteSink for GpuSpriteSink {
    fn draw_sprite(&mut self, sprite: Sprite, position: Float2, palette: usize) {
        self.batch.push(sprite, position, palette);
    }

    fn flush(&mut self) {
        let queued = self.batch.take();
        let mut vertices = Vec::with_capacity(queued.len() * 6);
        for q in queued {
            vertices.extend(quad(q.position, q.sprite.size, sprite_color(q.sprite, q.palette)));
        }
        self.draws.push(Primitive::Triangles, vertices);
    }
}

/// Line sink feeding a [`GpuRenderer`]'s draw list.
#[derive(Debug)]
pub struct GpuLineSink {
    draws: DrawList,
    batch: LineBatch,
}

impl LineSink for GpuLineSink {
    fn draw_line(&mut self, a: Float2, b: Float2, color_a: Color, color_b: Color) {
        self.batch.push(a, b, color_a, color_b);
    }

    fn flush(&mut self) {
        let queued = self.batch.take();
        let mut vertices = Vec::with_capacity(queued.len() * 2);
        for q in queued {
            vertices.push(Vertex::new(q.a, q.color_a.to_f32()));
            vertices.push(Vertex::new(q.b, q.color_b.to_f32()));
        }
        self.draws.push(Primitive::Lines, vertices);
    }
}

/// Checkerboard terrain aligned to the cell grid. Emits its own batch.
#[derive(Debug)]
pub struct GpuTerrain {
    draws: DrawList,
    cell_size: f32,
    colors: [[f32; 4]; 2],
}

impl GpuTerrain {
    pub fn with_colors(mut self, even: Color, odd: Color) -> Self {
        self.colors = [even.to_f32(), odd.to_f32()];
        self
    }
}

impl TerrainRenderer for GpuTerrain {
    fn draw(&mut self, viewport: &Viewport) {
        let rect = viewport.rect();
        let size = self.cell_size;
        let first_x = (rect.left() / size).floor() as i32;
        let first_y = (rect.top() / size).floor() as i32;
        let last_x = (rect.right() / size).ceil() as i32;
        let last_y = (rect.bottom() / size).ceil() as i32;

        let mut vertices = Vec::new();
        for y in first_y..last_y {
            for x in first_x..last_x {
                let color = self.colors[((x + y) & 1) as usize];
                let origin = Float2::new(x as f32 * size, y as f32 * size);
                vertices.extend(quad(origin, Float2::new(size, size), color));
            }
        }
        self.draws.push(Primitive::Triangles, vertices);
    }
}

// ---------------------------------------------------------------------------
// GpuRenderer
// ---------------------------------------------------------------------------

/// Upper bound on vertices uploaded per frame.
const MAX_VERTICES: usize = 1 << 16;

/// Window, device and pipelines behind the debug backend.
///
/// Hand [`sprite_sink`](Self::sprite_sink), [`line_sink`](Self::line_sink)
/// and [`terrain`](Self::terrain) to a `WorldRenderer`, render the frame,
/// then call [`present`](Self::present).
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    window: Arc<winit::window::Window>,
    draws: DrawList,
}

impl GpuRenderer {
    /// Initialize wgpu: surface, device, queue and both pipelines.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable GPU adapter or device is available.
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self, anyhow::Error> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("skirmish_gpu_renderer"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("skirmish_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let camera_matrix = Viewport::default().projection_matrix();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_uniform"),
            contents: bytemuck::cast_slice(&camera_matrix),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera_bind_group_layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("skirmish_pipeline_layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let triangle_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::TriangleList,
            "skirmish_triangle_pipeline",
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::LineList,
            "skirmish_line_pipeline",
        );

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vertex_buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        tracing::info!(width, height, format = ?config.format, "gpu renderer initialized");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            triangle_pipeline,
            line_pipeline,
            vertex_buffer,
            camera_buffer,
            camera_bind_group,
            window,
            draws: DrawList::default(),
        })
    }

    /// [`new`](Self::new), blocking on the current thread.
    pub fn new_blocking(window: Arc<winit::window::Window>) -> Result<Self, anyhow::Error> {
        pollster::block_on(Self::new(window))
    }

    pub fn sprite_sink(&self) -> GpuSpriteSink {
        GpuSpriteSink {
            draws: self.draws.clone(),
            batch: SpriteBatch::new(),
        }
    }

    pub fn line_sink(&self) -> GpuLineSink {
        GpuLineSink {
            draws: self.draws.clone(),
            batch: LineBatch::new(),
        }
    }

    pub fn terrain(&self, cell_size: f32) -> GpuTerrain {
        GpuTerrain {
            draws: self.draws.clone(),
            cell_size,
            colors: [[0.16, 0.22, 0.12, 1.0], [0.19, 0.26, 0.14, 1.0]],
        }
    }

    /// Replay every batch flushed since the last call, seen through
    /// `viewport`, and present the frame.
    ///
    /// # Errors
    ///
    /// Returns a [`wgpu::SurfaceError`] if the surface cannot provide an
    /// output texture (e.g., window minimized, surface lost). The pending
    /// batches are discarded either way.
    pub fn present(&mut self, viewport: &Viewport) -> Result<(), wgpu::SurfaceError> {
        let (vertices, ranges) = pack_batches(self.draws.take(), MAX_VERTICES);

        let camera_matrix = viewport.projection_matrix();
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&camera_matrix));
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("skirmish_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("skirmish_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            for (primitive, range) in ranges {
                let pipeline = match primitive {
                    Primitive::Triangles => &self.triangle_pipeline,
                    Primitive::Lines => &self.line_pipeline,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.draw(range, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Resize the surface when the window size changes. Zero-sized
    /// dimensions are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_world::sprite::SpriteId;

    #[test]
    fn flushes_append_batches_in_order() {
        let draws = DrawList::default();
        let mut sprites = GpuSpriteSink {
            draws: draws.clone(),
            batch: SpriteBatch::new(),
        };
        let mut lines = GpuLineSink {
            draws: draws.clone(),
            batch: LineBatch::new(),
        };

        sprites.draw_sprite(Sprite::new(SpriteId(1), 4.0, 4.0), Float2::ZERO, 0);
        sprites.flush();
        lines.draw_line(Float2::ZERO, Float2::new(3.0, 0.0), Color::RED, Color::RED);
        lines.flush();
        // Empty flushes add nothing.
        sprites.flush();

        let batches = draws.take();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].primitive, Primitive::Triangles);
        assert_eq!(batches[0].vertices.len(), 6);
        assert_eq!(batches[1].primitive, Primitive::Lines);
        assert_eq!(batches[1].vertices.len(), 2);
    }

    #[test]
    fn quad_covers_sprite_extent() {
        let verts = quad(Float2::new(10.0, 20.0), Float2::new(4.0, 2.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 14.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 22.0);
    }

    #[test]
    fn over_budget_batches_are_dropped_whole() {
        let batch = |n: usize| GpuBatch {
            primitive: Primitive::Lines,
            vertices: vec![Vertex::new(Float2::ZERO, [1.0; 4]); n],
        };
        let (vertices, ranges) = pack_batches(vec![batch(4), batch(6), batch(2)], 8);
        assert_eq!(vertices.len(), 6);
        assert_eq!(ranges, vec![(Primitive::Lines, 0..4), (Primitive::Lines, 4..6)]);
    }

    #[test]
    fn palette_index_wraps() {
        let s = Sprite::new(SpriteId(2), 1.0, 1.0);
        assert_eq!(sprite_color(s, 1), sprite_color(s, 1 + PALETTE_TINTS.len()));
    }
}
