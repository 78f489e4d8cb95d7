//! wgpu render pipelines
//!
//! Replays a [`Frame`] with two pipelines: flat-colored triangles and
//! textured quads. Game coordinates are logical pixels (origin top-left,
//! y down); they are mapped to NDC on upload.

use std::collections::HashMap;
use std::ops::Range;

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::canvas::Canvas;
use super::frame::{DrawCommand, Frame};
use super::vertex::{TexVertex, Vertex};
use crate::assets::{AssetCache, ImageId};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::Rect;

/// A sampled texture with its bind group
struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

/// The uploaded drawing canvas
struct CanvasTexture {
    gpu: GpuTexture,
    revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextureSlot {
    Image(ImageId),
    Canvas,
}

enum Batch {
    Color(Range<u32>),
    Textured(TextureSlot, Range<u32>),
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    color_pipeline: wgpu::RenderPipeline,
    texture_pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    images: HashMap<ImageId, GpuTexture>,
    canvas: Option<CanvasTexture>,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Logical coordinate space mapped onto the viewport
    logical: Vec2,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("baby-fun-box-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        // Colors are authored in sRGB, so write them to a non-sRGB target as-is
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let color_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("color_pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });
        let texture_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("texture_pipeline_layout"),
                bind_group_layouts: &[&texture_layout],
                immediate_size: 0,
            });

        let color_pipeline = create_pipeline(
            &device,
            "color_pipeline",
            &color_layout,
            &shader,
            ("vs_main", "fs_main"),
            Vertex::desc(),
            config.format,
        );
        let texture_pipeline = create_pipeline(
            &device,
            "texture_pipeline",
            &texture_pipeline_layout,
            &shader,
            ("vs_textured", "fs_textured"),
            TexVertex::desc(),
            config.format,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            color_pipeline,
            texture_pipeline,
            texture_layout,
            sampler,
            images: HashMap::new(),
            canvas: None,
            size: (width, height),
            logical: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size (after `Lost`/`Outdated`)
    pub fn reconfigure(&mut self) {
        let (w, h) = self.size;
        self.resize(w, h);
    }

    /// Upload the frame's geometry and present it
    pub fn render(&mut self, frame: &Frame, assets: &AssetCache) -> Result<(), wgpu::SurfaceError> {
        let logical = self.logical;
        let mut colored: Vec<Vertex> = Vec::new();
        let mut textured: Vec<TexVertex> = Vec::new();
        let mut batches: Vec<Batch> = Vec::new();

        for command in frame.commands() {
            match command {
                DrawCommand::Shapes(vertices) => {
                    let start = colored.len() as u32;
                    colored.extend(vertices.iter().map(|v| {
                        let p = to_ndc(Vec2::from(v.position), logical);
                        Vertex::new(p.x, p.y, v.color)
                    }));
                    batches.push(Batch::Color(start..colored.len() as u32));
                }
                DrawCommand::Image { id, rect, tint } => {
                    if !self.ensure_image(*id, assets) {
                        continue;
                    }
                    let start = textured.len() as u32;
                    textured.extend(quad(*rect, *tint, logical));
                    batches.push(Batch::Textured(
                        TextureSlot::Image(*id),
                        start..textured.len() as u32,
                    ));
                }
                DrawCommand::Canvas { canvas, rect } => {
                    self.sync_canvas(canvas);
                    let start = textured.len() as u32;
                    textured.extend(quad(*rect, [1.0; 4], logical));
                    batches.push(Batch::Textured(
                        TextureSlot::Canvas,
                        start..textured.len() as u32,
                    ));
                }
            }
        }

        let color_buffer = (!colored.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("color_vertex_buffer"),
                    contents: bytemuck::cast_slice(&colored),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });
        let texture_buffer = (!textured.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("texture_vertex_buffer"),
                    contents: bytemuck::cast_slice(&textured),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = frame.clear_color().map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for batch in &batches {
                match batch {
                    Batch::Color(range) => {
                        let Some(buffer) = &color_buffer else { continue };
                        render_pass.set_pipeline(&self.color_pipeline);
                        render_pass.set_vertex_buffer(0, buffer.slice(..));
                        render_pass.draw(range.clone(), 0..1);
                    }
                    Batch::Textured(slot, range) => {
                        let texture = match slot {
                            TextureSlot::Image(id) => self.images.get(id),
                            TextureSlot::Canvas => self.canvas.as_ref().map(|c| &c.gpu),
                        };
                        let (Some(texture), Some(buffer)) = (texture, &texture_buffer) else {
                            continue;
                        };
                        render_pass.set_pipeline(&self.texture_pipeline);
                        render_pass.set_bind_group(0, &texture.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, buffer.slice(..));
                        render_pass.draw(range.clone(), 0..1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Upload a custom picture on first use; false if it cannot be drawn
    fn ensure_image(&mut self, id: ImageId, assets: &AssetCache) -> bool {
        if self.images.contains_key(&id) {
            return true;
        }
        let Some(image) = assets.image(id) else {
            return false;
        };
        if image.width() == 0 || image.height() == 0 {
            return false;
        }
        let gpu = create_texture(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            "custom_image",
            image.width(),
            image.height(),
            image.as_raw(),
        );
        self.images.insert(id, gpu);
        true
    }

    /// Mirror the paint canvas into its texture when it changed
    fn sync_canvas(&mut self, canvas: &Canvas) {
        let matches = self.canvas.as_ref().is_some_and(|c| {
            c.gpu.width == canvas.width() && c.gpu.height == canvas.height()
        });

        if !matches {
            let gpu = create_texture(
                &self.device,
                &self.queue,
                &self.texture_layout,
                &self.sampler,
                "paint_canvas",
                canvas.width(),
                canvas.height(),
                canvas.pixels(),
            );
            self.canvas = Some(CanvasTexture {
                gpu,
                revision: canvas.revision(),
            });
            return;
        }

        if let Some(current) = self.canvas.as_mut()
            && current.revision != canvas.revision()
        {
            write_pixels(
                &self.queue,
                &current.gpu.texture,
                canvas.width(),
                canvas.height(),
                canvas.pixels(),
            );
            current.revision = canvas.revision();
        }
    }
}

/// Logical pixels to normalized device coordinates
fn to_ndc(p: Vec2, logical: Vec2) -> Vec2 {
    Vec2::new(p.x / logical.x * 2.0 - 1.0, 1.0 - p.y / logical.y * 2.0)
}

/// Two triangles covering `rect` with the full texture
fn quad(rect: Rect, tint: [f32; 4], logical: Vec2) -> [TexVertex; 6] {
    let tl = to_ndc(rect.min(), logical);
    let br = to_ndc(Vec2::new(rect.right(), rect.bottom()), logical);
    [
        TexVertex::new(tl.x, tl.y, 0.0, 0.0, tint),
        TexVertex::new(br.x, tl.y, 1.0, 0.0, tint),
        TexVertex::new(tl.x, br.y, 0.0, 1.0, tint),
        TexVertex::new(tl.x, br.y, 0.0, 1.0, tint),
        TexVertex::new(br.x, tl.y, 1.0, 0.0, tint),
        TexVertex::new(br.x, br.y, 1.0, 1.0, tint),
    ]
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    (vs, fs): (&str, &str),
    buffer: wgpu::VertexBufferLayout<'static>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            buffers: &[buffer],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
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
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[allow(clippy::too_many_arguments)]
fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> GpuTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_pixels(queue, &texture, width, height, rgba);

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture {
        texture,
        bind_group,
        width,
        height,
    }
}

fn write_pixels(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
    rgba: &[u8],
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners() {
        let logical = Vec2::new(1024.0, 768.0);
        assert_eq!(to_ndc(Vec2::ZERO, logical), Vec2::new(-1.0, 1.0));
        assert_eq!(to_ndc(logical, logical), Vec2::new(1.0, -1.0));
        assert_eq!(to_ndc(logical / 2.0, logical), Vec2::ZERO);
    }

    #[test]
    fn test_quad_uvs_follow_screen_orientation() {
        let logical = Vec2::new(100.0, 100.0);
        let verts = quad(Rect::new(0.0, 0.0, 50.0, 50.0), [1.0; 4], logical);
        // top-left of the picture is uv (0, 0)
        assert_eq!(verts[0].position, [-1.0, 1.0]);
        assert_eq!(verts[0].uv, [0.0, 0.0]);
        assert_eq!(verts[5].position, [0.0, 0.0]);
        assert_eq!(verts[5].uv, [1.0, 1.0]);
    }
}
