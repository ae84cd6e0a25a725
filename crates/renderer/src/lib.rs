//! Renderer: wgpu init, asset upload and the two-draw dithered scene.
//! wgpu = 26.x, winit = 0.30.x

pub mod mesh;
pub mod object;
pub mod shader;
pub mod texture;
pub mod uniforms;

use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use asset::{dither, obj};
use corelib::scene::Scene;
use wgpu::{
    Adapter, BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingType, BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState,
    ColorWrites, CommandEncoderDescriptor, DepthBiasState, DepthStencilState, Device,
    DeviceDescriptor, Extent3d, Features, FragmentState, Instance, InstanceDescriptor, Limits,
    LoadOp, Operations, PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    SamplerBindingType, ShaderStages, StoreOp, Surface, SurfaceConfiguration, SurfaceError,
    TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType, TextureUsages,
    TextureView, TextureViewDescriptor, TextureViewDimension, VertexState, util::DeviceExt,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    mesh::{GpuMesh, VERTEX_LAYOUT},
    object::SceneObject,
    texture::{GpuTexture2d, GpuTexture3d},
    uniforms::FrameUniform,
};

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

/// Asset files the scene is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenePaths {
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub model_mesh: PathBuf,
    pub model_texture: PathBuf,
    pub flame_mesh: PathBuf,
    pub flame_texture: PathBuf,
}

impl ScenePaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vertex_shader: dir.join("vertex.wgsl"),
            fragment_shader: dir.join("frag.wgsl"),
            model_mesh: dir.join("model.obj"),
            model_texture: dir.join("model.png"),
            flame_mesh: dir.join("flame.obj"),
            flame_texture: dir.join("flame.png"),
        }
    }
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    sample_count: u32,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipeline
    pipeline: RenderPipeline,

    // Frame bindings: uniforms + dither volume
    frame_buf: Buffer,
    frame_bg: BindGroup,
    dither_size: [f32; 2],

    // Draws
    model: SceneObject,
    flame: SceneObject,

    // Attachments
    depth_view: TextureView,
    msaa_view: Option<TextureView>,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window> and upload every scene asset.
    ///
    /// `size` is the requested startup size; the window may not report its final
    /// size yet. Platform failures and an unreadable mesh are errors; missing textures
    /// and shader diagnostics are logged and rendering degrades.
    pub async fn new(
        window: Arc<Window>,
        backends: wgpu::Backends,
        size: PhysicalSize<u32>,
        paths: &ScenePaths,
    ) -> Result<Self> {
        let width = size.width.max(1);
        let height = size.height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let adapter_limits = adapter.limits();
        let required_limits = Limits {
            max_texture_dimension_3d: adapter_limits.max_texture_dimension_3d,
            ..Limits::downlevel_defaults().using_resolution(adapter_limits.clone())
        };
        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Dither Device"),
                required_features: Features::empty(),
                required_limits,
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")?;

        // A broken shader must degrade the picture, not take the process down.
        device.on_uncaptured_error(Box::new(|err: wgpu::Error| {
            log::error!("wgpu error: {}", err);
        }));

        let caps = surface.get_capabilities(&adapter);
        let surface_format =
            pick_surface_format(&caps.formats).context("Surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let sample_count = pick_sample_count(&adapter, surface_format);
        log::info!("Surface {:?}, MSAA x{}", surface_format, sample_count);
        let depth_view = create_depth_view(&device, &surface_config, sample_count);
        let msaa_view = create_msaa_view(&device, &surface_config, sample_count);

        // ==== Shaders ====
        let vs = shader::load_stage(&device, &paths.vertex_shader);
        let fs = shader::load_stage(&device, &paths.fragment_shader);

        // ==== Layouts ====
        let frame_bgl = create_frame_layout(&device);
        let object_bgl = create_object_layout(&device);

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Scene PipelineLayout"),
            bind_group_layouts: &[&frame_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = shader::checked_link(&device, "Scene Pipeline", || {
            device.create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("Scene Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: &vs,
                    entry_point: Some("vs_main"),
                    buffers: &[VERTEX_LAYOUT],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: &fs,
                    entry_point: Some("fs_main"),
                    targets: &[Some(ColorTargetState {
                        format: surface_format,
                        blend: Some(BlendState::REPLACE),
                        write_mask: ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    ..Default::default()
                },
                multiview: None,
                cache: None,
            })
        });

        // ==== Dither volume (group 0) ====
        let (dither_w, dither_h) =
            dither_extent(width, height, device.limits().max_texture_dimension_3d);
        let volume = dither::generate(dither_w, dither_h, &dither::builtin_stack())
            .context("Failed to build dither volume")?;
        let dither = GpuTexture3d::upload(&device, &queue, "DitherMap", &volume);
        let dither_sampler = texture::clamped_volume_sampler(&device, "DitherMap Sampler");
        let dither_size = [dither_w as f32, dither_h as f32];

        let frame_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame UBO"),
            contents: bytemuck::bytes_of(&FrameUniform::new(&Scene::default(), dither_size)),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BG"),
            layout: &frame_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&dither.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&dither_sampler),
                },
            ],
        });

        // ==== Scene objects (group 1) ====
        let null_view = texture::null_view(&device, &queue);
        let sampler = texture::linear_sampler(&device, "Texture Sampler");
        let objects = ObjectContext {
            device: &device,
            queue: &queue,
            layout: &object_bgl,
            null_view: &null_view,
            sampler: &sampler,
        };
        let model = objects.load("Model", &paths.model_mesh, &paths.model_texture)?;
        let flame = objects.load("Flame", &paths.flame_mesh, &paths.flame_texture)?;

        Ok(Self {
            surface,
            surface_config,
            sample_count,
            device,
            queue,
            pipeline,
            frame_buf,
            frame_bg,
            dither_size,
            model,
            flame,
            depth_view,
            msaa_view,
            width,
            height,
        })
    }

    /// Resize: reconfigure surface & recreate attachments.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config, self.sample_count);
        self.msaa_view = create_msaa_view(&self.device, &self.surface_config, self.sample_count);
    }

    /// Render one frame: upload scene uniforms, clear, draw model then flame.
    pub fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        self.queue.write_buffer(
            &self.frame_buf,
            0,
            bytemuck::bytes_of(&FrameUniform::new(scene, self.dither_size)),
        );
        self.model.set_model(&self.queue, scene.model);
        self.flame.set_model(&self.queue, scene.flame_matrix());

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let (target, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR_COLOR),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.frame_bg, &[]);
            self.model.draw(&mut rpass);
            self.flame.draw(&mut rpass);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

/// Shared GPU handles for building [`SceneObject`]s.
struct ObjectContext<'a> {
    device: &'a Device,
    queue: &'a Queue,
    layout: &'a BindGroupLayout,
    null_view: &'a TextureView,
    sampler: &'a wgpu::Sampler,
}

impl ObjectContext<'_> {
    /// Mesh is required; the texture may degrade to null.
    fn load(&self, label: &str, mesh_path: &Path, texture_path: &Path) -> Result<SceneObject> {
        let mesh = obj::load_obj_from_path(mesh_path)
            .with_context(|| format!("Failed to load mesh {}", mesh_path.display()))?;
        let mesh = GpuMesh::upload(self.device, label, mesh);
        let texture = GpuTexture2d::load(self.device, self.queue, texture_path);
        Ok(SceneObject::new(
            self.device,
            self.layout,
            label,
            mesh,
            &texture,
            self.null_view,
            self.sampler,
        ))
    }
}

/// Prefer a non-sRGB target so shader output is written without gamma encoding,
/// matching the unconverted colour textures.
fn pick_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Dither volume footprint for the startup size, within the device's 3D limit.
fn dither_extent(width: u32, height: u32, max_3d: u32) -> (u32, u32) {
    (width.clamp(1, max_3d), height.clamp(1, max_3d))
}

fn pick_sample_count(adapter: &Adapter, format: TextureFormat) -> u32 {
    let color_ok = adapter
        .get_texture_format_features(format)
        .flags
        .sample_count_supported(MSAA_SAMPLES);
    let depth_ok = adapter
        .get_texture_format_features(DEPTH_FORMAT)
        .flags
        .sample_count_supported(MSAA_SAMPLES);
    if color_ok && depth_ok { MSAA_SAMPLES } else { 1 }
}

/// Group 0: frame uniforms (both stages), dither volume + sampler (fragment).
fn create_frame_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Frame BGL"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<FrameUniform>() as u64),
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D3,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 2,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Group 1: model matrix (vertex), colour texture + sampler (fragment).
fn create_object_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Object BGL"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<uniforms::ObjectUniform>() as u64,
                    ),
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 2,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn attachment_size(sc: &SurfaceConfiguration) -> Extent3d {
    Extent3d {
        width: sc.width.max(1),
        height: sc.height.max(1),
        depth_or_array_layers: 1,
    }
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration, sample_count: u32) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: attachment_size(sc),
        mip_level_count: 1,
        sample_count,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

/// Multisampled colour target, resolved into the swapchain image.
fn create_msaa_view(
    device: &Device,
    sc: &SurfaceConfiguration,
    sample_count: u32,
) -> Option<TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("MsaaColorTex"),
        size: attachment_size(sc),
        mip_level_count: 1,
        sample_count,
        dimension: TextureDimension::D2,
        format: sc.format,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(tex.create_view(&TextureViewDescriptor::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_paths_use_standard_names() {
        let paths = ScenePaths::in_dir("data");
        assert_eq!(paths.vertex_shader, Path::new("data/vertex.wgsl"));
        assert_eq!(paths.fragment_shader, Path::new("data/frag.wgsl"));
        assert_eq!(paths.model_mesh, Path::new("data/model.obj"));
        assert_eq!(paths.flame_texture, Path::new("data/flame.png"));
    }

    #[test]
    fn surface_format_skips_srgb_when_possible() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
        assert_eq!(
            pick_surface_format(&[TextureFormat::Rgba8UnormSrgb]),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(pick_surface_format(&[]), None);
    }

    #[test]
    fn dither_extent_follows_startup_size() {
        assert_eq!(dither_extent(800, 600, 2048), (800, 600));
        assert_eq!(dither_extent(4096, 600, 2048), (2048, 600));
        assert_eq!(dither_extent(0, 0, 2048), (1, 1));
    }
}
