use std::sync::Arc;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::config::{SceneSettings, ViewerConfig};
use crate::core::{GpuContext, ViewportSize};
use crate::error::ViewerError;
use crate::scene::{
    grid_instances, ground_plane, prop, skybox_view_projection, Mesh, Vertex, GROUND_COLOR,
    SKYBOX_INDICES, SKYBOX_VERTICES,
};

pub mod overlay;

pub use overlay::{CameraEdits, Overlay};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Remaps OpenGL clip depth (-1..1) to the 0..1 range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

type Result<T> = std::result::Result<T, ViewerError>;

/// Per-frame camera matrices shared by both pipelines
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub sky_view_proj: [[f32; 4]; 4],
}

impl SceneUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: (OPENGL_TO_WGPU_MATRIX * camera.view_projection_matrix()).to_cols_array_2d(),
            sky_view_proj: (OPENGL_TO_WGPU_MATRIX * skybox_view_projection(camera))
                .to_cols_array_2d(),
        }
    }
}

/// World-space offset of one mesh instance
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub offset: [f32; 3],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<Vec3> for InstanceRaw {
    fn from(offset: Vec3) -> Self {
        Self {
            offset: offset.to_array(),
        }
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

const SKYBOX_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

fn skybox_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &SKYBOX_ATTRIBUTES,
    }
}

/// Vertex and index buffers for one uploaded mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, vertices: &[u8], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertices")),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    fn from_mesh(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        Self::upload(device, label, bytemuck::cast_slice(&mesh.vertices), &mesh.indices)
    }
}

/// Instance buffer plus how many instances it holds
struct InstanceBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &str, offsets: &[Vec3]) -> Self {
        let raw: Vec<InstanceRaw> = offsets.iter().copied().map(InstanceRaw::from).collect();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&raw),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            buffer,
            count: raw.len() as u32,
        }
    }
}

/// Options that decide how the renderer talks to the GPU
#[derive(Debug, Clone, Copy)]
pub struct RendererOptions {
    pub backends: wgpu::Backends,
    /// Request backend validation
    pub debug: bool,
    /// Draw the egui camera panel
    pub overlay: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::PRIMARY,
            debug: false,
            overlay: true,
        }
    }
}

/// Rasterizes the ground, the instanced props and the skybox
pub struct Renderer {
    gpu: GpuContext,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    scene_pipeline: wgpu::RenderPipeline,
    skybox_pipeline: wgpu::RenderPipeline,
    ground: GpuMesh,
    ground_instance: InstanceBuffer,
    prop: GpuMesh,
    prop_instances: InstanceBuffer,
    skybox: GpuMesh,
    overlay: Option<Overlay>,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        viewer: &ViewerConfig,
        camera: &Camera,
        options: RendererOptions,
    ) -> Result<Self> {
        let size = ViewportSize::from(window.inner_size());
        let gpu = GpuContext::new(window.clone(), options.backends, options.debug).await?;

        let config = gpu.surface_config(size.width.max(1), size.height.max(1), viewer.window.vsync);
        gpu.surface.configure(&gpu.device, &config);
        log::debug!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        let depth_view = Self::create_depth_texture(&gpu.device, config.width, config.height);

        let uniform_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Uniform Buffer"),
                contents: bytemuck::bytes_of(&SceneUniform::from_camera(camera)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                    label: Some("scene_bind_group_layout"),
                });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        });

        let scene_pipeline =
            Self::create_scene_pipeline(&gpu.device, &bind_group_layout, config.format);
        let skybox_pipeline =
            Self::create_skybox_pipeline(&gpu.device, &bind_group_layout, config.format);

        let (ground, ground_instance, prop, prop_instances) =
            Self::upload_scene(&gpu.device, &viewer.scene);
        let skybox = GpuMesh::upload(
            &gpu.device,
            "Skybox",
            bytemuck::cast_slice(&SKYBOX_VERTICES),
            &SKYBOX_INDICES,
        );

        let overlay = options
            .overlay
            .then(|| Overlay::new(&window, &gpu.device, config.format));

        log::info!(
            "Renderer initialized: {} ground triangles, {} props",
            ground.index_count / 3,
            prop_instances.count
        );

        Ok(Self {
            gpu,
            config,
            depth_view,
            uniform_buffer,
            bind_group,
            scene_pipeline,
            skybox_pipeline,
            ground,
            ground_instance,
            prop,
            prop_instances,
            skybox,
            overlay,
        })
    }

    fn upload_scene(
        device: &wgpu::Device,
        scene: &SceneSettings,
    ) -> (GpuMesh, InstanceBuffer, GpuMesh, InstanceBuffer) {
        let ground_mesh = ground_plane(
            scene.ground_size,
            scene.ground_subdivisions,
            scene.ground_height,
            GROUND_COLOR,
        );
        let ground = GpuMesh::from_mesh(device, "Ground", &ground_mesh);
        let ground_instance = InstanceBuffer::new(device, "Ground Instance", &[Vec3::ZERO]);

        let offsets = grid_instances(
            scene.prop_rows,
            scene.prop_columns,
            scene.prop_spacing,
            scene.ground_height,
        );
        let prop = GpuMesh::from_mesh(device, "Prop", &prop());
        let prop_instances = InstanceBuffer::new(device, "Prop Instances", &offsets);

        (ground, ground_instance, prop, prop_instances)
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_scene_pipeline(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout(), InstanceRaw::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // generated meshes do not share a winding order
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_skybox_pipeline(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/skybox.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[skybox_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // drawn last at depth 1.0, only where nothing else landed
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Reconfigure the surface and depth buffer. Empty sizes are ignored.
    pub fn resize(&mut self, size: ViewportSize) {
        if size.is_empty() {
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.gpu.surface.configure(&self.gpu.device, &self.config);
        self.depth_view = Self::create_depth_texture(&self.gpu.device, size.width, size.height);
        log::debug!("Surface resized to {}x{}", size.width, size.height);
    }

    /// Upload the camera matrices
    pub fn update_camera(&self, camera: &Camera) {
        self.gpu.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&SceneUniform::from_camera(camera)),
        );
    }

    /// Forward a window event to the overlay. Returns true when it was consumed.
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.handle_event(window, event),
            None => false,
        }
    }

    /// Draw one frame.
    ///
    /// Returns the camera edits made in the overlay this frame, if any.
    pub fn render(
        &mut self,
        window: &Window,
        camera: &Camera,
        fps: f32,
    ) -> std::result::Result<CameraEdits, wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);

            render_pass.set_pipeline(&self.scene_pipeline);
            for (mesh, instances) in [
                (&self.ground, &self.ground_instance),
                (&self.prop, &self.prop_instances),
            ] {
                if instances.count == 0 {
                    continue;
                }
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, instances.buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..instances.count);
            }

            render_pass.set_pipeline(&self.skybox_pipeline);
            render_pass.set_vertex_buffer(0, self.skybox.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                self.skybox.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..self.skybox.index_count, 0, 0..1);
        }

        let mut edits = CameraEdits::default();
        let mut overlay_commands = Vec::new();
        if let Some(overlay) = &mut self.overlay {
            let (frame_edits, commands) = overlay.draw(
                window,
                &self.gpu.device,
                &self.gpu.queue,
                &mut encoder,
                &view,
                [self.config.width, self.config.height],
                camera,
                fps,
            );
            edits = frame_edits;
            overlay_commands = commands;
        }

        self.gpu.queue.submit(
            overlay_commands
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        output.present();

        Ok(edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraSettings;
    use glam::Vec4;

    fn clip_depth(clip: Vec4) -> f32 {
        clip.z / clip.w
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 128);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 12);
    }

    #[test]
    fn test_depth_remapped_to_unit_range() {
        let camera = Camera::new(800, 600, &CameraSettings::default());
        let uniform = SceneUniform::from_camera(&camera);
        let view_proj = Mat4::from_cols_array_2d(&uniform.view_proj);

        let direction = camera.direction();
        let near_point = camera.position() + direction * camera.near();
        let far_point = camera.position() + direction * camera.far();

        let near_depth = clip_depth(view_proj * near_point.extend(1.0));
        let far_depth = clip_depth(view_proj * far_point.extend(1.0));

        assert!(near_depth.abs() < 1e-4, "near depth {near_depth}");
        assert!((far_depth - 1.0).abs() < 1e-4, "far depth {far_depth}");
    }

    #[test]
    fn test_instance_from_offset() {
        let raw = InstanceRaw::from(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(raw.offset, [1.0, -2.0, 3.0]);
    }
}
