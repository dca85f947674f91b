use std::sync::Arc;

use anyhow::Context;
use glam::{Vec3, Vec4};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::SceneCamera;
use crate::geometry::{self, MeshRecord};
use crate::motion::SPHERE_LAUNCH;
use crate::shader;
use crate::shader_types::{ColorUniform, DisplacementUniform, LightParameters, TransformUniform};

const VERTEX_SHADER: &str = "shaders/sphere.vert.wgsl";
const FRAGMENT_SHADER: &str = "shaders/sphere.frag.wgsl";

const OBJECT_COLOR: Vec3 = Vec3::new(0.0, 0.0, 1.0);

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// GPU residency for one mesh record: two attribute buffers and one index
/// buffer. The list of these stays index-synchronized with the source record
/// list and is never reordered after upload.
struct GpuMesh {
    position_buffer: wgpu::Buffer,
    normal_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

pub struct State {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface<'static>,
    surface_format: wgpu::TextureFormat,
    depth_view: wgpu::TextureView,

    camera: SceneCamera,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    transform_buf: wgpu::Buffer,
    displacement_buf: wgpu::Buffer,
    #[expect(dead_code)]
    light_buf: wgpu::Buffer,
    #[expect(dead_code)]
    color_buf: wgpu::Buffer,
    meshes: Vec<GpuMesh>,
    // CPU-side geometry, kept alive until teardown.
    records: Vec<MeshRecord>,
}

impl State {
    pub async fn new(window: Arc<Window>, records: Vec<MeshRecord>) -> anyhow::Result<State> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .context("no suitable GPU adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("couldn't create the GPU device")?;

        let size = window.inner_size();

        let surface = instance
            .create_surface(window.clone())
            .context("couldn't create the window surface")?;
        let cap = surface.get_capabilities(&adapter);
        let surface_format = cap.formats[0];

        // Shader stage: both sources are loaded from disk, compiled, then
        // linked against the vertex layout metadata of the first mesh.
        let vs_source = shader::load_source(VERTEX_SHADER)?;
        let fs_source = shader::load_source(FRAGMENT_SHADER)?;
        let vs = shader::compile(&device, "vertex", &vs_source).await?;
        let fs = shader::compile(&device, "fragment", &fs_source).await?;

        let first = records.first().context("scene contains no meshes")?;
        let position = first
            .attribute(geometry::POSITION)
            .context("first mesh has no position stream")?;
        let normal = first
            .attribute(geometry::NORMAL)
            .context("first mesh has no normal stream")?;
        let (position_stride, position_format) = (position.stride, position.format);
        let (normal_stride, normal_format) = (normal.stride, normal.format);
        let topology = first.topology;

        let position_attributes = [wgpu::VertexAttribute {
            format: position_format,
            offset: 0,
            shader_location: 0,
        }];
        let normal_attributes = [wgpu::VertexAttribute {
            format: normal_format,
            offset: 0,
            shader_location: 1,
        }];
        let vertex_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: position_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &position_attributes,
            },
            wgpu::VertexBufferLayout {
                array_stride: normal_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &normal_attributes,
            },
        ];

        let pipeline = shader::link(
            &device,
            &vs,
            &fs,
            &vertex_layouts,
            topology,
            surface_format.add_srgb_suffix(),
            DEPTH_FORMAT,
        )
        .await?;

        let meshes = upload_meshes(&device, &records)?;

        // Uniform stage: three independent pieces of shader-visible state,
        // each with its own update cadence, plus the constant object color.
        let camera = SceneCamera::new();
        let transform = TransformUniform {
            mvp: camera.view_projection(),
        };
        let transform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform"),
            contents: bytemuck::bytes_of(&transform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let displacement = DisplacementUniform::new(SPHERE_LAUNCH.initial_position);
        let displacement_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Displacement"),
            contents: bytemuck::bytes_of(&displacement),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let lights = LightParameters {
            diffuse_intensity: Vec4::new(0.4, 0.4, 0.4, 1.0),
            ambient_intensity: Vec4::new(0.3, 0.3, 0.3, 1.0),
            light_direction: Vec4::new(0.0, -1.0, 0.5, 1.0),
        };
        let light_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("LightParameters"),
            contents: bytemuck::bytes_of(&lights),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let color = ColorUniform {
            color: OBJECT_COLOR.extend(1.0),
        };
        let color_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Color"),
            contents: bytemuck::bytes_of(&color),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        // The binding indices here must match the @binding declarations in
        // the shaders; resolving the layout from the freshly linked pipeline
        // keeps the two in the same place.
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_uniforms"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: displacement_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: light_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: color_buf.as_entire_binding(),
                },
            ],
        });

        let depth_view = create_depth_view(&device, size);

        let state = State {
            window,
            device,
            queue,
            size,
            surface,
            surface_format,
            depth_view,
            camera,
            pipeline,
            bind_group,
            transform_buf,
            displacement_buf,
            light_buf,
            color_buf,
            meshes,
            records,
        };

        state.configure_surface();

        Ok(state)
    }

    fn configure_surface(&self) {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            view_formats: vec![self.surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: self.size.width,
            height: self.size.height,
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::AutoVsync,
        };
        self.surface.configure(&self.device, &surface_config);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;

        self.configure_surface();
        self.depth_view = create_depth_view(&self.device, self.size);

        // The projection bounds are fixed constants: the matrix is rebuilt,
        // not refit to the new aspect ratio.
        let transform = TransformUniform {
            mvp: self.camera.view_projection(),
        };
        self.queue
            .write_buffer(&self.transform_buf, 0, bytemuck::bytes_of(&transform));
    }

    /// Publishes a new kinematic displacement to the shader.
    pub fn write_displacement(&mut self, delta: Vec3) {
        let displacement = DisplacementUniform::new(delta);
        self.queue
            .write_buffer(&self.displacement_buf, 0, bytemuck::bytes_of(&displacement));
    }

    pub fn render(&mut self) {
        let surface_texture = self
            .surface
            .get_current_texture()
            .expect("failed to acquire next swapchain texture");
        let texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.surface_format.add_srgb_suffix()),
                ..Default::default()
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &texture_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Only the first mesh is drawn.
        let mesh = &self.meshes[0];
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, Some(&self.bind_group), &[]);
        render_pass.set_vertex_buffer(0, mesh.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, mesh.normal_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);

        drop(render_pass);

        self.queue.submit([encoder.finish()]);
        self.window.pre_present_notify();
        surface_texture.present();
    }

    pub fn get_window(&self) -> &Window {
        &self.window
    }
}

impl Drop for State {
    fn drop(&mut self) {
        // GPU objects are released through their own handles when the struct
        // is dropped; this only records that teardown ran.
        log::debug!(
            "releasing {} mesh record(s) and {} GPU mesh(es)",
            self.records.len(),
            self.meshes.len()
        );
    }
}

/// Uploads every mesh record in order: one position buffer, one normal
/// buffer, one index buffer per record, all write-once. The stride/format
/// metadata is taken from the records unchecked.
fn upload_meshes(device: &wgpu::Device, records: &[MeshRecord]) -> anyhow::Result<Vec<GpuMesh>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let position = record
                .attribute(geometry::POSITION)
                .with_context(|| format!("mesh {i} has no position stream"))?;
            let normal = record
                .attribute(geometry::NORMAL)
                .with_context(|| format!("mesh {i} has no normal stream"))?;

            let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Positions"),
                contents: &position.data,
                usage: wgpu::BufferUsages::VERTEX,
            });
            let normal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Normals"),
                contents: &normal.data,
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Indices"),
                contents: bytemuck::cast_slice(&record.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            Ok(GpuMesh {
                position_buffer,
                normal_buffer,
                index_buffer,
                index_count: record.index_count(),
            })
        })
        .collect()
}
