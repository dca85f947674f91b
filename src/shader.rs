use std::borrow::Cow;

use crate::error::RenderError;

/// Reads a shader source text from disk. The paths are fixed at build time,
/// so a missing file means a broken deployment and is fatal.
pub fn load_source(path: &str) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::FileNotFound {
        path: path.to_string(),
        source,
    })
}

/// Compiles one WGSL module, trapping the backend's validation log.
pub async fn compile(
    device: &wgpu::Device,
    label: &'static str,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    });

    match device.pop_error_scope().await {
        None => Ok(module),
        Some(err) => Err(RenderError::CompileError {
            label,
            log: err.to_string(),
        }),
    }
}

/// Links the compiled vertex/fragment pair into one render pipeline.
///
/// Attribute slots are fixed across meshes: shader location 0 reads
/// positions, location 1 reads normals. The vertex buffer layouts carry the
/// stride and format metadata supplied by the geometry source.
pub async fn link(
    device: &wgpu::Device,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
    vertex_layouts: &[wgpu::VertexBufferLayout<'_>],
    topology: wgpu::PrimitiveTopology,
    target_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("sphere_pipeline"),
        layout: None,
        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: vertex_layouts,
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(target_format.into())],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    match device.pop_error_scope().await {
        None => Ok(pipeline),
        Some(err) => Err(RenderError::LinkError {
            log: err.to_string(),
        }),
    }
}
