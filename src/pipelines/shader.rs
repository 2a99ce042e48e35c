//! Shader program: a vertex + fragment WGSL pair turned into render pipelines.
//!
//! WebGL switches blend functions per draw call. wgpu bakes blending into the pipeline,
//! so a program owns one pipeline per [`BlendMode`] and materials pick theirs at
//! activation time.
//!
//! Compilation problems are reported once through the [`ErrorCallback`]; the program is
//! then kept around but unusable and every material built on it skips drawing.

use crate::{
    context::ErrorCallback,
    data_structures::texture::{Texture, TextureSlot},
    pipelines::{material::BlendMode, mesh_renderer::MeshBuffers},
};

pub const VERTEX_SHADER: &str = include_str!("textured.vert.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("textured.frag.wgsl");

struct BlendPipelines {
    alpha: wgpu::RenderPipeline,
    add: wgpu::RenderPipeline,
    multiply: wgpu::RenderPipeline,
}

pub struct ShaderProgram {
    uniform_layout: wgpu::BindGroupLayout,
    albedo_layout: wgpu::BindGroupLayout,
    fallback_albedo: wgpu::BindGroup,
    pipelines: Option<BlendPipelines>,
}

impl ShaderProgram {
    pub async fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        vs_source: &str,
        fs_source: &str,
        on_error: &ErrorCallback,
    ) -> Self {
        let uniform_layout = uniform_layout(device);
        let albedo_layout = albedo_layout(device);
        let white = TextureSlot::new(Texture::from_image(
            device,
            queue,
            &image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
                1,
                1,
                image::Rgba([255, 255, 255, 255]),
            )),
            Some("fallback albedo"),
        ));
        let fallback_albedo = white.bind_group(device, &albedo_layout);

        let pipelines = Self::link(
            device,
            color_format,
            &uniform_layout,
            &albedo_layout,
            vs_source,
            fs_source,
            on_error,
        )
        .await;

        Self {
            uniform_layout,
            albedo_layout,
            fallback_albedo,
            pipelines,
        }
    }

    async fn link(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        uniform_layout: &wgpu::BindGroupLayout,
        albedo_layout: &wgpu::BindGroupLayout,
        vs_source: &str,
        fs_source: &str,
        on_error: &ErrorCallback,
    ) -> Option<BlendPipelines> {
        let vertex_shader = load_shader(device, "Vertex Shader", vs_source, on_error).await?;
        let fragment_shader = load_shader(device, "Fragment Shader", fs_source, on_error).await?;

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Textured Pipeline Layout"),
            bind_group_layouts: &[uniform_layout, albedo_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mk = |mode: BlendMode| {
            mk_render_pipeline(
                device,
                &layout,
                color_format,
                Some(mode.blend_state()),
                Some(Texture::DEPTH_FORMAT),
                &MeshBuffers::layouts(),
                &vertex_shader,
                &fragment_shader,
            )
        };
        let pipelines = BlendPipelines {
            alpha: mk(BlendMode::Alpha),
            add: mk(BlendMode::Add),
            multiply: mk(BlendMode::Multiply),
        };
        if let Some(error) = device.pop_error_scope().await {
            on_error(&format!("Unable to initialize the shader program: {}", error));
            return None;
        }
        Some(pipelines)
    }

    pub fn is_usable(&self) -> bool {
        self.pipelines.is_some()
    }

    pub fn pipeline(&self, mode: BlendMode) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.as_ref().map(|pipelines| match mode {
            BlendMode::Alpha => &pipelines.alpha,
            BlendMode::Add => &pipelines.add,
            BlendMode::Multiply => &pipelines.multiply,
        })
    }

    pub fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }

    pub fn albedo_layout(&self) -> &wgpu::BindGroupLayout {
        &self.albedo_layout
    }

    /// Plain white texture bound for materials without an albedo.
    pub fn fallback_albedo(&self) -> &wgpu::BindGroup {
        &self.fallback_albedo
    }
}

async fn load_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    on_error: &ErrorCallback,
) -> Option<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match device.pop_error_scope().await {
        Some(error) => {
            on_error(&format!(
                "An error occurred compiling the shaders: {}",
                error
            ));
            None
        }
        None => Some(module),
    }
}

fn uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("material_uniform_bind_group_layout"),
    })
}

fn albedo_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        label: Some("albedo_bind_group_layout"),
    })
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    vertex_shader: &wgpu::ShaderModule,
    fragment_shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Textured Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: vertex_shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
