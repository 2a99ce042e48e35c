//! Materials: a shader program, an optional albedo texture, a tint and a blend mode.
//!
//! One material is built per visual style and shared by reference between renderers.
//! The per-draw uniform data lives in a [`MaterialBinding`] owned by each renderer,
//! because a wgpu queue write only lands at submit time and a shared buffer would end up
//! holding the last draw's matrices for every draw.

use std::rc::Rc;

use cgmath::Vector4;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        entity::DrawContext, rendering_state::RenderingState, texture::TextureSlot,
    },
    pipelines::shader::ShaderProgram,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Alpha,
    Add,
    Multiply,
}

impl BlendMode {
    /// `(source, destination)` factors, applied to colour and alpha alike.
    pub fn factors(self) -> (wgpu::BlendFactor, wgpu::BlendFactor) {
        match self {
            BlendMode::Alpha => (
                wgpu::BlendFactor::SrcAlpha,
                wgpu::BlendFactor::OneMinusSrcAlpha,
            ),
            BlendMode::Add => (wgpu::BlendFactor::SrcAlpha, wgpu::BlendFactor::One),
            BlendMode::Multiply => (wgpu::BlendFactor::Zero, wgpu::BlendFactor::OneMinusSrc),
        }
    }

    pub fn blend_state(self) -> wgpu::BlendState {
        let (src_factor, dst_factor) = self.factors();
        let component = wgpu::BlendComponent {
            src_factor,
            dst_factor,
            operation: wgpu::BlendOperation::Add,
        };
        wgpu::BlendState {
            color: component,
            alpha: component,
        }
    }
}

/**
 * The uniform block shared by the vertex and fragment stage.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl MaterialUniform {
    pub fn new(state: &RenderingState, color: Vector4<f32>) -> Self {
        Self {
            projection: state.projection.into(),
            model_view: state.model_view().into(),
            color: color.into(),
        }
    }
}

/// Uniform buffer and bind group owned by a single renderer.
pub struct MaterialBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MaterialBinding {
    pub fn new(device: &wgpu::Device, shader: &ShaderProgram) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniform Buffer"),
            contents: bytemuck::cast_slice(&[MaterialUniform::new(
                &RenderingState::default(),
                Vector4::new(1.0, 1.0, 1.0, 1.0),
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: shader.uniform_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("material_uniform_bind_group"),
        });
        Self { buffer, bind_group }
    }
}

pub struct Material {
    shader: Rc<ShaderProgram>,
    pub albedo: Option<TextureSlot>,
    pub color: Vector4<f32>,
    pub blend_mode: BlendMode,
}

impl Material {
    pub fn new(shader: Rc<ShaderProgram>) -> Self {
        Self {
            shader,
            albedo: None,
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            blend_mode: BlendMode::Alpha,
        }
    }

    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    /// Binds pipeline, uniforms and albedo for the upcoming draw.
    ///
    /// The model-view matrix is `view · model`, with `model` read from the rendering
    /// state the caller has just filled. Returns `false` when the shader program is
    /// unusable, in which case nothing was bound.
    pub fn activate(&self, dc: &mut DrawContext<'_, '_>, binding: &MaterialBinding) -> bool {
        let Some(pipeline) = self.shader.pipeline(self.blend_mode) else {
            return false;
        };
        let uniform = MaterialUniform::new(dc.state, self.color);
        dc.queue
            .write_buffer(&binding.buffer, 0, bytemuck::cast_slice(&[uniform]));

        dc.render_pass.set_pipeline(pipeline);
        dc.render_pass.set_bind_group(0, &binding.bind_group, &[]);
        match &self.albedo {
            Some(slot) => {
                let albedo = slot.bind_group(dc.device, self.shader.albedo_layout());
                dc.render_pass.set_bind_group(1, &albedo, &[]);
            }
            None => dc
                .render_pass
                .set_bind_group(1, self.shader.fallback_albedo(), &[]),
        }
        true
    }
}
