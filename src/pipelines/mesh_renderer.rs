//! Mesh buffers and the drawable that renders them.

use std::rc::Rc;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        entity::{Component, DrawContext, Drawable, Entity},
        mesh::Mesh,
    },
    pipelines::material::{Material, MaterialBinding},
};

/// Static GPU copies of a [`Mesh`]: positions, texture coordinates and indices.
///
/// Positions and uvs live in separate vertex buffers (slots 0 and 1). Meshes without uvs
/// get a zeroed uv stream so the pipeline layout is always satisfied.
pub struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    uv_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let zeroes;
        let uv: &[[f32; 2]] = match &mesh.uv {
            Some(uv) => uv,
            None => {
                zeroes = vec![[0.0f32; 2]; mesh.vertices.len()];
                &zeroes
            }
        };
        let uv_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh UV Buffer"),
            contents: bytemuck::cast_slice(uv),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.triangles),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            uv_buffer,
            index_buffer,
            num_indices: mesh.triangles.len() as u32,
        }
    }

    pub fn layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        use std::mem;
        [
            wgpu::VertexBufferLayout {
                array_stride: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
        ]
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.uv_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}

/// Geometry handed to a [`MeshRenderer`]: already uploaded and shared, or raw data
/// uploaded once at construction.
pub enum MeshSource {
    Shared(Rc<MeshBuffers>),
    Raw(Mesh),
}

impl From<Rc<MeshBuffers>> for MeshSource {
    fn from(buffers: Rc<MeshBuffers>) -> Self {
        MeshSource::Shared(buffers)
    }
}

impl From<Mesh> for MeshSource {
    fn from(mesh: Mesh) -> Self {
        MeshSource::Raw(mesh)
    }
}

pub struct MeshRenderer {
    buffers: Rc<MeshBuffers>,
    pub material: Rc<Material>,
    binding: MaterialBinding,
}

impl MeshRenderer {
    pub fn new(
        device: &wgpu::Device,
        mesh: impl Into<MeshSource>,
        material: Rc<Material>,
    ) -> Self {
        let buffers = match mesh.into() {
            MeshSource::Shared(buffers) => buffers,
            MeshSource::Raw(mesh) => Rc::new(MeshBuffers::new(device, &mesh)),
        };
        let binding = MaterialBinding::new(device, material.shader());
        Self {
            buffers,
            material,
            binding,
        }
    }

    pub fn buffers(&self) -> &Rc<MeshBuffers> {
        &self.buffers
    }
}

impl Drawable for MeshRenderer {
    fn draw(&self, entity: &Entity, dc: &mut DrawContext<'_, '_>) {
        let Some(transform) = entity.transform() else {
            log::debug!("{} has no transform, skipping draw", entity.name());
            return;
        };
        dc.state.model = transform.borrow().matrix();

        if !self.material.activate(dc, &self.binding) {
            return;
        }
        self.buffers.draw(dc.render_pass);
    }
}

impl From<MeshRenderer> for Component {
    fn from(renderer: MeshRenderer) -> Self {
        Component::Drawable(Box::new(renderer))
    }
}
