//! Pyramid geometry and its GPU resources.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use pyramid_engine::render::{GpuTexture, RenderCtx, TextureError, TextureImage};
use pyramid_engine::shader::{ShaderProgram, UniformLocation, UniformSlot};

// ── vertex ────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PyramidVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl PyramidVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PyramidVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const fn v(position: [f32; 3], uv: [f32; 2]) -> PyramidVertex {
    PyramidVertex { position, uv }
}

const APEX: [f32; 3] = [0.0, 1.0, 0.0];
const FRONT_LEFT: [f32; 3] = [-1.0, -1.0, 1.0];
const FRONT_RIGHT: [f32; 3] = [1.0, -1.0, 1.0];
const BACK_RIGHT: [f32; 3] = [1.0, -1.0, -1.0];
const BACK_LEFT: [f32; 3] = [-1.0, -1.0, -1.0];

/// Four side faces (one triangle each, unshared so every face gets the full
/// texture) followed by the square base.
pub const VERTICES: [PyramidVertex; 16] = [
    // front
    v(APEX, [0.5, 0.0]),
    v(FRONT_LEFT, [0.0, 1.0]),
    v(FRONT_RIGHT, [1.0, 1.0]),
    // right
    v(APEX, [0.5, 0.0]),
    v(FRONT_RIGHT, [0.0, 1.0]),
    v(BACK_RIGHT, [1.0, 1.0]),
    // back
    v(APEX, [0.5, 0.0]),
    v(BACK_RIGHT, [0.0, 1.0]),
    v(BACK_LEFT, [1.0, 1.0]),
    // left
    v(APEX, [0.5, 0.0]),
    v(BACK_LEFT, [0.0, 1.0]),
    v(FRONT_LEFT, [1.0, 1.0]),
    // base
    v(FRONT_LEFT, [0.0, 0.0]),
    v(BACK_LEFT, [0.0, 1.0]),
    v(BACK_RIGHT, [1.0, 1.0]),
    v(FRONT_RIGHT, [1.0, 0.0]),
];

pub const INDICES: [u16; 18] = [
    0, 1, 2, //
    3, 4, 5, //
    6, 7, 8, //
    9, 10, 11, //
    12, 13, 14, //
    12, 14, 15,
];

// ── mesh ──────────────────────────────────────────────────────────────────

/// GPU buffers and texture for the pyramid.
///
/// Only [`setup`](Self::setup) produces one, so a mesh that exists is always
/// ready to draw.
pub struct PyramidMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    /// Owns the texture sampled through `texture_bind_group`.
    _texture: GpuTexture,
    texture_bind_group: Option<(u32, wgpu::BindGroup)>,
}

impl PyramidMesh {
    /// Uploads geometry and `image`, and binds the texture at the group the
    /// program resolved for `uSampler`.
    pub fn setup(
        ctx: &RenderCtx<'_>,
        program: &ShaderProgram,
        image: &TextureImage,
    ) -> Result<Self, TextureError> {
        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pyramid vertices"),
            contents: bytemuck::cast_slice(&VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pyramid indices"),
            contents: bytemuck::cast_slice(&INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let texture = GpuTexture::upload(ctx.device, ctx.queue, image)?;

        let texture_bind_group = match program.location(UniformSlot::Sampler) {
            Some(UniformLocation::Texture { group, binding, sampler_binding }) => {
                let mut entries = vec![wgpu::BindGroupEntry {
                    binding,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                }];
                if let Some(sampler_binding) = sampler_binding {
                    entries.push(wgpu::BindGroupEntry {
                        binding: sampler_binding,
                        resource: wgpu::BindingResource::Sampler(texture.sampler()),
                    });
                }
                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("pyramid texture bind group"),
                    layout: &program.bind_group_layout(group),
                    entries: &entries,
                });
                Some((group, bind_group))
            }
            _ => {
                log::warn!("program does not sample `uSampler`; drawing untextured");
                None
            }
        };

        log::debug!(
            "pyramid mesh uploaded: {} vertices, {} indices, texture {}x{}",
            VERTICES.len(),
            INDICES.len(),
            texture.size().0,
            texture.size().1
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: INDICES.len() as u32,
            _texture: texture,
            texture_bind_group,
        })
    }

    /// Issues one indexed draw with whatever program is bound on `rpass`.
    pub fn render(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if let Some((group, bind_group)) = self.texture_bind_group.as_ref() {
            rpass.set_bind_group(*group, bind_group, &[]);
        }
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
