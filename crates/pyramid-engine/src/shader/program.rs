use std::borrow::Cow;

use super::interface::ProgramInterface;
use super::uniforms::{UniformBlock, UniformLocation, UniformSlot};
use super::{CompiledShader, ShaderError};

/// Render-target formats and vertex layout a program is linked against.
pub struct ProgramTargets<'a> {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
}

/// A linked vertex + fragment program with its uniform block.
///
/// Uniform values are staged on the CPU through [`uniforms_mut`](Self::uniforms_mut)
/// and uploaded with one buffer write in [`flush`](Self::flush).
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    interface: ProgramInterface,
    uniforms: UniformBlock,
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<(u32, wgpu::BindGroup)>,
}

impl ShaderProgram {
    /// Links two compiled stages into a render pipeline.
    ///
    /// Interface checks and uniform resolution happen on the CPU first; only a
    /// compatible pair reaches wgpu.
    pub fn link(
        device: &wgpu::Device,
        vertex: &CompiledShader,
        fragment: &CompiledShader,
        targets: &ProgramTargets<'_>,
    ) -> Result<Self, ShaderError> {
        let interface = ProgramInterface::link(vertex, fragment)?;

        let vs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pyramid vertex shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(vertex.source())),
        });
        let fs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pyramid fragment shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(fragment.source())),
        });

        // Auto layout: bind groups contain exactly what the stages use, which
        // matches the reflected uniform table.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pyramid program"),
            layout: None,

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(&interface.vertex_entry),
                compilation_options: Default::default(),
                buffers: targets.vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(&interface.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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

            depth_stencil: targets.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniforms = UniformBlock::new(interface.uniforms.clone());

        let (uniform_buffer, uniform_bind_group) = match interface.uniforms.block() {
            Some(block) => {
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("pyramid uniform block"),
                    size: u64::from(block.size),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("pyramid uniform bind group"),
                    layout: &pipeline.get_bind_group_layout(block.group),
                    entries: &[wgpu::BindGroupEntry {
                        binding: block.binding,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                (Some(buffer), Some((block.group, bind_group)))
            }
            None => (None, None),
        };

        let resolved = UniformSlot::ALL
            .iter()
            .filter(|s| interface.uniforms.get(**s).is_some())
            .count();
        log::info!(
            "linked program `{}`/`{}` ({resolved}/{} uniforms resolved)",
            interface.vertex_entry,
            interface.fragment_entry,
            UniformSlot::ALL.len()
        );

        Ok(Self {
            pipeline,
            interface,
            uniforms,
            uniform_buffer,
            uniform_bind_group,
        })
    }

    /// Looks up a uniform by name; `None` if the program does not expose it.
    pub fn resolve(&self, name: &str) -> Option<UniformLocation> {
        self.interface.uniforms.resolve(name)
    }

    /// Cached location of `slot`.
    pub fn location(&self, slot: UniformSlot) -> Option<UniformLocation> {
        self.interface.uniforms.get(slot)
    }

    /// Bind group a texture slot must be bound at.
    pub fn texture_group(&self, slot: UniformSlot) -> Option<u32> {
        self.interface.uniforms.texture_group(slot)
    }

    /// Layout of bind group `group` as derived from the shaders.
    pub fn bind_group_layout(&self, group: u32) -> wgpu::BindGroupLayout {
        self.pipeline.get_bind_group_layout(group)
    }

    pub fn uniforms_mut(&mut self) -> &mut UniformBlock {
        &mut self.uniforms
    }

    /// Uploads staged uniform values if any changed since the last flush.
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        if !self.uniforms.is_dirty() {
            return;
        }
        if let Some(buffer) = self.uniform_buffer.as_ref() {
            queue.write_buffer(buffer, 0, self.uniforms.as_bytes());
        }
        self.uniforms.mark_clean();
    }

    /// Makes this program current on `rpass` and binds its uniform block.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        if let Some((group, bind_group)) = self.uniform_bind_group.as_ref() {
            rpass.set_bind_group(*group, bind_group, &[]);
        }
    }
}
