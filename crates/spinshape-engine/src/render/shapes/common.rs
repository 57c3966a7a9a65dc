//! Shared GPU plumbing for shape drawables.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::shader::{ShaderError, ShaderProgram};
use crate::render::{RenderCtx, RenderTarget};

use super::{COLOR_UNIFORM, COORDS_PER_VERTEX, DrawCall, POSITION_ATTRIBUTE, TRANSFORM_UNIFORM};

/// How a shape's vertices are assembled into triangles.
#[derive(Debug, Copy, Clone)]
pub(super) enum Topology {
    TriangleList,
    IndexedTriangleStrip(&'static [u16]),
}

/// Everything a shape hands to [`ShapeMesh::new`].
pub(super) struct ShapeDesc {
    pub label: &'static str,
    pub positions: &'static [[f32; COORDS_PER_VERTEX]],
    pub topology: Topology,
    pub color: Color,
    pub vertex_shader: &'static str,
    pub fragment_shader: &'static str,
}

impl ShapeDesc {
    pub(super) fn draw_call(&self) -> DrawCall {
        match self.topology {
            Topology::TriangleList => DrawCall::Arrays {
                vertex_count: self.positions.len() as u32,
            },
            Topology::IndexedTriangleStrip(indices) => DrawCall::IndexedStrip {
                index_count: indices.len() as u32,
            },
        }
    }
}

/// Uniform bindings of a shape.
enum Bindings {
    /// Color only; one bind group serves every draw.
    Fixed(wgpu::BindGroup),
    /// Color plus a transform. Each draw binds its own transform buffer, so
    /// several draws recorded into one submission each keep their matrix.
    PerDraw { color_slot: u32, transform_slot: u32 },
}

/// GPU-resident shape: program, pipeline, buffers and bindings.
///
/// Vertex, index and color buffers are immutable after construction and are
/// destroyed on drop.
pub(super) struct ShapeMesh {
    label: &'static str,
    color: Color,
    draw_call: DrawCall,

    program: ShaderProgram,
    pipeline: wgpu::RenderPipeline,
    bindings: Bindings,

    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    color_ubo: wgpu::Buffer,
}

impl ShapeMesh {
    pub(super) fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        desc: ShapeDesc,
    ) -> Result<Self, ShaderError> {
        let program =
            ShaderProgram::build(device, desc.label, desc.vertex_shader, desc.fragment_shader)?;
        let interface = program.interface();

        let position_location = interface.attribute_location(POSITION_ATTRIBUTE)?;
        let color_slot = interface.uniform(COLOR_UNIFORM)?.binding;
        let transform_slot = if interface.has_uniform(TRANSFORM_UNIFORM) {
            Some(interface.uniform(TRANSFORM_UNIFORM)?.binding)
        } else {
            None
        };

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} vbo", desc.label)),
            contents: bytemuck::cast_slice(desc.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (index_buffer, topology, strip_index_format) = match desc.topology {
            Topology::TriangleList => (None, wgpu::PrimitiveTopology::TriangleList, None),
            Topology::IndexedTriangleStrip(indices) => (
                Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} ibo", desc.label)),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                })),
                wgpu::PrimitiveTopology::TriangleStrip,
                Some(wgpu::IndexFormat::Uint16),
            ),
        };

        let color_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} color ubo", desc.label)),
            contents: bytemuck::bytes_of(&desc.color),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bindings = match transform_slot {
            Some(transform_slot) => Bindings::PerDraw {
                color_slot,
                transform_slot,
            },
            None => Bindings::Fixed(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} bind group", desc.label)),
                layout: program.bind_group_layout(),
                entries: &[wgpu::BindGroupEntry {
                    binding: color_slot,
                    resource: color_ubo.as_entire_binding(),
                }],
            })),
        };

        let vertex_attributes = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: position_location,
        }];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} pipeline", desc.label)),
            layout: Some(program.pipeline_layout()),

            vertex: wgpu::VertexState {
                module: program.vertex_module(),
                entry_point: Some(crate::render::shader::ENTRY_POINT),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: (COORDS_PER_VERTEX * std::mem::size_of::<f32>()) as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &vertex_attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: program.fragment_module(),
                entry_point: Some(crate::render::shader::ENTRY_POINT),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format,
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
        });

        let draw_call = desc.draw_call();
        log::debug!("{} ready: {:?}", desc.label, draw_call);

        Ok(Self {
            label: desc.label,
            color: desc.color,
            draw_call,
            program,
            pipeline,
            bindings,
            vertex_buffer,
            index_buffer,
            color_ubo,
        })
    }

    pub(super) fn color(&self) -> Color {
        self.color
    }

    pub(super) fn draw_call(&self) -> DrawCall {
        self.draw_call
    }

    pub(super) fn has_transform(&self) -> bool {
        matches!(self.bindings, Bindings::PerDraw { .. })
    }

    /// Bind group holding the color and a fresh uniform with `transform`.
    fn transform_bind_group(
        &self,
        device: &wgpu::Device,
        color_slot: u32,
        transform_slot: u32,
        transform: &Mat4,
    ) -> wgpu::BindGroup {
        let transform_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} transform ubo", self.label)),
            contents: bytemuck::cast_slice(&transform.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} draw bind group", self.label)),
            layout: self.program.bind_group_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: color_slot,
                    resource: self.color_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: transform_slot,
                    resource: transform_ubo.as_entire_binding(),
                },
            ],
        })
    }

    /// Records one pass. `transform` defaults to the identity for shapes
    /// that take one and is ignored otherwise.
    pub(super) fn draw(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        transform: Option<&Mat4>,
    ) {
        let per_draw;
        let bind_group = match &self.bindings {
            Bindings::Fixed(bind_group) => bind_group,
            Bindings::PerDraw {
                color_slot,
                transform_slot,
            } => {
                let m = transform.copied().unwrap_or(Mat4::IDENTITY);
                per_draw =
                    self.transform_bind_group(ctx.device, *color_slot, *transform_slot, &m);
                &per_draw
            }
        };

        let mut rpass = target.begin_load_pass(self.label);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

        match (self.draw_call, self.index_buffer.as_ref()) {
            (DrawCall::Arrays { vertex_count }, _) => rpass.draw(0..vertex_count, 0..1),
            (DrawCall::IndexedStrip { index_count }, Some(ibo)) => {
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..index_count, 0, 0..1);
            }
            (DrawCall::IndexedStrip { .. }, None) => {
                log::warn!("{}: indexed draw without an index buffer; skipped", self.label);
            }
        }
    }
}

impl Drop for ShapeMesh {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        if let Some(ibo) = &self.index_buffer {
            ibo.destroy();
        }
        self.color_ubo.destroy();
        log::debug!("{} released", self.label);
    }
}
