use glam::Mat4;

use crate::paint::Color;
use crate::render::shader::{self, LinkedProgram, ShaderError};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{ShapeDesc, ShapeMesh, Topology};
use super::{COORDS_PER_VERTEX, DrawCall, Drawable};

/// Filled triangle positioned by a caller-supplied model-view-projection matrix.
pub struct Triangle {
    mesh: ShapeMesh,
}

impl Triangle {
    /// Vertices in counter-clockwise order: top, bottom left, bottom right.
    pub const COORDS: [[f32; COORDS_PER_VERTEX]; 3] = [
        [0.0, 0.622008459, 0.0],
        [-0.5, -0.311004243, 0.0],
        [0.5, -0.311004243, 0.0],
    ];

    pub const COLOR: Color = Color::new(0.63671875, 0.76953125, 0.22265625, 1.0);

    pub const VERTEX_SHADER: &'static str = include_str!("shaders/triangle.vert.wgsl");
    pub const FRAGMENT_SHADER: &'static str = include_str!("shaders/solid_color.frag.wgsl");

    const LABEL: &'static str = "triangle";

    /// Compiles and links the program on the CPU only.
    pub fn link_program() -> Result<LinkedProgram, ShaderError> {
        shader::link_sources(Self::LABEL, Self::VERTEX_SHADER, Self::FRAGMENT_SHADER)
    }

    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let mesh = ShapeMesh::new(device, surface_format, Self::desc())?;
        Ok(Self { mesh })
    }

    fn desc() -> ShapeDesc {
        ShapeDesc {
            label: Self::LABEL,
            positions: &Self::COORDS,
            topology: Topology::TriangleList,
            color: Self::COLOR,
            vertex_shader: Self::VERTEX_SHADER,
            fragment_shader: Self::FRAGMENT_SHADER,
        }
    }
}

impl Drawable for Triangle {
    fn color(&self) -> Color {
        self.mesh.color()
    }

    fn draw_call(&self) -> DrawCall {
        self.mesh.draw_call()
    }

    fn accepts_transform(&self) -> bool {
        self.mesh.has_transform()
    }

    /// Draws with `transform`, or with the identity when none is given.
    fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, transform: Option<&Mat4>) {
        self.mesh
            .draw(ctx, target, Some(transform.unwrap_or(&Mat4::IDENTITY)));
    }
}
