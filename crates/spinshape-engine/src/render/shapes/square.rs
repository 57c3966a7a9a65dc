use glam::Mat4;

use crate::paint::Color;
use crate::render::shader::{self, LinkedProgram, ShaderError};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{ShapeDesc, ShapeMesh, Topology};
use super::{COORDS_PER_VERTEX, DrawCall, Drawable};

/// Small fixed-position quad drawn in clip space as an overlay.
///
/// Has no transform input; whatever matrix the caller passes is ignored.
pub struct Square {
    mesh: ShapeMesh,
}

impl Square {
    pub const COORDS: [[f32; COORDS_PER_VERTEX]; 4] = [
        [-0.7, 0.75, 0.0], // top left
        [-0.7, 0.65, 0.0], // bottom left
        [-0.6, 0.65, 0.0], // bottom right
        [-0.6, 0.75, 0.0], // top right
    ];

    /// Two triangles sharing vertices 0 and 2.
    pub const DRAW_ORDER: [u16; 6] = [0, 1, 2, 0, 2, 3];

    pub const COLOR: Color = Color::new(1.0, 1.0, 0.0, 1.0);

    pub const VERTEX_SHADER: &'static str = include_str!("shaders/square.vert.wgsl");
    pub const FRAGMENT_SHADER: &'static str = include_str!("shaders/solid_color.frag.wgsl");

    const LABEL: &'static str = "square";

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
            topology: Topology::IndexedTriangleStrip(&Self::DRAW_ORDER),
            color: Self::COLOR,
            vertex_shader: Self::VERTEX_SHADER,
            fragment_shader: Self::FRAGMENT_SHADER,
        }
    }
}

impl Drawable for Square {
    fn color(&self) -> Color {
        self.mesh.color()
    }

    fn draw_call(&self) -> DrawCall {
        self.mesh.draw_call()
    }

    fn accepts_transform(&self) -> bool {
        false
    }

    fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, _transform: Option<&Mat4>) {
        self.mesh.draw(ctx, target, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes::{COLOR_UNIFORM, POSITION_ATTRIBUTE, TRANSFORM_UNIFORM};

    #[test]
    fn draw_order_is_two_triangles_sharing_a_diagonal() {
        assert_eq!(Square::DRAW_ORDER, [0, 1, 2, 0, 2, 3]);
        let (first, second) = Square::DRAW_ORDER.split_at(3);
        assert!(first.contains(&0) && first.contains(&2));
        assert!(second.contains(&0) && second.contains(&2));
        assert!(Square::DRAW_ORDER.iter().all(|&i| (i as usize) < Square::COORDS.len()));
    }

    #[test]
    fn draws_indexed_strip() {
        assert_eq!(Square::desc().draw_call(), DrawCall::IndexedStrip { index_count: 6 });
    }

    #[test]
    fn program_has_no_transform_slot() {
        let program = Square::link_program().unwrap();
        assert!(program.attribute_location(POSITION_ATTRIBUTE).is_ok());
        assert!(program.uniform(COLOR_UNIFORM).is_ok());
        assert!(!program.has_uniform(TRANSFORM_UNIFORM));
    }

    #[test]
    fn color_is_kept_verbatim() {
        assert_eq!(Square::desc().color.to_array(), [1.0, 1.0, 0.0, 1.0]);
    }
}
