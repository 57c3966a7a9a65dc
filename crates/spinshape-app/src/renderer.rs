use glam::{Mat4, Vec3};

use spinshape_engine::coords::Viewport;
use spinshape_engine::core::{AppControl, FrameCtx};
use spinshape_engine::paint::Color;
use spinshape_engine::render::{Drawable, ShaderError, Square, Triangle};

use crate::angle::SharedAngle;

pub const CLEAR_COLOR: Color = Color::BLACK;

/// Camera position; looks at the origin with +Y up.
pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 3.0);
pub const NEAR: f32 = 3.0;
pub const FAR: f32 = 7.0;

/// Axis the triangle spins around (into the screen).
pub const ROTATION_AXIS: Vec3 = Vec3::NEG_Z;

/// Vertical field of view of a frustum spanning `[-1, 1]` at the near plane.
#[inline]
pub fn fov_y() -> f32 {
    2.0 * (1.0 / NEAR).atan()
}

pub fn view_matrix() -> Mat4 {
    Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Y)
}

/// Frustum `(-aspect, aspect, -1, 1, NEAR, FAR)` with a `[0, 1]` depth range.
pub fn projection_matrix(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y(), aspect, NEAR, FAR)
}

pub fn rotation_matrix(degrees: f32) -> Mat4 {
    Mat4::from_axis_angle(ROTATION_AXIS, degrees.to_radians())
}

/// `projection * view * rotation`.
pub fn scene_matrix(projection: Mat4, view: Mat4, degrees: f32) -> Mat4 {
    projection * view * rotation_matrix(degrees)
}

struct Shapes {
    triangle: Triangle,
    square: Square,
}

impl Shapes {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, ShaderError> {
        let triangle = Triangle::new(device, format)?;
        let square = Square::new(device, format)?;
        log::info!("shapes ready (surface format {format:?})");
        Ok(Self { triangle, square })
    }
}

/// Draws the rotating triangle and the fixed square.
///
/// Shapes are built on the first frame, once a device and surface format exist.
pub struct SceneRenderer {
    angle: SharedAngle,
    shapes: Option<Shapes>,
    projection: Mat4,
    view: Mat4,
}

impl SceneRenderer {
    pub fn new(angle: SharedAngle) -> Self {
        Self {
            angle,
            shapes: None,
            projection: projection_matrix(1.0),
            view: view_matrix(),
        }
    }

    pub fn on_surface_changed(&mut self, viewport: Viewport) {
        let ratio = viewport.aspect_ratio();
        log::debug!("surface {}x{} (ratio {ratio})", viewport.width, viewport.height);
        self.projection = projection_matrix(ratio);
    }

    /// Matrix for the current angle. The angle is read once per call.
    pub fn mvp(&self) -> Mat4 {
        scene_matrix(self.projection, self.view, self.angle.get())
    }

    pub fn on_draw_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.shapes.is_none() {
            match Shapes::new(ctx.gpu.device(), ctx.gpu.surface_format()) {
                Ok(shapes) => self.shapes = Some(shapes),
                Err(err) => {
                    ctx.runtime
                        .fail(anyhow::Error::new(err).context("failed to build scene shapes"));
                    return AppControl::Exit;
                }
            }
        }
        let Some(shapes) = self.shapes.as_ref() else {
            return AppControl::Exit;
        };

        let mvp = self.mvp();
        ctx.render(CLEAR_COLOR, |rctx, target| {
            shapes.triangle.draw(rctx, target, Some(&mvp));
            shapes.square.draw(rctx, target, None);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn apex() -> Vec3 {
        Vec3::from_array(Triangle::COORDS[0])
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn unrotated_apex_lands_in_upper_half() {
        let m = scene_matrix(projection_matrix(1.0), view_matrix(), 0.0);
        let p = m.project_point3(apex());

        assert!(close(p.x, 0.0));
        assert!(close(p.y, 0.622008459));
        assert!(p.y > 0.0);
        // z = 0 sits at distance 3 from the eye, the near plane.
        assert!(close(p.z, 0.0));
    }

    #[test]
    fn projection_matches_frustum_scale() {
        let p = projection_matrix(0.5);
        // 2n / (r - l) with r = 0.5 and 2n / (t - b) with t = 1.
        assert!(close(p.x_axis.x, 6.0));
        assert!(close(p.y_axis.y, 3.0));
    }

    #[test]
    fn positive_angle_turns_clockwise_on_screen() {
        let m = scene_matrix(projection_matrix(1.0), view_matrix(), 90.0);
        let p = m.project_point3(apex());

        assert!(close(p.x, 0.622008459));
        assert!(close(p.y, 0.0));
    }

    #[test]
    fn wide_surface_compresses_x() {
        let m = scene_matrix(projection_matrix(2.0), view_matrix(), 90.0);
        let p = m.project_point3(apex());
        assert!(close(p.x, 0.622008459 / 2.0));
    }

    #[test]
    fn mvp_reads_the_shared_angle() {
        let angle = SharedAngle::default();
        let renderer = SceneRenderer::new(angle.clone());
        let before = renderer.mvp();

        angle.set(45.0);
        let after = renderer.mvp();

        assert_ne!(before, after);
        assert_eq!(after, scene_matrix(projection_matrix(1.0), view_matrix(), 45.0));
    }

    #[test]
    fn surface_change_updates_projection() {
        let mut renderer = SceneRenderer::new(SharedAngle::default());
        renderer.on_surface_changed(Viewport::new(720.0, 1280.0));
        assert_eq!(renderer.projection, projection_matrix(720.0 / 1280.0));
    }
}
