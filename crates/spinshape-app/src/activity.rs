use spinshape_engine::coords::Viewport;
use spinshape_engine::core::{App, AppControl, FrameCtx, InputCtx};
use spinshape_engine::input::{InputEvent, Key, KeyState};

use crate::angle::SharedAngle;
use crate::controller::RotationController;
use crate::renderer::SceneRenderer;

/// The sample application: one surface, drag to rotate.
pub struct SampleActivity {
    controller: RotationController,
    renderer: SceneRenderer,
}

impl SampleActivity {
    pub fn new() -> Self {
        let angle = SharedAngle::default();
        Self {
            controller: RotationController::new(angle.clone()),
            renderer: SceneRenderer::new(angle),
        }
    }
}

impl Default for SampleActivity {
    fn default() -> Self {
        Self::new()
    }
}

impl App for SampleActivity {
    fn on_input(&mut self, event: &InputEvent, ctx: &mut InputCtx<'_>) -> AppControl {
        match event {
            InputEvent::Motion(motion) => {
                if self.controller.on_motion(motion, ctx.viewport) {
                    ctx.runtime.request_redraw();
                }
            }
            InputEvent::Key {
                key: Key::Escape,
                state: KeyState::Pressed,
                ..
            } => return AppControl::Exit,
            _ => {}
        }
        AppControl::Continue
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.renderer.on_surface_changed(viewport);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.renderer.on_draw_frame(ctx)
    }
}
