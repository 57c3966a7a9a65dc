use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::coords::Viewport;
use crate::input::InputEvent;

use super::ctx::{FrameCtx, InputCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// All callbacks run on the event-loop thread, which also owns the GPU context.
pub trait App {
    /// Called for raw window events, before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called for every translated input event.
    ///
    /// Request a redraw through `ctx.runtime` when the event changed what is drawn.
    fn on_input(&mut self, event: &InputEvent, ctx: &mut InputCtx<'_>) -> AppControl {
        let _ = (event, ctx);
        AppControl::Continue
    }

    /// Called when the drawable surface changes size (physical pixels).
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
