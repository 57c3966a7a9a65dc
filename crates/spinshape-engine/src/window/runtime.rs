use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, InputCtx, WindowCtx};
use crate::core::surface_viewport;
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;

/// When the surface is redrawn.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RenderMode {
    /// Redraw only after a redraw request (or a resize).
    #[default]
    WhenDirty,
    /// Redraw every time the event loop goes idle.
    Continuously,
}

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub render_mode: RenderMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "spinshape".to_string(),
            initial_size: LogicalSize::new(720.0, 1280.0),
            render_mode: RenderMode::WhenDirty,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
/// Multiple redraw requests issued before the next frame coalesce into one.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Schedules a redraw of the surface.
    pub fn request_redraw(&mut self) {
        if !self.redraw_requested() {
            self.commands.push(Command::RequestRedraw);
        }
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    /// Stops the event loop and makes [`Runtime::run`] return `err`.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.commands.push(Command::Fail(err));
    }

    pub fn redraw_requested(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::RequestRedraw))
    }

    pub fn exit_requested(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, Command::Exit | Command::Fail(_)))
    }
}

#[derive(Debug)]
enum Command {
    RequestRedraw,
    Exit,
    Fail(anyhow::Error),
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs the event loop until the app exits.
    ///
    /// Returns an error when the event loop, window, or GPU context cannot be created.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::RequestRedraw => {
                    if let Some(entry) = self.window.as_ref() {
                        entry.with_window(|w| w.request_redraw());
                    }
                }
                Command::Exit => self.exit_requested = true,
                Command::Fail(err) => self.fail(event_loop, err),
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    /// Reconfigures the surface and notifies the app of the new size.
    fn handle_resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        let viewport = entry.with_window(|w| surface_viewport(w));
        log::debug!("surface resized to {}x{}", viewport.width, viewport.height);

        app.on_resize(viewport);
        entry.with_window(|w| w.request_redraw());
    }

    fn draw_frame(&mut self, window_id: WindowId) -> RuntimeCtx {
        let mut runtime_ctx = RuntimeCtx::default();
        let (app, window) = (&mut self.app, &mut self.window);

        let Some(entry) = window.as_mut() else {
            return runtime_ctx;
        };

        entry.with_mut(|fields| {
            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        id: window_id,
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    runtime: &mut runtime_ctx,
                };
                app.on_frame(&mut ctx)
            };

            if control == AppControl::Exit {
                runtime_ctx.exit();
            }
        });

        runtime_ctx
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                let size = entry.with_window(|w| w.inner_size());
                self.window = Some(entry);
                self.handle_resize(size);
            }
            Err(e) => self.fail(event_loop, e.context("failed to create initial window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if self.config.render_mode == RenderMode::Continuously {
            if let Some(entry) = self.window.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, window) = (&mut self.app, &mut self.window);

        let Some(entry) = window.as_mut() else {
            return;
        };

        let mut runtime_ctx = RuntimeCtx::default();
        let mut exit_from_app = false;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                let mut input_ctx = InputCtx {
                    viewport: surface_viewport(fields.window),
                    runtime: &mut runtime_ctx,
                };
                if app.on_input(&ev, &mut input_ctx) == AppControl::Exit {
                    exit_from_app = true;
                }

                fields.input_state.apply_event(&ev);
            }

            if app.on_window_event(window_id, &event) == AppControl::Exit {
                exit_from_app = true;
            }
        });

        if exit_from_app {
            runtime_ctx.exit();
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.window = None;
                runtime_ctx.exit();
            }

            WindowEvent::Resized(new_size) => self.handle_resize(*new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.handle_resize(size);
                }
            }

            WindowEvent::RedrawRequested => {
                let frame_ctx = self.draw_frame(window_id);
                runtime_ctx.commands.extend(frame_ctx.commands);
            }

            _ => {}
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}
