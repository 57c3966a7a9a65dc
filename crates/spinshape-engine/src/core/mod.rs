//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the
//! application: callbacks for input, resize and frames, plus the contexts
//! passed to them.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, InputCtx, WindowCtx};

pub(crate) use ctx::surface_viewport;
