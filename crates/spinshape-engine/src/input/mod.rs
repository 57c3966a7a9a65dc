//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into `InputEvent`s via `platform`.
//!
//! Touch and mouse both surface as [`MotionEvent`]s so consumers handle a
//! single gesture stream regardless of device.

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, MotionAction, MotionEvent, PointerId};
