//! spinshape engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the sample application:
//! window/event loop, input translation, device management, shader
//! compile/link, and the shape drawables.

pub mod core;
pub mod device;
pub mod input;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
