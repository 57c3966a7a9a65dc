//! GPU rendering subsystem.
//!
//! Each drawable owns its GPU resources (program, pipeline, buffers) and issues
//! its own render pass on top of what is already in the target.
//!
//! Convention:
//! - Geometry is authored in normalized device coordinates.
//! - Shader stages are separate WGSL sources compiled and linked through
//!   [`shader`], which checks the names a drawable binds before any GPU work.

mod ctx;
pub mod shader;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use shader::{ShaderError, ShaderProgram, ShaderStage};
pub use shapes::{DrawCall, Drawable, Square, Triangle};
