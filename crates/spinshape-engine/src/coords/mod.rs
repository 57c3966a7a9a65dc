//! Coordinate types shared by the runtime, input handling and renderers.
//!
//! Pointer space:
//! - Physical pixels, the same units as the surface size
//! - Origin top-left
//! - +X right, +Y down
//!
//! Geometry handed to shaders is in normalized device coordinates.

mod viewport;

pub use viewport::Viewport;
