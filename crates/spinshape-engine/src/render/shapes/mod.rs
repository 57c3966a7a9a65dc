//! Shape drawables.
//!
//! Both shapes are "fixed geometry + one program + one color + optional
//! transform"; the shared plumbing lives in `common`, and each shape file only
//! carries its constants and topology.

mod common;

pub mod square;
pub mod triangle;

pub use square::Square;
pub use triangle::Triangle;

use glam::Mat4;

use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

/// Attribute every shape program reads positions from.
pub const POSITION_ATTRIBUTE: &str = "vPosition";
/// Uniform every shape program reads its color from.
pub const COLOR_UNIFORM: &str = "vColor";
/// Uniform carrying the model-view-projection matrix, for shapes that take one.
pub const TRANSFORM_UNIFORM: &str = "uMVPMatrix";

/// Components per vertex position.
pub const COORDS_PER_VERTEX: usize = 3;

/// The GPU submission a drawable issues.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCall {
    /// Non-indexed triangle list.
    Arrays { vertex_count: u32 },
    /// Indexed triangle strip (`u16` indices).
    IndexedStrip { index_count: u32 },
}

/// Geometry that can draw itself into a render target.
///
/// Draws must happen on the thread that owns the device.
pub trait Drawable {
    /// Fill color passed to `vColor`.
    fn color(&self) -> Color;

    /// What `draw` submits.
    fn draw_call(&self) -> DrawCall;

    /// Whether `draw` honors the `transform` argument.
    fn accepts_transform(&self) -> bool;

    /// Records one render pass drawing the shape over the target's contents.
    ///
    /// `transform` is ignored by shapes without a transform uniform.
    fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, transform: Option<&Mat4>);
}
