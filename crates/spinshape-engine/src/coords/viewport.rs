/// Drawable surface size in physical pixels.
///
/// Pointer coordinates share this basis, so midpoint tests against touch
/// positions need no conversion.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Horizontal midpoint, truncated to a whole pixel (`width / 2` in integers).
    #[inline]
    pub fn mid_x(self) -> f32 {
        (self.width / 2.0).floor()
    }

    /// Vertical midpoint, truncated to a whole pixel.
    #[inline]
    pub fn mid_y(self) -> f32 {
        (self.height / 2.0).floor()
    }

    /// `width / height`, or `1.0` for a degenerate viewport.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoints_are_half_extents() {
        let vp = Viewport::new(200.0, 300.0);
        assert_eq!(vp.mid_x(), 100.0);
        assert_eq!(vp.mid_y(), 150.0);
    }

    #[test]
    fn odd_extents_truncate_midpoint() {
        let vp = Viewport::new(201.0, 99.0);
        assert_eq!(vp.mid_x(), 100.0);
        assert_eq!(vp.mid_y(), 49.0);
    }

    #[test]
    fn degenerate_viewport_has_unit_aspect() {
        assert_eq!(Viewport::new(0.0, 100.0).aspect_ratio(), 1.0);
        assert_eq!(Viewport::new(400.0, 200.0).aspect_ratio(), 2.0);
    }
}
