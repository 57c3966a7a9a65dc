use spinshape_engine::coords::Viewport;
use spinshape_engine::input::MotionEvent;

use crate::angle::SharedAngle;

/// Degrees of rotation per physical pixel of drag.
///
/// Motion events and the viewport are both in physical pixels, so a drag of
/// the same on-screen length turns further on a denser display.
pub const TOUCH_SCALE_FACTOR: f32 = 180.0 / 320.0;

/// Turns pointer drags into rotation of the scene.
///
/// The sign of each delta depends on which half of the surface the pointer is
/// in, so circling the center turns the shape consistently in one direction.
#[derive(Debug)]
pub struct RotationController {
    previous_x: f32,
    previous_y: f32,
    angle: SharedAngle,
}

impl RotationController {
    pub fn new(angle: SharedAngle) -> Self {
        Self {
            previous_x: 0.0,
            previous_y: 0.0,
            angle,
        }
    }

    pub fn angle(&self) -> &SharedAngle {
        &self.angle
    }

    /// Feeds one motion event. Returns `true` when the angle changed and the
    /// surface needs a redraw.
    ///
    /// The last position is recorded for every action, so a drag measures from
    /// where the pointer went down.
    pub fn on_motion(&mut self, event: &MotionEvent, viewport: Viewport) -> bool {
        let (x, y) = (event.x, event.y);
        let mut changed = false;

        if event.action.is_move() {
            let mut dx = x - self.previous_x;
            // Measured from x, not y.
            let mut dy = x - self.previous_y;

            // Reverse direction of rotation below the mid-line.
            if y > viewport.mid_y() {
                dx = -dx;
            }

            // Reverse direction of rotation left of the mid-line.
            if x < viewport.mid_x() {
                dy = -dy;
            }

            let angle = self.angle.add((dx + dy) * TOUCH_SCALE_FACTOR);
            log::trace!("drag ({dx}, {dy}) -> angle {angle}");
            changed = true;
        }

        self.previous_x = x;
        self.previous_y = y;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinshape_engine::input::{MotionAction, PointerId};

    fn touch(x: f32, y: f32, action: MotionAction) -> MotionEvent {
        MotionEvent::new(x, y, action, PointerId::Touch(0))
    }

    fn square() -> Viewport {
        Viewport::new(200.0, 200.0)
    }

    #[test]
    fn drag_right_from_center_rotates() {
        let mut c = RotationController::new(SharedAngle::default());

        assert!(!c.on_motion(&touch(100.0, 100.0, MotionAction::Down), square()));
        assert!(c.on_motion(&touch(110.0, 100.0, MotionAction::Move), square()));

        // dx = 10, dy = 110 - 100 = 10, no flips: 20 * 180 / 320.
        assert_eq!(c.angle().get(), 11.25);
    }

    #[test]
    fn only_moves_change_the_angle() {
        let mut c = RotationController::new(SharedAngle::default());
        for action in [
            MotionAction::Down,
            MotionAction::Hover,
            MotionAction::Up,
            MotionAction::Cancel,
        ] {
            assert!(!c.on_motion(&touch(37.0, 180.0, action), square()));
        }
        assert_eq!(c.angle().get(), 0.0);
    }

    #[test]
    fn non_move_events_update_the_last_position() {
        let mut c = RotationController::new(SharedAngle::default());
        c.on_motion(&touch(150.0, 50.0, MotionAction::Hover), square());
        c.on_motion(&touch(150.0, 50.0, MotionAction::Move), square());

        // dx = 0, dy = 150 - 50 = 100.
        assert_eq!(c.angle().get(), 100.0 * TOUCH_SCALE_FACTOR);
    }

    #[test]
    fn lower_half_reverses_horizontal_delta() {
        let mut c = RotationController::new(SharedAngle::default());
        c.on_motion(&touch(110.0, 150.0, MotionAction::Down), square());
        c.on_motion(&touch(120.0, 150.0, MotionAction::Move), square());

        // dx = -10, dy = 120 - 150 = -30.
        assert_eq!(c.angle().get(), -40.0 * TOUCH_SCALE_FACTOR);
    }

    #[test]
    fn left_half_reverses_vertical_delta() {
        let mut c = RotationController::new(SharedAngle::default());
        c.on_motion(&touch(50.0, 20.0, MotionAction::Down), square());
        c.on_motion(&touch(60.0, 20.0, MotionAction::Move), square());

        // dx = 10, dy = -(60 - 20) = -40.
        assert_eq!(c.angle().get(), -30.0 * TOUCH_SCALE_FACTOR);
    }

    #[test]
    fn angle_is_the_sum_of_scaled_deltas() {
        let angle = SharedAngle::default();
        let mut c = RotationController::new(angle.clone());
        let path = [(120.0, 40.0), (130.0, 45.0), (140.0, 60.0), (150.0, 80.0)];

        c.on_motion(&touch(110.0, 30.0, MotionAction::Down), square());
        let mut expected = 0.0;
        let (mut px, mut py) = (110.0_f32, 30.0_f32);
        for (x, y) in path {
            c.on_motion(&touch(x, y, MotionAction::Move), square());
            expected += ((x - px) + (x - py)) * TOUCH_SCALE_FACTOR;
            (px, py) = (x, y);
        }

        assert!((angle.get() - expected).abs() < 1e-3);
    }

    #[test]
    fn odd_height_splits_on_the_truncated_midpoint() {
        let odd = Viewport::new(200.0, 201.0);
        let mut c = RotationController::new(SharedAngle::default());

        // y = 100.5 lies above the exact midpoint but below the whole-pixel one.
        c.on_motion(&touch(110.0, 100.5, MotionAction::Down), odd);
        c.on_motion(&touch(120.0, 100.5, MotionAction::Move), odd);

        // dx = -(10), dy = 120 - 100.5 = 19.5.
        assert_eq!(c.angle().get(), 9.5 * TOUCH_SCALE_FACTOR);
    }
}
