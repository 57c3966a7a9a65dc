use super::types::{InputEvent, MotionAction, MotionEvent, PointerId};

/// Pointer state the runtime needs to translate platform events.
///
/// Holds a fixed amount of data; nothing accumulates between frames.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in physical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Primary mouse button held.
    pub mouse_down: bool,

    /// Touch id driving the current gesture. Other fingers are ignored.
    pub primary_touch: Option<u64>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Motion(m) => self.apply_motion(m),

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // A press in flight when focus went away never reports its release.
                    self.mouse_down = false;
                    self.primary_touch = None;
                }
            }

            InputEvent::Key { .. } => {}
        }
    }

    fn apply_motion(&mut self, m: &MotionEvent) {
        self.pointer_pos = Some((m.x, m.y));

        match (m.pointer, m.action) {
            (PointerId::Mouse, MotionAction::Down) => self.mouse_down = true,
            (PointerId::Mouse, MotionAction::Up | MotionAction::Cancel) => self.mouse_down = false,
            (PointerId::Touch(id), MotionAction::Down) => self.primary_touch = Some(id),
            (PointerId::Touch(_), MotionAction::Up | MotionAction::Cancel) => {
                self.primary_touch = None
            }
            _ => {}
        }
    }

    /// Whether a touch event from finger `id` may drive the gesture.
    ///
    /// Only the primary finger is accepted. With no primary finger, a touch
    /// must start with `Down`; moves from a finger that went down earlier (for
    /// example before focus was lost) are dropped.
    pub fn accepts_touch(&self, id: u64, action: MotionAction) -> bool {
        match self.primary_touch {
            Some(primary) => primary == id,
            None => action == MotionAction::Down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion(x: f32, y: f32, action: MotionAction, pointer: PointerId) -> InputEvent {
        InputEvent::Motion(MotionEvent::new(x, y, action, pointer))
    }

    #[test]
    fn mouse_press_and_release_track_button() {
        let mut state = InputState::default();

        state.apply_event(&motion(1.0, 2.0, MotionAction::Down, PointerId::Mouse));
        assert!(state.mouse_down);
        assert_eq!(state.pointer_pos, Some((1.0, 2.0)));

        state.apply_event(&motion(3.0, 4.0, MotionAction::Up, PointerId::Mouse));
        assert!(!state.mouse_down);
        assert_eq!(state.pointer_pos, Some((3.0, 4.0)));
    }

    #[test]
    fn first_touch_becomes_primary() {
        let mut state = InputState::default();

        assert!(state.accepts_touch(7, MotionAction::Down));
        state.apply_event(&motion(0.0, 0.0, MotionAction::Down, PointerId::Touch(7)));
        assert!(state.accepts_touch(7, MotionAction::Move));
        assert!(!state.accepts_touch(8, MotionAction::Down));
        assert!(!state.accepts_touch(8, MotionAction::Move));

        state.apply_event(&motion(0.0, 0.0, MotionAction::Up, PointerId::Touch(7)));
        assert!(state.accepts_touch(8, MotionAction::Down));
    }

    #[test]
    fn finger_still_down_after_focus_loss_needs_a_new_down() {
        let mut state = InputState::default();
        state.apply_event(&motion(10.0, 10.0, MotionAction::Down, PointerId::Touch(1)));
        state.apply_event(&InputEvent::Focused(false));

        // Finger 2 went down while finger 1 was primary; its moves stay ignored.
        assert!(!state.accepts_touch(2, MotionAction::Move));
        assert!(!state.accepts_touch(1, MotionAction::Move));

        assert!(state.accepts_touch(2, MotionAction::Down));
        state.apply_event(&motion(90.0, 90.0, MotionAction::Down, PointerId::Touch(2)));
        assert!(state.accepts_touch(2, MotionAction::Move));
        assert!(!state.accepts_touch(1, MotionAction::Move));
    }

    #[test]
    fn focus_loss_releases_mouse() {
        let mut state = InputState::default();

        state.apply_event(&motion(0.0, 0.0, MotionAction::Down, PointerId::Mouse));
        state.apply_event(&InputEvent::Focused(false));

        assert!(!state.mouse_down);
        assert!(!state.focused);
    }

    #[test]
    fn hover_stream_only_moves_the_pointer() {
        let mut state = InputState::default();
        for i in 0..100_000 {
            state.apply_event(&motion(i as f32, 5.0, MotionAction::Hover, PointerId::Mouse));
        }

        assert_eq!(state.pointer_pos, Some((99_999.0, 5.0)));
        assert!(!state.mouse_down);
        assert_eq!(state.primary_touch, None);
    }
}
