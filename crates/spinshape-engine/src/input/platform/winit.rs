use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{InputEvent, InputState, Key, KeyState, MotionAction, MotionEvent, PointerId};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Positions stay in physical pixels. Returns `None` for events not
/// represented by the input subsystem, and for touches rejected by
/// [`InputState::accepts_touch`].
pub(crate) fn translate_window_event(
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_f32(*position);
            let action = if state.mouse_down {
                MotionAction::Move
            } else {
                MotionAction::Hover
            };
            Some(InputEvent::Motion(MotionEvent::new(x, y, action, PointerId::Mouse)))
        }

        WindowEvent::MouseInput {
            state: st,
            button: MouseButton::Left,
            ..
        } => {
            let action = match st {
                ElementState::Pressed => MotionAction::Down,
                ElementState::Released => MotionAction::Up,
            };

            // winit 0.30 has no cursor query; use the tracked pointer position.
            let (x, y) = state.pointer_pos.unwrap_or((0.0, 0.0));

            Some(InputEvent::Motion(MotionEvent::new(x, y, action, PointerId::Mouse)))
        }

        WindowEvent::Touch(Touch {
            phase, location, id, ..
        }) => {
            let action = map_touch_phase(*phase);
            if !state.accepts_touch(*id, action) {
                return None;
            }
            let (x, y) = to_f32(*location);
            Some(InputEvent::Motion(MotionEvent::new(x, y, action, PointerId::Touch(*id))))
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let st = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state: st,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

pub(crate) fn map_touch_phase(phase: TouchPhase) -> MotionAction {
    match phase {
        TouchPhase::Started => MotionAction::Down,
        TouchPhase::Moved => MotionAction::Move,
        TouchPhase::Ended => MotionAction::Up,
        TouchPhase::Cancelled => MotionAction::Cancel,
    }
}

fn to_f32(pos: PhysicalPosition<f64>) -> (f32, f32) {
    (pos.x as f32, pos.y as f32)
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(_) | PhysicalKey::Unidentified(_) => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_phases_map_to_motion_actions() {
        assert_eq!(map_touch_phase(TouchPhase::Started), MotionAction::Down);
        assert_eq!(map_touch_phase(TouchPhase::Moved), MotionAction::Move);
        assert_eq!(map_touch_phase(TouchPhase::Ended), MotionAction::Up);
        assert_eq!(map_touch_phase(TouchPhase::Cancelled), MotionAction::Cancel);
    }

    #[test]
    fn escape_is_named() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Space)), Key::Other);
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Other));
    }
}
