use std::fmt;

/// Phase of a pointer gesture.
///
/// Only `Move` carries a drag; the other actions still report the pointer
/// position so gesture consumers can track where the pointer last was.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MotionAction {
    /// Finger touched down / primary mouse button pressed.
    Down,
    /// Pointer moved while down.
    Move,
    /// Finger lifted / button released.
    Up,
    /// Gesture aborted by the platform.
    Cancel,
    /// Pointer moved while not down (mouse only).
    Hover,
}

impl MotionAction {
    #[inline]
    pub fn is_move(self) -> bool {
        self == MotionAction::Move
    }
}

/// Which physical pointer produced a motion event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// Pointer motion in physical pixels (top-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MotionEvent {
    pub x: f32,
    pub y: f32,
    pub action: MotionAction,
    pub pointer: PointerId,
}

impl MotionEvent {
    #[inline]
    pub const fn new(x: f32, y: f32, action: MotionAction, pointer: PointerId) -> Self {
        Self { x, y, action, pointer }
    }
}

/// Keyboard keys the runtime distinguishes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    /// Any key the app has no binding for.
    Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Motion(MotionEvent),

    Key { key: Key, state: KeyState, repeat: bool },

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
