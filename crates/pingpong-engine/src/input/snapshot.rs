use super::frame::InputFrame;
use super::state::InputState;
use super::types::{Key, MouseButton};

/// Read-only view of input handed to game code for one frame.
#[derive(Debug, Copy, Clone)]
pub struct InputSnapshot<'a> {
    pub state: &'a InputState,
    pub frame: &'a InputFrame,
}

impl<'a> InputSnapshot<'a> {
    pub fn new(state: &'a InputState, frame: &'a InputFrame) -> Self {
        Self { state, frame }
    }

    /// True while `key` is held.
    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    /// True on the frame `key` went down.
    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.frame.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn key_released(&self, key: Key) -> bool {
        self.frame.keys_released.contains(&key)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.state.button_down(button)
    }

    /// Raw mouse motion accumulated this frame.
    #[inline]
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.frame.mouse_delta
    }

    #[inline]
    pub fn wheel_delta(&self) -> (f32, f32) {
        self.frame.wheel_delta
    }
}
