use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState};

/// Current input state for the game window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Cursor position in physical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Keys released while unfocused never reach us.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((x, y)),

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                MouseButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                MouseButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        frame.buttons_released.insert(button);
                    }
                }
            },

            InputEvent::MouseMotion { dx, dy } => {
                if !(dx.is_finite() && dy.is_finite()) {
                    log::warn!("input: dropping malformed mouse motion ({dx}, {dy})");
                    return;
                }
                frame.mouse_delta.0 += dx;
                frame.mouse_delta.1 += dy;
            }

            InputEvent::MouseWheel { dx, dy } => {
                frame.wheel_delta.0 += dx;
                frame.wheel_delta.1 += dy;
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    #[test]
    fn press_and_release_are_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed));
        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed));
        assert!(state.key_down(Key::A));
        assert_eq!(frame.keys_pressed.len(), 1);

        frame.clear();
        state.apply_event(&mut frame, key(Key::A, KeyState::Released));
        assert!(!state.key_down(Key::A));
        assert!(frame.keys_released.contains(&Key::A));
        assert!(frame.keys_pressed.is_empty());
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.key_down(Key::W));
    }

    #[test]
    fn mouse_motion_accumulates_and_drops_non_finite() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::MouseMotion { dx: 2.0, dy: -1.0 });
        state.apply_event(&mut frame, InputEvent::MouseMotion { dx: f32::NAN, dy: 5.0 });
        state.apply_event(&mut frame, InputEvent::MouseMotion { dx: 1.0, dy: 1.0 });
        assert_eq!(frame.mouse_delta, (3.0, 0.0));

        frame.clear();
        assert_eq!(frame.mouse_delta, (0.0, 0.0));
    }
}
