use std::collections::HashSet;

use super::snapshot::InputSnapshot;
use super::types::{InputEvent, Key, KeyState, PointerMoveEvent};

/// Current input state for a single window.
///
/// Mutated by the runtime as events arrive between frames; the frame loop
/// only ever sees an [`InputSnapshot`] taken at the start of a tick.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels, `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    /// Last known pointer position; survives the pointer leaving the window.
    pub last_pointer_pos: (f32, f32),

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoids stuck keys when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
                self.last_pointer_pos = (*x, *y);
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(*key);
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Captures an immutable view of the state for one frame.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::new(self.keys_down.clone(), self.last_pointer_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn press_and_release_track_held_keys() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::H, KeyState::Pressed));
        assert!(s.key_down(Key::H));
        s.apply_event(&key(Key::H, KeyState::Released));
        assert!(!s.key_down(Key::H));
    }

    #[test]
    fn repeat_press_keeps_key_down_once() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::L, KeyState::Pressed));
        s.apply_event(&InputEvent::Key { key: Key::L, state: KeyState::Pressed, repeat: true });
        assert_eq!(s.keys_down.len(), 1);
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::J, KeyState::Pressed));
        s.apply_event(&InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
        assert!(!s.focused);
    }

    #[test]
    fn pointer_leave_keeps_last_position() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 12.0, y: 34.0 }));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
        assert_eq!(s.snapshot().pointer(), (12.0, 34.0));
    }

    #[test]
    fn pointer_defaults_to_origin() {
        assert_eq!(InputState::default().snapshot().pointer(), (0.0, 0.0));
    }

    #[test]
    fn snapshot_is_detached_from_later_events() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::K, KeyState::Pressed));
        let snap = s.snapshot();
        s.apply_event(&key(Key::K, KeyState::Released));
        assert!(snap.key_down(Key::K));
        assert!(!s.key_down(Key::K));
    }
}
