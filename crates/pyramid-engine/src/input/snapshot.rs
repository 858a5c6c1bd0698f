use std::collections::HashSet;

use super::types::Key;

/// Immutable input view captured once at the start of a frame.
///
/// Decouples event delivery (runtime, between frames) from consumption
/// (frame update step).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    keys_down: HashSet<Key>,
    pointer: (f32, f32),
}

impl InputSnapshot {
    pub fn new(keys_down: HashSet<Key>, pointer: (f32, f32)) -> Self {
        Self { keys_down, pointer }
    }

    /// Convenience constructor for a snapshot with the given keys held.
    pub fn with_keys<I>(keys: I, pointer: (f32, f32)) -> Self
    where
        I: IntoIterator<Item = Key>,
    {
        Self::new(keys.into_iter().collect(), pointer)
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Pointer position in logical pixels (last known position).
    #[inline]
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }
}
