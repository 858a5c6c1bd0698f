//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s.

mod snapshot;
mod state;
mod types;

pub use snapshot::InputSnapshot;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, PointerMoveEvent};
