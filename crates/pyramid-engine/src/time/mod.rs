//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per window
//! - call `restart()` when the animation starts, then `tick()` once per frame

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
