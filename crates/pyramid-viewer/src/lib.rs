//! Rotating textured pyramid on top of `pyramid-engine`.
//!
//! [`FrameLoop`] is the application handed to the engine runtime. Everything
//! it does per tick is reachable without a GPU: [`frame::update`] advances a
//! [`FrameContext`] from an input snapshot, and the uniform push helpers in
//! [`frame_loop`] write into a CPU-side uniform block.

pub mod cli;
pub mod config;
pub mod frame;
pub mod frame_loop;
pub mod kernel;
pub mod mesh;
pub mod transform;

pub use config::{TextureSource, ViewerConfig};
pub use frame::{FrameContext, MovementKeys, UpdateParams};
pub use frame_loop::FrameLoop;
pub use kernel::{Kernel, KernelPreset};
pub use transform::Projection;
