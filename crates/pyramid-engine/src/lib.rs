//! Pyramid engine crate.
//!
//! Owns the platform, GPU and shader-program runtime pieces used by the viewer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod shader;
