//! GPU rendering helpers shared by applications.
//!
//! Convention:
//! - one render pass per frame, cleared to a [`Color`] and depth 1.0
//! - applications bind a [`ShaderProgram`](crate::shader::ShaderProgram) and
//!   issue their own draws inside that pass

mod color;
mod ctx;
mod texture;

pub use color::Color;
pub use ctx::RenderCtx;
pub use texture::{GpuTexture, TextureError, TextureImage};
