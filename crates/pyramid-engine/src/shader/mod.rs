//! Shader programs.
//!
//! A program is built in two steps:
//! - `compile` parses and validates one WGSL stage (naga), producing a
//!   [`CompiledShader`] or [`ShaderError::Compile`]
//! - `link` checks that a vertex and a fragment stage fit together, resolves
//!   the fixed set of named uniforms once, and builds the wgpu pipeline
//!
//! Everything up to the pipeline is CPU-only and testable without a device.

mod error;
mod interface;
mod program;
mod stage;
mod uniforms;

pub use error::ShaderError;
pub use interface::ProgramInterface;
pub use program::{ProgramTargets, ShaderProgram};
pub use stage::{compile, CompiledShader, ShaderStage};
pub use uniforms::{
    BlockBinding, UniformBlock, UniformKind, UniformLocation, UniformSlot, UniformTable,
};

#[cfg(test)]
mod tests;
