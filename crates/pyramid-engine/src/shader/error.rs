use super::ShaderStage;

/// Shader program construction failure.
///
/// Both variants are fatal for the caller: there is no fallback program.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShaderError {
    /// The source was rejected for the given stage.
    #[error("{stage} shader failed to compile:\n{message}")]
    Compile { stage: ShaderStage, message: String },

    /// The two stages cannot be combined into one program.
    #[error("shader program failed to link: {0}")]
    Link(String),
}

impl ShaderError {
    pub(crate) fn link(msg: impl Into<String>) -> Self {
        Self::Link(msg.into())
    }
}
