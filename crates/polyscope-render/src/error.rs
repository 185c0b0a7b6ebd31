//! Rendering error types.

use polyscope_core::PolyscopeError;
use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No base program with this name exists.
    #[error("unknown shader program '{0}'")]
    UnknownProgram(String),

    /// A rule was requested that the program cannot compose.
    #[error("unknown shader rule '{rule}' for program '{program}'")]
    UnknownRule { program: String, rule: String },

    /// Shader compilation failed.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    /// The pick buffer ran out of encodable indices.
    #[error("pick buffer exhausted: {requested} indices requested, {available} available")]
    PickBufferExhausted { requested: usize, available: usize },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for PolyscopeError {
    fn from(err: RenderError) -> Self {
        PolyscopeError::RenderError(err.to_string())
    }
}
