/// Convenience result type used across spritetile.
pub type SpriteResult<T> = Result<T, SpriteError>;

/// Top-level error taxonomy used by the decode/composite/slice APIs.
#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    /// Input bytes do not follow the document header/frame/chunk layout.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The document parsed but declares no frames.
    #[error("document contains no frames")]
    NoFrames,

    /// Caller-supplied parameters violate a precondition.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpriteError {
    /// Build a [`SpriteError::Malformed`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Build a [`SpriteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
