/// Convenience result type used across evalcast.
pub type CastResult<T> = Result<T, CastError>;

/// Top-level error taxonomy used by the library APIs.
#[derive(thiserror::Error, Debug)]
pub enum CastError {
    /// Invalid user-provided configuration, paths or timeline data.
    #[error("validation error: {0}")]
    Validation(String),

    /// TeX fragment outside the supported subset.
    #[error("tex error at byte {offset}: {message}")]
    Tex {
        /// Byte offset into the offending fragment.
        offset: usize,
        /// Human-readable description.
        message: String,
    },

    /// Invalid stage or step usage while recording a scene.
    #[error("choreography error: {0}")]
    Choreography(String),

    /// Errors while evaluating or rasterizing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors raised by frame sinks.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CastError {
    /// Build a [`CastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CastError::Tex`] value.
    pub fn tex(offset: usize, msg: impl Into<String>) -> Self {
        Self::Tex {
            offset,
            message: msg.into(),
        }
    }

    /// Build a [`CastError::Choreography`] value.
    pub fn choreography(msg: impl Into<String>) -> Self {
        Self::Choreography(msg.into())
    }

    /// Build a [`CastError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`CastError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CastError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
