/// Convenience result type used across panelreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration or caller-provided input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or malformed page annotation document.
    #[error("annotation error: {0}")]
    Annotation(String),

    /// Image or audio data that could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failures of the ffmpeg video encoding process.
    #[error("encode error: {0}")]
    Encode(String),

    /// Failures of the audio/video multiplexer, including its diagnostic output.
    #[error("mux error: {0}")]
    Mux(String),

    /// Transcript text that violates the interchange grammar.
    #[error("transcript error: {0}")]
    Transcript(String),

    /// Failures reported by the speech synthesis collaborator.
    #[error("speech error: {0}")]
    Speech(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Annotation`] value.
    pub fn annotation(msg: impl Into<String>) -> Self {
        Self::Annotation(msg.into())
    }

    /// Build a [`ReelError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Mux`] value.
    pub fn mux(msg: impl Into<String>) -> Self {
        Self::Mux(msg.into())
    }

    /// Build a [`ReelError::Transcript`] value.
    pub fn transcript(msg: impl Into<String>) -> Self {
        Self::Transcript(msg.into())
    }

    /// Build a [`ReelError::Speech`] value.
    pub fn speech(msg: impl Into<String>) -> Self {
        Self::Speech(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
