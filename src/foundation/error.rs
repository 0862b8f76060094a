/// Convenience result type used across scrubframe.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ScrubError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A single frame failed to fetch or decode; the whole sequence is abandoned.
    #[error("frame load error: frame {index}: {reason}")]
    Load {
        /// Zero-based index of the failing frame.
        index: u64,
        /// Human-readable cause.
        reason: String,
    },

    /// An operation that needs loaded frames ran before the sequence was ready.
    #[error("not ready: {0}")]
    NotReady(String),

    /// A frame index outside `[0, count)` was requested.
    #[error("frame index out of range: {index} (frame count {count})")]
    IndexOutOfRange {
        /// Requested index.
        index: u64,
        /// Number of frames in the sequence.
        count: u64,
    },

    /// The load was cancelled before it completed.
    #[error("load cancelled")]
    Cancelled,

    /// Errors while painting to a drawing surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrubError {
    /// Build a [`ScrubError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrubError::Load`] value.
    pub fn load(index: u64, reason: impl Into<String>) -> Self {
        Self::Load {
            index,
            reason: reason.into(),
        }
    }

    /// Build a [`ScrubError::NotReady`] value.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Build a [`ScrubError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrubError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
