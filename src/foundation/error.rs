/// Convenience result type used across gridstitch.
pub type StitchResult<T> = Result<T, StitchError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum StitchError {
    /// Invalid grid configuration, pattern or option values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A source could not be turned into a [`crate::DecodedImage`].
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A batch run was requested while another one is still active.
    #[error("batch processing is already in progress")]
    BatchInProgress,

    /// A surface could not be encoded into the requested output format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StitchError {
    /// Build a [`StitchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StitchError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

/// Per-request decode failure reported by [`crate::Decoder`].
///
/// Decode errors are never retried and never affect other queued requests.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The source bytes could not be obtained.
    #[error("failed to read '{name}': {message}")]
    Read {
        /// Name of the originating source.
        name: String,
        /// Underlying failure description.
        message: String,
    },

    /// The bytes are not in a raster format the decoder understands.
    #[error("unsupported image format in '{name}': {message}")]
    Unsupported {
        /// Name of the originating source.
        name: String,
        /// Underlying failure description.
        message: String,
    },

    /// The bytes claim a known format but could not be decoded.
    #[error("corrupt image data in '{name}': {message}")]
    Corrupt {
        /// Name of the originating source.
        name: String,
        /// Underlying failure description.
        message: String,
    },

    /// The decoder went away before the request produced a result.
    #[error("decode of '{name}' was cancelled")]
    Cancelled {
        /// Name of the originating source.
        name: String,
    },
}

impl DecodeError {
    /// Name of the source the failed request was made for.
    pub fn source_name(&self) -> &str {
        match self {
            Self::Read { name, .. }
            | Self::Unsupported { name, .. }
            | Self::Corrupt { name, .. }
            | Self::Cancelled { name } => name,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
