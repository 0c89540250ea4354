//! Error types for pspview.
//!
//! Buffer and I/O failures keep their own error types and are wrapped here
//! unchanged, so callers can still match on the underlying cause.

use crate::buffer::BufferError;
use crate::io::error::IoError;
use thiserror::Error;

/// Main error type for pspview operations.
#[derive(Debug, Error)]
pub enum PspError {
    /// Requested directory index does not exist
    #[error("Directory {index} not found (image has {count} directories)")]
    DirectoryNotFound { index: usize, count: usize },

    /// View bounds or access errors
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// Loading or storing the image failed
    #[error(transparent)]
    Io(#[from] IoError),

    /// Writing to the primary output stream failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for pspview operations
pub type Result<T> = std::result::Result<T, PspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PspError::DirectoryNotFound { index: 4, count: 2 };
        assert_eq!(err.to_string(), "Directory 4 not found (image has 2 directories)");

        let err = PspError::from(BufferError::InvalidChunkSize);
        assert_eq!(err.to_string(), "Chunk size must be non-zero");
    }

    #[test]
    fn test_buffer_error_is_preserved() {
        let err: PspError = BufferError::InvariantViolated { offset: 1, size: 2 }.into();
        assert!(matches!(
            err,
            PspError::Buffer(BufferError::InvariantViolated { offset: 1, size: 2 })
        ));
    }
}
