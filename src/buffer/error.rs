//! Error types for windowed buffer access.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Invariant violated: view of {size:#x} bytes at offset {offset:#x} overflows the address space")]
    InvariantViolated { offset: usize, size: usize },

    #[error("Access to [{start:#x}, {end:#x}) is outside a buffer of {len:#x} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Slice bound {bound} exceeds the view length {len:#x}")]
    SliceOutOfBounds { bound: isize, len: usize },

    #[error("Value of {found} bytes does not fit a range of {expected} bytes")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Chunk size must be non-zero")]
    InvalidChunkSize,
}

pub type Result<T> = std::result::Result<T, BufferError>;
