//! Error types for the compactor.

use macroblock_core::{BodyError, ValidationError};
use macroblock_keys::KeyError;
use thiserror::Error;

/// Errors that can occur while writing, merging or reading bodies.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage or format error.
    #[error("body error: {0}")]
    Body(#[from] BodyError),

    /// The body to be written is malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Key capsule error.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// A blocking merge task panicked or was aborted.
    #[error("background task failed: {0}")]
    Background(String),
}

/// Result type for compactor operations.
pub type Result<T> = std::result::Result<T, Error>;
