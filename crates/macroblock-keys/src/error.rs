//! Error types for key capsules.

use thiserror::Error;

/// Errors that can occur while exporting or importing a key capsule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The text is not valid base64, or is too short to hold the payload.
    #[error("malformed key string: {0}")]
    Decode(String),

    /// Wrong secret, tampered capsule, or a capsule of a different key type.
    #[error("key string authentication failed")]
    Authentication,

    /// The decrypted payload is not a valid key.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

/// Result type for key capsule operations.
pub type Result<T> = std::result::Result<T, KeyError>;
