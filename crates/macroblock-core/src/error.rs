//! Error types for macro-block bodies.

use thiserror::Error;

use crate::crypto::Hash;
use crate::types::StreamKind;

/// Errors raised while storing, reading or merging bodies.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The header stream was written under a different rule set.
    #[error("rules checksum mismatch: expected {expected}, found {found}")]
    FormatMismatch { expected: Hash, found: Hash },

    /// A stream belongs to a different macro-body than the header stream.
    #[error("{kind} stream content tag mismatch: expected {expected}, found {found}")]
    TagMismatch {
        kind: StreamKind,
        expected: Hash,
        found: Hash,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error in {kind} stream: {reason}")]
    Decoding { kind: StreamKind, reason: String },

    #[error("body summary overflow")]
    SummaryOverflow,
}

/// Structural problems in an assembled body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} sequence not strictly sorted at position {index}")]
    Unsorted { kind: StreamKind, index: usize },

    #[error("kernel nesting depth {depth} exceeds maximum {max}")]
    NestingTooDeep { depth: usize, max: usize },

    #[error("confidential output at position {0} has an empty range proof")]
    EmptyRangeProof(usize),

    #[error("header chain starts at height {expected} but summary starts at {found}")]
    PrefixMismatch { expected: u64, found: u64 },
}

/// Result type for body operations.
pub type Result<T> = std::result::Result<T, BodyError>;
