//! # Macroblock Core
//!
//! Pure primitives for block bodies and macro-bodies: elements, ordering,
//! Merkle proofs, header chains, and the streaming merge engine.
//!
//! This crate contains no I/O. Storage plugs in through the reader and
//! writer traits in [`traits`].
//!
//! ## Key Types
//!
//! - [`Input`], [`Output`], [`Kernel`] - Body elements, each totally ordered
//! - [`TxBase`] - Sorted element sequences plus the blinding offset
//! - [`BodySummary`] - Aggregate parameters of a (macro-)body
//! - [`Rules`] / [`ContentTag`] - Format checksum and body identity
//! - [`TxReader`] / [`TxWriter`] - Per-kind element cursors and sinks
//!
//! ## Merging
//!
//! [`merge::combine`] merges any number of sorted readers into one writer,
//! removing outputs that are spent within the merged set. It is
//! cooperatively cancellable through a [`CancelFlag`].

pub mod crypto;
pub mod element;
pub mod error;
pub mod header;
pub mod merge;
pub mod merkle;
pub mod rules;
pub mod traits;
pub mod tx;
pub mod types;
pub mod validation;

pub use crypto::{Commitment, Hash, HashWriter, Scalar, Signature};
pub use element::{cmp_in_out, Input, Kernel, KernelBuilder, Output, OutputProof};
pub use error::{BodyError, Result, ValidationError};
pub use header::{BlockHeader, BodySummary, HeaderChain, SequenceElement, SequencePrefix};
pub use merge::{CancelFlag, MergeOutcome, MergeStats, PassStats};
pub use merkle::{MerkleNode, MerkleProof};
pub use rules::{ContentTag, Rules};
pub use traits::{MacroReader, MacroWriter, TxReader, TxWriter};
pub use tx::TxBase;
pub use types::{Difficulty, DifficultyRange, Height, HeightRange, StreamKind, Timestamp};
pub use validation::{validate_kernel, validate_prefix, validate_tx_base, MAX_KERNEL_NESTING};
