//! # Macroblock
//!
//! The unified API for building block bodies and compacting them into
//! macro-bodies with cut-through.
//!
//! ## Overview
//!
//! A macro-body is the merged content of a contiguous run of blocks. Every
//! output spent within the run is removed together with the input that
//! spends it, so only the net unspent set remains. This crate provides:
//!
//! - **Bodies**: Sorted inputs, outputs and kernels in five per-kind files
//! - **Compaction**: Cancellable streaming merge of two bodies into one
//! - **Header chains**: Compact per-block header records kept in order
//! - **Key capsules**: Authenticated text export of key-derivation material
//!
//! ## Usage
//!
//! ```rust,no_run
//! use macroblock::{CancelFlag, Compactor, CompactorConfig};
//!
//! fn example() -> macroblock::Result<()> {
//!     let compactor = Compactor::new(CompactorConfig::default());
//!
//!     // Merge blocks 1..=2 into one macro-body
//!     let report = compactor.merge("bodies/b1.", "bodies/b2.", "bodies/m1-2.", &CancelFlag::new())?;
//!     assert!(report.is_completed());
//!
//!     let (summary, headers) = compactor.read_headers("bodies/m1-2.")?;
//!     println!("{:?}: {} headers", summary.height, headers.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `macroblock::core` - Elements, header chains, rules and the merge engine
//! - `macroblock::store` - File-backed and in-memory bodies
//! - `macroblock::keys` - Key capsules

pub use macroblock_core as core;
pub use macroblock_keys as keys;
pub use macroblock_store as store;

mod compactor;
mod config;
mod error;

pub use compactor::{CompactionReport, Compactor};
pub use config::CompactorConfig;
pub use error::{Error, Result};

pub use macroblock_core::{
    BlockHeader, BodySummary, CancelFlag, ContentTag, Input, Kernel, MergeOutcome, MergeStats,
    Output, Rules, SequenceElement, SequencePrefix, TxBase,
};
pub use macroblock_keys::{KdfPublic, KdfSecret, KeyString};
pub use macroblock_store::{BodyStreamSet, MemoryBody};
