//! Consensus rules and the content tag that binds a macro-body's files.
//!
//! Rules are passed explicitly to whoever needs them. Their checksum is
//! written at the start of every header stream, so files produced under a
//! different rule set are rejected on open.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{Hash, HashWriter};
use crate::header::BodySummary;
use crate::types::Height;

/// Consensus parameters that affect how bodies are built and merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Emission per block.
    pub coinbase_emission: u64,
    /// Blocks before a coinbase output may be spent.
    pub coinbase_maturity: Height,
    /// Blocks before a regular output may be spent.
    pub standard_maturity: Height,
    /// Upper bound on a serialized block body.
    pub max_body_size: u64,
    /// Target spacing between blocks, in seconds.
    pub target_block_interval: u64,
    /// Heights at which rule changes activate.
    pub fork_heights: Vec<Height>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            coinbase_emission: 40_000_000,
            coinbase_maturity: 60,
            standard_maturity: 0,
            max_body_size: 0x100000,
            target_block_interval: 60,
            fork_heights: Vec::new(),
        }
    }
}

impl Rules {
    /// Hash over every parameter. Any change produces a different checksum.
    pub fn checksum(&self) -> Hash {
        let mut w = HashWriter::new("macroblock-rules-v0");
        w.u64(self.coinbase_emission)
            .u64(self.coinbase_maturity)
            .u64(self.standard_maturity)
            .u64(self.max_body_size)
            .u64(self.target_block_interval)
            .u64(self.fork_heights.len() as u64);
        for h in &self.fork_heights {
            w.u64(*h);
        }
        w.finalize()
    }
}

/// Identity of one macro-body. Every per-kind stream of the body starts
/// with it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentTag(pub Hash);

impl ContentTag {
    /// Derive the tag from the rules checksum and the heights the body spans.
    pub fn derive(rules_checksum: &Hash, summary: &BodySummary) -> Self {
        Self(
            HashWriter::new("macroblock-content-v0")
                .hash(rules_checksum)
                .u64(summary.height.min)
                .u64(summary.height.max)
                .finalize(),
        )
    }

    pub const fn from_hash(h: Hash) -> Self {
        Self(h)
    }

    pub const fn as_hash(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Debug for ContentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentTag({})", self.0)
    }
}

impl fmt::Display for ContentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
