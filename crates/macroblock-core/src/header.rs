//! Block headers and the compact header chain stored with a macro-body.
//!
//! A macro-body does not store full headers. It stores one
//! [`SequencePrefix`] (what the first header inherits from its parent)
//! followed by one [`SequenceElement`] per block (what each header adds).
//! [`HeaderChain`] turns that back into full [`BlockHeader`]s.

use serde::{Deserialize, Serialize};

use crate::crypto::{Hash, HashWriter};
use crate::error::{BodyError, Result};
use crate::types::{Difficulty, DifficultyRange, Height, HeightRange, Timestamp};

/// A full block header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub prev: Hash,
    /// Merkle root over the block's full description.
    pub definition: Hash,
    pub height: Height,
    pub timestamp: Timestamp,
    /// Chain difficulty up to and including this block.
    pub total_difficulty: Difficulty,
    /// Difficulty of this block alone.
    pub difficulty: u8,
}

impl BlockHeader {
    pub fn hash(&self) -> Hash {
        HashWriter::new("macroblock-header-v0")
            .hash(&self.prev)
            .hash(&self.definition)
            .u64(self.height)
            .u64(self.timestamp)
            .u64(self.total_difficulty)
            .u8(self.difficulty)
            .finalize()
    }

    /// Split into the part inherited from the parent and the part this
    /// block contributes.
    pub fn split(&self) -> (SequencePrefix, SequenceElement) {
        let prefix = SequencePrefix {
            height: self.height,
            prev: self.prev,
            total_difficulty: self
                .total_difficulty
                .saturating_sub(Difficulty::from(self.difficulty)),
        };
        (prefix, SequenceElement::from(self))
    }
}

/// Where a header chain starts: the first height and what precedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequencePrefix {
    /// Height of the first block in the chain.
    pub height: Height,
    /// Hash of the block before the first one.
    pub prev: Hash,
    /// Cumulative difficulty before the first block.
    pub total_difficulty: Difficulty,
}

/// The per-block fields of a header chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceElement {
    pub definition: Hash,
    pub timestamp: Timestamp,
    pub difficulty: u8,
}

impl From<&BlockHeader> for SequenceElement {
    fn from(h: &BlockHeader) -> Self {
        Self {
            definition: h.definition,
            timestamp: h.timestamp,
            difficulty: h.difficulty,
        }
    }
}

/// Rebuilds full headers from a prefix and successive elements.
#[derive(Debug, Clone)]
pub struct HeaderChain {
    next_height: Height,
    prev: Hash,
    total_difficulty: Difficulty,
}

impl HeaderChain {
    pub fn new(prefix: &SequencePrefix) -> Self {
        Self {
            next_height: prefix.height,
            prev: prefix.prev,
            total_difficulty: prefix.total_difficulty,
        }
    }

    /// Apply the next element and return the header it describes.
    pub fn push(&mut self, elem: &SequenceElement) -> BlockHeader {
        self.total_difficulty = self
            .total_difficulty
            .saturating_add(Difficulty::from(elem.difficulty));

        let header = BlockHeader {
            prev: self.prev,
            definition: elem.definition,
            height: self.next_height,
            timestamp: elem.timestamp,
            total_difficulty: self.total_difficulty,
            difficulty: elem.difficulty,
        };

        self.prev = header.hash();
        self.next_height += 1;
        header
    }

    /// Hash of the most recent header (or the prefix's parent if none yet).
    pub fn tip(&self) -> Hash {
        self.prev
    }
}

/// Aggregate parameters of a body, merged when bodies are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySummary {
    pub height: HeightRange,
    pub difficulty: DifficultyRange,
    /// Total new emission contained in the body.
    pub subsidy: u64,
    /// Whether the body closes the subsidy schedule.
    pub subsidy_closed: bool,
}

impl BodySummary {
    /// Summary of a single block body.
    pub fn for_block(header: &BlockHeader, subsidy: u64) -> Self {
        Self {
            height: HeightRange::single(header.height),
            difficulty: DifficultyRange::new(header.total_difficulty, header.total_difficulty),
            subsidy,
            subsidy_closed: false,
        }
    }

    /// Extend this summary so it also covers `other`.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        self.subsidy = self
            .subsidy
            .checked_add(other.subsidy)
            .ok_or(BodyError::SummaryOverflow)?;
        self.height.extend(&other.height);
        self.difficulty.extend(&other.difficulty);
        self.subsidy_closed |= other.subsidy_closed;
        Ok(())
    }
}
