//! Test fixtures and helpers.
//!
//! Deterministic element builders plus a temporary directory for writing
//! bodies to disk.

use std::path::PathBuf;

use tempfile::TempDir;

use macroblock_core::{
    BlockHeader, BodySummary, CancelFlag, Commitment, ContentTag, Hash, Input, Kernel,
    KernelBuilder, MacroWriter, Output, Rules, Scalar, SequenceElement, SequencePrefix, Signature,
    TxBase, TxWriter,
};
use macroblock_store::{BodyStreamSet, MemoryBody};

/// Commitment whose x coordinate is `b` repeated.
pub fn commitment(b: u8) -> Commitment {
    Commitment::new([b; 32], false)
}

pub fn signature(b: u8) -> Signature {
    Signature::new(Scalar([b; 32]), Scalar([b.wrapping_add(1); 32]))
}

pub fn input(b: u8, height: u64) -> Input {
    Input::new(commitment(b), height)
}

/// Confidential output with a short non-empty range proof.
pub fn output(b: u8) -> Output {
    Output::confidential(commitment(b), vec![b; 8])
}

pub fn kernel(b: u8) -> Kernel {
    KernelBuilder::new(commitment(b)).fee(u64::from(b)).build(signature(b))
}

/// A transaction from raw parts, sorted.
pub fn tx(inputs: Vec<Input>, outputs: Vec<Output>, kernels: Vec<Kernel>) -> TxBase {
    let mut tx = TxBase {
        inputs,
        outputs,
        kernels,
        offset: Scalar::ZERO,
    };
    tx.normalize();
    tx
}

/// A linked chain of `n` headers starting at height 1, each block adding
/// difficulty 2.
pub fn header_chain(n: u64) -> Vec<BlockHeader> {
    let mut prev = Hash::ZERO;
    let mut total = 0;
    (1..=n)
        .map(|height| {
            total += 2;
            let header = BlockHeader {
                prev,
                definition: Hash::digest(&height.to_le_bytes()),
                height,
                timestamp: 1_700_000_000 + height * 60,
                total_difficulty: total,
                difficulty: 2,
            };
            prev = header.hash();
            header
        })
        .collect()
}

/// A temporary directory that bodies are written to and read from.
pub struct BodyFixture {
    dir: TempDir,
    pub rules: Rules,
}

impl BodyFixture {
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    pub fn with_rules(rules: Rules) -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
            rules,
        }
    }

    /// Path prefix for the body called `name`.
    pub fn prefix(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}."))
    }

    pub fn rules_checksum(&self) -> Hash {
        self.rules.checksum()
    }

    /// Write a single-block body for `header` and return its prefix.
    pub fn write_block(&self, name: &str, header: &BlockHeader, tx: &TxBase) -> PathBuf {
        let summary = BodySummary::for_block(header, self.rules.coinbase_emission);
        let (prefix, elem) = header.split();
        self.write_body(name, &summary, &prefix, &[elem], tx)
    }

    /// Write an arbitrary body and return its prefix.
    pub fn write_body(
        &self,
        name: &str,
        summary: &BodySummary,
        prefix: &SequencePrefix,
        headers: &[SequenceElement],
        tx: &TxBase,
    ) -> PathBuf {
        let path = self.prefix(name);
        let checksum = self.rules_checksum();
        let tag = ContentTag::derive(&checksum, summary);

        let mut set = BodyStreamSet::create(&path, checksum, tag).expect("create body");
        set.put_start(summary, prefix).expect("write start");
        for elem in headers {
            set.put_next_header(elem).expect("write header");
        }
        let mut body = MemoryBody::from_tx(tx.clone());
        set.dump(&mut body, &CancelFlag::new()).expect("write elements");
        set.close().expect("seal body");
        path
    }

    /// Load the body called `name` into memory.
    pub fn read(&self, name: &str) -> MemoryBody {
        let mut set = BodyStreamSet::open(self.prefix(name), self.rules_checksum()).expect("open body");
        let mut body = MemoryBody::new();
        body.dump(&mut set, &CancelFlag::new()).expect("read elements");
        body
    }
}

impl Default for BodyFixture {
    fn default() -> Self {
        Self::new()
    }
}
