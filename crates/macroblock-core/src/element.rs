//! Block body elements: inputs, outputs and kernels.
//!
//! Each element type carries a total order whose primary key is its
//! commitment (or kernel excess). Bodies keep every element sequence sorted
//! by that order so that several bodies can be merged in one streaming pass.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::crypto::{Commitment, Hash, HashWriter, Signature};
use crate::merkle::{self, MerkleNode};
use crate::types::Height;

/// A reference to the UTXO being spent.
///
/// Several UTXOs may share one commitment value; the height tells them apart.
/// Ordered by `(commitment, height)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Input {
    pub commitment: Commitment,
    pub height: Height,
    pub coinbase: bool,
}

impl Input {
    pub fn new(commitment: Commitment, height: Height) -> Self {
        Self {
            commitment,
            height,
            coinbase: false,
        }
    }

    /// Mark the spent UTXO as a coinbase output.
    pub fn coinbase(mut self) -> Self {
        self.coinbase = true;
        self
    }

    /// Leaf hash used in the body's Merkle tree.
    pub fn hash(&self) -> Hash {
        let mut w = HashWriter::new("macroblock-input-v0");
        self.commitment.write_to(&mut w);
        w.u64(self.height).flag(self.coinbase);
        w.finalize()
    }

    /// Check that this input is a member of the tree with the given root.
    pub fn is_valid_proof(&self, proof: &[MerkleNode], root: &Hash) -> bool {
        merkle::interpret(self.hash(), proof) == *root
    }
}

/// How an output proves its amount. Exactly one form is present.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutputProof {
    /// Hidden amount backed by a range proof.
    Confidential { range_proof: Bytes },
    /// Disclosed amount with a signature binding it to the commitment.
    Public { value: u64, signature: Signature },
}

/// A newly created UTXO.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Output {
    pub commitment: Commitment,
    pub coinbase: bool,
    pub proof: OutputProof,
}

impl Output {
    pub fn confidential(commitment: Commitment, range_proof: impl Into<Bytes>) -> Self {
        Self {
            commitment,
            coinbase: false,
            proof: OutputProof::Confidential {
                range_proof: range_proof.into(),
            },
        }
    }

    pub fn public(commitment: Commitment, value: u64, signature: Signature) -> Self {
        Self {
            commitment,
            coinbase: false,
            proof: OutputProof::Public { value, signature },
        }
    }

    pub fn coinbase(mut self) -> Self {
        self.coinbase = true;
        self
    }

    pub fn is_confidential(&self) -> bool {
        matches!(self.proof, OutputProof::Confidential { .. })
    }

    /// The disclosed value, for public outputs.
    pub fn public_value(&self) -> Option<u64> {
        match self.proof {
            OutputProof::Public { value, .. } => Some(value),
            OutputProof::Confidential { .. } => None,
        }
    }

    pub fn hash(&self) -> Hash {
        let mut w = HashWriter::new("macroblock-output-v0");
        self.commitment.write_to(&mut w);
        w.flag(self.coinbase);
        match &self.proof {
            OutputProof::Confidential { range_proof } => {
                w.u8(0).u64(range_proof.len() as u64).bytes(range_proof);
            }
            OutputProof::Public { value, signature } => {
                w.u8(1).u64(*value);
                signature.write_to(&mut w);
            }
        }
        w.finalize()
    }

    pub fn is_valid_proof(&self, proof: &[MerkleNode], root: &Hash) -> bool {
        merkle::interpret(self.hash(), proof) == *root
    }
}

/// Compare an input with an output it might spend.
///
/// Zero means the input spends this output's commitment, which is the
/// condition for cut-through.
pub fn cmp_in_out(input: &Input, output: &Output) -> Ordering {
    input.commitment.cmp(&output.commitment)
}

/// A transaction kernel: signed excess plus optional terms and nested kernels.
///
/// Children are owned by value, so a kernel tree cannot contain cycles.
/// Ordered by excess first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Kernel {
    pub excess: Commitment,
    pub signature: Signature,
    pub fee: Option<u64>,
    pub min_height: Option<Height>,
    pub custom_msg: Option<Hash>,
    pub public_key: Option<Commitment>,
    pub nested: Vec<Kernel>,
}

impl Kernel {
    /// Hash of every field except the signature, folding in the full
    /// hashes of nested kernels. This is the message the signature covers.
    pub fn hash_for_signing(&self) -> Hash {
        let mut w = HashWriter::new("macroblock-kernel-v0");
        self.excess.write_to(&mut w);

        w.flag(self.fee.is_some()).u64(self.fee.unwrap_or(0));
        w.flag(self.min_height.is_some())
            .u64(self.min_height.unwrap_or(0));
        w.flag(self.custom_msg.is_some())
            .hash(&self.custom_msg.unwrap_or(Hash::ZERO));
        w.flag(self.public_key.is_some());
        if let Some(pk) = &self.public_key {
            pk.write_to(&mut w);
        }

        w.u64(self.nested.len() as u64);
        for child in &self.nested {
            w.hash(&child.hash());
        }
        w.finalize()
    }

    /// Full kernel hash, including the signature. Used as the Merkle leaf.
    pub fn hash(&self) -> Hash {
        let mut w = HashWriter::new("macroblock-kernel-total-v0");
        w.hash(&self.hash_for_signing());
        self.signature.write_to(&mut w);
        w.finalize()
    }

    pub fn is_valid_proof(&self, proof: &[MerkleNode], root: &Hash) -> bool {
        merkle::interpret(self.hash(), proof) == *root
    }

    /// Depth of the kernel tree. A kernel without children has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.nested.iter().map(Kernel::depth).max().unwrap_or(0)
    }

    /// Sum of explicit fees over the whole tree.
    pub fn total_fee(&self) -> u64 {
        self.nested
            .iter()
            .fold(self.fee.unwrap_or(0), |acc, k| acc.saturating_add(k.total_fee()))
    }
}

/// Builder for kernels.
pub struct KernelBuilder {
    excess: Commitment,
    fee: Option<u64>,
    min_height: Option<Height>,
    custom_msg: Option<Hash>,
    public_key: Option<Commitment>,
    nested: Vec<Kernel>,
}

impl KernelBuilder {
    pub fn new(excess: Commitment) -> Self {
        Self {
            excess,
            fee: None,
            min_height: None,
            custom_msg: None,
            public_key: None,
            nested: Vec::new(),
        }
    }

    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn min_height(mut self, h: Height) -> Self {
        self.min_height = Some(h);
        self
    }

    pub fn custom_msg(mut self, msg: Hash) -> Self {
        self.custom_msg = Some(msg);
        self
    }

    pub fn public_key(mut self, pk: Commitment) -> Self {
        self.public_key = Some(pk);
        self
    }

    /// Append a child kernel. Children keep insertion order.
    pub fn nest(mut self, child: Kernel) -> Self {
        self.nested.push(child);
        self
    }

    /// Finish with a signature produced over [`Kernel::hash_for_signing`].
    pub fn build(self, signature: Signature) -> Kernel {
        Kernel {
            excess: self.excess,
            signature,
            fee: self.fee,
            min_height: self.min_height,
            custom_msg: self.custom_msg,
            public_key: self.public_key,
            nested: self.nested,
        }
    }
}
