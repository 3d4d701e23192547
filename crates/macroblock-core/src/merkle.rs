//! Merkle roots and membership proofs over element hashes.
//!
//! A proof is the ordered list of siblings from the leaf up to the root.
//! When a level has an odd number of nodes the last one is carried up
//! unchanged, so proofs for such nodes skip that level.

use serde::{Deserialize, Serialize};

use crate::crypto::{Hash, HashWriter};

const BRANCH_DOMAIN: &str = "macroblock-merkle-v0";

/// One step of a Merkle proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleNode {
    /// Whether the sibling sits to the right of the running hash.
    pub sibling_on_right: bool,
    pub sibling: Hash,
}

/// Ordered sibling path, leaf level first.
pub type MerkleProof = Vec<MerkleNode>;

/// Hash two children into their parent.
pub fn branch(left: &Hash, right: &Hash) -> Hash {
    HashWriter::new(BRANCH_DOMAIN).hash(left).hash(right).finalize()
}

/// Fold a leaf hash with its proof, bottom-up, into the implied root.
pub fn interpret(leaf: Hash, proof: &[MerkleNode]) -> Hash {
    proof.iter().fold(leaf, |acc, node| {
        if node.sibling_on_right {
            branch(&acc, &node.sibling)
        } else {
            branch(&node.sibling, &acc)
        }
    })
}

/// Compute the root over the given leaves. The empty tree has the zero root.
pub fn root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return Hash::ZERO;
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Build the membership proof for `leaves[index]`.
pub fn proof(leaves: &[Hash], index: usize) -> Option<MerkleProof> {
    if index >= leaves.len() {
        return None;
    }

    let mut path = Vec::new();
    let mut level = leaves.to_vec();
    let mut idx = index;

    while level.len() > 1 {
        let sibling = idx ^ 1;
        if sibling < level.len() {
            path.push(MerkleNode {
                sibling_on_right: idx % 2 == 0,
                sibling: level[sibling],
            });
        }
        level = next_level(&level);
        idx /= 2;
    }

    Some(path)
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => branch(left, right),
            _ => pair[0],
        })
        .collect()
}
