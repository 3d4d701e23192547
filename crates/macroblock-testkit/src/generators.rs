//! Proptest generators for property-based testing.
//!
//! Commitments are drawn from a small pool by default so that generated
//! bodies regularly share commitments and exercise cut-through.

use proptest::prelude::*;

use macroblock_core::{
    BlockHeader, Commitment, Hash, Input, Kernel, KernelBuilder, Output, Scalar, SequenceElement,
    Signature, TxBase,
};

/// Commitment from a pool of `pool` distinct values.
pub fn pooled_commitment(pool: u8) -> impl Strategy<Value = Commitment> {
    (0..pool).prop_map(|b| Commitment::new([b; 32], false))
}

/// Any commitment.
pub fn commitment() -> impl Strategy<Value = Commitment> {
    (any::<[u8; 32]>(), any::<bool>()).prop_map(|(x, y)| Commitment::new(x, y))
}

pub fn scalar() -> impl Strategy<Value = Scalar> {
    any::<[u8; 32]>().prop_map(Scalar)
}

pub fn signature() -> impl Strategy<Value = Signature> {
    (scalar(), scalar()).prop_map(|(e, k)| Signature::new(e, k))
}

pub fn input() -> impl Strategy<Value = Input> {
    (pooled_commitment(32), 0u64..1000, any::<bool>()).prop_map(|(c, h, coinbase)| {
        let input = Input::new(c, h);
        if coinbase {
            input.coinbase()
        } else {
            input
        }
    })
}

/// Confidential or public output. Range proofs are never empty.
pub fn output() -> impl Strategy<Value = Output> {
    prop_oneof![
        (pooled_commitment(32), prop::collection::vec(any::<u8>(), 1..64))
            .prop_map(|(c, proof)| Output::confidential(c, proof)),
        (pooled_commitment(32), any::<u64>(), signature())
            .prop_map(|(c, value, sig)| Output::public(c, value, sig)),
    ]
}

fn leaf_kernel() -> impl Strategy<Value = Kernel> {
    (pooled_commitment(32), any::<Option<u64>>(), signature()).prop_map(|(c, fee, sig)| {
        let builder = KernelBuilder::new(c);
        match fee {
            Some(fee) => builder.fee(fee).build(sig),
            None => builder.build(sig),
        }
    })
}

/// A kernel with at most one level of nested children.
pub fn kernel() -> impl Strategy<Value = Kernel> {
    (leaf_kernel(), prop::collection::vec(leaf_kernel(), 0..3)).prop_map(|(mut kernel, children)| {
        kernel.nested = children;
        kernel
    })
}

/// A normalized, duplicate-free transaction with up to `max` elements of
/// each kind.
pub fn tx_base(max: usize) -> impl Strategy<Value = TxBase> {
    (
        prop::collection::vec(input(), 0..=max),
        prop::collection::vec(output(), 0..=max),
        prop::collection::vec(kernel(), 0..=max),
        scalar(),
    )
        .prop_map(|(inputs, outputs, kernels, offset)| {
            let mut tx = TxBase {
                inputs,
                outputs,
                kernels,
                offset,
            };
            tx.normalize();
            tx.inputs.dedup();
            tx.outputs.dedup();
            tx.kernels.dedup();
            tx
        })
}

pub fn sequence_element() -> impl Strategy<Value = SequenceElement> {
    (any::<[u8; 32]>(), any::<u32>(), any::<u8>()).prop_map(|(def, ts, difficulty)| SequenceElement {
        definition: Hash(def),
        timestamp: u64::from(ts),
        difficulty,
    })
}

/// A linked header chain of 1 to `max` blocks starting at `start`.
pub fn header_chain(start: u64, max: usize) -> impl Strategy<Value = Vec<BlockHeader>> {
    (any::<[u8; 32]>(), 0u64..1_000_000, prop::collection::vec(sequence_element(), 1..=max)).prop_map(
        move |(prev, base, elems)| {
            let mut prev = Hash(prev);
            let mut total = base;
            elems
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    total += u64::from(e.difficulty);
                    let header = BlockHeader {
                        prev,
                        definition: e.definition,
                        height: start + i as u64,
                        timestamp: e.timestamp,
                        total_difficulty: total,
                        difficulty: e.difficulty,
                    };
                    prev = header.hash();
                    header
                })
                .collect()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroblock_core::{validate_tx_base, HeaderChain};

    proptest! {
        #[test]
        fn test_generated_tx_is_valid(tx in tx_base(8)) {
            prop_assert!(validate_tx_base(&tx).is_ok());
        }

        #[test]
        fn test_generated_chain_rebuilds(chain in header_chain(5, 6)) {
            let (prefix, _) = chain[0].split();
            let mut rebuilt = HeaderChain::new(&prefix);
            for h in &chain {
                prop_assert_eq!(&rebuilt.push(&h.split().1), h);
            }
        }
    }
}
