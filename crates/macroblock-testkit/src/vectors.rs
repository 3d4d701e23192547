//! Named merge scenarios with their expected results.
//!
//! Each vector merges two bodies in memory and states exactly which
//! elements must survive cut-through.

use macroblock_core::{CancelFlag, Result, TxBase, TxWriter};
use macroblock_store::MemoryBody;

use crate::fixtures::{input, kernel, output, tx};

/// A merge scenario.
#[derive(Debug, Clone)]
pub struct MergeVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub first: TxBase,
    pub second: TxBase,
    /// Everything expected to survive the merge.
    pub expected: TxBase,
}

/// Get all merge vectors.
pub fn all_vectors() -> Vec<MergeVector> {
    vec![
        MergeVector {
            name: "input spends output of the other body",
            first: tx(vec![input(1, 5)], vec![], vec![]),
            second: tx(vec![], vec![output(1)], vec![]),
            expected: TxBase::new(),
        },
        MergeVector {
            name: "output merged with empty body",
            first: tx(vec![], vec![output(2)], vec![]),
            second: TxBase::new(),
            expected: tx(vec![], vec![output(2)], vec![]),
        },
        MergeVector {
            name: "unrelated elements interleave",
            first: tx(vec![input(1, 1)], vec![output(4)], vec![kernel(2)]),
            second: tx(vec![input(3, 2)], vec![output(2)], vec![kernel(1)]),
            expected: tx(
                vec![input(1, 1), input(3, 2)],
                vec![output(2), output(4)],
                vec![kernel(1), kernel(2)],
            ),
        },
        MergeVector {
            name: "spend within the same body",
            first: tx(vec![input(7, 3)], vec![output(7), output(8)], vec![]),
            second: TxBase::new(),
            expected: tx(vec![], vec![output(8)], vec![]),
        },
        MergeVector {
            name: "one output, two inputs with the same commitment",
            first: tx(vec![input(5, 1), input(5, 2)], vec![], vec![]),
            second: tx(vec![], vec![output(5)], vec![]),
            expected: tx(vec![input(5, 2)], vec![], vec![]),
        },
        MergeVector {
            name: "both bodies empty",
            first: TxBase::new(),
            second: TxBase::new(),
            expected: TxBase::new(),
        },
    ]
}

/// Merge a vector's bodies in memory.
pub fn run_vector(vector: &MergeVector) -> Result<MemoryBody> {
    let mut first = MemoryBody::from_tx(vector.first.clone());
    let mut second = MemoryBody::from_tx(vector.second.clone());
    let mut out = MemoryBody::new();
    out.combine_pair(&mut first, &mut second, &CancelFlag::new())?;
    Ok(out)
}

/// Whether the merged body holds exactly the expected elements.
pub fn matches(vector: &MergeVector, merged: &MemoryBody) -> bool {
    merged.inputs() == vector.expected.inputs.as_slice()
        && merged.outputs() == vector.expected.outputs.as_slice()
        && merged.kernels_out() == vector.expected.kernels.as_slice()
        && merged.kernels_in().is_empty()
}

/// Run every vector and report `(name, passed)`.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    all_vectors()
        .iter()
        .map(|v| {
            let passed = run_vector(v).map(|m| matches(v, &m)).unwrap_or(false);
            (v.name.to_string(), passed)
        })
        .collect()
}
