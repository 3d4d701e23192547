//! Structural validation of assembled bodies.
//!
//! This does not check balances, signatures or maturity. It checks the
//! properties the storage and merge layers rely on.

use crate::element::{Kernel, OutputProof};
use crate::error::ValidationError;
use crate::header::{BodySummary, SequencePrefix};
use crate::tx::TxBase;
use crate::types::StreamKind;

/// Deepest kernel tree accepted in a body.
pub const MAX_KERNEL_NESTING: usize = 32;

/// Validate a body's element sequences.
///
/// This performs:
/// - Strict ordering of inputs, outputs and kernels
/// - Kernel nesting depth limit
/// - Non-empty range proofs on confidential outputs
pub fn validate_tx_base(tx: &TxBase) -> Result<(), ValidationError> {
    check_sorted(&tx.inputs, StreamKind::Input)?;
    check_sorted(&tx.outputs, StreamKind::Output)?;
    check_sorted(&tx.kernels, StreamKind::KernelOut)?;

    for (i, out) in tx.outputs.iter().enumerate() {
        if let OutputProof::Confidential { range_proof } = &out.proof {
            if range_proof.is_empty() {
                return Err(ValidationError::EmptyRangeProof(i));
            }
        }
    }

    tx.kernels.iter().try_for_each(validate_kernel)
}

/// Check a kernel tree's depth.
pub fn validate_kernel(kernel: &Kernel) -> Result<(), ValidationError> {
    let depth = kernel.depth();
    if depth > MAX_KERNEL_NESTING {
        return Err(ValidationError::NestingTooDeep {
            depth,
            max: MAX_KERNEL_NESTING,
        });
    }
    Ok(())
}

/// The header chain must start where the summary's height range starts.
pub fn validate_prefix(summary: &BodySummary, prefix: &SequencePrefix) -> Result<(), ValidationError> {
    if prefix.height != summary.height.min {
        return Err(ValidationError::PrefixMismatch {
            expected: summary.height.min,
            found: prefix.height,
        });
    }
    Ok(())
}

/// Strictly increasing check. Returns the first offending position.
pub fn check_sorted<T: Ord>(items: &[T], kind: StreamKind) -> Result<(), ValidationError> {
    match items.windows(2).position(|w| w[0] >= w[1]) {
        Some(i) => Err(ValidationError::Unsorted { kind, index: i + 1 }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Commitment, Hash, Signature};
    use crate::element::{Input, KernelBuilder, Output};
    use crate::types::{DifficultyRange, HeightRange};

    fn c(b: u8) -> Commitment {
        Commitment::new([b; 32], false)
    }

    #[test]
    fn test_valid_body() {
        let mut tx = TxBase::new();
        tx.inputs = vec![Input::new(c(1), 5), Input::new(c(1), 6)];
        tx.outputs = vec![Output::confidential(c(2), vec![7])];
        tx.kernels = vec![KernelBuilder::new(c(3)).build(Signature::default())];
        assert!(validate_tx_base(&tx).is_ok());
    }

    #[test]
    fn test_unsorted_inputs() {
        let mut tx = TxBase::new();
        tx.inputs = vec![Input::new(c(2), 0), Input::new(c(1), 0)];
        assert_eq!(
            validate_tx_base(&tx),
            Err(ValidationError::Unsorted {
                kind: StreamKind::Input,
                index: 1
            })
        );
    }

    #[test]
    fn test_duplicate_is_unsorted() {
        let out = Output::confidential(c(2), vec![7]);
        let mut tx = TxBase::new();
        tx.outputs = vec![out.clone(), out];
        assert!(matches!(
            validate_tx_base(&tx),
            Err(ValidationError::Unsorted { kind: StreamKind::Output, .. })
        ));
    }

    #[test]
    fn test_empty_range_proof() {
        let mut tx = TxBase::new();
        tx.outputs = vec![Output::confidential(c(2), Vec::new())];
        assert_eq!(validate_tx_base(&tx), Err(ValidationError::EmptyRangeProof(0)));
    }

    #[test]
    fn test_nesting_too_deep() {
        let mut k = KernelBuilder::new(c(0)).build(Signature::default());
        for i in 1..=MAX_KERNEL_NESTING as u8 {
            k = KernelBuilder::new(c(i)).nest(k).build(Signature::default());
        }
        assert_eq!(
            validate_kernel(&k),
            Err(ValidationError::NestingTooDeep {
                depth: MAX_KERNEL_NESTING + 1,
                max: MAX_KERNEL_NESTING
            })
        );
    }

    #[test]
    fn test_prefix_must_match_summary() {
        let summary = BodySummary {
            height: HeightRange::new(10, 20),
            difficulty: DifficultyRange::default(),
            subsidy: 0,
            subsidy_closed: false,
        };
        let good = SequencePrefix {
            height: 10,
            prev: Hash::ZERO,
            total_difficulty: 0,
        };
        assert!(validate_prefix(&summary, &good).is_ok());

        let bad = SequencePrefix { height: 11, ..good };
        assert!(validate_prefix(&summary, &bad).is_err());
    }
}
