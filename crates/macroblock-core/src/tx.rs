//! Transaction and block body contents.

use serde::{Deserialize, Serialize};

use crate::crypto::Scalar;
use crate::element::{Input, Kernel, Output};

/// Inputs, outputs and kernels plus the aggregate blinding offset.
///
/// A transaction and a block body share this shape. In a valid body every
/// sequence is strictly sorted by its element order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxBase {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub kernels: Vec<Kernel>,
    pub offset: Scalar,
}

impl TxBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort all three sequences into body order.
    pub fn normalize(&mut self) {
        self.inputs.sort();
        self.outputs.sort();
        self.kernels.sort();
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty() && self.kernels.is_empty()
    }

    /// Total number of top-level elements.
    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len() + self.kernels.len()
    }
}
