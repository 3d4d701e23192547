//! Scalar chain quantities and the ranges a macro-body spans.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block height.
pub type Height = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Cumulative chain difficulty.
pub type Difficulty = u64;

/// An inclusive range of block heights.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeightRange {
    pub min: Height,
    pub max: Height,
}

impl HeightRange {
    /// Range covering exactly one height.
    pub const fn single(h: Height) -> Self {
        Self { min: h, max: h }
    }

    pub const fn new(min: Height, max: Height) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, h: Height) -> bool {
        self.min <= h && h <= self.max
    }

    /// Number of heights covered. Zero for an inverted range.
    pub fn len(&self) -> u64 {
        if self.max < self.min {
            0
        } else {
            self.max - self.min + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widen this range so that it also covers `other`.
    pub fn extend(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

impl fmt::Debug for HeightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..={}]", self.min, self.max)
    }
}

/// The five streams that make up a stored body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StreamKind {
    /// Body summary, sequence prefix and per-block header records.
    Header,
    /// Spent-input references.
    Input,
    /// Created outputs.
    Output,
    /// Consumed kernels.
    KernelIn,
    /// Emitted kernels.
    KernelOut,
}

impl StreamKind {
    /// All kinds, header first. Opening follows this order.
    pub const ALL: [StreamKind; 5] = [
        StreamKind::Header,
        StreamKind::Input,
        StreamKind::Output,
        StreamKind::KernelIn,
        StreamKind::KernelOut,
    ];

    /// File name suffix appended to a body's path prefix.
    pub const fn suffix(self) -> &'static str {
        match self {
            StreamKind::Header => "hd",
            StreamKind::Input => "ui",
            StreamKind::Output => "uo",
            StreamKind::KernelIn => "ki",
            StreamKind::KernelOut => "ko",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamKind::Header => "header",
            StreamKind::Input => "input",
            StreamKind::Output => "output",
            StreamKind::KernelIn => "kernel-in",
            StreamKind::KernelOut => "kernel-out",
        };
        f.write_str(name)
    }
}

/// An inclusive range of cumulative difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DifficultyRange {
    pub min: Difficulty,
    pub max: Difficulty,
}

impl DifficultyRange {
    pub const fn new(min: Difficulty, max: Difficulty) -> Self {
        Self { min, max }
    }

    pub fn extend(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}
