//! Reader and writer abstractions over body element streams.
//!
//! These traits are the seam between the merge engine and storage. The
//! engine only ever sees `dyn TxReader`, so file-backed and in-memory
//! bodies can be merged with each other.

use crate::element::{Input, Kernel, Output};
use crate::error::Result;
use crate::header::{BodySummary, SequenceElement, SequencePrefix};
use crate::merge::{self, CancelFlag, MergeOutcome};

/// Forward-only cursor over the four element kinds of a body.
///
/// Each kind exposes its current element (or `None` once exhausted) and an
/// advance operation. After [`reset`](TxReader::reset) the first element of
/// every kind is already loaded.
pub trait TxReader {
    /// Rewind every kind to its first element.
    fn reset(&mut self) -> Result<()>;

    fn input(&self) -> Option<&Input>;
    fn output(&self) -> Option<&Output>;
    fn kernel_in(&self) -> Option<&Kernel>;
    fn kernel_out(&self) -> Option<&Kernel>;

    fn next_input(&mut self) -> Result<()>;
    fn next_output(&mut self) -> Result<()>;
    fn next_kernel_in(&mut self) -> Result<()>;
    fn next_kernel_out(&mut self) -> Result<()>;
}

/// Append-only sink for the four element kinds.
///
/// Writers never sort. Callers supply each kind in order.
pub trait TxWriter {
    fn write_input(&mut self, v: &Input) -> Result<()>;
    fn write_output(&mut self, v: &Output) -> Result<()>;
    fn write_kernel_in(&mut self, v: &Kernel) -> Result<()>;
    fn write_kernel_out(&mut self, v: &Kernel) -> Result<()>;

    /// Copy every element of `reader` into this writer, kind by kind.
    fn dump(&mut self, reader: &mut dyn TxReader, cancel: &CancelFlag) -> Result<MergeOutcome> {
        merge::dump(self, reader, cancel)
    }

    /// Merge any number of readers with cut-through.
    fn combine(
        &mut self,
        readers: &mut [&mut dyn TxReader],
        cancel: &CancelFlag,
    ) -> Result<MergeOutcome> {
        merge::combine(self, readers, cancel)
    }

    /// Two-reader form of [`combine`](TxWriter::combine).
    fn combine_pair(
        &mut self,
        first: &mut dyn TxReader,
        second: &mut dyn TxReader,
        cancel: &CancelFlag,
    ) -> Result<MergeOutcome> {
        let mut readers: [&mut dyn TxReader; 2] = [first, second];
        merge::combine(self, &mut readers, cancel)
    }
}

/// A reader that also carries a macro-body's header chain.
pub trait MacroReader: TxReader {
    /// Body summary and chain prefix. Valid right after a reset.
    fn get_start(&mut self) -> Result<(BodySummary, SequencePrefix)>;

    /// Next per-block header record, `None` at the end of the chain.
    fn get_next_header(&mut self) -> Result<Option<SequenceElement>>;
}

/// A writer that also records a macro-body's header chain.
pub trait MacroWriter: TxWriter {
    /// Write the body summary and chain prefix. Called once, first.
    fn put_start(&mut self, summary: &BodySummary, prefix: &SequencePrefix) -> Result<()>;

    fn put_next_header(&mut self, elem: &SequenceElement) -> Result<()>;

    /// Merge the summaries of two macro-bodies and append their header
    /// chains, `first` then `second`.
    fn combine_headers(
        &mut self,
        first: &mut dyn MacroReader,
        second: &mut dyn MacroReader,
        cancel: &CancelFlag,
    ) -> Result<MergeOutcome> {
        merge::combine_headers(self, first, second, cancel)
    }
}
