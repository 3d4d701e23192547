//! Streaming k-way merge with cut-through.
//!
//! Inputs and outputs are merged in one pass, then consumed and emitted
//! kernels in a second. In each pass the smallest pending input and the
//! smallest pending output across all readers are compared: the smaller is
//! written, and an input that spends the pending output annihilates with it.
//!
//! Cancellation is cooperative. The flag is polled before every step, and a
//! step is never left half-written.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::element::{cmp_in_out, Input, Kernel, Output};
use crate::error::Result;
use crate::traits::{MacroReader, MacroWriter, TxReader, TxWriter};

/// Shared, externally settable stop request.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this flag to stop.
    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::SeqCst)
    }
}

/// Counts for one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub inputs: u64,
    pub outputs: u64,
    /// Input/output pairs removed by cut-through.
    pub annihilated: u64,
}

/// What a completed merge wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub utxo: PassStats,
    pub kernel: PassStats,
    pub headers: u64,
}

impl MergeStats {
    /// Total records written across all kinds.
    pub fn written(&self) -> u64 {
        self.utxo.inputs + self.utxo.outputs + self.kernel.inputs + self.kernel.outputs + self.headers
    }
}

/// Result of a cancellable merge. Cancellation is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Completed(MergeStats),
    /// Stopped on request. The output holds a valid but truncated prefix.
    Cancelled,
}

impl MergeOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, MergeOutcome::Completed(_))
    }

    pub fn stats(&self) -> Option<&MergeStats> {
        match self {
            MergeOutcome::Completed(stats) => Some(stats),
            MergeOutcome::Cancelled => None,
        }
    }
}

/// Copy one reader into a writer without merging.
pub fn dump<W: TxWriter + ?Sized>(
    writer: &mut W,
    reader: &mut dyn TxReader,
    cancel: &CancelFlag,
) -> Result<MergeOutcome> {
    reader.reset()?;
    let mut stats = MergeStats::default();

    if !drain::<UtxoPass, W>(writer, reader, cancel, &mut stats.utxo)? {
        return Ok(MergeOutcome::Cancelled);
    }
    if !drain::<KernelPass, W>(writer, reader, cancel, &mut stats.kernel)? {
        return Ok(MergeOutcome::Cancelled);
    }
    Ok(MergeOutcome::Completed(stats))
}

/// Merge every reader into `writer`, annihilating spent outputs.
pub fn combine<W: TxWriter + ?Sized>(
    writer: &mut W,
    readers: &mut [&mut dyn TxReader],
    cancel: &CancelFlag,
) -> Result<MergeOutcome> {
    for r in readers.iter_mut() {
        r.reset()?;
    }
    let mut stats = MergeStats::default();

    if !run_pass::<UtxoPass, W>(writer, readers, cancel, &mut stats.utxo)? {
        return Ok(MergeOutcome::Cancelled);
    }
    if !run_pass::<KernelPass, W>(writer, readers, cancel, &mut stats.kernel)? {
        return Ok(MergeOutcome::Cancelled);
    }
    Ok(MergeOutcome::Completed(stats))
}

/// Merge two macro-bodies' summaries and concatenate their header chains.
pub fn combine_headers<W: MacroWriter + ?Sized>(
    writer: &mut W,
    first: &mut dyn MacroReader,
    second: &mut dyn MacroReader,
    cancel: &CancelFlag,
) -> Result<MergeOutcome> {
    first.reset()?;
    let (mut summary, prefix) = first.get_start()?;
    second.reset()?;
    let (other, _) = second.get_start()?;

    summary.merge(&other)?;
    writer.put_start(&summary, &prefix)?;

    let mut stats = MergeStats::default();
    if !copy_headers(writer, first, cancel, &mut stats)? {
        return Ok(MergeOutcome::Cancelled);
    }
    if !copy_headers(writer, second, cancel, &mut stats)? {
        return Ok(MergeOutcome::Cancelled);
    }
    Ok(MergeOutcome::Completed(stats))
}

fn copy_headers<W: MacroWriter + ?Sized>(
    writer: &mut W,
    reader: &mut dyn MacroReader,
    cancel: &CancelFlag,
    stats: &mut MergeStats,
) -> Result<bool> {
    while let Some(elem) = reader.get_next_header()? {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        writer.put_next_header(&elem)?;
        stats.headers += 1;
    }
    Ok(true)
}

/// One of the two merge passes: which reader slots feed it, how the two
/// sides compare and where the winners go.
trait MergePass {
    type In: Ord;
    type Out: Ord;

    fn input<R: TxReader + ?Sized>(r: &R) -> Option<&Self::In>;
    fn output<R: TxReader + ?Sized>(r: &R) -> Option<&Self::Out>;
    fn next_input<R: TxReader + ?Sized>(r: &mut R) -> Result<()>;
    fn next_output<R: TxReader + ?Sized>(r: &mut R) -> Result<()>;

    /// `Equal` means the input spends the output.
    fn cross(input: &Self::In, output: &Self::Out) -> Ordering;

    fn write_input<W: TxWriter + ?Sized>(w: &mut W, v: &Self::In) -> Result<()>;
    fn write_output<W: TxWriter + ?Sized>(w: &mut W, v: &Self::Out) -> Result<()>;
}

struct UtxoPass;

impl MergePass for UtxoPass {
    type In = Input;
    type Out = Output;

    fn input<R: TxReader + ?Sized>(r: &R) -> Option<&Input> {
        r.input()
    }

    fn output<R: TxReader + ?Sized>(r: &R) -> Option<&Output> {
        r.output()
    }

    fn next_input<R: TxReader + ?Sized>(r: &mut R) -> Result<()> {
        r.next_input()
    }

    fn next_output<R: TxReader + ?Sized>(r: &mut R) -> Result<()> {
        r.next_output()
    }

    fn cross(input: &Input, output: &Output) -> Ordering {
        cmp_in_out(input, output)
    }

    fn write_input<W: TxWriter + ?Sized>(w: &mut W, v: &Input) -> Result<()> {
        w.write_input(v)
    }

    fn write_output<W: TxWriter + ?Sized>(w: &mut W, v: &Output) -> Result<()> {
        w.write_output(v)
    }
}

struct KernelPass;

impl MergePass for KernelPass {
    type In = Kernel;
    type Out = Kernel;

    fn input<R: TxReader + ?Sized>(r: &R) -> Option<&Kernel> {
        r.kernel_in()
    }

    fn output<R: TxReader + ?Sized>(r: &R) -> Option<&Kernel> {
        r.kernel_out()
    }

    fn next_input<R: TxReader + ?Sized>(r: &mut R) -> Result<()> {
        r.next_kernel_in()
    }

    fn next_output<R: TxReader + ?Sized>(r: &mut R) -> Result<()> {
        r.next_kernel_out()
    }

    fn cross(input: &Kernel, output: &Kernel) -> Ordering {
        input.cmp(output)
    }

    fn write_input<W: TxWriter + ?Sized>(w: &mut W, v: &Kernel) -> Result<()> {
        w.write_kernel_in(v)
    }

    fn write_output<W: TxWriter + ?Sized>(w: &mut W, v: &Kernel) -> Result<()> {
        w.write_kernel_out(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Done,
    Input(usize),
    Output(usize),
    Annihilate { input: usize, output: usize },
}

/// Index and value of the smallest present item. Earlier readers win ties.
fn select_min<'a, T: Ord + 'a>(items: impl Iterator<Item = Option<&'a T>>) -> Option<(usize, &'a T)> {
    let mut best: Option<(usize, &'a T)> = None;
    for (i, item) in items.enumerate() {
        let Some(v) = item else { continue };
        match best {
            Some((_, b)) if b <= v => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

fn next_step<P: MergePass>(readers: &[&mut dyn TxReader]) -> Step {
    let input = select_min(readers.iter().map(|r| P::input(&**r)));
    let output = select_min(readers.iter().map(|r| P::output(&**r)));

    match (input, output) {
        (None, None) => Step::Done,
        (Some((i, _)), None) => Step::Input(i),
        (None, Some((o, _))) => Step::Output(o),
        (Some((i, vi)), Some((o, vo))) => match P::cross(vi, vo) {
            Ordering::Less => Step::Input(i),
            Ordering::Equal => Step::Annihilate { input: i, output: o },
            Ordering::Greater => Step::Output(o),
        },
    }
}

/// Returns `false` if cancelled.
fn run_pass<P: MergePass, W: TxWriter + ?Sized>(
    writer: &mut W,
    readers: &mut [&mut dyn TxReader],
    cancel: &CancelFlag,
    stats: &mut PassStats,
) -> Result<bool> {
    loop {
        if cancel.is_cancelled() {
            return Ok(false);
        }

        match next_step::<P>(readers) {
            Step::Done => return Ok(true),
            Step::Input(i) => {
                if let Some(v) = P::input(&*readers[i]) {
                    P::write_input(writer, v)?;
                }
                P::next_input(&mut *readers[i])?;
                stats.inputs += 1;
            }
            Step::Output(o) => {
                if let Some(v) = P::output(&*readers[o]) {
                    P::write_output(writer, v)?;
                }
                P::next_output(&mut *readers[o])?;
                stats.outputs += 1;
            }
            Step::Annihilate { input, output } => {
                P::next_input(&mut *readers[input])?;
                P::next_output(&mut *readers[output])?;
                stats.annihilated += 1;
            }
        }
    }
}

/// Copy both sides of one pass from a single reader, inputs first.
fn drain<P: MergePass, W: TxWriter + ?Sized>(
    writer: &mut W,
    reader: &mut dyn TxReader,
    cancel: &CancelFlag,
    stats: &mut PassStats,
) -> Result<bool> {
    while let Some(v) = P::input(&*reader) {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        P::write_input(writer, v)?;
        P::next_input(&mut *reader)?;
        stats.inputs += 1;
    }
    while let Some(v) = P::output(&*reader) {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        P::write_output(writer, v)?;
        P::next_output(&mut *reader)?;
        stats.outputs += 1;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Commitment, Hash, Signature};
    use crate::element::KernelBuilder;
    use crate::error::BodyError;
    use crate::header::{BodySummary, SequenceElement, SequencePrefix};
    use crate::types::{DifficultyRange, HeightRange, StreamKind};
    use proptest::prelude::*;

    #[derive(Debug, Default, Clone)]
    struct VecBody {
        inputs: Vec<Input>,
        outputs: Vec<Output>,
        kernels_in: Vec<Kernel>,
        kernels_out: Vec<Kernel>,
        start: Option<(BodySummary, SequencePrefix)>,
        headers: Vec<SequenceElement>,
        pos: [usize; 5],
    }

    impl TxReader for VecBody {
        fn reset(&mut self) -> Result<()> {
            self.pos = [0; 5];
            Ok(())
        }
        fn input(&self) -> Option<&Input> {
            self.inputs.get(self.pos[0])
        }
        fn output(&self) -> Option<&Output> {
            self.outputs.get(self.pos[1])
        }
        fn kernel_in(&self) -> Option<&Kernel> {
            self.kernels_in.get(self.pos[2])
        }
        fn kernel_out(&self) -> Option<&Kernel> {
            self.kernels_out.get(self.pos[3])
        }
        fn next_input(&mut self) -> Result<()> {
            self.pos[0] += 1;
            Ok(())
        }
        fn next_output(&mut self) -> Result<()> {
            self.pos[1] += 1;
            Ok(())
        }
        fn next_kernel_in(&mut self) -> Result<()> {
            self.pos[2] += 1;
            Ok(())
        }
        fn next_kernel_out(&mut self) -> Result<()> {
            self.pos[3] += 1;
            Ok(())
        }
    }

    impl TxWriter for VecBody {
        fn write_input(&mut self, v: &Input) -> Result<()> {
            self.inputs.push(v.clone());
            Ok(())
        }
        fn write_output(&mut self, v: &Output) -> Result<()> {
            self.outputs.push(v.clone());
            Ok(())
        }
        fn write_kernel_in(&mut self, v: &Kernel) -> Result<()> {
            self.kernels_in.push(v.clone());
            Ok(())
        }
        fn write_kernel_out(&mut self, v: &Kernel) -> Result<()> {
            self.kernels_out.push(v.clone());
            Ok(())
        }
    }

    impl MacroReader for VecBody {
        fn get_start(&mut self) -> Result<(BodySummary, SequencePrefix)> {
            self.start.ok_or_else(|| BodyError::Decoding {
                kind: StreamKind::Header,
                reason: "no start record".into(),
            })
        }
        fn get_next_header(&mut self) -> Result<Option<SequenceElement>> {
            let h = self.headers.get(self.pos[4]).copied();
            self.pos[4] += 1;
            Ok(h)
        }
    }

    impl MacroWriter for VecBody {
        fn put_start(&mut self, summary: &BodySummary, prefix: &SequencePrefix) -> Result<()> {
            self.start = Some((*summary, *prefix));
            Ok(())
        }
        fn put_next_header(&mut self, elem: &SequenceElement) -> Result<()> {
            self.headers.push(*elem);
            Ok(())
        }
    }

    /// Sets the flag once `limit` records have been written.
    struct CancelAfter {
        inner: VecBody,
        limit: usize,
        written: usize,
        flag: CancelFlag,
    }

    impl CancelAfter {
        fn tick(&mut self) {
            self.written += 1;
            if self.written >= self.limit {
                self.flag.cancel();
            }
        }
    }

    impl TxWriter for CancelAfter {
        fn write_input(&mut self, v: &Input) -> Result<()> {
            self.tick();
            self.inner.write_input(v)
        }
        fn write_output(&mut self, v: &Output) -> Result<()> {
            self.tick();
            self.inner.write_output(v)
        }
        fn write_kernel_in(&mut self, v: &Kernel) -> Result<()> {
            self.tick();
            self.inner.write_kernel_in(v)
        }
        fn write_kernel_out(&mut self, v: &Kernel) -> Result<()> {
            self.tick();
            self.inner.write_kernel_out(v)
        }
    }

    fn c(b: u8) -> Commitment {
        Commitment::new([b; 32], false)
    }

    fn input(b: u8) -> Input {
        Input::new(c(b), 0)
    }

    fn output(b: u8) -> Output {
        Output::confidential(c(b), vec![b])
    }

    fn kernel(b: u8) -> Kernel {
        KernelBuilder::new(c(b)).fee(u64::from(b)).build(Signature::default())
    }

    fn commitments_in(v: &[Input]) -> Vec<u8> {
        v.iter().map(|i| i.commitment.x[0]).collect()
    }

    fn commitments_out(v: &[Output]) -> Vec<u8> {
        v.iter().map(|o| o.commitment.x[0]).collect()
    }

    #[test]
    fn test_dump_identity() {
        let mut src = VecBody {
            inputs: vec![input(1), input(4)],
            outputs: vec![output(2), output(3)],
            kernels_in: vec![kernel(5)],
            kernels_out: vec![kernel(6), kernel(7)],
            ..Default::default()
        };
        src.pos = [9; 5];

        let mut dst = VecBody::default();
        let outcome = dst.dump(&mut src, &CancelFlag::new()).unwrap();

        assert_eq!(dst.inputs, src.inputs);
        assert_eq!(dst.outputs, src.outputs);
        assert_eq!(dst.kernels_in, src.kernels_in);
        assert_eq!(dst.kernels_out, src.kernels_out);
        assert_eq!(outcome.stats().unwrap().written(), 7);
    }

    #[test]
    fn test_combine_annihilates_spent_output() {
        let mut a = VecBody {
            inputs: vec![input(1)],
            ..Default::default()
        };
        let mut b = VecBody {
            outputs: vec![output(1)],
            ..Default::default()
        };

        let mut dst = VecBody::default();
        let outcome = dst.combine_pair(&mut a, &mut b, &CancelFlag::new()).unwrap();

        assert!(dst.inputs.is_empty());
        assert!(dst.outputs.is_empty());
        assert_eq!(outcome.stats().unwrap().utxo.annihilated, 1);
    }

    #[test]
    fn test_combine_with_empty_reader_passes_through() {
        let mut a = VecBody {
            outputs: vec![output(2)],
            ..Default::default()
        };
        let mut b = VecBody::default();

        let mut dst = VecBody::default();
        dst.combine_pair(&mut a, &mut b, &CancelFlag::new()).unwrap();
        assert_eq!(dst.outputs, vec![output(2)]);
        assert!(dst.inputs.is_empty());
    }

    #[test]
    fn test_combine_sorted_union() {
        let mut a = VecBody {
            inputs: vec![input(1), input(5)],
            outputs: vec![output(3), output(9)],
            ..Default::default()
        };
        let mut b = VecBody {
            inputs: vec![input(2), input(9)],
            outputs: vec![output(4)],
            ..Default::default()
        };
        let mut c3 = VecBody {
            outputs: vec![output(7)],
            ..Default::default()
        };

        let mut dst = VecBody::default();
        let mut readers: [&mut dyn TxReader; 3] = [&mut a, &mut b, &mut c3];
        dst.combine(&mut readers, &CancelFlag::new()).unwrap();

        assert_eq!(commitments_in(&dst.inputs), vec![1, 2, 5]);
        assert_eq!(commitments_out(&dst.outputs), vec![3, 4, 7]);
    }

    #[test]
    fn test_combine_tie_prefers_first_reader() {
        // Same commitment, different heights: both survive, in order.
        let mut a = VecBody {
            inputs: vec![Input::new(c(1), 10)],
            ..Default::default()
        };
        let mut b = VecBody {
            inputs: vec![Input::new(c(1), 5)],
            ..Default::default()
        };
        let mut dst = VecBody::default();
        dst.combine_pair(&mut a, &mut b, &CancelFlag::new()).unwrap();
        assert_eq!(dst.inputs, vec![Input::new(c(1), 5), Input::new(c(1), 10)]);
    }

    #[test]
    fn test_combine_shared_commitment_removes_one_pair() {
        let mut a = VecBody {
            inputs: vec![Input::new(c(1), 3), Input::new(c(1), 4)],
            ..Default::default()
        };
        let mut b = VecBody {
            outputs: vec![output(1)],
            ..Default::default()
        };
        let mut dst = VecBody::default();
        let outcome = dst.combine_pair(&mut a, &mut b, &CancelFlag::new()).unwrap();
        assert_eq!(dst.inputs, vec![Input::new(c(1), 4)]);
        assert_eq!(outcome.stats().unwrap().utxo.annihilated, 1);
    }

    #[test]
    fn test_kernel_pass_annihilation_advances_kernels() {
        let mut a = VecBody {
            kernels_in: vec![kernel(4)],
            kernels_out: vec![kernel(8)],
            ..Default::default()
        };
        let mut b = VecBody {
            kernels_out: vec![kernel(4)],
            ..Default::default()
        };
        let mut dst = VecBody::default();
        let outcome = dst.combine_pair(&mut a, &mut b, &CancelFlag::new()).unwrap();

        assert!(dst.kernels_in.is_empty());
        assert_eq!(dst.kernels_out, vec![kernel(8)]);
        assert_eq!(outcome.stats().unwrap().kernel.annihilated, 1);
    }

    #[test]
    fn test_combine_cancel_before_start_writes_nothing() {
        let mut a = VecBody {
            inputs: vec![input(1)],
            ..Default::default()
        };
        let mut b = VecBody::default();
        let flag = CancelFlag::new();
        flag.cancel();

        let mut dst = VecBody::default();
        let outcome = dst.combine_pair(&mut a, &mut b, &flag).unwrap();
        assert_eq!(outcome, MergeOutcome::Cancelled);
        assert!(dst.inputs.is_empty());
    }

    #[test]
    fn test_combine_cancel_after_k_writes() {
        let mut a = VecBody {
            inputs: (1..=6).map(|i| input(i * 2)).collect(),
            kernels_out: vec![kernel(1)],
            ..Default::default()
        };
        let mut b = VecBody {
            outputs: (1..=6).map(|i| output(i * 2 + 1)).collect(),
            ..Default::default()
        };

        let flag = CancelFlag::new();
        let mut dst = CancelAfter {
            inner: VecBody::default(),
            limit: 4,
            written: 0,
            flag: flag.clone(),
        };
        let outcome = dst.combine_pair(&mut a, &mut b, &flag).unwrap();

        assert_eq!(outcome, MergeOutcome::Cancelled);
        assert_eq!(dst.inner.inputs.len() + dst.inner.outputs.len(), 4);
        assert_eq!(commitments_in(&dst.inner.inputs), vec![2, 4]);
        assert_eq!(commitments_out(&dst.inner.outputs), vec![3, 5]);
        assert!(dst.inner.kernels_out.is_empty());
    }

    fn start(min: u64, max: u64, subsidy: u64) -> (BodySummary, SequencePrefix) {
        let summary = BodySummary {
            height: HeightRange::new(min, max),
            difficulty: DifficultyRange::new(min, max),
            subsidy,
            subsidy_closed: false,
        };
        let prefix = SequencePrefix {
            height: min,
            prev: Hash::digest(&min.to_le_bytes()),
            total_difficulty: min,
        };
        (summary, prefix)
    }

    fn elem(b: u8) -> SequenceElement {
        SequenceElement {
            definition: Hash::from_bytes([b; 32]),
            timestamp: u64::from(b),
            difficulty: b,
        }
    }

    #[test]
    fn test_combine_headers_concatenates() {
        let mut a = VecBody {
            start: Some(start(1, 2, 10)),
            headers: vec![elem(1), elem(2)],
            ..Default::default()
        };
        let mut b = VecBody {
            start: Some(start(3, 5, 20)),
            headers: vec![elem(3), elem(4), elem(5)],
            ..Default::default()
        };

        let mut dst = VecBody::default();
        let outcome = dst.combine_headers(&mut a, &mut b, &CancelFlag::new()).unwrap();

        let (summary, prefix) = dst.start.unwrap();
        assert_eq!(summary.height, HeightRange::new(1, 5));
        assert_eq!(summary.subsidy, 30);
        assert_eq!(prefix, start(1, 2, 10).1);
        assert_eq!(dst.headers, (1..=5).map(elem).collect::<Vec<_>>());
        assert_eq!(outcome.stats().unwrap().headers, 5);
    }

    #[test]
    fn test_combine_headers_cancelled() {
        let mut a = VecBody {
            start: Some(start(1, 1, 0)),
            headers: vec![elem(1)],
            ..Default::default()
        };
        let mut b = VecBody {
            start: Some(start(2, 2, 0)),
            headers: vec![elem(2)],
            ..Default::default()
        };
        let flag = CancelFlag::new();
        flag.cancel();

        let mut dst = VecBody::default();
        let outcome = dst.combine_headers(&mut a, &mut b, &flag).unwrap();
        assert_eq!(outcome, MergeOutcome::Cancelled);
        assert!(dst.headers.is_empty());
    }

    #[test]
    fn test_select_min_stable() {
        let items = [Some(&3), None, Some(&1), Some(&1)];
        assert_eq!(select_min(items.into_iter()), Some((2, &1)));
        let none: [Option<&u8>; 2] = [None, None];
        assert_eq!(select_min(none.into_iter()), None);
    }

    proptest! {
        #[test]
        fn prop_combine_is_union_minus_pairs(
            owners in prop::collection::vec((0u8..3, 0u8..3), 0..64)
        ) {
            // For commitment i: which reader (1 or 2) spends it, which creates it.
            let mut a = VecBody::default();
            let mut b = VecBody::default();
            let mut expect_in = Vec::new();
            let mut expect_out = Vec::new();

            for (i, (spent_by, created_by)) in owners.iter().enumerate() {
                let i = i as u8;
                let created_by = if created_by == spent_by { 0 } else { *created_by };
                match *spent_by {
                    1 => a.inputs.push(input(i)),
                    2 => b.inputs.push(input(i)),
                    _ => {}
                }
                match created_by {
                    1 => a.outputs.push(output(i)),
                    2 => b.outputs.push(output(i)),
                    _ => {}
                }
                match (*spent_by != 0, created_by != 0) {
                    (true, false) => expect_in.push(i),
                    (false, true) => expect_out.push(i),
                    _ => {}
                }
            }

            let mut dst = VecBody::default();
            let outcome = dst.combine_pair(&mut a, &mut b, &CancelFlag::new()).unwrap();

            prop_assert!(outcome.is_completed());
            prop_assert_eq!(commitments_in(&dst.inputs), expect_in);
            prop_assert_eq!(commitments_out(&dst.outputs), expect_out);
        }
    }
}
