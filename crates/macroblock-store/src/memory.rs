//! In-memory body with the same reader/writer surface as
//! [`BodyStreamSet`](crate::BodyStreamSet).
//!
//! Used to assemble a block body before it is written out, and in tests.
//! Nothing is persisted.

use std::io;

use macroblock_core::{
    BodySummary, Input, Kernel, MacroReader, MacroWriter, Output, Result, SequenceElement,
    SequencePrefix, TxBase, TxReader, TxWriter,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBody {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    kernels_in: Vec<Kernel>,
    kernels_out: Vec<Kernel>,
    start: Option<(BodySummary, SequencePrefix)>,
    headers: Vec<SequenceElement>,
    cursor: Cursor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    input: usize,
    output: usize,
    kernel_in: usize,
    kernel_out: usize,
    header: usize,
}

impl MemoryBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// A body holding a transaction's elements. Its kernels become the
    /// emitted kernels.
    pub fn from_tx(tx: TxBase) -> Self {
        Self {
            inputs: tx.inputs,
            outputs: tx.outputs,
            kernels_out: tx.kernels,
            ..Self::default()
        }
    }

    pub fn with_start(mut self, summary: BodySummary, prefix: SequencePrefix) -> Self {
        self.start = Some((summary, prefix));
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = SequenceElement>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_kernels_in(mut self, kernels: impl IntoIterator<Item = Kernel>) -> Self {
        self.kernels_in.extend(kernels);
        self
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn kernels_in(&self) -> &[Kernel] {
        &self.kernels_in
    }

    pub fn kernels_out(&self) -> &[Kernel] {
        &self.kernels_out
    }

    pub fn start(&self) -> Option<&(BodySummary, SequencePrefix)> {
        self.start.as_ref()
    }

    pub fn headers(&self) -> &[SequenceElement] {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
            && self.outputs.is_empty()
            && self.kernels_in.is_empty()
            && self.kernels_out.is_empty()
    }
}

impl TxReader for MemoryBody {
    fn reset(&mut self) -> Result<()> {
        self.cursor = Cursor::default();
        Ok(())
    }

    fn input(&self) -> Option<&Input> {
        self.inputs.get(self.cursor.input)
    }

    fn output(&self) -> Option<&Output> {
        self.outputs.get(self.cursor.output)
    }

    fn kernel_in(&self) -> Option<&Kernel> {
        self.kernels_in.get(self.cursor.kernel_in)
    }

    fn kernel_out(&self) -> Option<&Kernel> {
        self.kernels_out.get(self.cursor.kernel_out)
    }

    fn next_input(&mut self) -> Result<()> {
        self.cursor.input = (self.cursor.input + 1).min(self.inputs.len());
        Ok(())
    }

    fn next_output(&mut self) -> Result<()> {
        self.cursor.output = (self.cursor.output + 1).min(self.outputs.len());
        Ok(())
    }

    fn next_kernel_in(&mut self) -> Result<()> {
        self.cursor.kernel_in = (self.cursor.kernel_in + 1).min(self.kernels_in.len());
        Ok(())
    }

    fn next_kernel_out(&mut self) -> Result<()> {
        self.cursor.kernel_out = (self.cursor.kernel_out + 1).min(self.kernels_out.len());
        Ok(())
    }
}

impl TxWriter for MemoryBody {
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

impl MacroReader for MemoryBody {
    fn get_start(&mut self) -> Result<(BodySummary, SequencePrefix)> {
        self.start.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "body has no start records").into()
        })
    }

    fn get_next_header(&mut self) -> Result<Option<SequenceElement>> {
        let next = self.headers.get(self.cursor.header).copied();
        if next.is_some() {
            self.cursor.header += 1;
        }
        Ok(next)
    }
}

impl MacroWriter for MemoryBody {
    fn put_start(&mut self, summary: &BodySummary, prefix: &SequencePrefix) -> Result<()> {
        self.start = Some((*summary, *prefix));
        Ok(())
    }

    fn put_next_header(&mut self, elem: &SequenceElement) -> Result<()> {
        self.headers.push(*elem);
        Ok(())
    }
}
