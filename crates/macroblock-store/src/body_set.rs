//! File-backed storage for one (macro-)body as five per-kind streams.
//!
//! Layout on disk, for a path prefix `P`:
//!
//! | File   | Leading hashes                 | Records                                   |
//! |--------|--------------------------------|-------------------------------------------|
//! | `Phd`  | rules checksum, content tag    | `BodySummary`, `SequencePrefix`, `SequenceElement`* |
//! | `Pui`  | content tag                    | `Input`*                                  |
//! | `Puo`  | content tag                    | `Output`*                                 |
//! | `Pki`  | content tag                    | `Kernel`* (consumed)                      |
//! | `Pko`  | content tag                    | `Kernel`* (emitted)                       |
//!
//! A set is opened either for reading (every file is opened and verified
//! up front) or for writing (existing files are removed, and each stream is
//! created on its first write). Closing a write set seals it: streams that
//! were never written are created holding only their leading hashes.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use macroblock_core::{
    BodyError, BodySummary, ContentTag, Hash, Input, Kernel, MacroReader, MacroWriter, Output,
    Result, SequenceElement, SequencePrefix, StreamKind, TxReader, TxWriter,
};

use crate::codec;
use crate::lookahead::Lookahead;
use crate::stream::{remove_if_exists, stream_path, KindStream};

/// The five streams of one body, rooted at a path prefix.
pub struct BodyStreamSet {
    prefix: PathBuf,
    rules_checksum: Hash,
    tag: ContentTag,
    read: bool,
    closed: bool,
    auto_delete: bool,
    streams: [Option<KindStream>; 5],
    inputs: Lookahead<Input>,
    outputs: Lookahead<Output>,
    kernels_in: Lookahead<Kernel>,
    kernels_out: Lookahead<Kernel>,
}

impl BodyStreamSet {
    fn empty(prefix: PathBuf, rules_checksum: Hash, tag: ContentTag, read: bool) -> Self {
        Self {
            prefix,
            rules_checksum,
            tag,
            read,
            closed: false,
            auto_delete: false,
            streams: Default::default(),
            inputs: Lookahead::new(),
            outputs: Lookahead::new(),
            kernels_in: Lookahead::new(),
            kernels_out: Lookahead::new(),
        }
    }

    /// Open an existing body for reading.
    ///
    /// The header stream is checked first against `rules_checksum`, then
    /// every element stream against the header's content tag. All five
    /// files must exist. On success the first element of each kind is
    /// already loaded.
    pub fn open(prefix: impl Into<PathBuf>, rules_checksum: Hash) -> Result<Self> {
        let mut set = Self::empty(prefix.into(), rules_checksum, ContentTag::from_hash(Hash::ZERO), true);

        for kind in StreamKind::ALL {
            let path = set.path_for(kind);
            let mut stream = KindStream::open_read(&path).map_err(|e| {
                warn!(path = %path.display(), error = %e, "cannot open body stream");
                e
            })?;
            check_leading(kind, &mut stream, &set.rules_checksum, &mut set.tag)?;
            set.streams[kind.index()] = Some(stream);
        }

        set.preload()?;
        debug!(prefix = %set.prefix.display(), tag = %set.tag, "opened body for reading");
        Ok(set)
    }

    /// Start a new body for writing, removing any files at `prefix`.
    pub fn create(prefix: impl Into<PathBuf>, rules_checksum: Hash, tag: ContentTag) -> Result<Self> {
        let set = Self::empty(prefix.into(), rules_checksum, tag, false);
        set.remove_files()?;
        debug!(prefix = %set.prefix.display(), tag = %set.tag, "created body for writing");
        Ok(set)
    }

    /// Delete every file of this set when it is dropped.
    pub fn with_auto_delete(mut self, on: bool) -> Self {
        self.auto_delete = on;
        self
    }

    pub fn set_auto_delete(&mut self, on: bool) {
        self.auto_delete = on;
    }

    pub fn auto_delete(&self) -> bool {
        self.auto_delete
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn path_for(&self, kind: StreamKind) -> PathBuf {
        stream_path(&self.prefix, kind)
    }

    /// Identity of this body. For a read set, as recorded in the header.
    pub fn content_tag(&self) -> ContentTag {
        self.tag
    }

    pub fn rules_checksum(&self) -> &Hash {
        &self.rules_checksum
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    /// Rewind every open stream, verify it again and reload the first
    /// element of each kind. Only read sets can be reset.
    pub fn reset(&mut self) -> Result<()> {
        if !self.read {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "cannot reset a body stream set open for writing",
            )
            .into());
        }

        let Self {
            streams,
            rules_checksum,
            tag,
            ..
        } = self;
        for kind in StreamKind::ALL {
            if let Some(stream) = streams[kind.index()].as_mut() {
                stream.rewind()?;
                check_leading(kind, stream, rules_checksum, tag)?;
            }
        }
        self.preload()
    }

    /// Push buffered writes to disk. The set stays open.
    pub fn flush(&mut self) -> Result<()> {
        for stream in self.streams.iter_mut().flatten() {
            stream.flush()?;
        }
        Ok(())
    }

    /// Release every stream handle. A write set is sealed first, so all
    /// five files exist afterwards. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if !self.read {
            for kind in StreamKind::ALL {
                self.writer(kind)?;
            }
        }
        self.flush()?;
        self.release();
        debug!(prefix = %self.prefix.display(), "closed body");
        Ok(())
    }

    /// Close without sealing and remove every file.
    pub fn delete(&mut self) -> Result<()> {
        self.release();
        self.remove_files()?;
        debug!(prefix = %self.prefix.display(), "deleted body");
        Ok(())
    }

    /// A new set over the same path in the same mode, with its own
    /// position. Cloning a write set starts the body over.
    pub fn try_clone(&self) -> Result<Self> {
        if self.read {
            Self::open(self.prefix.clone(), self.rules_checksum)
        } else {
            Self::create(self.prefix.clone(), self.rules_checksum, self.tag)
        }
    }

    /// Close (sealing a write set) and open the same body for reading.
    /// The auto-delete setting carries over.
    pub fn reopen_for_read(&mut self) -> Result<()> {
        self.close()?;
        let mut fresh = Self::open(self.prefix.clone(), self.rules_checksum)?;
        fresh.auto_delete = self.auto_delete;
        self.auto_delete = false;
        *self = fresh;
        Ok(())
    }

    fn release(&mut self) {
        self.streams = Default::default();
        self.inputs.clear();
        self.outputs.clear();
        self.kernels_in.clear();
        self.kernels_out.clear();
        self.closed = true;
    }

    fn remove_files(&self) -> Result<()> {
        for kind in StreamKind::ALL {
            remove_if_exists(&self.path_for(kind))?;
        }
        Ok(())
    }

    fn preload(&mut self) -> Result<()> {
        load(&mut self.streams, StreamKind::Input, &mut self.inputs)?;
        load(&mut self.streams, StreamKind::Output, &mut self.outputs)?;
        load(&mut self.streams, StreamKind::KernelIn, &mut self.kernels_in)?;
        load(&mut self.streams, StreamKind::KernelOut, &mut self.kernels_out)
    }

    /// The append handle for `kind`, creating the stream on first use.
    fn writer(&mut self, kind: StreamKind) -> Result<&mut BufWriter<File>> {
        if self.read {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "body stream set is open for reading",
            )
            .into());
        }
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "body stream set is closed").into());
        }

        let idx = kind.index();
        if self.streams[idx].is_none() {
            let path = self.path_for(kind);
            let mut stream = KindStream::create(&path)?;
            if let Some(w) = stream.writer() {
                if kind == StreamKind::Header {
                    codec::write_hash(w, &self.rules_checksum)?;
                }
                codec::write_hash(w, self.tag.as_hash())?;
            }
            debug!(kind = %kind, path = %path.display(), "created body stream");
            self.streams[idx] = Some(stream);
        }

        self.streams[idx]
            .as_mut()
            .and_then(|s| s.writer())
            .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "stream is not writable").into())
    }

    fn append<T: Serialize>(&mut self, kind: StreamKind, value: &T) -> Result<()> {
        let w = self.writer(kind)?;
        codec::write_record(w, value)
    }

    fn header_reader(&mut self) -> Result<&mut BufReader<File>> {
        self.streams[StreamKind::Header.index()]
            .as_mut()
            .and_then(|s| s.reader())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "header stream is not open for reading").into())
    }
}

/// Read and verify the leading hashes of a freshly opened or rewound
/// stream. Reading the header stream sets `tag`.
fn check_leading(
    kind: StreamKind,
    stream: &mut KindStream,
    rules_checksum: &Hash,
    tag: &mut ContentTag,
) -> Result<()> {
    let Some(r) = stream.reader() else {
        return Ok(());
    };

    let found = codec::read_hash(r)?;
    if kind == StreamKind::Header {
        if found != *rules_checksum {
            warn!(expected = %rules_checksum, found = %found, "body written under different rules");
            return Err(BodyError::FormatMismatch {
                expected: *rules_checksum,
                found,
            });
        }
        *tag = ContentTag::from_hash(codec::read_hash(r)?);
    } else if found != *tag.as_hash() {
        warn!(kind = %kind, expected = %tag, found = %found, "body stream content tag mismatch");
        return Err(BodyError::TagMismatch {
            kind,
            expected: *tag.as_hash(),
            found,
        });
    }
    Ok(())
}

/// Decode the next element of `kind` into its lookahead.
fn load<T: DeserializeOwned>(
    streams: &mut [Option<KindStream>; 5],
    kind: StreamKind,
    slot: &mut Lookahead<T>,
) -> Result<()> {
    let next = match streams[kind.index()].as_mut().and_then(|s| s.reader()) {
        Some(r) => codec::read_record(r, kind)?,
        None => None,
    };
    slot.load(next);
    Ok(())
}

impl Drop for BodyStreamSet {
    fn drop(&mut self) {
        if self.auto_delete {
            if let Err(e) = self.delete() {
                warn!(prefix = %self.prefix.display(), error = %e, "failed to delete body on drop");
            }
        }
    }
}

impl std::fmt::Debug for BodyStreamSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyStreamSet")
            .field("prefix", &self.prefix)
            .field("tag", &self.tag)
            .field("read", &self.read)
            .field("closed", &self.closed)
            .field("auto_delete", &self.auto_delete)
            .finish()
    }
}

impl TxReader for BodyStreamSet {
    fn reset(&mut self) -> Result<()> {
        BodyStreamSet::reset(self)
    }

    fn input(&self) -> Option<&Input> {
        self.inputs.current()
    }

    fn output(&self) -> Option<&Output> {
        self.outputs.current()
    }

    fn kernel_in(&self) -> Option<&Kernel> {
        self.kernels_in.current()
    }

    fn kernel_out(&self) -> Option<&Kernel> {
        self.kernels_out.current()
    }

    fn next_input(&mut self) -> Result<()> {
        load(&mut self.streams, StreamKind::Input, &mut self.inputs)
    }

    fn next_output(&mut self) -> Result<()> {
        load(&mut self.streams, StreamKind::Output, &mut self.outputs)
    }

    fn next_kernel_in(&mut self) -> Result<()> {
        load(&mut self.streams, StreamKind::KernelIn, &mut self.kernels_in)
    }

    fn next_kernel_out(&mut self) -> Result<()> {
        load(&mut self.streams, StreamKind::KernelOut, &mut self.kernels_out)
    }
}

impl TxWriter for BodyStreamSet {
    fn write_input(&mut self, v: &Input) -> Result<()> {
        self.append(StreamKind::Input, v)
    }

    fn write_output(&mut self, v: &Output) -> Result<()> {
        self.append(StreamKind::Output, v)
    }

    fn write_kernel_in(&mut self, v: &Kernel) -> Result<()> {
        self.append(StreamKind::KernelIn, v)
    }

    fn write_kernel_out(&mut self, v: &Kernel) -> Result<()> {
        self.append(StreamKind::KernelOut, v)
    }
}

impl MacroReader for BodyStreamSet {
    fn get_start(&mut self) -> Result<(BodySummary, SequencePrefix)> {
        let r = self.header_reader()?;
        let summary = codec::read_record(r, StreamKind::Header)?;
        let prefix = codec::read_record(r, StreamKind::Header)?;
        match (summary, prefix) {
            (Some(summary), Some(prefix)) => Ok((summary, prefix)),
            _ => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "header stream ends before the start records",
            )
            .into()),
        }
    }

    fn get_next_header(&mut self) -> Result<Option<SequenceElement>> {
        let r = self.header_reader()?;
        codec::read_record(r, StreamKind::Header)
    }
}

impl MacroWriter for BodyStreamSet {
    fn put_start(&mut self, summary: &BodySummary, prefix: &SequencePrefix) -> Result<()> {
        self.append(StreamKind::Header, summary)?;
        self.append(StreamKind::Header, prefix)
    }

    fn put_next_header(&mut self, elem: &SequenceElement) -> Result<()> {
        self.append(StreamKind::Header, elem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroblock_core::{Commitment, DifficultyRange, HeightRange, Rules};

    fn summary() -> BodySummary {
        BodySummary {
            height: HeightRange::new(1, 1),
            difficulty: DifficultyRange::new(1, 1),
            subsidy: 0,
            subsidy_closed: false,
        }
    }

    fn rules() -> Hash {
        Rules::default().checksum()
    }

    fn tag() -> ContentTag {
        ContentTag::derive(&rules(), &summary())
    }

    #[test]
    fn test_lazy_streams_and_sealing() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("b");

        let mut set = BodyStreamSet::create(&prefix, rules(), tag()).unwrap();
        set.write_input(&Input::new(Commitment::new([1; 32], false), 1)).unwrap();
        assert!(set.path_for(StreamKind::Input).exists());
        assert!(!set.path_for(StreamKind::Output).exists());

        set.close().unwrap();
        for kind in StreamKind::ALL {
            assert!(set.path_for(kind).exists(), "{kind} not sealed");
        }
        set.close().unwrap();
    }

    #[test]
    fn test_write_after_close_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = BodyStreamSet::create(dir.path().join("b"), rules(), tag()).unwrap();
        set.close().unwrap();
        let err = set.write_input(&Input::new(Commitment::new([1; 32], false), 1));
        assert!(matches!(err, Err(BodyError::Io(_))));
    }

    #[test]
    fn test_reset_on_write_set_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = BodyStreamSet::create(dir.path().join("b"), rules(), tag()).unwrap();
        assert!(matches!(set.reset(), Err(BodyError::Io(e)) if e.kind() == io::ErrorKind::Unsupported));
    }

    #[test]
    fn test_get_start_without_header_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("b");
        let mut set = BodyStreamSet::create(&prefix, rules(), tag()).unwrap();
        set.close().unwrap();

        let mut read = BodyStreamSet::open(&prefix, rules()).unwrap();
        assert!(matches!(read.get_start(), Err(BodyError::Io(_))));
    }
}
