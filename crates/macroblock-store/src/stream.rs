//! One per-kind file, opened either for reading or for appending.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use macroblock_core::StreamKind;

/// Path of the file holding `kind` for the body rooted at `prefix`.
///
/// The kind suffix is appended to the prefix as-is, so `blocks/000017`
/// yields `blocks/000017hd`, `blocks/000017ui` and so on.
pub fn stream_path(prefix: &Path, kind: StreamKind) -> PathBuf {
    let mut s = prefix.as_os_str().to_owned();
    s.push(kind.suffix());
    PathBuf::from(s)
}

pub(crate) enum KindStream {
    Read(BufReader<File>),
    Write(BufWriter<File>),
}

impl KindStream {
    pub fn open_read(path: &Path) -> io::Result<Self> {
        Ok(Self::Read(BufReader::new(File::open(path)?)))
    }

    /// Create or truncate.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::Write(BufWriter::new(file)))
    }

    pub fn rewind(&mut self) -> io::Result<()> {
        match self {
            Self::Read(r) => r.seek(SeekFrom::Start(0)).map(|_| ()),
            Self::Write(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "cannot rewind a stream open for writing",
            )),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(w) => {
                w.flush()?;
                w.get_ref().sync_data()
            }
        }
    }

    pub fn reader(&mut self) -> Option<&mut BufReader<File>> {
        match self {
            Self::Read(r) => Some(r),
            Self::Write(_) => None,
        }
    }

    pub fn writer(&mut self) -> Option<&mut BufWriter<File>> {
        match self {
            Self::Write(w) => Some(w),
            Self::Read(_) => None,
        }
    }
}

/// Remove a file, treating "already gone" as success.
pub(crate) fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
