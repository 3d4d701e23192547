//! Record encoding inside per-kind streams.
//!
//! Leading hashes are raw 32-byte values. Everything after them is a
//! sequence of self-delimiting CBOR records, so a stream can be decoded one
//! record at a time and end-of-stream is simply "no bytes left".

use std::io::{BufRead, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use macroblock_core::{BodyError, Hash, Result, StreamKind};

/// Write a raw hash.
pub fn write_hash<W: Write>(w: &mut W, h: &Hash) -> Result<()> {
    w.write_all(h.as_bytes())?;
    Ok(())
}

/// Read a raw hash. A short stream is an I/O error.
pub fn read_hash<R: Read>(r: &mut R) -> Result<Hash> {
    let mut buf = [0u8; Hash::LEN];
    r.read_exact(&mut buf)?;
    Ok(Hash::from_bytes(buf))
}

/// Append one CBOR record.
pub fn write_record<T: Serialize, W: Write>(w: &mut W, value: &T) -> Result<()> {
    ciborium::into_writer(value, w).map_err(|e| BodyError::Encoding(e.to_string()))
}

/// Decode the next record, or `None` if the stream is exhausted.
pub fn read_record<T: DeserializeOwned, R: BufRead>(r: &mut R, kind: StreamKind) -> Result<Option<T>> {
    if r.fill_buf()?.is_empty() {
        return Ok(None);
    }
    ciborium::from_reader(r)
        .map(Some)
        .map_err(|e| BodyError::Decoding {
            kind,
            reason: e.to_string(),
        })
}
