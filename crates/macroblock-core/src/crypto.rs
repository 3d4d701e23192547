//! Opaque cryptographic values used by block elements.
//!
//! Commitments, scalars and signatures are produced and verified elsewhere.
//! Here they are fixed-size values with a total order and a hex rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte Blake3 hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// Size of the raw value in bytes.
    pub const LEN: usize = 32;

    /// The zero hash (sentinel value).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Compute the Blake3 hash of the given data.
    pub fn digest(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<blake3::Hash> for Hash {
    fn from(h: blake3::Hash) -> Self {
        Self(*h.as_bytes())
    }
}

/// Domain-separated Blake3 hasher for structured values.
///
/// Every multi-field hash in this crate goes through here so that the
/// field encoding (little-endian integers, presence flags) stays uniform.
pub struct HashWriter(blake3::Hasher);

impl HashWriter {
    /// Start a hash under the given domain string.
    pub fn new(domain: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain.as_bytes());
        hasher.update(b":");
        Self(hasher)
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.0.update(data);
        self
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.0.update(&v.to_le_bytes());
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.0.update(&[v]);
        self
    }

    pub fn flag(&mut self, v: bool) -> &mut Self {
        self.u8(u8::from(v))
    }

    pub fn hash(&mut self, h: &Hash) -> &mut Self {
        self.bytes(&h.0)
    }

    pub fn finalize(&self) -> Hash {
        self.0.finalize().into()
    }
}

/// A curve point in compressed form: x coordinate plus y parity.
///
/// Pedersen commitments and kernel excesses both use this representation.
/// Ordered by `(x, y)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Commitment {
    pub x: [u8; 32],
    pub y: bool,
}

impl Commitment {
    /// Create from an x coordinate and y parity.
    pub const fn new(x: [u8; 32], y: bool) -> Self {
        Self { x, y }
    }

    /// Convert to hex string (33 bytes, parity byte first).
    pub fn to_hex(&self) -> String {
        let mut buf = [0u8; 33];
        buf[0] = u8::from(self.y);
        buf[1..].copy_from_slice(&self.x);
        hex::encode(buf)
    }

    pub(crate) fn write_to(&self, w: &mut HashWriter) {
        w.bytes(&self.x).flag(self.y);
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", &self.to_hex()[..18])
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..18])
    }
}

/// A 32-byte field scalar (blinding offsets, signature components).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Scalar(pub [u8; 32]);

impl Scalar {
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({}...)", &hex::encode(self.0)[..16])
    }
}

/// A Schnorr signature: challenge `e` and response `k`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Signature {
    pub e: Scalar,
    pub k: Scalar,
}

impl Signature {
    pub const fn new(e: Scalar, k: Scalar) -> Self {
        Self { e, k }
    }

    pub(crate) fn write_to(&self, w: &mut HashWriter) {
        w.bytes(&self.e.0).bytes(&self.k.0);
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &hex::encode(self.e.0)[..16])
    }
}
