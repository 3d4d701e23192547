//! Packed forms of key-derivation material carried inside capsules.

use rand::RngCore;
use zeroize::Zeroize;

use macroblock_core::Commitment;

use crate::error::{KeyError, Result};

/// Secret key-derivation material: the derivation secret and the cofactor
/// scalar. Wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct KdfSecret {
    pub secret: [u8; 32],
    pub cofactor: [u8; 32],
}

impl KdfSecret {
    /// Length of [`to_packed`](Self::to_packed) output.
    pub const PACKED_LEN: usize = 64;

    pub fn new(secret: [u8; 32], cofactor: [u8; 32]) -> Self {
        Self { secret, cofactor }
    }

    /// Generate fresh random material.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut kdf = Self::new([0u8; 32], [0u8; 32]);
        rng.fill_bytes(&mut kdf.secret);
        rng.fill_bytes(&mut kdf.cofactor);
        kdf
    }

    pub fn to_packed(&self) -> [u8; Self::PACKED_LEN] {
        let mut out = [0u8; Self::PACKED_LEN];
        out[..32].copy_from_slice(&self.secret);
        out[32..].copy_from_slice(&self.cofactor);
        out
    }

    pub fn from_packed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::PACKED_LEN {
            return Err(KeyError::InvalidKey(format!(
                "secret kdf must be {} bytes, got {}",
                Self::PACKED_LEN,
                bytes.len()
            )));
        }
        let mut kdf = Self::new([0u8; 32], [0u8; 32]);
        kdf.secret.copy_from_slice(&bytes[..32]);
        kdf.cofactor.copy_from_slice(&bytes[32..]);
        Ok(kdf)
    }
}

impl Drop for KdfSecret {
    fn drop(&mut self) {
        self.secret.zeroize();
        self.cofactor.zeroize();
    }
}

impl std::fmt::Debug for KdfSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KdfSecret(..)")
    }
}

/// Public key-derivation material: the derivation secret and the public
/// cofactor point. Lets a holder derive public keys only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfPublic {
    pub secret: [u8; 32],
    pub point: Commitment,
}

impl KdfPublic {
    /// Secret, point x coordinate, point parity byte.
    pub const PACKED_LEN: usize = 65;

    pub fn new(secret: [u8; 32], point: Commitment) -> Self {
        Self { secret, point }
    }

    pub fn to_packed(&self) -> [u8; Self::PACKED_LEN] {
        let mut out = [0u8; Self::PACKED_LEN];
        out[..32].copy_from_slice(&self.secret);
        out[32..64].copy_from_slice(&self.point.x);
        out[64] = u8::from(self.point.y);
        out
    }

    pub fn from_packed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::PACKED_LEN {
            return Err(KeyError::InvalidKey(format!(
                "public kdf must be {} bytes, got {}",
                Self::PACKED_LEN,
                bytes.len()
            )));
        }
        let y = match bytes[64] {
            0 => false,
            1 => true,
            other => return Err(KeyError::InvalidKey(format!("bad point parity byte {other}"))),
        };
        let mut secret = [0u8; 32];
        let mut x = [0u8; 32];
        secret.copy_from_slice(&bytes[..32]);
        x.copy_from_slice(&bytes[32..64]);
        Ok(Self::new(secret, Commitment::new(x, y)))
    }
}
