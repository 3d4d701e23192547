//! Primitives behind the capsule: AES-256 in counter mode and HMAC-SHA256.
//!
//! Both are keyed with the same 32-byte secret. The initial counter is the
//! low 16 bytes of SHA-256(secret), incremented as a big-endian integer
//! after every block.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{KeyError, Result};

pub type HmacSha256 = Hmac<Sha256>;

/// Size of the MAC at the front of a capsule.
pub const MAC_LEN: usize = 32;

/// AES block size.
pub const BLOCK_LEN: usize = 16;

/// Initial counter block for `secret`.
pub fn counter_seed(secret: &[u8; 32]) -> [u8; BLOCK_LEN] {
    let digest = Sha256::digest(secret);
    let mut seed = [0u8; BLOCK_LEN];
    seed.copy_from_slice(&digest[digest.len() - BLOCK_LEN..]);
    seed
}

/// XOR `data` with the AES-256-CTR keystream for `key` starting at
/// `counter`. Applying it twice restores the input.
pub fn ctr_xor(key: &[u8; 32], counter: [u8; BLOCK_LEN], data: &mut [u8]) {
    let cipher = Aes256::new(GenericArray::from_slice(key));
    let mut ctr = u128::from_be_bytes(counter);

    for chunk in data.chunks_mut(BLOCK_LEN) {
        let mut block = GenericArray::from(ctr.to_be_bytes());
        cipher.encrypt_block(&mut block);
        for (b, k) in chunk.iter_mut().zip(block.iter()) {
            *b ^= k;
        }
        ctr = ctr.wrapping_add(1);
    }
}

/// Encrypt or decrypt a capsule body in place.
pub fn xcrypt(secret: &[u8; 32], data: &mut [u8]) {
    ctr_xor(secret, counter_seed(secret), data);
}

/// HMAC-SHA256 of `data` under `key`.
pub fn mac(key: &[u8], data: &[u8]) -> Result<[u8; MAC_LEN]> {
    let mut hmac = <HmacSha256 as Mac>::new_from_slice(key).map_err(|e| KeyError::InvalidKey(e.to_string()))?;
    hmac.update(data);
    Ok(hmac.finalize().into_bytes().into())
}

/// Constant-time check of `tag` against the MAC of `data`.
pub fn verify_mac(key: &[u8], data: &[u8], tag: &[u8]) -> Result<()> {
    let mut hmac = <HmacSha256 as Mac>::new_from_slice(key).map_err(|e| KeyError::InvalidKey(e.to_string()))?;
    hmac.update(data);
    hmac.verify_slice(tag).map_err(|_| KeyError::Authentication)
}
