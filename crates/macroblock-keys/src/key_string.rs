//! Authenticated text capsule for key material.
//!
//! Binary layout before base64 encoding:
//!
//! ```text
//! [ MAC (32) | code (1) | payload (fixed per code) | metadata (rest) ]
//!             \____________ AES-256-CTR encrypted ______________/
//! ```
//!
//! The MAC is HMAC-SHA256 over the plaintext of the encrypted region. Both
//! the cipher and the MAC are keyed with the capsule secret.

use std::borrow::Cow;

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::cipher::{self, MAC_LEN};
use crate::error::{KeyError, Result};
use crate::packed::{KdfPublic, KdfSecret};

/// Type discriminator stored after the MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyCode {
    /// Secret key-derivation material.
    Secret = b's',
    /// Public key-derivation material.
    Public = b'P',
}

impl KeyCode {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Exports and imports key material under a 32-byte secret, carrying a
/// free-form metadata string alongside.
///
/// Metadata is kept as raw bytes so that capsules carrying non-UTF-8
/// metadata still import. [`meta`](Self::meta) renders it lossily.
pub struct KeyString {
    secret: Zeroizing<[u8; 32]>,
    meta: Vec<u8>,
}

impl KeyString {
    pub fn new(secret: [u8; 32]) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            meta: Vec::new(),
        }
    }

    /// A capsule key from fresh randomness.
    pub fn generate() -> Self {
        let mut secret = Zeroizing::new([0u8; 32]);
        rand::thread_rng().fill_bytes(secret.as_mut());
        Self {
            secret,
            meta: Vec::new(),
        }
    }

    /// Secret = SHA-256(password).
    pub fn from_password(password: &[u8]) -> Self {
        let mut secret = Zeroizing::new([0u8; 32]);
        secret.copy_from_slice(&Sha256::digest(password));
        Self {
            secret,
            meta: Vec::new(),
        }
    }

    pub fn with_meta(mut self, meta: impl Into<Vec<u8>>) -> Self {
        self.meta = meta.into();
        self
    }

    pub fn meta(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.meta)
    }

    pub fn meta_bytes(&self) -> &[u8] {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: impl Into<Vec<u8>>) {
        self.meta = meta.into();
    }

    /// Seal `payload` and the current metadata into a capsule string.
    pub fn export(&self, payload: &[u8], code: KeyCode) -> Result<String> {
        let mut buf = Zeroizing::new(Vec::with_capacity(MAC_LEN + 1 + payload.len() + self.meta.len()));
        buf.resize(MAC_LEN, 0);
        buf.push(code.as_byte());
        buf.extend_from_slice(payload);
        buf.extend_from_slice(&self.meta);

        let (mac_slot, body) = buf.split_at_mut(MAC_LEN);
        let tag = cipher::mac(self.secret.as_ref(), body)?;
        cipher::xcrypt(&self.secret, body);
        mac_slot.copy_from_slice(&tag);

        Ok(general_purpose::STANDARD.encode(buf.as_slice()))
    }

    /// Open a capsule holding a `payload_len`-byte payload of type `code`.
    ///
    /// On success the capsule's metadata replaces this instance's.
    pub fn import(&mut self, text: &str, payload_len: usize, code: KeyCode) -> Result<Zeroizing<Vec<u8>>> {
        let mut buf = Zeroizing::new(
            general_purpose::STANDARD
                .decode(text.trim())
                .map_err(|e| KeyError::Decode(e.to_string()))?,
        );
        if buf.len() < MAC_LEN + 1 + payload_len {
            return Err(KeyError::Decode(format!(
                "key string holds {} bytes, need at least {}",
                buf.len(),
                MAC_LEN + 1 + payload_len
            )));
        }

        let (stored_mac, body) = buf.split_at_mut(MAC_LEN);
        cipher::xcrypt(&self.secret, body);
        cipher::verify_mac(self.secret.as_ref(), body, stored_mac)?;
        if body[0] != code.as_byte() {
            return Err(KeyError::Authentication);
        }

        let (payload, meta) = body[1..].split_at(payload_len);
        self.meta = meta.to_vec();
        Ok(Zeroizing::new(payload.to_vec()))
    }

    pub fn export_secret(&self, kdf: &KdfSecret) -> Result<String> {
        let packed = Zeroizing::new(kdf.to_packed());
        self.export(packed.as_ref(), KeyCode::Secret)
    }

    pub fn export_public(&self, kdf: &KdfPublic) -> Result<String> {
        self.export(&kdf.to_packed(), KeyCode::Public)
    }

    pub fn import_secret(&mut self, text: &str) -> Result<KdfSecret> {
        let payload = self.import(text, KdfSecret::PACKED_LEN, KeyCode::Secret)?;
        KdfSecret::from_packed(&payload)
    }

    pub fn import_public(&mut self, text: &str) -> Result<KdfPublic> {
        let payload = self.import(text, KdfPublic::PACKED_LEN, KeyCode::Public)?;
        KdfPublic::from_packed(&payload)
    }
}

impl std::fmt::Debug for KeyString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyString").field("meta", &self.meta()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroblock_core::Commitment;
    use proptest::prelude::*;

    fn raw(text: &str) -> Vec<u8> {
        general_purpose::STANDARD.decode(text).unwrap()
    }

    fn encode(bytes: &[u8]) -> String {
        general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_secret_round_trip_with_meta() {
        let kdf = KdfSecret::new([5; 32], [6; 32]);
        let ks = KeyString::from_password(b"hunter2").with_meta("wallet #1");
        let text = ks.export_secret(&kdf).unwrap();

        let mut other = KeyString::from_password(b"hunter2");
        assert_eq!(other.import_secret(&text).unwrap(), kdf);
        assert_eq!(other.meta(), "wallet #1");
    }

    #[test]
    fn test_public_round_trip() {
        let kdf = KdfPublic::new([8; 32], Commitment::new([9; 32], false));
        let ks = KeyString::new([1; 32]);
        let text = ks.export_public(&kdf).unwrap();

        let mut other = KeyString::new([1; 32]);
        assert_eq!(other.import_public(&text).unwrap(), kdf);
        assert_eq!(other.meta(), "");
    }

    #[test]
    fn test_layout_length() {
        let ks = KeyString::new([1; 32]).with_meta("abc");
        let text = ks.export(&[0u8; 10], KeyCode::Secret).unwrap();
        assert_eq!(raw(&text).len(), MAC_LEN + 1 + 10 + 3);
    }

    #[test]
    fn test_wrong_secret_fails_authentication() {
        let text = KeyString::new([1; 32]).export(b"payload", KeyCode::Secret).unwrap();
        let mut other = KeyString::new([2; 32]);
        assert_eq!(other.import(&text, 7, KeyCode::Secret), Err(KeyError::Authentication));
    }

    #[test]
    fn test_wrong_code_rejected() {
        let kdf = KdfSecret::new([5; 32], [6; 32]);
        let mut ks = KeyString::new([1; 32]);
        let text = ks.export_secret(&kdf).unwrap();
        assert_eq!(
            ks.import(&text, KdfSecret::PACKED_LEN, KeyCode::Public),
            Err(KeyError::Authentication)
        );
    }

    #[test]
    fn test_truncated_capsule() {
        let mut ks = KeyString::new([1; 32]);
        let text = ks.export(&[7u8; 64], KeyCode::Secret).unwrap();
        let bytes = raw(&text);

        let short = encode(&bytes[..MAC_LEN + 10]);
        assert!(matches!(ks.import(&short, 64, KeyCode::Secret), Err(KeyError::Decode(_))));

        // Long enough for a smaller payload, but the MAC no longer matches.
        let cut = encode(&bytes[..bytes.len() - 1]);
        assert_eq!(ks.import(&cut, 32, KeyCode::Secret), Err(KeyError::Authentication));
    }

    #[test]
    fn test_invalid_base64() {
        let mut ks = KeyString::new([1; 32]);
        assert!(matches!(ks.import("not*base64!", 1, KeyCode::Secret), Err(KeyError::Decode(_))));
    }

    #[test]
    fn test_failed_import_keeps_meta() {
        let mut ks = KeyString::new([1; 32]).with_meta("keep");
        let text = KeyString::new([2; 32]).with_meta("other").export(b"x", KeyCode::Public).unwrap();
        assert!(ks.import(&text, 1, KeyCode::Public).is_err());
        assert_eq!(ks.meta(), "keep");
    }

    #[test]
    fn test_non_utf8_meta_survives_import() {
        let raw_meta = vec![0xff, b'w', 0xfe, 0x00];
        let text = KeyString::new([3; 32])
            .with_meta(raw_meta.clone())
            .export(b"payload", KeyCode::Public)
            .unwrap();

        let mut ks = KeyString::new([3; 32]);
        assert_eq!(ks.import(&text, 7, KeyCode::Public).unwrap().as_slice(), b"payload");
        assert_eq!(ks.meta_bytes(), raw_meta.as_slice());
        assert!(ks.meta().contains('w'));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            secret in any::<[u8; 32]>(),
            payload in prop::collection::vec(any::<u8>(), 0..80),
            meta in "[a-zA-Z0-9 ]{0,24}",
        ) {
            let ks = KeyString::new(secret).with_meta(meta.clone());
            let text = ks.export(&payload, KeyCode::Secret).unwrap();

            let mut back = KeyString::new(secret);
            let got = back.import(&text, payload.len(), KeyCode::Secret).unwrap();
            prop_assert_eq!(got.as_slice(), payload.as_slice());
            prop_assert_eq!(back.meta(), meta.as_str());
        }

        #[test]
        fn prop_any_bit_flip_is_rejected(
            payload in prop::collection::vec(any::<u8>(), 1..40),
            pos in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let secret = [0x42u8; 32];
            let text = KeyString::new(secret).with_meta("m").export(&payload, KeyCode::Secret).unwrap();
            let mut bytes = raw(&text);
            let i = pos.index(bytes.len());
            bytes[i] ^= 1 << bit;

            let mut ks = KeyString::new(secret);
            prop_assert_eq!(
                ks.import(&encode(&bytes), payload.len(), KeyCode::Secret),
                Err(KeyError::Authentication)
            );
        }

        #[test]
        fn prop_text_bit_flip_is_rejected(
            payload in prop::collection::vec(any::<u8>(), 1..40),
            pos in any::<prop::sample::Index>(),
            bit in 0u8..7,
        ) {
            let secret = [0x42u8; 32];
            let text = KeyString::new(secret).with_meta("m").export(&payload, KeyCode::Secret).unwrap();
            let mut chars = text.into_bytes();
            let i = pos.index(chars.len());
            chars[i] ^= 1 << bit;
            // Only the low seven bits are flipped, so the text stays ASCII.
            let flipped = String::from_utf8(chars).unwrap();

            let mut ks = KeyString::new(secret);
            let result = ks.import(&flipped, payload.len(), KeyCode::Secret);
            if general_purpose::STANDARD.decode(flipped.trim()).is_ok() {
                prop_assert_eq!(result, Err(KeyError::Authentication));
            } else {
                prop_assert!(matches!(result, Err(KeyError::Decode(_))));
            }
        }
    }
}
