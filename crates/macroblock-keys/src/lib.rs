//! # Macroblock Keys
//!
//! Export and import of key-derivation material as a compact,
//! authenticated text string.
//!
//! ## Overview
//!
//! A [`KeyString`] holds a 32-byte secret and a metadata string. Exporting
//! packs the key material and metadata behind a one-byte type code,
//! authenticates the plaintext with HMAC-SHA256, encrypts it with AES-256
//! in counter mode and base64-encodes the result. Importing reverses the
//! steps and rejects anything whose MAC or type code does not match.
//!
//! ## Usage
//!
//! ```rust
//! use macroblock_keys::{KdfSecret, KeyString};
//!
//! let kdf = KdfSecret::generate();
//! let text = KeyString::from_password(b"correct horse")
//!     .with_meta("main wallet")
//!     .export_secret(&kdf)
//!     .unwrap();
//!
//! let mut ks = KeyString::from_password(b"correct horse");
//! let back = ks.import_secret(&text).unwrap();
//! assert_eq!(back, kdf);
//! assert_eq!(ks.meta(), "main wallet");
//! ```
//!
//! ## Security Notes
//!
//! The cipher and the MAC share one key, and the MAC covers the plaintext
//! rather than the ciphertext. The format is kept as is so that existing
//! exported strings stay readable.

pub mod cipher;
pub mod error;
pub mod key_string;
pub mod packed;

pub use error::{KeyError, Result};
pub use key_string::{KeyCode, KeyString};
pub use packed::{KdfPublic, KdfSecret};
