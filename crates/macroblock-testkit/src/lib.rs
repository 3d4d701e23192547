//! # Macroblock Testkit
//!
//! Testing utilities for macroblock bodies.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Merge vectors**: Named cut-through scenarios with expected results
//! - **Generators**: Proptest strategies for elements, bodies and header chains
//! - **Fixtures**: Deterministic elements and a temporary body directory
//!
//! ## Merge Vectors
//!
//! ```rust
//! use macroblock_testkit::vectors::verify_all_vectors;
//!
//! for (name, passed) in verify_all_vectors() {
//!     assert!(passed, "{name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use macroblock_testkit::generators::tx_base;
//!
//! proptest! {
//!     #[test]
//!     fn merged_body_is_sorted(a in tx_base(8), b in tx_base(8)) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use macroblock_testkit::fixtures::{header_chain, output, tx, BodyFixture};
//!
//! let fixture = BodyFixture::new();
//! let headers = header_chain(1);
//! fixture.write_block("b1", &headers[0], &tx(vec![], vec![output(1)], vec![]));
//! assert_eq!(fixture.read("b1").outputs().len(), 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{header_chain, BodyFixture};
pub use generators::tx_base;
pub use vectors::{all_vectors, run_vector, verify_all_vectors, MergeVector};
