//! # Macroblock Store
//!
//! Storage for block bodies and macro-bodies. A body is kept as five
//! sequential streams (header, inputs, outputs, consumed kernels, emitted
//! kernels) so that large bodies can be read and merged without loading
//! them whole.
//!
//! ## Key Types
//!
//! - [`BodyStreamSet`] - The five per-kind files of one body
//! - [`MemoryBody`] - The same reader/writer surface, kept in memory
//! - [`Lookahead`] - Two-slot current-element buffer used by the cursors
//!
//! ## Usage
//!
//! ```rust,no_run
//! use macroblock_core::{CancelFlag, ContentTag, Rules, TxWriter};
//! use macroblock_store::BodyStreamSet;
//!
//! fn example(tag: ContentTag) -> macroblock_core::Result<()> {
//!     let rules = Rules::default().checksum();
//!     let mut a = BodyStreamSet::open("blocks/a", rules)?;
//!     let mut b = BodyStreamSet::open("blocks/b", rules)?;
//!
//!     let mut out = BodyStreamSet::create("blocks/ab", rules, tag)?;
//!     out.combine_pair(&mut a, &mut b, &CancelFlag::new())?;
//!     out.close()
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Verified on open**: the header carries the rules checksum, every
//!   stream carries the body's content tag, and a mismatch fails the open
//! - **Lazy writes**: a stream file is created on its first record
//! - **Sealed on close**: a closed write set always has all five files

pub mod body_set;
pub mod codec;
pub mod lookahead;
pub mod memory;
pub mod stream;

pub use body_set::BodyStreamSet;
pub use lookahead::Lookahead;
pub use memory::MemoryBody;
pub use stream::stream_path;
