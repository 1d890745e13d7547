//! Compact bitmap font container
//!
//! Fonts are stored as a small header, a sorted index of codepoint ranges,
//! and back-to-back cropped glyph bitmaps:
//!
//! ```text
//! ┌──────────────┬─────────────────┬──────────────────────────────────┐
//! │ HEIGHT  u32  │ INDEX_SIZE u32  │ record × (INDEX_SIZE / 8)        │
//! ├──────────────┴─────────────────┴──────────────────────────────────┤
//! │ record: START u24 │ COUNT u8 │ BLOCK_ADDRESS u32                  │
//! ├───────────────────────────────────────────────────────────────────┤
//! │ glyph × N: BEG_X u8 │ BEG_Y u8 │ LEN_X u8 │ LEN_Y u8 │ bits...    │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Looking up U+30F3 in a font with a record for `[U+3000, U+30FF)`:
//!
//! 1. Binary search the index for the record containing the codepoint
//! 2. Seek to the record's block (relative to the end of the index)
//! 3. Skip 0xF3 glyphs, each header telling how many bitmap bytes follow
//!
//! The codec never loads the index or the glyph data into memory: every
//! probe and skip is a seek on the [`ByteSource`](monocle_hal::ByteSource),
//! so it runs in constant RAM on the device.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod font;
pub mod glyph;
pub mod index;

#[cfg(any(test, feature = "std"))]
pub mod builder;

pub use font::{Font, FontError};
pub use glyph::{Glyph, GlyphSink};
pub use index::IndexRecord;

#[cfg(any(test, feature = "std"))]
pub use builder::{BuilderError, FontBuilder};
