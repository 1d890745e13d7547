//! Monocle FPGA Display Protocol
//!
//! This crate defines the byte layout of every command the host writes to
//! the display controller's memory-mapped registers. It has no knowledge of
//! shapes or fonts; the display crate builds buffers out of these records.
//!
//! # Protocol Overview
//!
//! Each layer has its own registers and buffer format. Multi-byte integers
//! are big-endian. Most buffers start with a two-byte reserved prefix
//! (the write offset inside the controller's buffer, always zero here):
//!
//! ```text
//! palette    ┌──────┬──────────────────────┐
//!            │ 0000 │ R G B  × entries     │
//!            └──────┴──────────────────────┘
//! vector     ┌──────┬──────────────────────┬────┐
//!            │ 0000 │ record × shapes      │ 00 │
//!            └──────┴──────────────────────┴────┘
//! text       ┌──────────────────────────────┬──────────┐
//!            │ [xy:3 color:1 len:1 code*]*  │ FF FF FF │
//!            └──────────────────────────────┴──────────┘
//! sprites    ┌──────┬──────────────────────┐
//!  layout    │ 0000 │ descriptor:4 × ids   │
//!            └──────┴──────────────────────┘
//!  placement ┌──────┬──────────────────────┬────────────────┐
//!            │ 0000 │ placement:5 × uses   │ 00 FF FF FF FF │
//!            └──────┴──────────────────────┴────────────────┘
//! ```
//!
//! The device limits a single register transfer to 255 bytes; longer
//! buffers are streamed as consecutive writes to the same register.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod palette;
pub mod registers;
pub mod sprite;
pub mod text;
pub mod vector;

pub use palette::{MAX_PALETTE_ENTRIES, PALETTE_BUFFER_LEN};
pub use sprite::{SpriteDescriptor, SpritePlacement, SPRITE_CHUNK_LEN};
pub use text::{TextHeader, TextRecords, TEXT_END};
pub use vector::{RecordHeader, ShapeKind, VECTOR_END};

/// Reserved two-byte prefix opening palette, vector and sprite buffers
pub const BUFFER_PREFIX: [u8; 2] = [0x00, 0x00];
