//! Scene encoder for the Monocle display
//!
//! This crate turns drawing calls into the command buffers the FPGA display
//! controller consumes:
//! - [`DisplayObject`] is the closed set of things that can be shown
//! - [`ColorTable`] deduplicates colors into a 128-entry palette
//! - the vector, text and sprite encoders each produce one layer
//! - [`Display`] composes a frame and writes the layers in a fixed order
//!
//! # Frame pipeline
//!
//! ```text
//! objects ──flatten──┬─ shapes  ──► palette + vector records ──► 0x4402, 0x4403
//!                    ├─ text    ──► page select + palette + records ──► 0x4301..0x4303
//!                    └─ sprites ──► layout + placements + commit ──► 0x4502, 0x4503, 0x4501
//! ```
//!
//! Every layer is encoded and validated before the first register write,
//! so a rejected frame leaves the screen untouched.
//!
//! Text can take two routes: the controller's native fixed-cell text layer
//! ([`Display::show`]), or glyphs rendered from a [`monocle_font::Font`]
//! and uploaded as sprites ([`Display::show_with_font`]).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod color;
pub mod composer;
pub mod config;
pub mod error;
pub mod fbtext;
pub mod glyph_sprites;
pub mod object;
pub mod shape;
pub mod sprite;
pub mod text;
pub mod vector;

pub use color::ColorTable;
pub use composer::{Display, FrameState, SharedDisplay};
pub use config::{CellMetrics, DisplayConfig};
pub use error::DisplayError;
pub use object::DisplayObject;
pub use shape::{Line, Polygon, Polyline, Rectangle};
pub use sprite::{Checkpoint, Sprite, SpriteMemory, SpriteSource};
pub use text::{Justify, Text};
