//! Palette entries
//!
//! The controller resolves color indices through a palette of at most
//! [`MAX_PALETTE_ENTRIES`] RGB triples.

use crate::BUFFER_PREFIX;

/// Hardware palette capacity
pub const MAX_PALETTE_ENTRIES: usize = 128;

/// Bytes per palette entry
pub const ENTRY_LEN: usize = 3;

/// Size of a full palette upload (prefix + every entry)
pub const PALETTE_BUFFER_LEN: usize = BUFFER_PREFIX.len() + MAX_PALETTE_ENTRIES * ENTRY_LEN;

/// Encode a `0xRRGGBB` color as its three wire bytes
pub const fn encode_rgb(color: u32) -> [u8; ENTRY_LEN] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Decode three wire bytes back into `0xRRGGBB`
pub const fn decode_rgb(bytes: [u8; ENTRY_LEN]) -> u32 {
    (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32
}
