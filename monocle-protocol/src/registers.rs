//! Command register addresses
//!
//! Addresses are part of the controller's ABI and must match the FPGA
//! bitstream bit-for-bit.

/// Chip identification, reads back `b"Mncl"` on a Monocle controller
pub const CHIP_ID: u16 = 0x0001;

/// Expected contents of [`CHIP_ID`]
pub const CHIP_ID_VALUE: [u8; 4] = *b"Mncl";

// Native text layer
/// Selects the text page the next text buffer is written into
pub const TEXT_PAGE_SELECT: u16 = 0x4301;
/// Palette used by text records
pub const TEXT_PALETTE: u16 = 0x4302;
/// Text record buffer
pub const TEXT_DATA: u16 = 0x4303;

// Vector graphics layer
/// Palette used by vector records
pub const VECTOR_PALETTE: u16 = 0x4402;
/// Vector record buffer
pub const VECTOR_DATA: u16 = 0x4403;

// Sprite layer
/// Commit strobe: display the last uploaded layout and placements
pub const SPRITE_SHOW: u16 = 0x4501;
/// Sprite layout descriptors, indexed by sprite id
pub const SPRITE_LAYOUT: u16 = 0x4502;
/// Sprite placements
pub const SPRITE_PLACEMENT: u16 = 0x4503;
/// Sprite bitmap upload, one chunk per write
pub const SPRITE_DATA: u16 = 0x4504;
