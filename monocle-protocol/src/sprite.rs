//! Sprite layout, placement and bitmap upload records
//!
//! Sprite bitmaps live in device RAM and are addressed in 128-byte units.
//! A frame uploads one layout descriptor per sprite id, then one placement
//! per sprite instance on screen.

/// Bytes per bitmap upload chunk, also the device RAM allocation unit
pub const SPRITE_CHUNK_LEN: usize = 128;

/// Horizontal granularity of sprite widths in pixels
pub const WIDTH_UNIT: u16 = 32;

/// Widest sprite a descriptor can express (4-bit width in 32 px units)
pub const MAX_WIDTH: u16 = 0x0F * WIDTH_UNIT;

/// Tallest sprite a descriptor can express
pub const MAX_HEIGHT: u16 = 0xFF;

/// Highest addressable sprite RAM byte + 1 (20-bit address in chunk units)
pub const ADDRESS_SPACE: u32 = 0x10_0000 * SPRITE_CHUNK_LEN as u32;

/// Number of distinct sprite ids per frame (12-bit id)
pub const MAX_SPRITE_IDS: usize = 0x1000;

/// Terminates a placement buffer
pub const PLACEMENT_END: [u8; 5] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF];

/// Prefix of a bitmap upload chunk: the destination RAM address
pub fn chunk_header(address: u32) -> [u8; 4] {
    address.to_be_bytes()
}

/// Sprite layout descriptor: `width_units:4 | height:8 | address_units:20`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpriteDescriptor {
    /// Width in pixels (multiple of [`WIDTH_UNIT`])
    pub width: u16,
    /// Height in rows
    pub height: u16,
    /// Byte address in sprite RAM (multiple of [`SPRITE_CHUNK_LEN`])
    pub address: u32,
}

impl SpriteDescriptor {
    /// Encode the descriptor; out-of-range fields are masked to their width
    pub fn encode(&self) -> [u8; 4] {
        let width = u32::from(self.width / WIDTH_UNIT) & 0xF;
        let height = u32::from(self.height) & 0xFF;
        let address = (self.address / SPRITE_CHUNK_LEN as u32) & 0xF_FFFF;
        (width << 28 | height << 20 | address).to_be_bytes()
    }

    /// Decode a descriptor
    pub fn decode(bytes: [u8; 4]) -> Self {
        let word = u32::from_be_bytes(bytes);
        Self {
            width: (word >> 28) as u16 * WIDTH_UNIT,
            height: (word >> 20 & 0xFF) as u16,
            address: (word & 0xF_FFFF) * SPRITE_CHUNK_LEN as u32,
        }
    }
}

/// Sprite placement: `x:12 | y:12 | z:4 | id:12`, five bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpritePlacement {
    pub x: u16,
    pub y: u16,
    /// Stacking layer, higher draws on top
    pub z: u8,
    /// Index into the frame's layout descriptors
    pub id: u16,
}

impl SpritePlacement {
    /// Encode the placement; fields are masked to their bit widths
    pub fn encode(&self) -> [u8; 5] {
        let x = u32::from(self.x) & 0xFFF;
        let y = u32::from(self.y) & 0xFFF;
        let z = u32::from(self.z) & 0xF;
        let id = self.id & 0xFFF;
        let word = (x << 20 | y << 8 | z << 4 | u32::from(id >> 8)).to_be_bytes();
        [word[0], word[1], word[2], word[3], id as u8]
    }

    /// Decode a placement
    pub fn decode(bytes: [u8; 5]) -> Self {
        let word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Self {
            x: (word >> 20) as u16,
            y: (word >> 8 & 0xFFF) as u16,
            z: (word >> 4 & 0xF) as u8,
            id: ((word & 0xF) as u16) << 8 | u16::from(bytes[4]),
        }
    }
}
