//! Palette deduplication

use heapless::Vec;

use monocle_protocol::palette::encode_rgb;
use monocle_protocol::{BUFFER_PREFIX, MAX_PALETTE_ENTRIES, PALETTE_BUFFER_LEN};

use crate::error::DisplayError;

/// Transparent on the display; shares the value of black
pub const CLEAR: u32 = 0x000000;
pub const BLACK: u32 = 0x000000;
pub const RED: u32 = 0xAD2323;
pub const GREEN: u32 = 0x1D6914;
pub const BLUE: u32 = 0x2A4BD7;
pub const CYAN: u32 = 0x29D0D0;
pub const MAGENTA: u32 = 0x8126C0;
pub const YELLOW: u32 = 0xFFEE33;
pub const WHITE: u32 = 0xFFFFFF;
pub const GRAY1: u32 = 0x1C1C1C;
pub const GRAY2: u32 = 0x383838;
pub const GRAY3: u32 = 0x555555;
pub const GRAY4: u32 = 0x717171;
pub const GRAY5: u32 = 0x8D8D8D;
pub const GRAY6: u32 = 0xAAAAAA;
pub const GRAY7: u32 = 0xC6C6C6;
pub const GRAY8: u32 = 0xE2E2E2;

/// Colors used by one layer, indexed in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<u32, MAX_PALETTE_ENTRIES>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette index of `color`, appending it if unseen
    pub fn intern(&mut self, color: u32) -> Result<u8, DisplayError> {
        let color = color & 0xFF_FFFF;
        if let Some(index) = self.entries.iter().position(|&c| c == color) {
            return Ok(index as u8);
        }
        self.entries
            .push(color)
            .map_err(|_| DisplayError::PaletteOverflow)?;
        Ok((self.entries.len() - 1) as u8)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    /// Palette upload buffer: reserved prefix, then `R G B` per entry
    pub fn serialize(&self) -> Vec<u8, PALETTE_BUFFER_LEN> {
        let mut buf = Vec::new();
        // Capacity covers the prefix and a full table
        let _ = buf.extend_from_slice(&BUFFER_PREFIX);
        for &color in &self.entries {
            let _ = buf.extend_from_slice(&encode_rgb(color));
        }
        buf
    }
}
