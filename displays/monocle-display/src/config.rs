//! Display configuration
//!
//! The defaults describe the production controller; tests and other
//! bitstreams override single fields with the `with_*` builders.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use monocle_protocol::sprite::{ADDRESS_SPACE, SPRITE_CHUNK_LEN};

/// Screen width in pixels
pub const SCREEN_WIDTH: u16 = 640;

/// Screen height in pixels
pub const SCREEN_HEIGHT: u16 = 400;

/// Fixed character cell used by the native text layer and for justification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellMetrics {
    /// Horizontal advance per character, including spacing
    pub width: u16,
    /// Line height
    pub height: u16,
    /// Blank columns at the end of each cell
    pub letter_spacing: u16,
}

impl CellMetrics {
    pub const DEFAULT: Self = Self {
        width: 24,
        height: 48,
        letter_spacing: 0,
    };

    /// Inked width of `len` characters: the trailing gap is not counted
    pub fn text_width(&self, len: usize) -> i32 {
        if len == 0 {
            return 0;
        }
        i32::from(self.width) * len as i32 - i32::from(self.letter_spacing)
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Device geometry and timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Screen width in pixels
    pub screen_width: u16,
    /// Screen height in pixels
    pub screen_height: u16,
    /// Native text cell
    pub cell: CellMetrics,
    /// Number of text pages the controller cycles through
    pub text_pages: u8,
    /// Bytes per text page
    pub text_page_size: u16,
    /// Wait after a text page write before the next frame may swap it
    pub settle_delay_ms: u32,
    /// Sprite RAM in bytes
    pub sprite_capacity: u32,
}

impl DisplayConfig {
    pub const DEFAULT: Self = Self {
        screen_width: SCREEN_WIDTH,
        screen_height: SCREEN_HEIGHT,
        cell: CellMetrics::DEFAULT,
        text_pages: 2,
        text_page_size: 1024,
        settle_delay_ms: 20,
        sprite_capacity: ADDRESS_SPACE,
    };

    pub const fn with_screen(mut self, width: u16, height: u16) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub const fn with_cell(mut self, cell: CellMetrics) -> Self {
        self.cell = cell;
        self
    }

    pub const fn with_text_pages(mut self, count: u8, size: u16) -> Self {
        self.text_pages = count;
        self.text_page_size = size;
        self
    }

    pub const fn with_settle_delay_ms(mut self, ms: u32) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// Sprite RAM size, rounded down to whole allocation units
    pub const fn with_sprite_capacity(mut self, bytes: u32) -> Self {
        self.sprite_capacity = bytes - bytes % SPRITE_CHUNK_LEN as u32;
        self
    }

    /// Characters of the native cell that fit across the screen
    pub fn columns(&self) -> usize {
        if self.cell.width == 0 {
            return 0;
        }
        usize::from(self.screen_width / self.cell.width)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
