//! Glyph headers and rendering sinks

/// Size of a glyph header
pub const GLYPH_HEADER_LEN: usize = 4;

/// Horizontal granularity of rendered glyph cells
pub const CELL_WIDTH_UNIT: u16 = 32;

/// A glyph located in the container
///
/// The bitmap is not copied out of the source; `data_offset` points at its
/// first byte so rendering can stream it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph {
    /// Codepoint this glyph draws
    pub codepoint: u32,
    /// Blank columns left of the bitmap
    pub beg_x: u8,
    /// Blank rows above the bitmap
    pub beg_y: u8,
    /// Bitmap width in pixels
    pub len_x: u8,
    /// Bitmap height in rows
    pub len_y: u8,
    /// Absolute source offset of the packed bitmap
    pub data_offset: u32,
}

impl Glyph {
    /// Parse the four header bytes
    pub(crate) fn from_header(codepoint: u32, header: [u8; GLYPH_HEADER_LEN], data_offset: u32) -> Self {
        Self {
            codepoint,
            beg_x: header[0],
            beg_y: header[1],
            len_x: header[2],
            len_y: header[3],
            data_offset,
        }
    }

    /// Bytes of packed bitmap following the header
    pub fn data_len(&self) -> u32 {
        bitmap_len(self.len_x, self.len_y)
    }

    /// Rendered cell width: the inked extent rounded up to 32 pixels
    ///
    /// Never zero, so blank glyphs such as the space still occupy a cell.
    pub fn width(&self) -> u16 {
        let inked = u16::from(self.beg_x) + u16::from(self.len_x);
        inked.div_ceil(CELL_WIDTH_UNIT).max(1) * CELL_WIDTH_UNIT
    }

    /// Rendered cell height for a font with the given cell height
    ///
    /// A glyph reaching below the cell extends it rather than being cut.
    pub fn rows(&self, cell_height: u32) -> u32 {
        cell_height.max(u32::from(self.beg_y) + u32::from(self.len_y))
    }
}

/// Bytes needed for a `len_x × len_y` bitmap padded to a whole byte
pub fn bitmap_len(len_x: u8, len_y: u8) -> u32 {
    (u32::from(len_x) * u32::from(len_y)).div_ceil(8)
}

/// Receives a rendered glyph row by row
///
/// The renderer emits runs of identical pixels; `pixel` is one of the
/// caller-supplied foreground/background encodings, repeated `count` times.
pub trait GlyphSink {
    /// Append `count` copies of `pixel` to the current row
    fn pixels(&mut self, pixel: &[u8], count: usize);

    /// Close the current row
    fn end_row(&mut self);
}
