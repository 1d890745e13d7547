//! Native text records
//!
//! The controller renders text from its built-in font, indexed from the
//! printable-ASCII origin (`' '` is code 0).
//!
//! Record layout:
//! - POSITION (3 bytes): x:12 y:12 packed as `x[11:4] | x[3:0] y[11:8] | y[7:0]`
//! - COLOR (1 byte): text palette index
//! - LENGTH (1 byte): number of character codes
//! - CODES (LENGTH bytes): `ascii - 32` per character
//!
//! A buffer is a sequence of records closed by [`TEXT_END`].

/// Terminates a text buffer
pub const TEXT_END: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Size of a record header
pub const HEADER_LEN: usize = 5;

/// First printable ASCII character, device font code 0
pub const FIRST_PRINTABLE: u8 = b' ';

/// Last printable ASCII character
pub const LAST_PRINTABLE: u8 = b'~';

/// Largest coordinate representable in 12 bits
pub const MAX_COORD: u16 = 0x0FFF;

/// Device font code for a character, `None` outside printable ASCII
pub fn glyph_code(ch: char) -> Option<u8> {
    let byte = u8::try_from(u32::from(ch)).ok()?;
    if (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&byte) {
        Some(byte - FIRST_PRINTABLE)
    } else {
        None
    }
}

/// Fixed part of a text record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextHeader {
    pub x: u16,
    pub y: u16,
    pub color: u8,
    pub len: u8,
}

impl TextHeader {
    /// Encode the header; coordinates are truncated to 12 bits
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let x = self.x & MAX_COORD;
        let y = self.y & MAX_COORD;
        [
            (x >> 4) as u8,
            ((x << 4) as u8 & 0xF0) | ((y >> 8) as u8 & 0x0F),
            y as u8,
            self.color,
            self.len,
        ]
    }

    /// Decode a header
    pub fn decode(bytes: [u8; HEADER_LEN]) -> Self {
        Self {
            x: u16::from(bytes[0]) << 4 | u16::from(bytes[1]) >> 4,
            y: u16::from(bytes[1] & 0x0F) << 8 | u16::from(bytes[2]),
            color: bytes[3],
            len: bytes[4],
        }
    }
}

/// Errors while walking a text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextParseError {
    /// Buffer ended inside a record
    Truncated,
    /// Buffer ended without [`TEXT_END`]
    MissingEnd,
}

/// Iterator over the records of an encoded text buffer
///
/// Yields `(header, codes)` pairs until the end marker. Used by host tools
/// and tests to inspect what a frame will draw.
#[derive(Debug, Clone)]
pub struct TextRecords<'a> {
    buf: &'a [u8],
    done: bool,
}

impl<'a> TextRecords<'a> {
    /// Walk `buf` from its first record
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, done: false }
    }
}

impl<'a> Iterator for TextRecords<'a> {
    type Item = Result<(TextHeader, &'a [u8]), TextParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.buf.starts_with(&TEXT_END) {
            self.done = true;
            return None;
        }
        let Some((head, rest)) = self.buf.split_first_chunk::<HEADER_LEN>() else {
            self.done = true;
            return Some(Err(if self.buf.is_empty() {
                TextParseError::MissingEnd
            } else {
                TextParseError::Truncated
            }));
        };
        let header = TextHeader::decode(*head);
        let len = header.len as usize;
        if rest.len() < len {
            self.done = true;
            return Some(Err(TextParseError::Truncated));
        }
        let (codes, rest) = rest.split_at(len);
        self.buf = rest;
        Some(Ok((header, codes)))
    }
}
