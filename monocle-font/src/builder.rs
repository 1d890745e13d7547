//! Font container writer for host tools and tests

use crate::glyph::GLYPH_HEADER_LEN;
use crate::index::{IndexRecord, HEADER_LEN, MAX_RANGE_LEN, RECORD_LEN};

/// Reasons a glyph is rejected by [`FontBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// Codepoints must be added in strictly ascending order
    OutOfOrder(u32),
    /// Codepoint does not fit in 24 bits
    CodepointTooLarge(u32),
    /// Bitmap wider or taller than 255 pixels
    BitmapTooLarge,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuilderError::OutOfOrder(cp) => write!(f, "U+{:04X} added out of order", cp),
            BuilderError::CodepointTooLarge(cp) => write!(f, "U+{:X} exceeds 24 bits", cp),
            BuilderError::BitmapTooLarge => f.write_str("glyph bitmap exceeds 255 pixels"),
        }
    }
}

impl std::error::Error for BuilderError {}

/// Assembles a font container from ASCII-art glyphs
///
/// Consecutive codepoints share an index record; a record is closed when
/// the run breaks or reaches 255 glyphs.
#[derive(Debug)]
pub struct FontBuilder {
    height: u32,
    records: Vec<IndexRecord>,
    glyphs: Vec<u8>,
    last: Option<u32>,
}

impl FontBuilder {
    pub fn new(height: u32) -> Self {
        Self {
            height,
            records: Vec::new(),
            glyphs: Vec::new(),
            last: None,
        }
    }

    /// Append a glyph; `#` marks an inked pixel, anything else is blank
    pub fn glyph(
        &mut self,
        codepoint: u32,
        beg_x: u8,
        beg_y: u8,
        rows: &[&str],
    ) -> Result<&mut Self, BuilderError> {
        if codepoint > 0xFF_FFFF {
            return Err(BuilderError::CodepointTooLarge(codepoint));
        }
        if self.last.is_some_and(|last| codepoint <= last) {
            return Err(BuilderError::OutOfOrder(codepoint));
        }
        let len_x = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let len_x = u8::try_from(len_x).map_err(|_| BuilderError::BitmapTooLarge)?;
        let len_y = u8::try_from(rows.len()).map_err(|_| BuilderError::BitmapTooLarge)?;

        let extends = match self.records.last() {
            Some(record) => record.end() == codepoint && u32::from(record.count) < MAX_RANGE_LEN,
            None => false,
        };
        match self.records.last_mut() {
            Some(record) if extends => record.count += 1,
            _ => self.records.push(IndexRecord {
                start: codepoint,
                count: 1,
                address: self.glyphs.len() as u32,
            }),
        }

        let header: [u8; GLYPH_HEADER_LEN] = [beg_x, beg_y, len_x, len_y];
        self.glyphs.extend_from_slice(&header);

        let mut byte = 0u8;
        let mut bit = 0usize;
        for row in rows {
            let mut chars = row.chars();
            for _ in 0..len_x {
                if chars.next() == Some('#') {
                    byte |= 0x80 >> (bit % 8);
                }
                bit += 1;
                if bit % 8 == 0 {
                    self.glyphs.push(byte);
                    byte = 0;
                }
            }
        }
        if bit % 8 != 0 {
            self.glyphs.push(byte);
        }

        self.last = Some(codepoint);
        Ok(self)
    }

    /// Serialize the container
    pub fn build(&self) -> Vec<u8> {
        let index_size = self.records.len() as u32 * RECORD_LEN;
        let mut out =
            Vec::with_capacity(HEADER_LEN as usize + index_size as usize + self.glyphs.len());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(&index_size.to_be_bytes());
        for record in &self.records {
            out.extend_from_slice(&record.encode());
        }
        out.extend_from_slice(&self.glyphs);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_layout() {
        let mut builder = FontBuilder::new(16);
        builder.glyph(0x41, 1, 2, &["#.#", ".#.", "#.#"]).unwrap();
        let data = builder.build();

        assert_eq!(&data[..8], &[0, 0, 0, 16, 0, 0, 0, 8]);
        assert_eq!(&data[8..16], &[0, 0, 0x41, 1, 0, 0, 0, 0]);
        // 101 010 101 -> 1010_1010 1000_0000
        assert_eq!(&data[16..], &[1, 2, 3, 3, 0b1010_1010, 0b1000_0000]);
    }

    #[test]
    fn test_ranges_split_on_gap_and_length() {
        let mut builder = FontBuilder::new(1);
        for cp in 0x100..0x100 + 300 {
            builder.glyph(cp, 0, 0, &[]).unwrap();
        }
        builder.glyph(0x1000, 0, 0, &[]).unwrap();
        assert_eq!(builder.records.len(), 3);
        assert_eq!(builder.records[0].count, 255);
        assert_eq!(builder.records[1].start, 0x100 + 255);
        assert_eq!(builder.records[1].count, 45);
        assert_eq!(builder.records[2].address, 300 * GLYPH_HEADER_LEN as u32);
    }

    #[test]
    fn test_rejects_out_of_order() {
        let mut builder = FontBuilder::new(1);
        builder.glyph(0x42, 0, 0, &["#"]).unwrap();
        assert_eq!(
            builder.glyph(0x41, 0, 0, &["#"]).err(),
            Some(BuilderError::OutOfOrder(0x41))
        );
    }
}
