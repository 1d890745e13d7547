//! Font container reader
//!
//! Opens a container over any [`ByteSource`], resolves codepoints to
//! glyphs, and renders them into a [`GlyphSink`].

use monocle_hal::{ByteSource, SourceError};

use crate::glyph::{Glyph, GlyphSink, GLYPH_HEADER_LEN};
use crate::index::{IndexRecord, HEADER_LEN, RECORD_LEN};

/// Font lookup and decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontError {
    /// No index record covers the codepoint
    GlyphNotFound(u32),
    /// Header or index is inconsistent
    Corrupt,
    /// Reading the container failed
    Source(SourceError),
}

impl From<SourceError> for FontError {
    fn from(e: SourceError) -> Self {
        FontError::Source(e)
    }
}

impl core::fmt::Display for FontError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FontError::GlyphNotFound(cp) => write!(f, "glyph U+{:04X} not found in font", cp),
            FontError::Corrupt => f.write_str("corrupt font container"),
            FontError::Source(e) => write!(f, "font source: {}", e),
        }
    }
}

/// An opened font container
#[derive(Debug)]
pub struct Font<S> {
    source: S,
    height: u32,
    index_size: u32,
}

impl<S: ByteSource> Font<S> {
    /// Read the container header
    ///
    /// Only the eight header bytes are read; the index stays in the source.
    pub fn open(mut source: S) -> Result<Self, FontError> {
        source.seek(0)?;
        let height = source.read_u32_be()?;
        let index_size = source.read_u32_be()?;
        if index_size % RECORD_LEN != 0 {
            return Err(FontError::Corrupt);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "font opened: cell height {}, {} ranges",
            height,
            index_size / RECORD_LEN
        );

        Ok(Self {
            source,
            height,
            index_size,
        })
    }

    /// Height of every rendered glyph cell
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of index records
    pub fn range_count(&self) -> u32 {
        self.index_size / RECORD_LEN
    }

    /// Read the `i`th index record
    pub fn record(&mut self, i: u32) -> Result<IndexRecord, FontError> {
        if i >= self.range_count() {
            return Err(FontError::Corrupt);
        }
        self.source.seek(HEADER_LEN + i * RECORD_LEN)?;
        let mut bytes = [0u8; RECORD_LEN as usize];
        self.source.read(&mut bytes)?;
        Ok(IndexRecord::decode(bytes))
    }

    /// Find the block containing `codepoint`
    ///
    /// Returns `(range_start, block_address)`. Records are sorted and
    /// disjoint, so a three-way binary search needs O(log N) probes.
    pub fn unicode_range(&mut self, codepoint: u32) -> Result<(u32, u32), FontError> {
        let mut lo = 0;
        let mut hi = self.range_count();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let record = self.record(mid)?;
            match record.locate(codepoint) {
                core::cmp::Ordering::Greater => hi = mid,
                core::cmp::Ordering::Less => lo = mid + 1,
                core::cmp::Ordering::Equal => return Ok((record.start, record.address)),
            }
        }
        Err(FontError::GlyphNotFound(codepoint))
    }

    /// Locate the glyph for `codepoint`
    ///
    /// Glyphs in a block have no address table, so the ones before the
    /// target are skipped header by header (at most 254 skips).
    pub fn glyph(&mut self, codepoint: u32) -> Result<Glyph, FontError> {
        let (range_start, block_address) = self.unicode_range(codepoint)?;
        let block = HEADER_LEN
            .checked_add(self.index_size)
            .and_then(|base| base.checked_add(block_address))
            .ok_or(FontError::Corrupt)?;
        self.source.seek(block)?;

        for skipped in range_start..codepoint {
            let glyph = self.read_glyph(skipped)?;
            self.source.skip(glyph.data_len())?;
        }
        let glyph = self.read_glyph(codepoint)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "glyph U+{=u32:X}: {}x{} at ({}, {})",
            codepoint,
            glyph.len_x,
            glyph.len_y,
            glyph.beg_x,
            glyph.beg_y
        );

        Ok(glyph)
    }

    fn read_glyph(&mut self, codepoint: u32) -> Result<Glyph, FontError> {
        let mut header = [0u8; GLYPH_HEADER_LEN];
        self.source.read(&mut header)?;
        Ok(Glyph::from_header(codepoint, header, self.source.tell()))
    }

    /// Render the full cell of `glyph` into `sink`
    ///
    /// Emits `beg_y` background rows, then each bitmap row framed by
    /// `beg_x` background pixels on the left and background padding up to
    /// [`Glyph::width`] on the right, then background rows down to the
    /// cell height. Bits are unpacked MSB first and run on continuously
    /// across rows.
    pub fn render<K: GlyphSink>(
        &mut self,
        glyph: &Glyph,
        sink: &mut K,
        fg: &[u8],
        bg: &[u8],
    ) -> Result<(), FontError> {
        let width = usize::from(glyph.width());
        let beg_x = usize::from(glyph.beg_x);
        let len_x = usize::from(glyph.len_x);
        let pad = width - beg_x - len_x;

        for _ in 0..glyph.beg_y {
            sink.pixels(bg, width);
            sink.end_row();
        }

        self.source.seek(glyph.data_offset)?;
        let mut byte = [0u8; 1];
        let mut bit = 0usize;
        for _ in 0..glyph.len_y {
            if beg_x > 0 {
                sink.pixels(bg, beg_x);
            }

            let mut run_on = false;
            let mut run = 0usize;
            for _ in 0..len_x {
                if bit % 8 == 0 {
                    self.source.read(&mut byte)?;
                }
                let on = byte[0] & (0x80 >> (bit % 8)) != 0;
                bit += 1;

                if run > 0 && on != run_on {
                    sink.pixels(if run_on { fg } else { bg }, run);
                    run = 0;
                }
                run_on = on;
                run += 1;
            }
            if run > 0 {
                sink.pixels(if run_on { fg } else { bg }, run);
            }

            if pad > 0 {
                sink.pixels(bg, pad);
            }
            sink.end_row();
        }

        let drawn = u32::from(glyph.beg_y) + u32::from(glyph.len_y);
        for _ in 0..self.height.saturating_sub(drawn) {
            sink.pixels(bg, width);
            sink.end_row();
        }
        Ok(())
    }

    /// Return the underlying source
    pub fn into_source(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FontBuilder;
    use monocle_hal::SliceSource;
    use proptest::prelude::*;

    /// Collects rendered rows as one byte per pixel
    #[derive(Default)]
    struct Rows {
        rows: Vec<Vec<u8>>,
        current: Vec<u8>,
    }

    impl GlyphSink for Rows {
        fn pixels(&mut self, pixel: &[u8], count: usize) {
            for _ in 0..count {
                self.current.extend_from_slice(pixel);
            }
        }

        fn end_row(&mut self) {
            self.rows.push(core::mem::take(&mut self.current));
        }
    }

    const A: [&str; 5] = [".##.", "#..#", "####", "#..#", "#..#"];

    fn ascii_font() -> Vec<u8> {
        let mut builder = FontBuilder::new(8);
        for cp in 0x20..0x7F {
            if cp == u32::from(b'A') {
                builder.glyph(cp, 1, 2, &A).unwrap();
            } else {
                builder.glyph(cp, 0, 0, &["#"]).unwrap();
            }
        }
        builder.build()
    }

    #[test]
    fn test_open_reads_header() {
        let data = ascii_font();
        let font = Font::open(SliceSource::new(&data)).unwrap();
        assert_eq!(font.height(), 8);
        assert_eq!(font.range_count(), 1);
    }

    #[test]
    fn test_open_rejects_partial_record() {
        let data = [0, 0, 0, 8, 0, 0, 0, 5, 0, 0, 0, 0, 0];
        assert_eq!(
            Font::open(SliceSource::new(&data)).err(),
            Some(FontError::Corrupt)
        );
    }

    #[test]
    fn test_open_truncated_header() {
        let data = [0, 0, 0, 8];
        assert_eq!(
            Font::open(SliceSource::new(&data)).err(),
            Some(FontError::Source(SourceError::UnexpectedEof))
        );
    }

    #[test]
    fn test_unicode_range_bounds() {
        let data = ascii_font();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        assert_eq!(font.unicode_range(0x20), Ok((0x20, 0)));
        assert_eq!(font.unicode_range(0x7E), Ok((0x20, 0)));
        assert_eq!(font.unicode_range(0x7F), Err(FontError::GlyphNotFound(0x7F)));
        assert_eq!(font.unicode_range(0x1F), Err(FontError::GlyphNotFound(0x1F)));
    }

    #[test]
    fn test_glyph_skips_to_target() {
        let data = ascii_font();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let glyph = font.glyph(u32::from(b'A')).unwrap();
        assert_eq!((glyph.beg_x, glyph.beg_y, glyph.len_x, glyph.len_y), (1, 2, 4, 5));
        assert_eq!(glyph.width(), 32);
    }

    #[test]
    fn test_render_reproduces_bitmap() {
        let data = ascii_font();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let glyph = font.glyph(u32::from(b'A')).unwrap();

        let mut rows = Rows::default();
        font.render(&glyph, &mut rows, &[1], &[0]).unwrap();

        assert_eq!(rows.rows.len(), 8);
        for row in &rows.rows {
            assert_eq!(row.len(), 32);
        }
        assert!(rows.rows[0].iter().all(|&p| p == 0));
        assert!(rows.rows[1].iter().all(|&p| p == 0));
        for (i, pattern) in A.iter().enumerate() {
            let row = &rows.rows[2 + i];
            assert_eq!(row[0], 0);
            let bits: String = row[1..5]
                .iter()
                .map(|&p| if p == 1 { '#' } else { '.' })
                .collect();
            assert_eq!(&bits, pattern);
            assert!(row[5..].iter().all(|&p| p == 0));
        }
        assert!(rows.rows[7].iter().all(|&p| p == 0));
    }

    #[test]
    fn test_render_multibyte_pixels() {
        let data = ascii_font();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let glyph = font.glyph(u32::from(b'!')).unwrap();

        let mut rows = Rows::default();
        font.render(&glyph, &mut rows, &[0xAA, 0xBB, 0xCC, 0xFF], &[0; 4]).unwrap();
        assert_eq!(rows.rows.len(), 8);
        assert_eq!(rows.rows[0].len(), 32 * 4);
        assert_eq!(&rows.rows[0][..8], &[0xAA, 0xBB, 0xCC, 0xFF, 0, 0, 0, 0]);
    }

    #[test]
    fn test_multiple_ranges() {
        let mut builder = FontBuilder::new(4);
        builder.glyph(0x41, 0, 0, &["#"]).unwrap();
        builder.glyph(0x42, 0, 0, &["##"]).unwrap();
        builder.glyph(0x3042, 0, 0, &["###"]).unwrap();
        builder.glyph(0x3043, 0, 0, &["####"]).unwrap();
        let data = builder.build();

        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        assert_eq!(font.range_count(), 2);
        assert_eq!(font.glyph(0x42).unwrap().len_x, 2);
        assert_eq!(font.glyph(0x3043).unwrap().len_x, 4);
        assert_eq!(font.glyph(0x43), Err(FontError::GlyphNotFound(0x43)));
    }

    proptest! {
        #[test]
        fn prop_unicode_range_finds_unique_block(
            gaps in prop::collection::vec((1u32..64, 1u32..=255), 1..24),
            cp in 0u32..0x4000,
        ) {
            let mut builder = FontBuilder::new(1);
            let mut blocks = Vec::new();
            let mut next = 0x20u32;
            for (gap, len) in gaps {
                let start = next + gap;
                for c in start..start + len {
                    builder.glyph(c, 0, 0, &["#"]).unwrap();
                }
                blocks.push((start, len));
                next = start + len;
            }
            let data = builder.build();
            let mut font = Font::open(SliceSource::new(&data)).unwrap();

            let expected = blocks
                .iter()
                .find(|(start, len)| cp >= *start && cp < start + len)
                .map(|(start, _)| *start);
            match font.unicode_range(cp) {
                Ok((start, _)) => prop_assert_eq!(Some(start), expected),
                Err(e) => {
                    prop_assert_eq!(e, FontError::GlyphNotFound(cp));
                    prop_assert_eq!(expected, None);
                }
            }
        }
    }
}
