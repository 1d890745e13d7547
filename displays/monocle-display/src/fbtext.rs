//! Native text layer: clipping, overlap checks, records and paging
//!
//! The controller draws text from its own fixed-cell font. Each visible
//! text becomes one record; records for a frame must fit in one text page.

use alloc::vec::Vec;

use monocle_protocol::text::{glyph_code, HEADER_LEN};
use monocle_protocol::{TextHeader, TEXT_END};

use crate::color::ColorTable;
use crate::config::DisplayConfig;
use crate::error::DisplayError;
use crate::text::Text;

/// Ring of text pages; the controller shows one while the next is written
#[derive(Debug, Clone)]
pub struct TextPages {
    page: u8,
    count: u8,
    size: u16,
}

impl TextPages {
    /// Ring for [`DisplayConfig::DEFAULT`]
    pub const DEFAULT: Self = Self {
        page: 0,
        count: DisplayConfig::DEFAULT.text_pages,
        size: DisplayConfig::DEFAULT.text_page_size,
    };

    /// Fails with no pages, or when the last page starts past `0xFFFF`
    pub fn new(count: u8, size: u16) -> Result<Self, DisplayError> {
        let last = u32::from(count)
            .checked_sub(1)
            .ok_or(DisplayError::InvalidConfig)?
            * u32::from(size);
        if last > u32::from(u16::MAX) {
            return Err(DisplayError::InvalidConfig);
        }
        Ok(Self {
            page: 0,
            count,
            size,
        })
    }

    /// Page the next frame writes into
    pub fn current(&self) -> u8 {
        self.page
    }

    /// Byte address of the current page
    pub fn address(&self) -> u16 {
        // Bounded by the check in `new`
        u16::from(self.page) * self.size
    }

    pub fn advance(&mut self) {
        self.page = (self.page + 1) % self.count;
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }
}

/// A text after clipping, with the part that remains on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed<'a> {
    /// Position in the frame's text list
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub visible: &'a str,
    pub color: u32,
}

impl Placed<'_> {
    /// `(x0, x1, y0, y1)`, half-open
    fn bounds(&self, config: &DisplayConfig) -> (i32, i32, i32, i32) {
        let cell = &config.cell;
        (
            self.x,
            self.x.saturating_add(cell.text_width(self.visible.chars().count())),
            self.y,
            self.y.saturating_add(i32::from(cell.height)),
        )
    }

    fn overlaps(&self, other: &Placed<'_>, config: &DisplayConfig) -> bool {
        let (ax0, ax1, ay0, ay1) = self.bounds(config);
        let (bx0, bx1, by0, by1) = other.bounds(config);
        ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1
    }
}

/// Clip `text` to whole cells on screen
///
/// Characters are validated first; the native layer only draws printable
/// ASCII. Returns `None` when nothing is left to draw.
pub fn clip<'a>(
    index: usize,
    text: &'a Text,
    config: &DisplayConfig,
) -> Result<Option<Placed<'a>>, DisplayError> {
    for ch in text.as_str().chars() {
        glyph_code(ch).ok_or(DisplayError::GlyphNotFound(u32::from(ch)))?;
    }
    Ok(clip_cells(index, text, config))
}

/// Clip `text` to whole cells on screen, whatever its characters
///
/// Cells are counted per `char`. Positions are worked out in `i64` so
/// texts moved to the ends of the `i32` range clip away cleanly.
pub fn clip_cells<'a>(index: usize, text: &'a Text, config: &DisplayConfig) -> Option<Placed<'a>> {
    let string = text.as_str();
    let len = string.chars().count();
    let cell_width = i64::from(config.cell.width);
    let y = text.y;
    if len == 0 || cell_width == 0 || y < 0 || y >= i32::from(config.screen_height) {
        return None;
    }

    let mut x = i64::from(text.x);
    let mut first = 0;
    if x < 0 {
        let drop = (-x + cell_width - 1) / cell_width;
        if drop >= len as i64 {
            return None;
        }
        first = drop as usize;
        x += drop * cell_width;
    }

    let mut count = len - first;
    let right = x + i64::from(config.cell.text_width(count));
    let overflow = right - i64::from(config.screen_width);
    if overflow > 0 {
        let drop = ((overflow + cell_width - 1) / cell_width) as usize;
        if drop >= count {
            return None;
        }
        count -= drop;
    }

    Some(Placed {
        index,
        // On screen after clipping
        x: x as i32,
        y,
        visible: char_range(string, first, count),
        color: text.color,
    })
}

/// `count` characters of `s` starting at character `first`
fn char_range(s: &str, first: usize, count: usize) -> &str {
    let mut bounds = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(core::iter::once(s.len()));
    let start = bounds.nth(first).unwrap_or(s.len());
    let end = match count {
        0 => start,
        n => bounds.nth(n - 1).unwrap_or(s.len()),
    };
    &s[start..end]
}

/// Fail on the first pair of intersecting boxes
pub fn check_overlap(placed: &[Placed<'_>], config: &DisplayConfig) -> Result<(), DisplayError> {
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if a.overlaps(b, config) {
                return Err(DisplayError::TextOverlap {
                    a: a.index,
                    b: b.index,
                });
            }
        }
    }
    Ok(())
}

/// Encoded text layer of one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    pub palette: ColorTable,
    pub records: Vec<u8>,
}

/// Clip, check and serialize every text of a frame
pub fn encode_texts(texts: &[&Text], config: &DisplayConfig) -> Result<TextFrame, DisplayError> {
    let mut placed = Vec::with_capacity(texts.len());
    for (index, text) in texts.iter().enumerate() {
        if let Some(p) = clip(index, text, config)? {
            placed.push(p);
        }
    }
    check_overlap(&placed, config)?;

    let mut palette = ColorTable::new();
    let mut records = Vec::new();
    for p in &placed {
        let header = TextHeader {
            x: p.x as u16,
            y: p.y as u16,
            color: palette.intern(p.color)?,
            len: p.visible.len() as u8,
        };
        records.reserve(HEADER_LEN + p.visible.len());
        records.extend_from_slice(&header.encode());
        // Validated printable ASCII in `clip`
        records.extend(p.visible.chars().filter_map(glyph_code));
    }
    records.extend_from_slice(&TEXT_END);

    if records.len() > usize::from(config.text_page_size) {
        return Err(DisplayError::TextPageOverflow);
    }
    Ok(TextFrame { palette, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;
    use crate::config::CellMetrics;
    use crate::text::Justify;
    use monocle_protocol::TextRecords;

    fn text(s: &str, x: i32, y: i32) -> Text {
        Text::new(s, x, y, WHITE, Justify::TopLeft).unwrap()
    }

    #[test]
    fn test_pages_wrap() {
        let mut pages = TextPages::new(2, 1024).unwrap();
        assert_eq!(pages.address(), 0);
        pages.advance();
        assert_eq!((pages.current(), pages.address()), (1, 1024));
        pages.advance();
        assert_eq!(pages.current(), 0);
    }

    #[test]
    fn test_page_addresses_must_fit() {
        assert!(TextPages::new(2, 0x8000).is_ok());
        let last = TextPages::new(4, 0x5555).unwrap();
        assert_eq!(last.count, 4);
        assert_eq!(TextPages::new(3, 0x8000).err(), Some(DisplayError::InvalidConfig));
        assert_eq!(TextPages::new(0, 16).err(), Some(DisplayError::InvalidConfig));
        assert_eq!(TextPages::DEFAULT.address(), 0);
    }

    #[test]
    fn test_extreme_positions_clip_away() {
        let config = DisplayConfig::DEFAULT;
        let mut far_right = text("ab", 0, 0);
        far_right.move_by(i32::MAX, 0);
        assert_eq!(clip(0, &far_right, &config), Ok(None));

        let mut far_left = text("ab", 0, 0);
        far_left.move_by(i32::MIN, 0);
        assert_eq!(clip(0, &far_left, &config), Ok(None));

        let mut far_down = text("ab", 0, 0);
        far_down.move_by(0, i32::MAX);
        let frame = encode_texts(&[&far_right, &far_left, &far_down], &config).unwrap();
        assert_eq!(frame.records, TEXT_END.to_vec());
    }

    #[test]
    fn test_clip_cells_counts_chars() {
        let config = DisplayConfig::DEFAULT;
        let t = text("éàü", -24, 0);
        let p = clip_cells(0, &t, &config).unwrap();
        assert_eq!((p.x, p.visible), (0, "àü"));

        let t = text("aéb", 592, 0);
        let p = clip_cells(0, &t, &config).unwrap();
        assert_eq!((p.x, p.visible), (592, "aé"));
    }

    #[test]
    fn test_negative_x_drops_leading() {
        let config = DisplayConfig::DEFAULT;
        let t = text("abc", -1, 0);
        let p = clip(0, &t, &config).unwrap().unwrap();
        assert_eq!((p.x, p.visible), (23, "bc"));

        let t = text("abc", -48, 0);
        let p = clip(0, &t, &config).unwrap().unwrap();
        assert_eq!((p.x, p.visible), (0, "c"));
    }

    #[test]
    fn test_right_overflow_drops_trailing() {
        let config = DisplayConfig::DEFAULT;
        // 3 cells end at 641
        let t = text("abc", 569, 0);
        let p = clip(0, &t, &config).unwrap().unwrap();
        assert_eq!((p.x, p.visible), (569, "ab"));

        let t = text("abc", 568, 0);
        assert_eq!(clip(0, &t, &config).unwrap().unwrap().visible, "abc");
    }

    #[test]
    fn test_fully_clipped() {
        let config = DisplayConfig::DEFAULT;
        assert_eq!(clip(0, &text("ab", -48, 0), &config), Ok(None));
        assert_eq!(clip(0, &text("ab", 640, 0), &config), Ok(None));
        assert_eq!(clip(0, &text("ab", 0, -1), &config), Ok(None));
        assert_eq!(clip(0, &text("ab", 0, 400), &config), Ok(None));
        assert_eq!(clip(0, &text("", 0, 0), &config), Ok(None));
    }

    #[test]
    fn test_non_ascii_rejected() {
        let config = DisplayConfig::DEFAULT;
        assert_eq!(
            clip(0, &text("né", 0, 0), &config),
            Err(DisplayError::GlyphNotFound(0xE9))
        );
    }

    #[test]
    fn test_overlap() {
        let config = DisplayConfig::DEFAULT.with_cell(CellMetrics {
            width: 15,
            height: 48,
            letter_spacing: 0,
        });
        let a = text("AB", 0, 0);
        let b = text("AB", 100, 0);
        assert!(encode_texts(&[&a, &b], &config).is_ok());

        let c = text("CD", 10, 0);
        assert_eq!(
            encode_texts(&[&a, &b, &c], &config).err(),
            Some(DisplayError::TextOverlap { a: 0, b: 2 })
        );
    }

    #[test]
    fn test_stacked_lines_do_not_overlap() {
        let config = DisplayConfig::DEFAULT;
        let a = text("line one", 0, 0);
        let b = text("line two", 0, 48);
        assert!(encode_texts(&[&a, &b], &config).is_ok());
        let c = text("line two", 0, 47);
        assert!(encode_texts(&[&a, &c], &config).is_err());
    }

    #[test]
    fn test_clipped_text_skips_overlap() {
        let config = DisplayConfig::DEFAULT;
        let a = text("AB", 0, 0);
        let hidden = text("AB", 0, -10);
        assert!(encode_texts(&[&a, &hidden], &config).is_ok());
    }

    #[test]
    fn test_record_layout() {
        let config = DisplayConfig::DEFAULT;
        let mut red = text("Hi", 0x123, 0x45);
        red.color = 0xFF0000;
        let white = text("!", 0, 200);
        let frame = encode_texts(&[&red, &white], &config).unwrap();

        assert_eq!(frame.palette.entries(), &[0xFF0000, WHITE]);
        assert_eq!(
            &frame.records[..7],
            &[0x12, 0x30, 0x45, 0, 2, b'H' - 32, b'i' - 32]
        );
        let parsed: std::vec::Vec<_> = TextRecords::new(&frame.records)
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!((parsed[1].0.y, parsed[1].0.color), (200, 1));
        assert_eq!(parsed[1].1, &[1]);
        assert!(frame.records.ends_with(&TEXT_END));
    }

    #[test]
    fn test_empty_layer() {
        let frame = encode_texts(&[], &DisplayConfig::DEFAULT).unwrap();
        assert_eq!(frame.records, TEXT_END.to_vec());
        assert!(frame.palette.is_empty());
    }

    #[test]
    fn test_page_overflow() {
        let config = DisplayConfig::DEFAULT.with_text_pages(2, 16);
        let a = text("0123456789", 0, 0);
        assert_eq!(
            encode_texts(&[&a], &config).err(),
            Some(DisplayError::TextPageOverflow)
        );
    }
}
