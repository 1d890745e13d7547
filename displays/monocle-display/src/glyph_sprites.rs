//! Text drawn with a loaded font, as sprites
//!
//! Each `(codepoint, color)` pair is rendered once into RGBA, uploaded to
//! sprite RAM and remembered; later frames reuse the resident bitmap.
//!
//! A frame goes through three steps: [`layout_glyphs`] turns clipped texts
//! into cells, [`GlyphCache::prepare`] looks up every missing glyph and
//! checks it fits, and only then [`GlyphCache::upload`] writes them.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use monocle_font::{Font, Glyph, GlyphSink};
use monocle_hal::{ByteSource, FpgaBus};
use monocle_protocol::SPRITE_CHUNK_LEN;

use crate::config::DisplayConfig;
use crate::error::DisplayError;
use crate::fbtext::Placed;
use crate::sprite::{sprite_height, Sprite, SpriteMemory, SpriteSource, BYTES_PER_PIXEL, MAX_Z};

/// Transparent pixel around the inked part of a glyph
const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Opaque RGBA pixel for a `0xRRGGBB` color
fn rgba(color: u32) -> [u8; 4] {
    let [_, r, g, b] = color.to_be_bytes();
    [r, g, b, 0xFF]
}

/// RGBA bytes of a rendered glyph
fn rendered_len(glyph: &Glyph, font_height: u32) -> usize {
    usize::from(glyph.width()) * glyph.rows(font_height) as usize * BYTES_PER_PIXEL
}

/// Collects rendered rows into a contiguous RGBA bitmap
struct RgbaBitmap {
    data: Vec<u8>,
}

impl GlyphSink for RgbaBitmap {
    fn pixels(&mut self, pixel: &[u8], count: usize) {
        for _ in 0..count {
            self.data.extend_from_slice(pixel);
        }
    }

    fn end_row(&mut self) {}
}

/// One character of laid-out text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlyphCell {
    pub x: i32,
    pub y: i32,
    pub z: u8,
    pub codepoint: u32,
    pub color: u32,
}

impl GlyphCell {
    fn key(&self) -> (u32, u32) {
        (self.codepoint, self.color)
    }
}

/// Lay out a clipped text as one cell per character
///
/// Characters advance by the configured cell width. Spaces produce no
/// cell. Later characters stack above earlier ones.
pub fn layout_glyphs(placed: &Placed<'_>, config: &DisplayConfig, out: &mut Vec<GlyphCell>) {
    let advance = i32::from(config.cell.width);
    let mut x = placed.x;
    let mut z = 1u8;
    for ch in placed.visible.chars() {
        if ch != ' ' {
            out.push(GlyphCell {
                x,
                y: placed.y,
                z,
                codepoint: u32::from(ch),
                color: placed.color,
            });
            z = (z + 1).min(MAX_Z);
        }
        x = x.saturating_add(advance);
    }
}

/// Distinct `(codepoint, color)` pairs among `cells`
pub fn distinct_glyphs(cells: &[GlyphCell]) -> usize {
    cells.iter().map(GlyphCell::key).collect::<BTreeSet<_>>().len()
}

/// Glyphs a frame needs that are not resident yet
///
/// Produced by [`GlyphCache::prepare`] once every lookup has succeeded.
#[derive(Debug, Default)]
pub struct PendingGlyphs {
    glyphs: Vec<(u32, Glyph)>,
    bytes: u64,
}

impl PendingGlyphs {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Sprite RAM the uploads will take
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

/// Resident glyph bitmaps keyed by `(codepoint, color)`
#[derive(Debug, Default)]
pub struct GlyphCache {
    entries: BTreeMap<(u32, u32), SpriteSource>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, codepoint: u32, color: u32) -> Option<&SpriteSource> {
        self.entries.get(&(codepoint, color))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Forget glyphs stored at or above `address`
    pub fn evict_from(&mut self, address: u32) {
        self.entries.retain(|_, source| source.address() < address);
    }

    /// Look up every glyph `cells` need that is not cached
    ///
    /// Nothing is written. Fails on the first codepoint the font lacks, on
    /// a glyph too large for a sprite, or when the misses together do not
    /// fit in the free sprite RAM.
    pub fn prepare<S: ByteSource>(
        &self,
        font: &mut Font<S>,
        cells: &[GlyphCell],
        memory: &SpriteMemory,
    ) -> Result<PendingGlyphs, DisplayError> {
        let mut pending = PendingGlyphs::default();
        let mut seen = BTreeSet::new();
        for cell in cells {
            let key = cell.key();
            if self.entries.contains_key(&key) || !seen.insert(key) {
                continue;
            }
            let glyph = font.glyph(cell.codepoint)?;
            let len = rendered_len(&glyph, font.height());
            sprite_height(len, glyph.width())?;
            pending.bytes += len.div_ceil(SPRITE_CHUNK_LEN) as u64 * SPRITE_CHUNK_LEN as u64;
            pending.glyphs.push((cell.color, glyph));
        }

        if pending.bytes > u64::from(memory.remaining()) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "{} glyphs need {} bytes, {} free",
                pending.glyphs.len(),
                pending.bytes,
                memory.remaining()
            );
            return Err(DisplayError::SpriteMemoryExhausted);
        }
        Ok(pending)
    }

    /// Render and upload glyphs returned by [`prepare`](Self::prepare)
    pub fn upload<S, B>(
        &mut self,
        font: &mut Font<S>,
        memory: &mut SpriteMemory,
        bus: &mut B,
        pending: PendingGlyphs,
    ) -> Result<(), DisplayError>
    where
        S: ByteSource,
        B: FpgaBus,
    {
        for (color, glyph) in pending.glyphs {
            self.load(font, memory, bus, &glyph, color)?;
        }
        Ok(())
    }

    /// Resident sprite for a glyph, rendering and uploading it on a miss
    pub fn sprite<S, B>(
        &mut self,
        font: &mut Font<S>,
        memory: &mut SpriteMemory,
        bus: &mut B,
        codepoint: u32,
        color: u32,
    ) -> Result<SpriteSource, DisplayError>
    where
        S: ByteSource,
        B: FpgaBus,
    {
        if let Some(source) = self.get(codepoint, color) {
            return Ok(*source);
        }
        let glyph = font.glyph(codepoint)?;
        self.load(font, memory, bus, &glyph, color)
    }

    fn load<S, B>(
        &mut self,
        font: &mut Font<S>,
        memory: &mut SpriteMemory,
        bus: &mut B,
        glyph: &Glyph,
        color: u32,
    ) -> Result<SpriteSource, DisplayError>
    where
        S: ByteSource,
        B: FpgaBus,
    {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "glyph cache miss: U+{=u32:X} color {=u32:X}",
            glyph.codepoint,
            color
        );

        let mut bitmap = RgbaBitmap {
            data: Vec::with_capacity(rendered_len(glyph, font.height())),
        };
        font.render(glyph, &mut bitmap, &rgba(color), &TRANSPARENT)?;

        let source = memory.upload(bus, &bitmap.data, glyph.width())?;
        self.entries.insert((glyph.codepoint, color), source);
        Ok(source)
    }
}

/// One sprite per cell, using the cached bitmaps
///
/// Every cell must already be resident; see [`GlyphCache::upload`].
pub fn place_glyphs(
    cells: &[GlyphCell],
    cache: &GlyphCache,
    out: &mut Vec<Sprite>,
) -> Result<(), DisplayError> {
    for cell in cells {
        let source = cache
            .get(cell.codepoint, cell.color)
            .ok_or(DisplayError::GlyphNotFound(cell.codepoint))?;
        out.push(Sprite::new(cell.x, cell.y, cell.z, *source));
    }
    Ok(())
}
