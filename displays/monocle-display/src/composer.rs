//! Frame composition
//!
//! [`Display`] owns the register bus and the state that outlives a frame:
//! the sprite RAM cursor, the text page ring and the glyph cache. Each
//! `show` encodes every layer first, then writes them in a fixed order:
//!
//! ```text
//! 0x4402 vector palette     0x4301 text page select   0x4502 sprite layout
//! 0x4403 vector records     0x4302 text palette       0x4503 sprite placements
//!                           0x4303 text records       0x4501 commit (empty)
//!                           (settle delay)
//! ```
//!
//! Empty layers are still written so the previous frame is cleared.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;

use monocle_font::Font;
use monocle_hal::{ByteSource, FpgaBus};
use monocle_protocol::registers::{
    CHIP_ID, CHIP_ID_VALUE, SPRITE_LAYOUT, SPRITE_PLACEMENT, SPRITE_SHOW, TEXT_DATA,
    TEXT_PAGE_SELECT, TEXT_PALETTE, VECTOR_DATA, VECTOR_PALETTE,
};
use monocle_protocol::sprite::MAX_SPRITE_IDS;

use crate::color::{ColorTable, WHITE};
use crate::config::DisplayConfig;
use crate::error::DisplayError;
use crate::fbtext::{check_overlap, clip_cells, encode_texts, TextFrame, TextPages};
use crate::glyph_sprites::{distinct_glyphs, layout_glyphs, place_glyphs, GlyphCache, GlyphCell};
use crate::object::{DisplayObject, Layers};
use crate::sprite::{encode_sprites, Checkpoint, Sprite, SpriteFrame, SpriteMemory, SpriteSource};
use crate::text::{Justify, Text, MAX_TEXT_LEN};
use crate::vector::{build_palette, encode_vectors, VectorShape};

/// Progress of the current (or last) `show` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameState {
    /// No frame started since construction or reset
    Idle,
    BuildingPalette,
    EncodingVector,
    EncodingText,
    EncodingSprites,
    /// All layers written
    Flushed,
    /// The last frame failed; see its error
    Aborted,
}

/// Every buffer of one frame, ready to write
struct Frame {
    vector_palette: ColorTable,
    vector: Vec<u8>,
    text: TextFrame,
    sprites: SpriteFrame,
}

/// Scene encoder bound to one display controller
pub struct Display<B, D> {
    bus: B,
    delay: D,
    config: DisplayConfig,
    memory: SpriteMemory,
    pages: TextPages,
    glyphs: GlyphCache,
    state: FrameState,
}

impl<B: FpgaBus, D: DelayNs> Display<B, D> {
    /// Display with the production controller's configuration
    pub fn new(bus: B, delay: D) -> Self {
        Self::from_parts(bus, delay, DisplayConfig::DEFAULT, TextPages::DEFAULT)
    }

    /// Display for another controller build
    ///
    /// Fails with [`DisplayError::InvalidConfig`] when the text pages do
    /// not fit the 16-bit page address.
    pub fn with_config(bus: B, delay: D, config: DisplayConfig) -> Result<Self, DisplayError> {
        let pages = TextPages::new(config.text_pages, config.text_page_size)?;
        Ok(Self::from_parts(bus, delay, config, pages))
    }

    fn from_parts(bus: B, delay: D, config: DisplayConfig, pages: TextPages) -> Self {
        Self {
            bus,
            delay,
            memory: SpriteMemory::new(config.sprite_capacity),
            pages,
            glyphs: GlyphCache::new(),
            state: FrameState::Idle,
            config,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Text page the next frame writes into
    pub fn text_page(&self) -> u8 {
        self.pages.current()
    }

    pub fn sprite_memory(&self) -> &SpriteMemory {
        &self.memory
    }

    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.glyphs
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give back the bus and delay
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Check that a Monocle controller answers on the bus
    pub fn detect(&mut self) -> Result<bool, DisplayError> {
        let mut id = [0u8; 4];
        self.bus.read(CHIP_ID, &mut id)?;
        Ok(id == CHIP_ID_VALUE)
    }

    /// Show a frame, drawing text with the controller's native font
    pub fn show(&mut self, objects: &[DisplayObject]) -> Result<(), DisplayError> {
        let result = self.compose(objects);
        self.finish(result)
    }

    /// Show a frame, drawing text as glyph sprites rendered from `font`
    ///
    /// Texts are clipped and checked for overlap like native text, and every
    /// character is looked up in `font` before anything is written. Glyphs
    /// missing from the cache are then uploaded to sprite RAM ahead of the
    /// layer writes.
    pub fn show_with_font<S: ByteSource>(
        &mut self,
        objects: &[DisplayObject],
        font: &mut Font<S>,
    ) -> Result<(), DisplayError> {
        let result = self.compose_with_font(objects, font);
        self.finish(result)
    }

    /// Blank the screen with one line of spaces across the top
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        let mut blank: heapless::String<MAX_TEXT_LEN> = heapless::String::new();
        for _ in 0..self.config.columns().min(MAX_TEXT_LEN) {
            // Bounded by the capacity above
            let _ = blank.push(' ');
        }
        let text = Text::with_metrics(&blank, 0, 0, WHITE, Justify::TopLeft, &self.config.cell)?;
        self.show(&[DisplayObject::Text(text)])
    }

    /// Forget everything resident on the controller
    pub fn reset(&mut self) {
        self.memory.reset();
        self.pages.reset();
        self.glyphs.clear();
        self.state = FrameState::Idle;
    }

    /// Upload an RGBA bitmap to sprite RAM
    pub fn load_sprite(&mut self, raw: &[u8], width: u16) -> Result<SpriteSource, DisplayError> {
        self.memory.upload(&mut self.bus, raw, width)
    }

    /// Mark the current sprite RAM position
    pub fn checkpoint(&self) -> Checkpoint {
        self.memory.checkpoint()
    }

    /// Release sprite RAM allocated after `checkpoint`
    ///
    /// Cached glyphs in the released range are evicted; sprite sources the
    /// caller loaded after the checkpoint become invalid.
    pub fn compact(&mut self, checkpoint: Checkpoint) {
        self.memory.rewind(checkpoint);
        self.glyphs.evict_from(self.memory.cursor());

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "sprite memory compacted to {=u32:#x}, {} glyphs cached",
            self.memory.cursor(),
            self.glyphs.len()
        );
    }

    fn compose(&mut self, objects: &[DisplayObject]) -> Result<(), DisplayError> {
        let layers = Layers::partition(objects);
        let (vector_palette, vector) = self.encode_vector(&layers.shapes)?;
        self.state = FrameState::EncodingText;
        let text = encode_texts(&layers.texts, &self.config)?;
        let sprites = self.encode_sprite_layer(&layers.sprites)?;
        self.flush(Frame {
            vector_palette,
            vector,
            text,
            sprites,
        })
    }

    fn compose_with_font<S: ByteSource>(
        &mut self,
        objects: &[DisplayObject],
        font: &mut Font<S>,
    ) -> Result<(), DisplayError> {
        let layers = Layers::partition(objects);
        let (vector_palette, vector) = self.encode_vector(&layers.shapes)?;

        self.state = FrameState::EncodingText;
        let text = encode_texts(&[], &self.config)?;
        let placed: Vec<_> = layers
            .texts
            .iter()
            .enumerate()
            .filter_map(|(index, t)| clip_cells(index, t, &self.config))
            .collect();
        check_overlap(&placed, &self.config)?;
        let mut cells = Vec::new();
        for p in &placed {
            layout_glyphs(p, &self.config, &mut cells);
        }

        self.state = FrameState::EncodingSprites;
        let pending = self.glyphs.prepare(font, &cells, &self.memory)?;
        if distinct_sources(&layers.sprites, &cells) > MAX_SPRITE_IDS {
            return Err(DisplayError::TooManySprites);
        }
        self.glyphs
            .upload(font, &mut self.memory, &mut self.bus, pending)?;

        let mut glyphs = Vec::with_capacity(cells.len());
        place_glyphs(&cells, &self.glyphs, &mut glyphs)?;
        let mut sprites = layers.sprites;
        sprites.extend(glyphs.iter());
        let sprites = self.encode_sprite_layer(&sprites)?;
        self.flush(Frame {
            vector_palette,
            vector,
            text,
            sprites,
        })
    }

    fn encode_vector(
        &mut self,
        shapes: &[VectorShape<'_>],
    ) -> Result<(ColorTable, Vec<u8>), DisplayError> {
        self.state = FrameState::BuildingPalette;
        let mut palette = ColorTable::new();
        build_palette(shapes, &mut palette)?;

        self.state = FrameState::EncodingVector;
        let records = encode_vectors(shapes, &mut palette)?;
        Ok((palette, records))
    }

    fn encode_sprite_layer(&mut self, sprites: &[&Sprite]) -> Result<SpriteFrame, DisplayError> {
        self.state = FrameState::EncodingSprites;
        encode_sprites(sprites.iter().copied())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), DisplayError> {
        self.bus
            .write_all(VECTOR_PALETTE, &frame.vector_palette.serialize())?;
        self.bus.write_all(VECTOR_DATA, &frame.vector)?;

        self.bus
            .write(TEXT_PAGE_SELECT, &self.pages.address().to_be_bytes())?;
        self.bus
            .write_all(TEXT_PALETTE, &frame.text.palette.serialize())?;
        self.bus.write_all(TEXT_DATA, &frame.text.records)?;
        self.delay.delay_ms(self.config.settle_delay_ms);
        self.pages.advance();

        self.bus.write_all(SPRITE_LAYOUT, &frame.sprites.layout)?;
        self.bus
            .write_all(SPRITE_PLACEMENT, &frame.sprites.placements)?;
        self.bus.write(SPRITE_SHOW, &[])?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "frame flushed: {} colors, {} vector bytes, {} text bytes, {} sprite ids, next page {}",
            frame.vector_palette.len(),
            frame.vector.len(),
            frame.text.records.len(),
            frame.sprites.sources.len(),
            self.pages.current()
        );

        self.state = FrameState::Flushed;
        Ok(())
    }

    fn finish(&mut self, result: Result<(), DisplayError>) -> Result<(), DisplayError> {
        if let Err(_e) = &result {
            #[cfg(feature = "defmt")]
            defmt::warn!("frame aborted in {}: {}", self.state, _e);
            self.state = FrameState::Aborted;
        }
        result
    }
}

/// Sprite ids a frame of user sprites plus glyph cells will need
fn distinct_sources(sprites: &[&Sprite], cells: &[GlyphCell]) -> usize {
    let addresses: BTreeSet<u32> = sprites.iter().map(|s| s.source.address()).collect();
    addresses.len() + distinct_glyphs(cells)
}

/// A [`Display`] shared between call sites
///
/// Calls are serialized by an `embassy-sync` blocking mutex. Re-entering
/// the display from inside [`lock`](Self::lock) panics.
pub struct SharedDisplay<M: RawMutex, B, D> {
    inner: Mutex<M, RefCell<Display<B, D>>>,
}

impl<M: RawMutex, B: FpgaBus, D: DelayNs> SharedDisplay<M, B, D> {
    pub fn new(display: Display<B, D>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(display)),
        }
    }

    /// Run `f` with exclusive access to the display
    pub fn lock<R>(&self, f: impl FnOnce(&mut Display<B, D>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn show(&self, objects: &[DisplayObject]) -> Result<(), DisplayError> {
        self.lock(|display| display.show(objects))
    }

    pub fn clear(&self) -> Result<(), DisplayError> {
        self.lock(|display| display.clear())
    }

    pub fn show_with_font<S: ByteSource>(
        &self,
        objects: &[DisplayObject],
        font: &mut Font<S>,
    ) -> Result<(), DisplayError> {
        self.lock(|display| display.show_with_font(objects, font))
    }

    pub fn reset(&self) {
        self.lock(|display| display.reset())
    }

    pub fn load_sprite(&self, raw: &[u8], width: u16) -> Result<SpriteSource, DisplayError> {
        self.lock(|display| display.load_sprite(raw, width))
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.lock(|display| display.checkpoint())
    }

    pub fn compact(&self, checkpoint: Checkpoint) {
        self.lock(|display| display.compact(checkpoint))
    }

    pub fn into_inner(self) -> Display<B, D> {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{GREEN, RED};
    use crate::shape::{Line, Rectangle};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use monocle_font::FontBuilder;
    use monocle_hal::mock::{RecordingBus, RecordingDelay};
    use monocle_hal::{BusError, SliceSource};
    use monocle_protocol::registers::SPRITE_DATA;
    use monocle_protocol::sprite::PLACEMENT_END;
    use monocle_protocol::{SpritePlacement, TextRecords};

    type TestDisplay = Display<RecordingBus, RecordingDelay>;

    fn display() -> TestDisplay {
        Display::new(RecordingBus::new(), RecordingDelay::default())
    }

    fn text(s: &str, x: i32, y: i32) -> DisplayObject {
        Text::new(s, x, y, WHITE, Justify::TopLeft).unwrap().into()
    }

    fn font_data() -> std::vec::Vec<u8> {
        let mut builder = FontBuilder::new(8);
        for cp in 0x20..0x7F {
            builder.glyph(cp, 0, 0, &["#.#", ".#."]).unwrap();
        }
        builder.build()
    }

    const FRAME_ORDER: [u16; 8] = [
        VECTOR_PALETTE,
        VECTOR_DATA,
        TEXT_PAGE_SELECT,
        TEXT_PALETTE,
        TEXT_DATA,
        SPRITE_LAYOUT,
        SPRITE_PLACEMENT,
        SPRITE_SHOW,
    ];

    #[test]
    fn test_two_rectangles_end_to_end() {
        let mut display = display();
        display
            .show(&[
                Rectangle::new(0, 0, 10, 10, RED).into(),
                Rectangle::new(5, 5, 15, 15, GREEN).into(),
            ])
            .unwrap();

        let bus = display.bus();
        assert_eq!(bus.addresses(), FRAME_ORDER.to_vec());
        assert_eq!(
            bus.stream(VECTOR_PALETTE),
            vec![0, 0, 0xAD, 0x23, 0x23, 0x1D, 0x69, 0x14]
        );
        let vector = bus.stream(VECTOR_DATA);
        assert_eq!(vector.len(), 27);
        assert_eq!(&vector[2..6], &[2, 0, 0, 4]);
        assert_eq!(&vector[14..18], &[2, 1, 0, 4]);

        assert_eq!(bus.stream(TEXT_PAGE_SELECT), vec![0, 0]);
        assert_eq!(bus.stream(TEXT_PALETTE), vec![0, 0]);
        assert_eq!(bus.stream(TEXT_DATA), vec![0xFF, 0xFF, 0xFF]);
        assert_eq!(bus.stream(SPRITE_LAYOUT), vec![0, 0]);
        assert_eq!(bus.stream(SPRITE_PLACEMENT).len(), 2 + PLACEMENT_END.len());
        assert!(bus.writes().last().unwrap().payload.is_empty());

        assert_eq!(display.state(), FrameState::Flushed);
        let (_, delay) = display.release();
        assert_eq!(delay.total_ns, 20_000_000);
    }

    #[test]
    fn test_text_overlap_writes_nothing() {
        let mut display = display();
        let result = display.show(&[
            Rectangle::new(0, 0, 10, 10, RED).into(),
            text("AB", 0, 0),
            text("CD", 10, 0),
        ]);
        assert_eq!(result, Err(DisplayError::TextOverlap { a: 0, b: 1 }));
        assert!(display.bus().writes().is_empty());
        assert_eq!(display.state(), FrameState::Aborted);
        assert_eq!(display.text_page(), 0);
    }

    #[test]
    fn test_palette_overflow_writes_nothing() {
        let mut display = display();
        let lines: std::vec::Vec<DisplayObject> = (0..129u32)
            .map(|c| Line::new(0, 0, 1, 1, c, 1).unwrap().into())
            .collect();
        assert_eq!(display.show(&lines), Err(DisplayError::PaletteOverflow));
        assert!(display.bus().writes().is_empty());
    }

    #[test]
    fn test_full_palette_is_chunked() {
        let mut display = display();
        let lines: std::vec::Vec<DisplayObject> = (0..128u32)
            .map(|c| Line::new(0, 0, 1, 1, c, 1).unwrap().into())
            .collect();
        display.show(&lines).unwrap();

        let lens: std::vec::Vec<usize> = display
            .bus()
            .writes()
            .iter()
            .filter(|w| w.address == VECTOR_PALETTE)
            .map(|w| w.payload.len())
            .collect();
        assert_eq!(lens, vec![255, 131]);
    }

    #[test]
    fn test_pages_alternate() {
        let mut display = display();
        for _ in 0..3 {
            display.show(&[text("hi", 0, 0)]).unwrap();
        }
        let pages: std::vec::Vec<std::vec::Vec<u8>> = display
            .bus()
            .writes()
            .iter()
            .filter(|w| w.address == TEXT_PAGE_SELECT)
            .map(|w| w.payload.clone())
            .collect();
        assert_eq!(pages, vec![vec![0, 0], vec![0x04, 0x00], vec![0, 0]]);
        assert_eq!(display.text_page(), 1);
    }

    #[test]
    fn test_native_text_records() {
        let mut display = display();
        display
            .show(&[text("abc", -1, 10), text("zz", 0, 100)])
            .unwrap();
        let records = display.bus().stream(TEXT_DATA);
        let parsed: std::vec::Vec<_> = TextRecords::new(&records).map(|r| r.unwrap()).collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!((parsed[0].0.x, parsed[0].0.y), (23, 10));
        assert_eq!(parsed[0].1, &[b'b' - 32, b'c' - 32]);
        assert_eq!(display.bus().stream(TEXT_PALETTE), vec![0, 0, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_clear() {
        let mut display = display();
        display.clear().unwrap();
        let records = display.bus().stream(TEXT_DATA);
        let parsed: std::vec::Vec<_> = TextRecords::new(&records).map(|r| r.unwrap()).collect();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].0.len, 26);
        assert!(parsed[0].1.iter().all(|&c| c == 0));
        assert_eq!(display.bus().stream(VECTOR_DATA), vec![0, 0, 0]);
    }

    #[test]
    fn test_bus_error_aborts_midway() {
        let mut display = Display::new(RecordingBus::new().fail_after(1), RecordingDelay::default());
        let result = display.show(&[Rectangle::new(0, 0, 10, 10, RED).into()]);
        assert_eq!(result, Err(DisplayError::Bus(BusError::Transport)));
        assert_eq!(display.bus().addresses(), vec![VECTOR_PALETTE]);
        assert_eq!(display.state(), FrameState::Aborted);
        assert_eq!(display.text_page(), 0);
    }

    #[test]
    fn test_detect() {
        let bus = RecordingBus::new().with_register(CHIP_ID, b"Mncl");
        let mut monocle = Display::new(bus, RecordingDelay::default());
        assert_eq!(monocle.detect(), Ok(true));

        let mut other = display();
        assert_eq!(other.detect(), Ok(false));
    }

    #[test]
    fn test_sprites_share_ids() {
        let mut display = display();
        let source = display.load_sprite(&[0xAA; 256], 32).unwrap();
        assert_eq!(display.bus().stream(SPRITE_DATA).len(), 2 * (4 + 128));
        display.bus_mut().clear();

        display
            .show(&[
                Sprite::new(10, 10, 1, source).into(),
                Sprite::new(100, 10, 2, source).into(),
            ])
            .unwrap();

        let layout = display.bus().stream(SPRITE_LAYOUT);
        assert_eq!(layout, vec![0, 0, 0x10, 0x20, 0x00, 0x00]);
        let placements = display.bus().stream(SPRITE_PLACEMENT);
        assert_eq!(placements.len(), 2 + 2 * 5 + PLACEMENT_END.len());
        let second = SpritePlacement::decode([
            placements[7],
            placements[8],
            placements[9],
            placements[10],
            placements[11],
        ]);
        assert_eq!((second.x, second.z, second.id), (100, 2, 0));
    }

    #[test]
    fn test_font_path_caches_glyphs() {
        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let mut display = display();

        display
            .show_with_font(&[text("AA B", 0, 0)], &mut font)
            .unwrap();
        assert_eq!(display.glyph_cache().len(), 2);
        // Two glyphs of 32 x 8 RGBA, 8 chunks each
        assert_eq!(
            display
                .bus()
                .writes()
                .iter()
                .filter(|w| w.address == SPRITE_DATA)
                .count(),
            16
        );
        assert_eq!(display.bus().stream(TEXT_DATA), vec![0xFF, 0xFF, 0xFF]);
        assert_eq!(display.bus().stream(SPRITE_LAYOUT).len(), 2 + 2 * 4);
        assert_eq!(
            display.bus().stream(SPRITE_PLACEMENT).len(),
            2 + 3 * 5 + PLACEMENT_END.len()
        );

        display.bus_mut().clear();
        display
            .show_with_font(&[text("BA", 0, 100)], &mut font)
            .unwrap();
        assert!(!display.bus().addresses().contains(&SPRITE_DATA));
        assert_eq!(display.bus().addresses(), FRAME_ORDER.to_vec());
    }

    #[test]
    fn test_font_path_missing_glyph() {
        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let mut display = display();
        assert_eq!(
            display.show_with_font(&[text("é", 0, 0)], &mut font),
            Err(DisplayError::GlyphNotFound(0xE9))
        );
        assert!(display.bus().writes().is_empty());
        assert_eq!(display.state(), FrameState::Aborted);

        // Earlier characters are not uploaded either
        assert_eq!(
            display.show_with_font(&[text("AB", 0, 0), text("C\u{e9}", 0, 100)], &mut font),
            Err(DisplayError::GlyphNotFound(0xE9))
        );
        assert!(display.bus().writes().is_empty());
        assert!(display.glyph_cache().is_empty());
        assert_eq!(display.sprite_memory().cursor(), 0);
    }

    #[test]
    fn test_font_path_overlap() {
        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let mut display = display();
        assert_eq!(
            display.show_with_font(&[text("AB", 0, 0), text("CD", 10, 0)], &mut font),
            Err(DisplayError::TextOverlap { a: 0, b: 1 })
        );
        assert!(display.bus().writes().is_empty());
        assert!(display.glyph_cache().is_empty());

        display
            .show_with_font(&[text("AB", 0, 0), text("CD", 0, 48)], &mut font)
            .unwrap();
        assert_eq!(display.glyph_cache().len(), 4);
    }

    #[test]
    fn test_font_path_too_many_sprites() {
        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let mut display = display();
        let mut objects: std::vec::Vec<DisplayObject> = (0..MAX_SPRITE_IDS as u32)
            .map(|i| {
                let source = SpriteSource::new(&[0u8; 128], 32, i * 128).unwrap();
                Sprite::new(0, 0, 0, source).into()
            })
            .collect();
        objects.push(text("A", 0, 0));
        assert_eq!(
            display.show_with_font(&objects, &mut font),
            Err(DisplayError::TooManySprites)
        );
        assert!(display.bus().writes().is_empty());
        assert!(display.glyph_cache().is_empty());
    }

    #[test]
    fn test_font_path_memory_exhausted() {
        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        // Room for two 32 x 8 glyphs
        let config = DisplayConfig::DEFAULT.with_sprite_capacity(2048);
        let mut display =
            Display::with_config(RecordingBus::new(), RecordingDelay::default(), config).unwrap();
        assert_eq!(
            display.show_with_font(&[text("ABC", 0, 0)], &mut font),
            Err(DisplayError::SpriteMemoryExhausted)
        );
        assert!(display.bus().writes().is_empty());
        display.show_with_font(&[text("ABA", 0, 0)], &mut font).unwrap();
    }

    #[test]
    fn test_extreme_text_position() {
        let mut display = display();
        let mut far: DisplayObject = text("ab", 0, 0);
        far.move_by(i32::MAX, 0);
        display.show(&[far.clone()]).unwrap();
        assert_eq!(display.bus().stream(TEXT_DATA), vec![0xFF, 0xFF, 0xFF]);

        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        display.show_with_font(&[far], &mut font).unwrap();
        assert!(display.glyph_cache().is_empty());
    }

    #[test]
    fn test_with_config_rejects_page_overflow() {
        let config = DisplayConfig::DEFAULT.with_text_pages(3, 0x8000);
        assert_eq!(
            Display::with_config(RecordingBus::new(), RecordingDelay::default(), config).err(),
            Some(DisplayError::InvalidConfig)
        );
    }

    #[test]
    fn test_compact_evicts_glyphs() {
        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let mut display = display();

        display.show_with_font(&[text("A", 0, 0)], &mut font).unwrap();
        let checkpoint = display.checkpoint();
        display.show_with_font(&[text("BC", 0, 0)], &mut font).unwrap();
        assert_eq!(display.glyph_cache().len(), 3);

        display.compact(checkpoint);
        assert_eq!(display.glyph_cache().len(), 1);
        assert_eq!(display.sprite_memory().cursor(), checkpoint.address());
    }

    #[test]
    fn test_reset() {
        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let mut display = display();
        display.show_with_font(&[text("A", 0, 0)], &mut font).unwrap();
        assert_eq!(display.text_page(), 1);

        display.reset();
        assert_eq!(display.text_page(), 0);
        assert_eq!(display.sprite_memory().cursor(), 0);
        assert!(display.glyph_cache().is_empty());
        assert_eq!(display.state(), FrameState::Idle);
    }

    #[test]
    fn test_shared_display() {
        let shared: SharedDisplay<NoopRawMutex, _, _> = SharedDisplay::new(display());
        shared
            .show(&[Rectangle::new(0, 0, 1, 1, RED).into()])
            .unwrap();
        shared.clear().unwrap();
        assert_eq!(shared.lock(|d| d.text_page()), 0);
        let display = shared.into_inner();
        assert_eq!(display.bus().writes().len(), 2 * FRAME_ORDER.len());
    }

    #[test]
    fn test_shared_display_sprites_and_font() {
        let data = font_data();
        let mut font = Font::open(SliceSource::new(&data)).unwrap();
        let shared: SharedDisplay<NoopRawMutex, _, _> = SharedDisplay::new(display());

        let source = shared.load_sprite(&[0u8; 128], 32).unwrap();
        let checkpoint = shared.checkpoint();
        assert_eq!(checkpoint.address(), 128);
        let objects: [DisplayObject; 2] =
            [Sprite::new(0, 0, 0, source).into(), text("AB", 0, 100)];
        shared.show_with_font(&objects, &mut font).unwrap();
        assert_eq!(shared.lock(|d| d.glyph_cache().len()), 2);

        shared.compact(checkpoint);
        let display = shared.into_inner();
        assert!(display.glyph_cache().is_empty());
        assert_eq!(display.sprite_memory().cursor(), 128);
    }
}
