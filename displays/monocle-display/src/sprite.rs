//! Sprite bitmaps, device memory, and per-frame sprite layers
//!
//! Bitmaps are uploaded once into sprite RAM and referenced by address.
//! Each frame then sends a layout table (one descriptor per distinct
//! bitmap, indexed by sprite id) and one placement per sprite on screen.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use monocle_hal::FpgaBus;
use monocle_protocol::registers::SPRITE_DATA;
use monocle_protocol::sprite::{
    chunk_header, MAX_HEIGHT, MAX_SPRITE_IDS, MAX_WIDTH, PLACEMENT_END, WIDTH_UNIT,
};
use monocle_protocol::{SpriteDescriptor, SpritePlacement, BUFFER_PREFIX, SPRITE_CHUNK_LEN};

use crate::error::DisplayError;

/// Bytes per RGBA pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Placement coordinates keep their low 12 bits
const PLACEMENT_COORD_MASK: u16 = 0xFFF;

/// Highest z layer (4-bit field)
pub const MAX_Z: u8 = 0xF;

/// Check sprite geometry and derive the height
pub fn sprite_height(raw_len: usize, width: u16) -> Result<u16, DisplayError> {
    if width == 0 || width % WIDTH_UNIT != 0 || width > MAX_WIDTH {
        return Err(DisplayError::InvalidSpriteWidth(width));
    }
    let row = BYTES_PER_PIXEL * usize::from(width);
    if raw_len % row != 0 {
        return Err(DisplayError::InvalidSpriteDataLength(raw_len));
    }
    match u16::try_from(raw_len / row) {
        Ok(height) if (1..=MAX_HEIGHT).contains(&height) => Ok(height),
        _ => Err(DisplayError::InvalidSpriteDataLength(raw_len)),
    }
}

/// A bitmap resident in sprite RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpriteSource {
    width: u16,
    height: u16,
    address: u32,
    id: Option<u16>,
}

impl SpriteSource {
    /// Describe RGBA data stored at `address`
    ///
    /// Does not upload anything; see [`SpriteMemory::upload`].
    pub fn new(raw: &[u8], width: u16, address: u32) -> Result<Self, DisplayError> {
        let height = sprite_height(raw.len(), width)?;
        Ok(Self {
            width,
            height,
            address,
            id: None,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    /// Sprite id in the frame being composed, `None` until a frame uses it
    pub fn id(&self) -> Option<u16> {
        self.id
    }

    pub fn descriptor(&self) -> SpriteDescriptor {
        SpriteDescriptor {
            width: self.width,
            height: self.height,
            address: self.address,
        }
    }

    /// Append the layout descriptor
    pub fn describe(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.descriptor().encode());
    }
}

/// One placement of a bitmap on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sprite {
    pub x: i32,
    pub y: i32,
    /// Stacking layer 0..=15, higher on top
    pub z: u8,
    pub source: SpriteSource,
}

impl Sprite {
    pub fn new(x: i32, y: i32, z: u8, source: SpriteSource) -> Self {
        Self {
            x,
            y,
            z: z.min(MAX_Z),
            source,
        }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// Append the placement record referring to sprite `id`
    ///
    /// Coordinates are truncated to the 12-bit placement fields, so a
    /// small negative position stays in two's complement and the sprite
    /// hangs off the top or left edge.
    pub fn encode(&self, id: u16, buf: &mut Vec<u8>) {
        let placement = SpritePlacement {
            x: self.x as u16 & PLACEMENT_COORD_MASK,
            y: self.y as u16 & PLACEMENT_COORD_MASK,
            z: self.z,
            id,
        };
        buf.extend_from_slice(&placement.encode());
    }
}

/// Position in sprite RAM that a later [`SpriteMemory::rewind`] returns to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Checkpoint(u32);

impl Checkpoint {
    pub fn address(&self) -> u32 {
        self.0
    }
}

/// Bump allocator over device sprite RAM
///
/// The cursor only moves forward, one 128-byte chunk per upload write,
/// until [`reset`](Self::reset) or [`rewind`](Self::rewind).
#[derive(Debug, Clone)]
pub struct SpriteMemory {
    cursor: u32,
    capacity: u32,
}

impl SpriteMemory {
    pub fn new(capacity: u32) -> Self {
        Self {
            cursor: 0,
            capacity,
        }
    }

    /// Next free address
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.cursor)
    }

    /// Upload RGBA data at the cursor and return its source
    ///
    /// The bitmap goes out as `address:u32` + 128 data bytes per write.
    /// Capacity is checked up front; a bus error part way leaves the cursor
    /// after the last chunk that was written.
    pub fn upload<B: FpgaBus>(
        &mut self,
        bus: &mut B,
        raw: &[u8],
        width: u16,
    ) -> Result<SpriteSource, DisplayError> {
        let source = SpriteSource::new(raw, width, self.cursor)?;
        let needed = raw.len().div_ceil(SPRITE_CHUNK_LEN) * SPRITE_CHUNK_LEN;
        if needed > self.remaining() as usize {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "sprite memory exhausted: {} bytes needed, {} free",
                needed,
                self.remaining()
            );
            return Err(DisplayError::SpriteMemoryExhausted);
        }

        let mut frame = [0u8; 4 + SPRITE_CHUNK_LEN];
        for chunk in raw.chunks(SPRITE_CHUNK_LEN) {
            frame[..4].copy_from_slice(&chunk_header(self.cursor));
            frame[4..4 + chunk.len()].copy_from_slice(chunk);
            bus.write(SPRITE_DATA, &frame[..4 + chunk.len()])?;
            self.cursor += SPRITE_CHUNK_LEN as u32;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "sprite uploaded: {}x{} at {=u32:#x}",
            source.width,
            source.height,
            source.address
        );

        Ok(source)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.cursor)
    }

    /// Release everything uploaded after `checkpoint`
    ///
    /// A checkpoint from before a [`reset`](Self::reset) that lies beyond
    /// the cursor is ignored.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.cursor = self.cursor.min(checkpoint.0);
    }
}

/// Encoded sprite layers of one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrame {
    /// Layout buffer: prefix + one descriptor per id
    pub layout: Vec<u8>,
    /// Placement buffer: prefix + one placement per sprite + end marker
    pub placements: Vec<u8>,
    /// Sources in id order, ids assigned
    pub sources: Vec<SpriteSource>,
}

/// Assign ids and encode the layout and placement buffers
///
/// Ids `0..K` go to distinct sources (by address) in iteration order;
/// every sprite still gets its own placement.
pub fn encode_sprites<'a, I>(sprites: I) -> Result<SpriteFrame, DisplayError>
where
    I: IntoIterator<Item = &'a Sprite>,
{
    let mut ids: BTreeMap<u32, u16> = BTreeMap::new();
    let mut sources: Vec<SpriteSource> = Vec::new();
    let mut placements = Vec::from(BUFFER_PREFIX);

    for sprite in sprites {
        let address = sprite.source.address;
        let id = match ids.get(&address) {
            Some(&id) => id,
            None => {
                if sources.len() >= MAX_SPRITE_IDS {
                    return Err(DisplayError::TooManySprites);
                }
                let id = sources.len() as u16;
                ids.insert(address, id);
                sources.push(SpriteSource {
                    id: Some(id),
                    ..sprite.source
                });
                id
            }
        };
        sprite.encode(id, &mut placements);
    }
    placements.extend_from_slice(&PLACEMENT_END);

    let mut layout = Vec::with_capacity(BUFFER_PREFIX.len() + 4 * sources.len());
    layout.extend_from_slice(&BUFFER_PREFIX);
    for source in &sources {
        source.describe(&mut layout);
    }

    Ok(SpriteFrame {
        layout,
        placements,
        sources,
    })
}
