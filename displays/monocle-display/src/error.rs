//! Display error type

use monocle_font::FontError;
use monocle_hal::BusError;

/// Errors raised while building objects or composing a frame
///
/// Construction errors surface when an object is built; the rest abort the
/// current `show` call. Nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// More than 128 distinct colors in one layer
    PaletteOverflow,
    /// Odd-length coordinate list or too many points
    MalformedGeometry,
    /// Stroke thickness outside the supported range
    ThicknessOutOfRange(u8),
    /// Sprite width not a non-zero multiple of 32 up to 480
    InvalidSpriteWidth(u16),
    /// Sprite data not a whole number of rows, or too many rows
    InvalidSpriteDataLength(usize),
    /// Two text boxes intersect (indices into the frame's text list)
    TextOverlap { a: usize, b: usize },
    /// Character has no glyph
    GlyphNotFound(u32),
    /// Text longer than 255 bytes
    TextTooLong,
    /// Text records do not fit in one text page
    TextPageOverflow,
    /// Sprite RAM is full
    SpriteMemoryExhausted,
    /// More than 4096 distinct sprite sources in one frame
    TooManySprites,
    /// Text page ring does not fit the 16-bit page address
    InvalidConfig,
    /// Font lookup failed
    Font(FontError),
    /// Register transfer failed
    Bus(BusError),
}

impl From<BusError> for DisplayError {
    fn from(e: BusError) -> Self {
        DisplayError::Bus(e)
    }
}

impl From<FontError> for DisplayError {
    fn from(e: FontError) -> Self {
        match e {
            FontError::GlyphNotFound(cp) => DisplayError::GlyphNotFound(cp),
            other => DisplayError::Font(other),
        }
    }
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::PaletteOverflow => f.write_str("more than 128 colors in one layer"),
            DisplayError::MalformedGeometry => f.write_str("malformed point list"),
            DisplayError::ThicknessOutOfRange(t) => write!(f, "thickness {} out of range", t),
            DisplayError::InvalidSpriteWidth(w) => write!(f, "invalid sprite width {}", w),
            DisplayError::InvalidSpriteDataLength(n) => {
                write!(f, "invalid sprite data length {}", n)
            }
            DisplayError::TextOverlap { a, b } => write!(f, "text {} overlaps text {}", a, b),
            DisplayError::GlyphNotFound(cp) => write!(f, "no glyph for U+{:04X}", cp),
            DisplayError::TextTooLong => f.write_str("text longer than 255 bytes"),
            DisplayError::TextPageOverflow => f.write_str("text does not fit in a page"),
            DisplayError::SpriteMemoryExhausted => f.write_str("sprite memory exhausted"),
            DisplayError::TooManySprites => f.write_str("too many sprites in one frame"),
            DisplayError::InvalidConfig => f.write_str("text pages exceed the page address range"),
            DisplayError::Font(e) => write!(f, "font: {}", e),
            DisplayError::Bus(e) => write!(f, "bus: {}", e),
        }
    }
}
