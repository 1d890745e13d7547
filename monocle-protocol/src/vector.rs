//! Vector geometry records
//!
//! Record layout:
//! - KIND (1 byte): shape discriminant
//! - COLOR (1 byte): palette index
//! - THICKNESS (1 byte): stroke width in pixels (0 for rectangles)
//! - COUNT (1 byte): number of coordinates that follow
//! - COORDS (COUNT × 2 bytes): signed 16-bit big-endian values
//!
//! Lines and rectangles carry four coordinates (`x1 y1 x2 y2` and
//! `x y width height`); polylines and polygons carry `x0 y0 x1 y1 ...`.

/// Terminates a vector buffer
pub const VECTOR_END: u8 = 0x00;

/// Size of a record header
pub const HEADER_LEN: usize = 4;

/// Maximum coordinates in one record
pub const MAX_COORDS: usize = u8::MAX as usize;

/// Shape discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShapeKind {
    Line,
    Rectangle,
    Polyline,
    Polygon,
}

// Wire format values
const KIND_LINE: u8 = 0x01;
const KIND_RECTANGLE: u8 = 0x02;
const KIND_POLYLINE: u8 = 0x03;
const KIND_POLYGON: u8 = 0x04;

impl ShapeKind {
    /// Parse a kind from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            KIND_LINE => Some(ShapeKind::Line),
            KIND_RECTANGLE => Some(ShapeKind::Rectangle),
            KIND_POLYLINE => Some(ShapeKind::Polyline),
            KIND_POLYGON => Some(ShapeKind::Polygon),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ShapeKind::Line => KIND_LINE,
            ShapeKind::Rectangle => KIND_RECTANGLE,
            ShapeKind::Polyline => KIND_POLYLINE,
            ShapeKind::Polygon => KIND_POLYGON,
        }
    }
}

/// Fixed part of a vector record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecordHeader {
    pub kind: ShapeKind,
    pub color: u8,
    pub thickness: u8,
    pub count: u8,
}

impl RecordHeader {
    /// Encode the header
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        [self.kind.to_byte(), self.color, self.thickness, self.count]
    }

    /// Decode a header, `None` for an unknown kind (including [`VECTOR_END`])
    pub fn decode(bytes: [u8; HEADER_LEN]) -> Option<Self> {
        Some(Self {
            kind: ShapeKind::from_byte(bytes[0])?,
            color: bytes[1],
            thickness: bytes[2],
            count: bytes[3],
        })
    }

    /// Size of the whole record including coordinates
    pub fn record_len(&self) -> usize {
        HEADER_LEN + 2 * self.count as usize
    }
}

/// Encode a coordinate, saturating into the signed 16-bit wire range
pub fn encode_coord(value: i32) -> [u8; 2] {
    let clamped = value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    clamped.to_be_bytes()
}

/// Decode a coordinate
pub fn decode_coord(bytes: [u8; 2]) -> i16 {
    i16::from_be_bytes(bytes)
}
