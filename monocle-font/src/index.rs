//! Codepoint range index records

use core::cmp::Ordering;

/// Size of the container header (cell height + index size)
pub const HEADER_LEN: u32 = 8;

/// Size of one index record
pub const RECORD_LEN: u32 = 8;

/// Most codepoints a single record can cover
pub const MAX_RANGE_LEN: u32 = u8::MAX as u32;

/// One contiguous block of glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndexRecord {
    /// First codepoint in the block (24 bits)
    pub start: u32,
    /// Number of consecutive codepoints in the block
    pub count: u8,
    /// Offset of the block's first glyph, relative to the end of the index
    pub address: u32,
}

impl IndexRecord {
    /// Decode a record from its 8 wire bytes
    pub fn decode(bytes: [u8; RECORD_LEN as usize]) -> Self {
        let head = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Self {
            start: head >> 8,
            count: head as u8,
            address: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Encode a record into its 8 wire bytes
    pub fn encode(&self) -> [u8; RECORD_LEN as usize] {
        let head = (self.start << 8 | u32::from(self.count)).to_be_bytes();
        let addr = self.address.to_be_bytes();
        [
            head[0], head[1], head[2], head[3], addr[0], addr[1], addr[2], addr[3],
        ]
    }

    /// One past the last codepoint in the block
    pub fn end(&self) -> u32 {
        self.start + u32::from(self.count)
    }

    /// Where `codepoint` lies relative to this block
    ///
    /// `Less` means the block is below the codepoint (search higher),
    /// `Greater` means it is above (search lower).
    pub fn locate(&self, codepoint: u32) -> Ordering {
        if codepoint < self.start {
            Ordering::Greater
        } else if codepoint >= self.end() {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_layout() {
        let bytes = [0x00, 0x30, 0x00, 0xFF, 0x00, 0x00, 0x12, 0x34];
        let record = IndexRecord::decode(bytes);
        assert_eq!(record.start, 0x3000);
        assert_eq!(record.count, 0xFF);
        assert_eq!(record.address, 0x1234);
        assert_eq!(record.encode(), bytes);
    }

    #[test]
    fn test_locate_is_half_open() {
        let record = IndexRecord {
            start: 0x20,
            count: 95,
            address: 0,
        };
        assert_eq!(record.locate(0x1F), Ordering::Greater);
        assert_eq!(record.locate(0x20), Ordering::Equal);
        assert_eq!(record.locate(0x7E), Ordering::Equal);
        assert_eq!(record.locate(0x7F), Ordering::Less);
    }
}
