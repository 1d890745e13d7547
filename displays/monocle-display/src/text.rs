//! Text objects and justification

use heapless::String;

use crate::config::CellMetrics;
use crate::error::DisplayError;

/// Longest text a single record can carry
pub const MAX_TEXT_LEN: usize = 255;

/// Anchor point the text position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Justify {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Justify {
    /// Offset from the anchor to the top-left corner of a `width × height` box
    pub fn offset(self, width: i32, height: i32) -> (i32, i32) {
        use Justify::*;
        let dx = match self {
            TopLeft | MiddleLeft | BottomLeft => 0,
            TopCenter | MiddleCenter | BottomCenter => width / 2,
            TopRight | MiddleRight | BottomRight => width,
        };
        let dy = match self {
            TopLeft | TopCenter | TopRight => 0,
            MiddleLeft | MiddleCenter | MiddleRight => height / 2,
            BottomLeft | BottomCenter | BottomRight => height,
        };
        (-dx, -dy)
    }
}

/// A string positioned by its top-left corner
///
/// Justification is resolved once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Text {
    string: String<MAX_TEXT_LEN>,
    pub x: i32,
    pub y: i32,
    pub color: u32,
}

impl Text {
    /// Text justified against the default 24 × 48 cell
    pub fn new(
        string: &str,
        x: i32,
        y: i32,
        color: u32,
        justify: Justify,
    ) -> Result<Self, DisplayError> {
        Self::with_metrics(string, x, y, color, justify, &CellMetrics::DEFAULT)
    }

    /// Text justified against a custom cell
    pub fn with_metrics(
        string: &str,
        x: i32,
        y: i32,
        color: u32,
        justify: Justify,
        cell: &CellMetrics,
    ) -> Result<Self, DisplayError> {
        let string: String<MAX_TEXT_LEN> =
            String::try_from(string).map_err(|_| DisplayError::TextTooLong)?;
        let width = cell.text_width(string.chars().count());
        let (dx, dy) = justify.offset(width, i32::from(cell.height));
        Ok(Self {
            string,
            x: x.saturating_add(dx),
            y: y.saturating_add(dy),
            color,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_center() {
        let t = Text::new("hello", 0, 0, 0xFFFFFF, Justify::MiddleCenter).unwrap();
        assert_eq!((t.x, t.y), (-60, -24));
    }

    #[test]
    fn test_all_anchors() {
        let cases = [
            (Justify::TopLeft, (320, 200)),
            (Justify::TopCenter, (308, 200)),
            (Justify::TopRight, (296, 200)),
            (Justify::MiddleLeft, (320, 176)),
            (Justify::MiddleCenter, (308, 176)),
            (Justify::MiddleRight, (296, 176)),
            (Justify::BottomLeft, (320, 152)),
            (Justify::BottomCenter, (308, 152)),
            (Justify::BottomRight, (296, 152)),
        ];
        for (justify, expected) in cases {
            let t = Text::new(".", 320, 200, 0, justify).unwrap();
            assert_eq!((t.x, t.y), expected, "{:?}", justify);
        }
    }

    #[test]
    fn test_justify_saturates() {
        let t = Text::new("ab", i32::MIN, i32::MIN, 0, Justify::BottomRight).unwrap();
        assert_eq!((t.x, t.y), (i32::MIN, i32::MIN));
        let t = Text::new("ab", i32::MAX, 0, 0, Justify::TopLeft).unwrap();
        assert_eq!(t.x, i32::MAX);
    }

    #[test]
    fn test_letter_spacing_trims_right_edge() {
        let cell = CellMetrics {
            width: 10,
            height: 20,
            letter_spacing: 2,
        };
        let t = Text::with_metrics("abc", 100, 0, 0, Justify::TopRight, &cell).unwrap();
        assert_eq!(t.x, 72);
    }

    #[test]
    fn test_too_long() {
        let long = [b'a'; 256];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(
            Text::new(long, 0, 0, 0, Justify::TopLeft).err(),
            Some(DisplayError::TextTooLong)
        );
        assert!(Text::new(&long[..255], 0, 0, 0, Justify::TopLeft).is_ok());
    }
}
