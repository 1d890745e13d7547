//! Vector layer encoder

use alloc::vec::Vec;

use monocle_protocol::vector::encode_coord;
use monocle_protocol::{RecordHeader, ShapeKind, BUFFER_PREFIX, VECTOR_END};

use crate::color::ColorTable;
use crate::error::DisplayError;
use crate::shape::{Line, Polygon, Polyline, Rectangle};

/// A shape borrowed from the frame's object list
#[derive(Debug, Clone, Copy)]
pub enum VectorShape<'a> {
    Line(&'a Line),
    Rectangle(&'a Rectangle),
    Polyline(&'a Polyline),
    Polygon(&'a Polygon),
}

impl VectorShape<'_> {
    pub fn color(&self) -> u32 {
        match self {
            VectorShape::Line(l) => l.color,
            VectorShape::Rectangle(r) => r.color,
            VectorShape::Polyline(p) => p.color,
            VectorShape::Polygon(p) => p.fill_color,
        }
    }

    fn kind(&self) -> ShapeKind {
        match self {
            VectorShape::Line(_) => ShapeKind::Line,
            VectorShape::Rectangle(_) => ShapeKind::Rectangle,
            VectorShape::Polyline(_) => ShapeKind::Polyline,
            VectorShape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    fn thickness(&self) -> u8 {
        match self {
            VectorShape::Line(l) => l.thickness(),
            VectorShape::Rectangle(_) => 0,
            VectorShape::Polyline(p) => p.thickness(),
            VectorShape::Polygon(p) => p.thickness(),
        }
    }

    /// Append the record for this shape using palette index `color`
    pub fn encode(&self, color: u8, buf: &mut Vec<u8>) {
        let pair;
        let points: &[(i32, i32)] = match self {
            VectorShape::Line(l) => {
                pair = [(l.x1, l.y1), (l.x2, l.y2)];
                &pair
            }
            VectorShape::Rectangle(r) => {
                pair = [(r.x, r.y), (r.width, r.height)];
                &pair
            }
            VectorShape::Polyline(p) => p.points(),
            VectorShape::Polygon(p) => p.points(),
        };

        let header = RecordHeader {
            kind: self.kind(),
            color,
            thickness: self.thickness(),
            count: (points.len() * 2) as u8,
        };
        buf.reserve(header.record_len());
        buf.extend_from_slice(&header.encode());
        for &(x, y) in points {
            buf.extend_from_slice(&encode_coord(x));
            buf.extend_from_slice(&encode_coord(y));
        }
    }
}

/// Intern every shape's color into `palette` in draw order
pub fn build_palette(shapes: &[VectorShape<'_>], palette: &mut ColorTable) -> Result<(), DisplayError> {
    for shape in shapes {
        palette.intern(shape.color())?;
    }
    Ok(())
}

/// Encode the vector buffer: prefix, one record per shape, end byte
pub fn encode_vectors(
    shapes: &[VectorShape<'_>],
    palette: &mut ColorTable,
) -> Result<Vec<u8>, DisplayError> {
    let mut buf = Vec::from(BUFFER_PREFIX);
    for shape in shapes {
        let color = palette.intern(shape.color())?;
        shape.encode(color, &mut buf);
    }
    buf.push(VECTOR_END);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{GREEN, RED};
    use monocle_protocol::vector::{decode_coord, HEADER_LEN};

    #[test]
    fn test_two_rectangles() {
        let a = Rectangle::new(0, 0, 10, 10, RED);
        let b = Rectangle::new(5, 5, 15, 15, GREEN);
        let shapes = [VectorShape::Rectangle(&a), VectorShape::Rectangle(&b)];

        let mut palette = ColorTable::new();
        build_palette(&shapes, &mut palette).unwrap();
        let buf = encode_vectors(&shapes, &mut palette).unwrap();

        assert_eq!(palette.entries(), &[RED, GREEN]);
        assert_eq!(buf.len(), 2 + 2 * (HEADER_LEN + 8) + 1);
        assert_eq!(&buf[..2], &BUFFER_PREFIX);
        assert_eq!(
            RecordHeader::decode([buf[2], buf[3], buf[4], buf[5]]),
            Some(RecordHeader {
                kind: ShapeKind::Rectangle,
                color: 0,
                thickness: 0,
                count: 4,
            })
        );
        assert_eq!(buf[15], 1);
        assert_eq!(decode_coord([buf[18], buf[19]]), 5);
        assert_eq!(*buf.last().unwrap(), VECTOR_END);
    }

    #[test]
    fn test_polygon_record() {
        let p = Polygon::new(&[-1, 2, 300, -400], RED, 3).unwrap();
        let mut palette = ColorTable::new();
        let buf = encode_vectors(&[VectorShape::Polygon(&p)], &mut palette).unwrap();
        assert_eq!(&buf[2..6], &[4, 0, 3, 4]);
        let coords: std::vec::Vec<i16> = buf[6..14]
            .chunks_exact(2)
            .map(|c| decode_coord([c[0], c[1]]))
            .collect();
        assert_eq!(coords, vec![-1, 2, 300, -400]);
    }

    #[test]
    fn test_line_record_saturates() {
        let l = Line::new(0, 0, 100_000, -100_000, GREEN, 2).unwrap();
        let mut buf = Vec::new();
        VectorShape::Line(&l).encode(9, &mut buf);
        assert_eq!(&buf[..4], &[1, 9, 2, 4]);
        assert_eq!(decode_coord([buf[8], buf[9]]), i16::MAX);
        assert_eq!(decode_coord([buf[10], buf[11]]), i16::MIN);
    }

    #[test]
    fn test_empty_layer() {
        let mut palette = ColorTable::new();
        let buf = encode_vectors(&[], &mut palette).unwrap();
        assert_eq!(buf, vec![0, 0, VECTOR_END]);
        assert!(palette.is_empty());
    }

    #[test]
    fn test_palette_overflow() {
        let lines: std::vec::Vec<Line> = (0..129u32)
            .map(|c| Line::new(0, 0, 1, 1, c, 1).unwrap())
            .collect();
        let shapes: std::vec::Vec<VectorShape> = lines.iter().map(VectorShape::Line).collect();
        let mut palette = ColorTable::new();
        assert_eq!(
            build_palette(&shapes, &mut palette),
            Err(DisplayError::PaletteOverflow)
        );
    }
}
